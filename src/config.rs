use std::env;

#[derive(Debug, Clone)]
pub struct Settings {
    pub host: String,
    pub port: u16,

    pub telegram_bot_token: String,
    pub telegram_api_base: String,

    pub alerts_file: String,
    pub users_file: String,

    pub exchange_suffix: String,
    pub check_interval_secs: u64,
    pub quote_timeout_secs: u64,
}

pub fn load() -> Settings {
    // Loads .env if present (no crash if missing)
    dotenvy::dotenv().ok();

    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());

    let port = env::var("PORT")
        .ok()
        .and_then(|s| s.parse::<u16>().ok())
        .unwrap_or(5000);

    let telegram_bot_token = env::var("TELEGRAM_BOT_TOKEN").unwrap_or_default();

    let telegram_api_base = env::var("TELEGRAM_API_BASE")
        .unwrap_or_else(|_| "https://api.telegram.org".to_string());

    let alerts_file = env::var("ALERTS_FILE").unwrap_or_else(|_| "alerts.json".to_string());

    let users_file = env::var("USERS_FILE").unwrap_or_else(|_| "telegram_users.json".to_string());

    let exchange_suffix = env::var("EXCHANGE_SUFFIX").unwrap_or_else(|_| ".NS".to_string());

    let check_interval_secs = env::var("CHECK_INTERVAL_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(60);

    let quote_timeout_secs = env::var("QUOTE_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);

    Settings {
        host,
        port,
        telegram_bot_token,
        telegram_api_base,
        alerts_file,
        users_file,
        exchange_suffix,
        check_interval_secs,
        quote_timeout_secs,
    }
}
