use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use stockwatch::services::alert_store::JsonFileAlertStore;
use stockwatch::services::directory::UserDirectory;
use stockwatch::services::engine::{spawn_engine, Engine};
use stockwatch::services::market_clock::MarketClock;
use stockwatch::services::notifier::Notifier;
use stockwatch::services::quotes::YahooQuoteSource;
use stockwatch::services::telegram::{Messaging, TelegramClient};
use stockwatch::{config, routes, AppState};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let settings = config::load();
    if settings.telegram_bot_token.is_empty() {
        tracing::warn!("TELEGRAM_BOT_TOKEN is empty; notifications will fail");
    }

    let messaging: Arc<dyn Messaging> = Arc::new(TelegramClient::new(
        settings.telegram_api_base.clone(),
        settings.telegram_bot_token.clone(),
    ));

    let quotes = Arc::new(YahooQuoteSource::new(
        MarketClock::nse(),
        Duration::from_secs(settings.quote_timeout_secs),
    ));

    let store = Arc::new(JsonFileAlertStore::new(&settings.alerts_file));

    let directory = Arc::new(
        UserDirectory::open(&settings.users_file, Arc::clone(&messaging))
            .await
            .expect("failed to load user directory"),
    );

    let engine = Arc::new(Engine::new(
        quotes,
        store.clone(),
        directory.clone(),
        Notifier::new(messaging),
    ));

    spawn_engine(
        engine.clone(),
        Duration::from_secs(settings.check_interval_secs),
    );

    let state = AppState {
        settings: settings.clone(),
        store,
        directory,
        engine,
    };

    let app = routes::app(state);

    let addr = SocketAddr::from((
        settings.host.parse::<std::net::IpAddr>().unwrap(),
        settings.port,
    ));
    tracing::info!("listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
