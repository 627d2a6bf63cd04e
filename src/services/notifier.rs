use std::sync::Arc;

use crate::models::Alert;
use crate::services::telegram::Messaging;

/// Best-effort delivery. A failed send is logged and swallowed; it must not
/// stall the rest of the cycle.
pub struct Notifier {
    messaging: Arc<dyn Messaging>,
}

impl Notifier {
    pub fn new(messaging: Arc<dyn Messaging>) -> Self {
        Self { messaging }
    }

    pub async fn notify(&self, chat_id: i64, text: &str) {
        if let Err(e) = self.messaging.send_message(chat_id, text).await {
            tracing::warn!(chat_id, error = %e, "alert delivery failed");
        }
    }
}

fn fmt2(x: f64) -> String {
    format!("{:.2}", x)
}

/// Human-readable trigger message. Wording is not a contract, but it must
/// carry the symbol, the condition, the threshold and the observed price.
pub fn alert_message(alert: &Alert, price: f64) -> String {
    format!(
        "🔔 {} is {} {} (Current: {})",
        alert.symbol,
        alert.condition,
        fmt2(alert.threshold),
        fmt2(price)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    #[test]
    fn message_embeds_all_four_values() {
        let alert = Alert::new("RELIANCE", Condition::Above, 2500.0, "@bob", ".NS").unwrap();
        let msg = alert_message(&alert, 2550.25);
        assert!(msg.contains("RELIANCE.NS"));
        assert!(msg.contains("above"));
        assert!(msg.contains("2500.0"));
        assert!(msg.contains("2550.25"));
    }
}
