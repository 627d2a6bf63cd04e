use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::sync::Mutex;
use tokio::time::{self, MissedTickBehavior};

use crate::error::EngineError;
use crate::models::{Alert, Quote};
use crate::services::alert_store::AlertStore;
use crate::services::directory::UserDirectory;
use crate::services::notifier::{alert_message, Notifier};
use crate::services::quotes::QuoteSource;

/// Alerts retired during one cycle. Whatever is not here survived unchanged.
#[derive(Debug)]
pub struct CycleReport {
    pub triggered: Vec<Alert>,
    pub retained: usize,
}

/// The evaluation engine. One `run_cycle` call is one full pass:
/// refresh directory, load alerts, evaluate each in order, notify and retire
/// the hits, atomically persist the survivors.
///
/// `cycle_lock` keeps scheduled and manual cycles from overlapping: the
/// load -> mutate -> save-all pattern would lose updates under concurrent
/// execution.
pub struct Engine {
    quotes: Arc<dyn QuoteSource>,
    store: Arc<dyn AlertStore>,
    directory: Arc<UserDirectory>,
    notifier: Notifier,
    cycle_lock: Mutex<()>,
}

impl Engine {
    pub fn new(
        quotes: Arc<dyn QuoteSource>,
        store: Arc<dyn AlertStore>,
        directory: Arc<UserDirectory>,
        notifier: Notifier,
    ) -> Self {
        Self {
            quotes,
            store,
            directory,
            notifier,
            cycle_lock: Mutex::new(()),
        }
    }

    pub async fn run_cycle(&self, filter_owner: Option<&str>) -> Result<CycleReport, EngineError> {
        let _guard = self.cycle_lock.lock().await;

        // Fail-soft: a dead messaging provider must not stop evaluation, we
        // just keep notifying against the last known directory state.
        if let Err(e) = self.directory.refresh().await {
            tracing::warn!(error = %e, "directory refresh failed, using last known state");
        }

        let alerts = self.store.load_all().await?;

        let in_scope = |a: &Alert| filter_owner.map_or(true, |owner| a.owner == owner);

        // Quote fetches are independent per symbol and may run concurrently;
        // the retain/retire decisions below stay single-threaded.
        let mut symbols: Vec<String> = alerts
            .iter()
            .filter(|a| in_scope(a))
            .map(|a| a.symbol.clone())
            .collect();
        symbols.sort();
        symbols.dedup();

        let fetches = symbols.into_iter().map(|symbol| {
            let quotes = Arc::clone(&self.quotes);
            async move {
                let quote = quotes.fetch(&symbol).await;
                (symbol, quote)
            }
        });
        let prices: HashMap<String, Quote> = join_all(fetches).await.into_iter().collect();

        let mut surviving: Vec<Alert> = Vec::with_capacity(alerts.len());
        let mut triggered: Vec<Alert> = Vec::new();

        for alert in alerts {
            if !in_scope(&alert) {
                surviving.push(alert);
                continue;
            }

            let price = prices
                .get(&alert.symbol)
                .copied()
                .unwrap_or(Quote::Unavailable)
                .price();

            let Some(price) = price else {
                // Can't evaluate, don't punish: missing data never costs the
                // user an alert.
                surviving.push(alert);
                continue;
            };

            if !alert.is_hit(price) {
                surviving.push(alert);
                continue;
            }

            match self.directory.resolve(&alert.owner).await {
                Some(chat_id) => {
                    let msg = alert_message(&alert, price);
                    tracing::info!(
                        symbol = %alert.symbol,
                        owner = %alert.owner,
                        price,
                        "alert triggered"
                    );
                    // Delivery is at-most-once: the alert is retired even if
                    // the send fails.
                    self.notifier.notify(chat_id, &msg).await;
                    triggered.push(alert);
                }
                None => {
                    // Unresolved owner retains: a hit we cannot deliver stays
                    // active instead of being silently discarded.
                    tracing::warn!(
                        symbol = %alert.symbol,
                        owner = %alert.owner,
                        "alert hit but owner is unreachable, retaining"
                    );
                    surviving.push(alert);
                }
            }
        }

        // Persistence failure is the one fatal outcome: claiming success
        // here would make retained alerts vanish without having triggered.
        self.store.save_all(&surviving).await?;

        Ok(CycleReport {
            triggered,
            retained: surviving.len(),
        })
    }
}

/// Background driver: one owned ticker, one cycle at a time. Because the
/// cycle itself holds the engine mutex, a slow cycle delays the next tick
/// instead of overlapping it.
pub fn spawn_engine(engine: Arc<Engine>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        loop {
            ticker.tick().await;

            match engine.run_cycle(None).await {
                Ok(report) if report.triggered.is_empty() => {
                    tracing::debug!(retained = report.retained, "cycle complete, no triggers");
                }
                Ok(report) => {
                    tracing::info!(
                        triggered = report.triggered.len(),
                        retained = report.retained,
                        "cycle complete"
                    );
                }
                Err(e) => {
                    tracing::error!(error = %e, "cycle failed");
                }
            }
        }
    });
}
