pub mod market_clock;
pub mod quotes;
pub mod storage;
pub mod telegram;

pub mod alert_store;
pub mod directory;
pub mod engine;
pub mod notifier;
