use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::AlertError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Condition {
    Above,
    Below,
}

impl fmt::Display for Condition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Condition::Above => write!(f, "above"),
            Condition::Below => write!(f, "below"),
        }
    }
}

impl FromStr for Condition {
    type Err = AlertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "above" => Ok(Condition::Above),
            "below" => Ok(Condition::Below),
            other => Err(AlertError::InvalidCondition(other.to_string())),
        }
    }
}

/// One standing watch condition. Removal matches on `id` only, never on the
/// field tuple (two alerts may share symbol/condition/threshold).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: String,
    pub symbol: String,
    pub condition: Condition,
    pub threshold: f64,
    pub owner: String,
}

impl Alert {
    /// Validated construction: the only way alerts enter the system.
    /// Symbols are stored exchange-qualified, owners "@"-prefixed.
    pub fn new(
        symbol: &str,
        condition: Condition,
        threshold: f64,
        owner: &str,
        exchange_suffix: &str,
    ) -> Result<Self, AlertError> {
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(AlertError::InvalidThreshold);
        }

        let symbol = qualify_symbol(symbol, exchange_suffix)?;
        let owner =
            normalize_handle(owner).ok_or_else(|| AlertError::InvalidOwner(owner.to_string()))?;

        Ok(Alert {
            id: Uuid::new_v4().to_string(),
            symbol,
            condition,
            threshold,
            owner,
        })
    }

    pub fn is_hit(&self, price: f64) -> bool {
        // Strict inequality both directions: a quote exactly at the
        // threshold does not trigger.
        match self.condition {
            Condition::Above => price > self.threshold,
            Condition::Below => price < self.threshold,
        }
    }
}

fn symbol_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Z0-9][A-Z0-9&-]*(\.[A-Z]{1,4})?$").unwrap())
}

/// Uppercase the ticker and attach the exchange suffix when the caller
/// passed a bare symbol ("reliance" -> "RELIANCE.NS").
pub fn qualify_symbol(raw: &str, exchange_suffix: &str) -> Result<String, AlertError> {
    let mut sym = raw.trim().to_uppercase();
    if sym.is_empty() {
        return Err(AlertError::InvalidSymbol(raw.to_string()));
    }
    if !sym.contains('.') {
        sym.push_str(exchange_suffix);
    }
    if !symbol_re().is_match(&sym) {
        return Err(AlertError::InvalidSymbol(raw.to_string()));
    }
    Ok(sym)
}

/// "bob" and "@bob" both mean the Telegram handle "@bob".
pub fn normalize_handle(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_start_matches('@');
    if trimmed.is_empty() || trimmed.contains(char::is_whitespace) {
        return None;
    }
    Some(format!("@{trimmed}"))
}
