/// Outcome of one price lookup. "Unavailable" is an explicit state, never a
/// zero or NaN sentinel: a missing quote must be distinguishable from any
/// real price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Quote {
    Price(f64),
    Unavailable,
}

impl Quote {
    pub fn price(self) -> Option<f64> {
        match self {
            Quote::Price(p) => Some(p),
            Quote::Unavailable => None,
        }
    }
}

/// Prices are quoted to 2 fractional digits.
pub fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
