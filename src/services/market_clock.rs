use chrono::{DateTime, Datelike, FixedOffset, NaiveTime, Utc, Weekday};

/// Pure "is the market open" test against a fixed daily window in the
/// exchange's local timezone. No I/O; callers inject timestamps in tests.
#[derive(Debug, Clone, Copy)]
pub struct MarketClock {
    offset: FixedOffset,
    open: NaiveTime,
    close: NaiveTime,
}

impl MarketClock {
    pub fn new(offset: FixedOffset, open: NaiveTime, close: NaiveTime) -> Self {
        Self { offset, open, close }
    }

    /// NSE: 09:15–15:30 IST. IST is a fixed UTC+5:30, no DST.
    pub fn nse() -> Self {
        let offset = FixedOffset::east_opt(5 * 3600 + 1800).unwrap();
        let open = NaiveTime::from_hms_opt(9, 15, 0).unwrap();
        let close = NaiveTime::from_hms_opt(15, 30, 0).unwrap();
        Self::new(offset, open, close)
    }

    /// Open iff `now` falls on a weekday within [open, close], both ends
    /// inclusive.
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        let local = now.with_timezone(&self.offset);
        if matches!(local.weekday(), Weekday::Sat | Weekday::Sun) {
            return false;
        }
        let t = local.time();
        self.open <= t && t <= self.close
    }

    pub fn is_open(&self) -> bool {
        self.is_open_at(Utc::now())
    }
}
