use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One OHLCV bar of a price history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bar {
    /// Start of the bar interval
    pub timestamp: DateTime<Utc>,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    /// Closing price (required)
    pub close: f64,
    pub volume: u64,
}

impl Bar {
    /// Create a bar where every price equals `close`
    pub fn flat(timestamp: DateTime<Utc>, close: f64, volume: u64) -> Self {
        Self {
            timestamp,
            open: close,
            high: close,
            low: close,
            close,
            volume,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_flat_bar() {
        let ts = Utc.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let bar = Bar::flat(ts, 185.5, 1_000);
        assert_eq!(bar.open, 185.5);
        assert_eq!(bar.low, 185.5);
        assert_eq!(bar.close, 185.5);
        assert_eq!(bar.volume, 1_000);
    }
}
