use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Cash dividend paid per share.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dividend {
    pub date: DateTime<Utc>,
    pub amount: f64,
}

/// Stock split event, expressed as `numerator`-for-`denominator`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Split {
    pub date: DateTime<Utc>,
    pub numerator: f64,
    pub denominator: f64,
}

impl Split {
    /// Shares after the split for each share held before it.
    ///
    /// A zero denominator yields 0 rather than infinity.
    pub fn ratio(&self) -> f64 {
        if self.denominator == 0.0 {
            0.0
        } else {
            self.numerator / self.denominator
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_ratio() {
        let split = Split {
            date: Utc::now(),
            numerator: 4.0,
            denominator: 1.0,
        };
        assert_eq!(split.ratio(), 4.0);

        let reverse = Split {
            date: Utc::now(),
            numerator: 1.0,
            denominator: 10.0,
        };
        assert!((reverse.ratio() - 0.1).abs() < f64::EPSILON);

        let broken = Split {
            date: Utc::now(),
            numerator: 2.0,
            denominator: 0.0,
        };
        assert_eq!(broken.ratio(), 0.0);
    }
}
