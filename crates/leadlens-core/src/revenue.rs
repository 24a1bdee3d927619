//! Revenue values and the revenue parser collaborator.

use serde::{Deserialize, Serialize};

/// Revenue exactly as the data source delivers it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RawRevenue {
    Number(f64),
    Text(String),
}

/// Normalises raw revenue into a non-negative number.
///
/// Implementations must return `0.0` for missing or unparseable input; the
/// engine treats `0.0` as "no revenue".
pub trait RevenueParser: Send + Sync {
    fn parse(&self, raw: Option<&RawRevenue>) -> f64;
}

/// Default parser for plain numbers and currency-formatted strings such as
/// `"$1,250.50"` or `"₹ 4 000"`.
#[derive(Debug, Clone, Copy, Default)]
pub struct CurrencyRevenueParser;

impl RevenueParser for CurrencyRevenueParser {
    fn parse(&self, raw: Option<&RawRevenue>) -> f64 {
        let value = match raw {
            None => return 0.0,
            Some(RawRevenue::Number(n)) => *n,
            Some(RawRevenue::Text(text)) => {
                let cleaned: String = text
                    .chars()
                    .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                    .collect();
                cleaned.parse::<f64>().unwrap_or(0.0)
            }
        };

        if value.is_finite() && value > 0.0 {
            value
        } else {
            0.0
        }
    }
}

/// Closed numeric interval `[min, max]`, serialised as a two-element array.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "(f64, f64)", into = "(f64, f64)")]
pub struct RevenueRange {
    pub min: f64,
    pub max: f64,
}

impl RevenueRange {
    /// Range used when no account carries a positive revenue.
    pub const DEFAULT: RevenueRange = RevenueRange {
        min: 0.0,
        max: 1_000_000.0,
    };

    /// Creates a range, swapping the bounds if they are reversed.
    #[must_use]
    pub fn new(min: f64, max: f64) -> Self {
        if min <= max {
            Self { min, max }
        } else {
            Self { min: max, max: min }
        }
    }

    #[must_use]
    pub fn contains(&self, value: f64) -> bool {
        self.min <= value && value <= self.max
    }

    /// Intersection of two ranges, `None` when they are disjoint.
    #[must_use]
    pub fn intersect(&self, other: &RevenueRange) -> Option<RevenueRange> {
        let min = self.min.max(other.min);
        let max = self.max.min(other.max);
        (min <= max).then_some(RevenueRange { min, max })
    }
}

impl Default for RevenueRange {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl From<(f64, f64)> for RevenueRange {
    fn from((min, max): (f64, f64)) -> Self {
        Self::new(min, max)
    }
}

impl From<RevenueRange> for (f64, f64) {
    fn from(range: RevenueRange) -> Self {
        (range.min, range.max)
    }
}
