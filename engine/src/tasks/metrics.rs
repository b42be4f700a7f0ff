//! Aggregation primitives shared by the task scorers.

use serde::{Deserialize, Serialize};

/// Mean RT and accuracy for one phase or condition.
#[derive(Debug, Default, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockSummary {
    pub mean_rt_ms: f64,
    pub accuracy_pct: f64,
}

/// Arithmetic mean; an empty set averages to 0.
pub fn mean<I>(values: I) -> f64
where
    I: IntoIterator<Item = u64>,
{
    let (sum, count) = values
        .into_iter()
        .fold((0u64, 0u64), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        0.0
    } else {
        sum as f64 / count as f64
    }
}

/// Percentage with one decimal, `round(part / total × 1000) / 10`. 0 when
/// `total` is 0.
pub fn pct(part: usize, total: usize) -> f64 {
    if total == 0 {
        return 0.0;
    }
    (part as f64 / total as f64 * 1000.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_sets_are_zero() {
        assert_eq!(mean(Vec::<u64>::new()), 0.0);
        assert_eq!(pct(0, 0), 0.0);
        assert_eq!(pct(3, 0), 0.0);
    }

    #[test]
    fn pct_keeps_one_decimal() {
        assert_eq!(pct(2, 3), 66.7);
        assert_eq!(pct(1, 3), 33.3);
        assert_eq!(pct(5, 5), 100.0);
    }

    #[test]
    fn mean_of_values() {
        assert_eq!(mean([100, 200, 600]), 300.0);
        assert_eq!(mean([1, 2]), 1.5);
    }
}
