use serde::{Deserialize, Serialize};

/// Which close price a feature row is paired with.
///
/// Both policies build the row at index `i` from data up to and including
/// `i`, with the previous close taken from `i - 1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelPolicy {
    /// Target is `close[i]`: "what is the price now given trailing indicators".
    /// The moving averages and the daily return include today's close.
    SameDay,
    /// Target is `close[i + 1]`. The last row has no target; it is excluded
    /// from the dataset but remains available for forecasting.
    NextDay,
}

impl LabelPolicy {
    /// Row offset of the target relative to the feature row
    pub fn target_offset(&self) -> usize {
        match self {
            Self::SameDay => 0,
            Self::NextDay => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::SameDay => "Same-day close",
            Self::NextDay => "Next-day close",
        }
    }

    /// Target for the row at `idx`, if the series extends far enough
    pub fn target(&self, closes: &[f64], idx: usize) -> Option<f64> {
        closes.get(idx + self.target_offset()).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_targets() {
        let closes = [1.0, 2.0, 3.0];
        assert_eq!(LabelPolicy::SameDay.target(&closes, 2), Some(3.0));
        assert_eq!(LabelPolicy::NextDay.target(&closes, 1), Some(3.0));
        assert_eq!(LabelPolicy::NextDay.target(&closes, 2), None);
    }
}
