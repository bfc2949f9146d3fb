use crate::statistic::time::TimeInterval;
use serde::{Deserialize, Serialize};

/// Represents a mean Rate of Return value over a specific [`TimeInterval`].
///
/// Rate of Return measures the percentage change in value over a time period.
/// Unlike risk-adjusted metrics, returns scale linearly with time.
///
/// See docs: <https://www.investopedia.com/terms/r/rateofreturn.asp>
#[derive(Debug, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct RateOfReturn<Interval> {
    pub value: f64,
    pub interval: Interval,
}

impl<Interval> RateOfReturn<Interval>
where
    Interval: TimeInterval,
{
    /// Calculate the [`RateOfReturn`] over the provided [`TimeInterval`].
    pub fn calculate(mean_return: f64, returns_period: Interval) -> Self {
        Self {
            value: mean_return,
            interval: returns_period,
        }
    }

    /// Scale the [`RateOfReturn`] from the current [`TimeInterval`] to the provided
    /// [`TimeInterval`].
    ///
    /// Scaling is linear (simple interest), so a 1% daily return scales to 252% over
    /// [`Annual252`](crate::statistic::time::Annual252), not √252%.
    ///
    /// A missing (`NaN`) value stays missing.
    pub fn scale<TargetInterval>(self, target: TargetInterval) -> RateOfReturn<TargetInterval>
    where
        TargetInterval: TimeInterval,
    {
        // Determine scale factor: linear scaling of Self Intervals in TargetIntervals
        let scale = target.interval().num_seconds().abs() as f64
            / self.interval.interval().num_seconds().abs() as f64;

        RateOfReturn {
            value: self.value * scale,
            interval: target,
        }
    }
}
