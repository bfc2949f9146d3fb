use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use smol_str::{SmolStr, format_smolstr};

/// Period over which a metric is expressed, eg/ one trading day or one year of trading days.
pub trait TimeInterval: Copy {
    fn name(&self) -> SmolStr;
    fn interval(&self) -> TimeDelta;
}

/// One year of 252 trading days.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Annual252;

impl TimeInterval for Annual252 {
    fn name(&self) -> SmolStr {
        SmolStr::new("Annual(252)")
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::days(252)
    }
}

/// One observation period of a daily price table.
#[derive(Debug, Copy, Clone, PartialEq, PartialOrd, Default, Deserialize, Serialize)]
pub struct Daily;

impl TimeInterval for Daily {
    fn name(&self) -> SmolStr {
        SmolStr::new("Daily")
    }

    fn interval(&self) -> TimeDelta {
        TimeDelta::days(1)
    }
}

impl TimeInterval for TimeDelta {
    fn name(&self) -> SmolStr {
        format_smolstr!("Duration {} (days)", self.num_days())
    }

    fn interval(&self) -> TimeDelta {
        *self
    }
}

/// Interval spanning `periods` [`Daily`] observations, eg/ `trading_days(252)` is equivalent
/// to [`Annual252`].
pub fn trading_days(periods: u32) -> TimeDelta {
    TimeDelta::days(i64::from(periods))
}
