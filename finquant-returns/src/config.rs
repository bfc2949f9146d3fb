use crate::{
    error::ReturnsError,
    returns::{self, IntoPriceData, MeanReturn},
    table::{PriceTable, ReturnTable},
};
use serde::{Deserialize, Serialize};

/// Default annualisation factor: trading days in a year.
pub const DEFAULT_FREQ: u32 = 252;

/// Parameters for the returns calculations that take them, with the conventional defaults.
///
/// Missing fields deserialise to their default, so `{}` is a valid configuration.
///
/// # Example
/// ```
/// use finquant_returns::config::ReturnsConfig;
///
/// let config: ReturnsConfig = serde_json::from_str(r#"{ "dividend": 1.5 }"#).unwrap();
///
/// assert_eq!(config.dividend, 1.5);
/// assert_eq!(config.freq, 252);
/// ```
#[derive(Debug, Copy, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ReturnsConfig {
    /// Dividend added to every price change in [`returns::cumulative_returns`].
    pub dividend: f64,

    /// Number of periods per year used by [`returns::historical_mean_return`].
    pub freq: u32,
}

impl Default for ReturnsConfig {
    fn default() -> Self {
        Self {
            dividend: 0.0,
            freq: DEFAULT_FREQ,
        }
    }
}

impl ReturnsConfig {
    /// Parse a [`ReturnsConfig`] from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ReturnsError> {
        serde_json::from_str(json).map_err(|error| ReturnsError::InvalidArgument(error.to_string()))
    }

    /// [`returns::cumulative_returns`] with the configured dividend.
    pub fn cumulative_returns<Key>(&self, data: &PriceTable<Key>) -> ReturnTable<Key>
    where
        Key: Clone,
    {
        returns::cumulative_returns(data, self.dividend)
    }

    /// [`returns::historical_mean_return`] with the configured annualisation factor.
    pub fn historical_mean_return<Key, Data>(&self, data: Data) -> Result<MeanReturn, ReturnsError>
    where
        Key: Clone,
        Data: IntoPriceData<Key>,
    {
        returns::historical_mean_return(data, self.freq)
    }
}
