use crate::{
    error::ReturnsError,
    statistic::{
        algorithm::mean_skip_missing,
        metric::rate_of_return::RateOfReturn,
        time::{Daily, trading_days},
    },
    table::{PriceSeries, PriceTable, ReturnTable, Series, Table},
};
use indexmap::IndexMap;
use itertools::Itertools;
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use smol_str::SmolStr;
use tracing::{debug, trace};

/// Cumulative returns of each asset relative to the first complete row of prices.
///
/// `R = (price_t - price_0 + dividend) / price_0`
///
/// Rows with a missing price for *any* asset are dropped before the baseline is chosen, so the
/// baseline is the first row where every asset is priced. Returns an empty [`ReturnTable`] if no
/// such row exists.
pub fn cumulative_returns<Key>(data: &PriceTable<Key>, dividend: f64) -> ReturnTable<Key>
where
    Key: Clone,
{
    let retained = data.clone().retain_rows(|row| !row.iter().any(|price| price.is_nan()));

    debug!(
        input_rows = data.len(),
        retained_rows = retained.len(),
        dividend,
        "calculating cumulative returns"
    );

    let (index, columns, rows) = retained.into_parts();

    let Some(baseline) = rows.first().cloned() else {
        return Table::empty(columns);
    };

    let rows = rows
        .into_iter()
        .map(|row| {
            row.into_iter()
                .zip(&baseline)
                .map(|(price, base)| (price - base + dividend) / base)
                .collect()
        })
        .collect();

    Table::from_parts(index, columns, rows)
}

/// Daily percentage change of each asset's price.
///
/// `R = price_t / price_t-1 - 1`
///
/// Missing prices are first forward-filled from the last observed price of the same asset, so a
/// gap yields a `0.0` return and the next observation is measured against the last known price.
/// Leading missing prices have nothing to fill from and stay `NaN`.
///
/// The first row has no predecessor and is never part of the output. Rows where *every* asset
/// return is missing are dropped. Infinite returns (from a zero previous price) are then
/// replaced with `NaN`, without any further row filtering.
pub fn daily_returns<Key>(data: &PriceTable<Key>) -> ReturnTable<Key>
where
    Key: Clone,
{
    let filled = forward_fill(data.rows(), data.width());

    let (index, rows): (Vec<Key>, Vec<Vec<f64>>) = data
        .index()
        .iter()
        .zip(&filled)
        .tuple_windows()
        .map(|((_, prev), (key, next))| {
            let row = prev
                .iter()
                .zip(next)
                .map(|(prev, next)| next / prev - 1.0)
                .collect::<Vec<_>>();

            (key.clone(), row)
        })
        .filter(|(_, row)| !is_all_missing(row))
        .unzip();

    debug!(
        input_rows = data.len(),
        output_rows = index.len(),
        "calculated daily returns"
    );

    Table::from_parts(index, data.columns().to_vec(), rows).map_values(replace_infinite)
}

/// Per-row dot product of [`daily_returns`] and the asset weights.
///
/// Weights are not normalised. Missing returns propagate as `NaN`.
pub fn weighted_mean_daily_returns<Key>(
    data: &PriceTable<Key>,
    weights: &[f64],
) -> Result<Vec<f64>, ReturnsError>
where
    Key: Clone,
{
    if weights.len() != data.width() {
        return Err(ReturnsError::DimensionMismatch {
            expected: data.width(),
            actual: weights.len(),
        });
    }

    let weighted = daily_returns(data)
        .rows()
        .iter()
        .map(|row| row.iter().zip(weights).map(|(ret, weight)| ret * weight).sum::<f64>())
        .collect();

    Ok(weighted)
}

/// Daily logarithmic returns, `ln(1 + R)` where `R` is the [`daily_returns`] value.
///
/// A daily return of `-1` or below (price fell to zero or changed sign) has no real logarithm
/// and yields `NaN`. Rows where every asset is missing are dropped.
pub fn daily_log_returns<Key>(data: &PriceTable<Key>) -> ReturnTable<Key>
where
    Key: Clone,
{
    let log_returns = daily_returns(data)
        .map_values(log_return)
        .retain_rows(|row| !is_all_missing(row));

    debug!(output_rows = log_returns.len(), "calculated daily log returns");

    log_returns
}

/// Mean [`daily_returns`] of each asset, annualised by `freq` periods.
///
/// The mean skips missing returns; an asset with no defined return has a `NaN` mean.
///
/// Accepts anything implementing [`IntoPriceData`]: a [`PriceTable`] yields
/// [`MeanReturn::PerAsset`], a [`PriceSeries`] yields [`MeanReturn::Scalar`]. Untyped input
/// (eg/ [`serde_json::Value`]) fails with [`ReturnsError::InvalidArgument`] if it is neither.
///
/// # Example
/// ```
/// use finquant_returns::{historical_mean_return, table::PriceSeries};
///
/// let prices = PriceSeries::new("spy", vec![1, 2, 3], vec![100.0, 110.0, 121.0]).unwrap();
///
/// let mean = historical_mean_return(prices, 252).unwrap().scalar().unwrap();
/// assert!((mean - 25.2).abs() < 1e-9);
/// ```
pub fn historical_mean_return<Key, Data>(data: Data, freq: u32) -> Result<MeanReturn, ReturnsError>
where
    Key: Clone,
    Data: IntoPriceData<Key>,
{
    let data = data.into_price_data()?;
    Ok(data.historical_mean_return(freq))
}

/// Conversion into the [`PriceData`] accepted by [`historical_mean_return`].
pub trait IntoPriceData<Key> {
    fn into_price_data(self) -> Result<PriceData<Key>, ReturnsError>;
}

impl<Key> IntoPriceData<Key> for PriceData<Key> {
    fn into_price_data(self) -> Result<PriceData<Key>, ReturnsError> {
        Ok(self)
    }
}

impl<Key> IntoPriceData<Key> for Table<Key> {
    fn into_price_data(self) -> Result<PriceData<Key>, ReturnsError> {
        Ok(PriceData::Table(self))
    }
}

impl<Key> IntoPriceData<Key> for Series<Key> {
    fn into_price_data(self) -> Result<PriceData<Key>, ReturnsError> {
        Ok(PriceData::Series(self))
    }
}

impl<Key> IntoPriceData<Key> for serde_json::Value
where
    Key: DeserializeOwned + Ord,
{
    fn into_price_data(self) -> Result<PriceData<Key>, ReturnsError> {
        PriceData::try_from(self)
    }
}

/// Price input accepted by [`historical_mean_return`].
#[derive(Debug, Clone, PartialEq)]
pub enum PriceData<Key> {
    Table(PriceTable<Key>),
    Series(PriceSeries<Key>),
}

impl<Key> PriceData<Key>
where
    Key: Clone,
{
    /// Mean daily return annualised by `freq` periods. See [`historical_mean_return`].
    pub fn historical_mean_return(&self, freq: u32) -> MeanReturn {
        match self {
            Self::Table(table) => {
                let returns = daily_returns(table);
                let means = returns
                    .columns()
                    .iter()
                    .enumerate()
                    .map(|(column, asset)| {
                        let mean = mean_skip_missing(returns.column_values(column));
                        (asset.clone(), annualise(mean, freq))
                    })
                    .collect();

                MeanReturn::PerAsset(means)
            }
            Self::Series(series) => {
                let returns = daily_returns(&series.clone().into_table());
                let mean = mean_skip_missing(returns.column_values(0));

                MeanReturn::Scalar(annualise(mean, freq))
            }
        }
    }
}

impl<Key> From<Table<Key>> for PriceData<Key> {
    fn from(value: Table<Key>) -> Self {
        Self::Table(value)
    }
}

impl<Key> From<Series<Key>> for PriceData<Key> {
    fn from(value: Series<Key>) -> Self {
        Self::Series(value)
    }
}

impl<Key> TryFrom<serde_json::Value> for PriceData<Key>
where
    Key: DeserializeOwned + Ord,
{
    type Error = ReturnsError;

    /// Interpret JSON as a serialised [`Table`] or [`Series`]. Any other JSON value, including a
    /// plain list of prices or an arbitrary object, is an [`ReturnsError::InvalidArgument`].
    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        let serde_json::Value::Object(object) = &value else {
            return Err(ReturnsError::InvalidArgument(format!(
                "data must be a price table or price series, found JSON {}",
                json_kind(&value)
            )));
        };

        if object.contains_key("columns") && object.contains_key("rows") {
            serde_json::from_value::<Table<Key>>(value)
                .map(Self::Table)
                .map_err(|error| ReturnsError::InvalidArgument(error.to_string()))
        } else if object.contains_key("name") && object.contains_key("values") {
            serde_json::from_value::<Series<Key>>(value)
                .map(Self::Series)
                .map_err(|error| ReturnsError::InvalidArgument(error.to_string()))
        } else {
            Err(ReturnsError::InvalidArgument(
                "data must be a price table or price series, found JSON object".to_string(),
            ))
        }
    }
}

/// Output of [`historical_mean_return`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub enum MeanReturn {
    /// Annualised mean return of each asset, in column order.
    PerAsset(IndexMap<SmolStr, f64>),
    /// Annualised mean return of a single series.
    Scalar(f64),
}

impl MeanReturn {
    /// Annualised mean return of the provided asset, if present.
    pub fn asset(&self, asset: &str) -> Option<f64> {
        match self {
            Self::PerAsset(means) => means.get(asset).copied(),
            Self::Scalar(_) => None,
        }
    }

    pub fn scalar(&self) -> Option<f64> {
        match self {
            Self::PerAsset(_) => None,
            Self::Scalar(mean) => Some(*mean),
        }
    }
}

fn annualise(mean_daily: f64, freq: u32) -> f64 {
    let annual = RateOfReturn::calculate(mean_daily, Daily).scale(trading_days(freq));
    trace!(mean_daily, freq, annual = annual.value, "annualised mean return");
    annual.value
}

/// Replace each missing value with the last observed value of its column.
fn forward_fill(rows: &[Vec<f64>], width: usize) -> Vec<Vec<f64>> {
    let mut last = vec![f64::NAN; width];

    rows.iter()
        .map(|row| {
            row.iter()
                .zip(last.iter_mut())
                .map(|(value, filled)| {
                    if !value.is_nan() {
                        *filled = *value;
                    }
                    *filled
                })
                .collect()
        })
        .collect()
}

fn is_all_missing(row: &[f64]) -> bool {
    row.iter().all(|value| value.is_nan())
}

fn replace_infinite(value: f64) -> f64 {
    if value.is_infinite() { f64::NAN } else { value }
}

fn log_return(daily_return: f64) -> f64 {
    if daily_return <= -1.0 {
        f64::NAN
    } else {
        daily_return.ln_1p()
    }
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "bool",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn single_asset(prices: Vec<f64>) -> PriceTable<usize> {
        let index = (0..prices.len()).collect();
        PriceTable::from_columns(index, [("spy", prices)]).unwrap()
    }

    fn column(table: &ReturnTable<usize>, position: usize) -> Vec<f64> {
        table.column_values(position).collect()
    }

    #[test]
    fn test_cumulative_returns_single_asset() {
        let actual = cumulative_returns(&single_asset(vec![100.0, 110.0, 121.0]), 0.0);

        let values = column(&actual, 0);
        assert_eq!(actual.index(), &[0, 1, 2]);
        assert_eq!(values[0], 0.0);
        assert_relative_eq!(values[1], 0.1, epsilon = 1e-12);
        assert_relative_eq!(values[2], 0.21, epsilon = 1e-12);
    }

    #[test]
    fn test_cumulative_returns_drops_rows_with_any_missing_price() {
        let prices = PriceTable::new(
            vec![0, 1, 2, 3],
            ["a", "b"],
            vec![
                vec![f64::NAN, 50.0],
                vec![100.0, 50.0],
                vec![120.0, f64::NAN],
                vec![150.0, 75.0],
            ],
        )
        .unwrap();

        let actual = cumulative_returns(&prices, 0.0);

        // Baseline becomes row 1, the first complete row
        assert_eq!(actual.index(), &[1, 3]);
        assert_eq!(actual.rows(), &[vec![0.0, 0.0], vec![0.5, 0.5]]);
    }

    #[test]
    fn test_cumulative_returns_with_dividend() {
        let actual = cumulative_returns(&single_asset(vec![100.0, 100.0, 105.0]), 2.0);

        assert_eq!(column(&actual, 0), vec![0.02, 0.02, 0.07]);
    }

    #[test]
    fn test_cumulative_returns_empty() {
        let all_missing = single_asset(vec![f64::NAN, f64::NAN]);

        let actual = cumulative_returns(&all_missing, 0.0);

        assert!(actual.is_empty());
        assert_eq!(actual.columns(), &[SmolStr::new("spy")]);
    }

    #[test]
    fn test_daily_returns() {
        struct TestCase {
            input: Vec<f64>,
            expected_index: Vec<usize>,
            expected: Vec<f64>,
        }

        let cases = vec![
            // TC0: compounding 10% moves
            TestCase {
                input: vec![100.0, 110.0, 121.0],
                expected_index: vec![1, 2],
                expected: vec![0.1, 0.1],
            },
            // TC1: unchanged price yields exactly zero
            TestCase {
                input: vec![42.0, 42.0, 42.0],
                expected_index: vec![1, 2],
                expected: vec![0.0, 0.0],
            },
            // TC2: single row has no daily return
            TestCase {
                input: vec![100.0],
                expected_index: vec![],
                expected: vec![],
            },
            // TC3: missing price is forward-filled, so the gap is a zero return
            TestCase {
                input: vec![100.0, f64::NAN, 50.0, 25.0],
                expected_index: vec![1, 2, 3],
                expected: vec![0.0, -0.5, -0.5],
            },
            // TC4: leading missing prices have nothing to fill from
            TestCase {
                input: vec![f64::NAN, f64::NAN, 50.0, 55.0],
                expected_index: vec![3],
                expected: vec![0.1],
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = daily_returns(&single_asset(test.input));

            assert_eq!(actual.index(), test.expected_index.as_slice(), "TC{index} failed");
            for (actual, expected) in column(&actual, 0).into_iter().zip(test.expected) {
                assert!((actual - expected).abs() < 1e-12, "TC{index} failed");
            }
        }
    }

    #[test]
    fn test_daily_returns_keeps_partially_missing_rows() {
        let prices = PriceTable::new(
            vec![0, 1, 2],
            ["a", "b"],
            vec![vec![10.0, f64::NAN], vec![11.0, f64::NAN], vec![11.0, 4.0]],
        )
        .unwrap();

        let actual = daily_returns(&prices);

        assert_eq!(actual.index(), &[1, 2]);
        assert_relative_eq!(actual.value(0, 0).unwrap(), 0.1, epsilon = 1e-12);
        assert!(actual.value(0, 1).unwrap().is_nan());
        assert_eq!(actual.value(1, 0), Some(0.0));
        assert!(actual.value(1, 1).unwrap().is_nan());
    }

    #[test]
    fn test_daily_returns_replaces_infinity_after_dropping_rows() {
        let prices = PriceTable::new(
            vec![0, 1, 2],
            ["a", "b"],
            vec![vec![0.0, 0.0], vec![5.0, 0.0], vec![10.0, 0.0]],
        )
        .unwrap();

        let actual = daily_returns(&prices);

        // Row 1 is [inf, NaN]: not all missing when filtered, so it survives as all NaN
        assert_eq!(actual.index(), &[1, 2]);
        assert!(actual.rows()[0].iter().all(|value| value.is_nan()));
        assert_eq!(actual.value(1, 0), Some(1.0));
        assert!(actual.value(1, 1).unwrap().is_nan());
    }

    #[test]
    fn test_daily_log_returns_matches_daily_returns() {
        let prices = single_asset(vec![100.0, 104.0, 98.0, 101.5, 101.5]);

        let simple = daily_returns(&prices);
        let log = daily_log_returns(&prices);

        assert_eq!(simple.index(), log.index());
        for (simple, log) in column(&simple, 0).into_iter().zip(column(&log, 0)) {
            assert_relative_eq!(log.exp() - 1.0, simple, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_daily_log_returns_non_positive_argument_is_nan() {
        let prices = PriceTable::new(
            vec![0, 1, 2],
            ["a", "b"],
            vec![vec![10.0, 10.0], vec![0.0, 11.0], vec![-1.0, 12.0]],
        )
        .unwrap();

        let actual = daily_log_returns(&prices);

        assert_eq!(actual.index(), &[1, 2]);
        assert!(actual.value(0, 0).unwrap().is_nan());
        assert_relative_eq!(actual.value(0, 1).unwrap(), 1.1_f64.ln(), epsilon = 1e-12);
        assert!(actual.value(1, 0).unwrap().is_nan());
    }

    #[test]
    fn test_daily_log_returns_drops_all_missing_rows() {
        let prices = PriceTable::new(
            vec![0, 1, 2],
            ["a"],
            vec![vec![10.0], vec![0.0], vec![5.0]],
        )
        .unwrap();

        // Daily returns: [-1.0, NaN (inf replaced)], both undefined after the log transform
        let actual = daily_log_returns(&prices);

        assert!(actual.is_empty());
    }

    #[test]
    fn test_weighted_mean_daily_returns() {
        let prices = PriceTable::new(
            vec![0, 1, 2],
            ["a", "b"],
            vec![vec![100.0, 10.0], vec![110.0, 9.0], vec![121.0, 9.0]],
        )
        .unwrap();

        let actual = weighted_mean_daily_returns(&prices, &[0.25, 0.75]).unwrap();

        assert_eq!(actual.len(), 2);
        assert_relative_eq!(actual[0], 0.25 * 0.1 + 0.75 * -0.1, epsilon = 1e-12);
        assert_relative_eq!(actual[1], 0.25 * 0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_mean_daily_returns_dimension_mismatch() {
        let actual = weighted_mean_daily_returns(&single_asset(vec![1.0, 2.0]), &[0.5, 0.5]);

        assert_eq!(
            actual,
            Err(ReturnsError::DimensionMismatch {
                expected: 1,
                actual: 2,
            })
        );
    }

    #[test]
    fn test_historical_mean_return_table() {
        let prices = PriceTable::new(
            vec![0, 1, 2],
            ["a", "b"],
            vec![vec![100.0, f64::NAN], vec![110.0, f64::NAN], vec![121.0, 50.0]],
        )
        .unwrap();

        let actual = historical_mean_return(prices, 252).unwrap();

        let MeanReturn::PerAsset(means) = &actual else {
            panic!("table input must yield per-asset means");
        };
        assert_eq!(means.keys().collect::<Vec<_>>(), vec!["a", "b"]);
        assert_relative_eq!(actual.asset("a").unwrap(), 25.2, epsilon = 1e-9);
        assert!(actual.asset("b").unwrap().is_nan());
        assert_eq!(actual.scalar(), None);
    }

    #[test]
    fn test_historical_mean_return_fills_gaps() {
        let prices = single_asset(vec![100.0, f64::NAN, 50.0, 25.0]);

        let weighted = weighted_mean_daily_returns(&prices, &[1.0]).unwrap();
        let actual = historical_mean_return(prices, 1).unwrap();

        assert_eq!(weighted, vec![0.0, -0.5, -0.5]);
        assert_relative_eq!(actual.asset("spy").unwrap(), -1.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_historical_mean_return_custom_freq() {
        let prices = Series::new("spy", vec![0, 1, 2], vec![100.0, 101.0, 100.0]).unwrap();

        let actual = historical_mean_return(prices, 12).unwrap().scalar().unwrap();

        let expected = (0.01 + (100.0 / 101.0 - 1.0)) / 2.0 * 12.0;
        assert_relative_eq!(actual, expected, epsilon = 1e-12);
    }

    #[test]
    fn test_historical_mean_return_rejects_untyped_input() {
        struct TestCase {
            input: serde_json::Value,
        }

        let cases = vec![
            // TC0: plain list of prices
            TestCase {
                input: serde_json::json!([100.0, 110.0, 121.0]),
            },
            // TC1: plain dict of prices
            TestCase {
                input: serde_json::json!({"spy": [100.0, 110.0, 121.0]}),
            },
            // TC2: scalar
            TestCase {
                input: serde_json::json!(100.0),
            },
        ];

        for (index, test) in cases.into_iter().enumerate() {
            let actual = historical_mean_return::<usize, _>(test.input, 252);
            assert!(
                matches!(actual, Err(ReturnsError::InvalidArgument(_))),
                "TC{index} failed"
            );
        }
    }

    #[test]
    fn test_historical_mean_return_from_json_series() {
        let input = serde_json::json!({
            "name": "spy",
            "index": [0, 1, 2],
            "values": [100.0, 110.0, 121.0]
        });

        let actual = historical_mean_return::<usize, _>(input, 252).unwrap();

        assert_relative_eq!(actual.scalar().unwrap(), 25.2, epsilon = 1e-9);
    }
}
