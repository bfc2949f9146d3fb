use crate::{
    error::ReturnsError,
    table::{Table, present, validate_index},
};
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// [`Series`] of a single asset's prices.
pub type PriceSeries<Key> = Series<Key>;

/// Named single column of `f64` values indexed by a strictly increasing time `Key`.
///
/// Missing values are represented by [`f64::NAN`].
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(
    try_from = "RawSeries<Key>",
    into = "RawSeries<Key>",
    bound(
        serialize = "Key: Serialize + Clone",
        deserialize = "Key: Deserialize<'de> + Ord"
    )
)]
pub struct Series<Key> {
    name: SmolStr,
    index: Vec<Key>,
    values: Vec<f64>,
}

impl<Key> Series<Key>
where
    Key: Ord,
{
    /// Construct a validated [`Series`].
    pub fn new(
        name: impl Into<SmolStr>,
        index: Vec<Key>,
        values: Vec<f64>,
    ) -> Result<Self, ReturnsError> {
        let name = name.into();

        validate_index(&index)?;

        if values.len() != index.len() {
            return Err(ReturnsError::ColumnLength {
                column: name,
                expected: index.len(),
                actual: values.len(),
            });
        }

        Ok(Self {
            name,
            index,
            values,
        })
    }
}

impl<Key> Series<Key> {
    pub(crate) fn from_parts(name: SmolStr, index: Vec<Key>, values: Vec<f64>) -> Self {
        debug_assert_eq!(index.len(), values.len());
        Self {
            name,
            index,
            values,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn index(&self) -> &[Key] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Convert into a one-column [`Table`] labelled with the [`Series`] name.
    pub fn into_table(self) -> Table<Key> {
        let rows = self.values.into_iter().map(|value| vec![value]).collect();
        Table::from_parts(self.index, vec![self.name], rows)
    }
}

#[derive(Deserialize, Serialize)]
struct RawSeries<Key> {
    name: SmolStr,
    index: Vec<Key>,
    values: Vec<Option<f64>>,
}

impl<Key> TryFrom<RawSeries<Key>> for Series<Key>
where
    Key: Ord,
{
    type Error = ReturnsError;

    fn try_from(raw: RawSeries<Key>) -> Result<Self, Self::Error> {
        let values = raw
            .values
            .into_iter()
            .map(|value| value.unwrap_or(f64::NAN))
            .collect();

        Self::new(raw.name, raw.index, values)
    }
}

impl<Key> From<Series<Key>> for RawSeries<Key> {
    fn from(series: Series<Key>) -> Self {
        Self {
            name: series.name,
            index: series.index,
            values: series.values.into_iter().map(present).collect(),
        }
    }
}
