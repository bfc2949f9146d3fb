use crate::error::ReturnsError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

/// Single labelled column of values sharing a time index. See [`Series`].
pub mod series;

pub use series::{PriceSeries, Series};

/// [`Table`] of asset prices, one column per asset.
pub type PriceTable<Key> = Table<Key>;

/// [`Table`] of fractional (or logarithmic) returns, one column per asset.
pub type ReturnTable<Key> = Table<Key>;

/// Two-dimensional `f64` table, rows indexed by an ordered time `Key` and columns labelled by
/// asset name.
///
/// Missing values are represented by [`f64::NAN`].
///
/// # Invariants
/// - The index is strictly increasing.
/// - Column labels are unique.
/// - Every row holds exactly one value per column.
///
/// # Example
/// ```
/// use chrono::NaiveDate;
/// use finquant_returns::table::PriceTable;
///
/// let day = |d| NaiveDate::from_ymd_opt(2024, 1, d).unwrap();
///
/// let prices = PriceTable::new(
///     vec![day(2), day(3)],
///     ["AAPL", "MSFT"],
///     vec![vec![185.6, 370.9], vec![184.3, 370.6]],
/// )
/// .unwrap();
///
/// assert_eq!(prices.len(), 2);
/// assert_eq!(prices.width(), 2);
/// assert_eq!(prices.value(1, 0), Some(184.3));
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(
    try_from = "RawTable<Key>",
    into = "RawTable<Key>",
    bound(
        serialize = "Key: Serialize + Clone",
        deserialize = "Key: Deserialize<'de> + Ord"
    )
)]
pub struct Table<Key> {
    index: Vec<Key>,
    columns: Vec<SmolStr>,
    rows: Vec<Vec<f64>>,
}

impl<Key> Table<Key>
where
    Key: Ord,
{
    /// Construct a validated [`Table`] from row-major values.
    pub fn new<Label>(
        index: Vec<Key>,
        columns: impl IntoIterator<Item = Label>,
        rows: Vec<Vec<f64>>,
    ) -> Result<Self, ReturnsError>
    where
        Label: Into<SmolStr>,
    {
        let columns = columns.into_iter().map(Into::into).collect::<Vec<_>>();

        validate_index(&index)?;
        validate_columns(&columns)?;

        if rows.len() != index.len() {
            return Err(ReturnsError::IndexLength {
                expected: index.len(),
                actual: rows.len(),
            });
        }

        if let Some((row, values)) = rows
            .iter()
            .enumerate()
            .find(|(_, values)| values.len() != columns.len())
        {
            return Err(ReturnsError::RowLength {
                row,
                expected: columns.len(),
                actual: values.len(),
            });
        }

        Ok(Self {
            index,
            columns,
            rows,
        })
    }

    /// Construct a validated [`Table`] from column-major `(label, values)` pairs.
    pub fn from_columns<Label>(
        index: Vec<Key>,
        columns: impl IntoIterator<Item = (Label, Vec<f64>)>,
    ) -> Result<Self, ReturnsError>
    where
        Label: Into<SmolStr>,
    {
        let (labels, values): (Vec<SmolStr>, Vec<Vec<f64>>) = columns
            .into_iter()
            .map(|(label, values)| (label.into(), values))
            .unzip();

        if let Some((label, column)) = labels
            .iter()
            .zip(&values)
            .find(|(_, column)| column.len() != index.len())
        {
            return Err(ReturnsError::ColumnLength {
                column: label.clone(),
                expected: index.len(),
                actual: column.len(),
            });
        }

        let rows = (0..index.len())
            .map(|row| values.iter().map(|column| column[row]).collect())
            .collect();

        Self::new(index, labels, rows)
    }
}

impl<Key> Table<Key> {
    /// Construct a [`Table`] whose invariants are already guaranteed by the caller.
    ///
    /// Used by derivations that only ever filter rows of a validated [`Table`].
    pub(crate) fn from_parts(index: Vec<Key>, columns: Vec<SmolStr>, rows: Vec<Vec<f64>>) -> Self {
        debug_assert_eq!(index.len(), rows.len());
        debug_assert!(rows.iter().all(|row| row.len() == columns.len()));
        Self {
            index,
            columns,
            rows,
        }
    }

    /// Construct an empty [`Table`] with the provided column labels.
    pub fn empty(columns: Vec<SmolStr>) -> Self {
        Self::from_parts(Vec::new(), columns, Vec::new())
    }

    pub fn index(&self) -> &[Key] {
        &self.index
    }

    pub fn columns(&self) -> &[SmolStr] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<f64>] {
        &self.rows
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of columns.
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn row(&self, row: usize) -> Option<(&Key, &[f64])> {
        self.index
            .get(row)
            .zip(self.rows.get(row))
            .map(|(key, values)| (key, values.as_slice()))
    }

    pub fn value(&self, row: usize, column: usize) -> Option<f64> {
        self.rows.get(row).and_then(|values| values.get(column)).copied()
    }

    pub fn column_position(&self, label: &str) -> Option<usize> {
        self.columns.iter().position(|column| column == label)
    }

    /// Iterate over `(key, row)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&Key, &[f64])> {
        self.index.iter().zip(self.rows.iter().map(Vec::as_slice))
    }

    /// Iterate over the values of the column at the provided position, in index order.
    pub fn column_values(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        self.rows.iter().map(move |row| row[column])
    }

    /// Decompose the [`Table`] into `(index, columns, rows)`.
    pub fn into_parts(self) -> (Vec<Key>, Vec<SmolStr>, Vec<Vec<f64>>) {
        (self.index, self.columns, self.rows)
    }

    /// Keep only the rows satisfying the predicate, preserving order.
    pub(crate) fn retain_rows<F>(self, mut keep: F) -> Self
    where
        F: FnMut(&[f64]) -> bool,
    {
        let (index, rows) = self
            .index
            .into_iter()
            .zip(self.rows)
            .filter(|(_, row)| keep(row))
            .unzip();

        Self::from_parts(index, self.columns, rows)
    }

    /// Apply `op` to every value, preserving shape and labels.
    pub(crate) fn map_values<F>(self, mut op: F) -> Self
    where
        F: FnMut(f64) -> f64,
    {
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(&mut op).collect())
            .collect();

        Self::from_parts(self.index, self.columns, rows)
    }
}

impl<Key> Table<Key>
where
    Key: Clone,
{
    /// Extract the column with the provided label as a [`Series`].
    pub fn column(&self, label: &str) -> Result<Series<Key>, ReturnsError> {
        let position = self
            .column_position(label)
            .ok_or_else(|| ReturnsError::UnknownColumn(SmolStr::new(label)))?;

        Ok(Series::from_parts(
            self.columns[position].clone(),
            self.index.clone(),
            self.column_values(position).collect(),
        ))
    }
}

pub(crate) fn validate_index<Key>(index: &[Key]) -> Result<(), ReturnsError>
where
    Key: Ord,
{
    match index.windows(2).position(|pair| pair[0] >= pair[1]) {
        Some(position) => Err(ReturnsError::UnorderedIndex {
            position: position + 1,
        }),
        None => Ok(()),
    }
}

fn validate_columns(columns: &[SmolStr]) -> Result<(), ReturnsError> {
    match columns.iter().duplicates().next() {
        Some(duplicate) => Err(ReturnsError::DuplicateColumn(duplicate.clone())),
        None => Ok(()),
    }
}

/// Wire representation of a [`Table`], with missing values as `null`.
#[derive(Deserialize, Serialize)]
struct RawTable<Key> {
    index: Vec<Key>,
    columns: Vec<SmolStr>,
    rows: Vec<Vec<Option<f64>>>,
}

impl<Key> TryFrom<RawTable<Key>> for Table<Key>
where
    Key: Ord,
{
    type Error = ReturnsError;

    fn try_from(raw: RawTable<Key>) -> Result<Self, Self::Error> {
        let rows = raw
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(|value| value.unwrap_or(f64::NAN)).collect())
            .collect();

        Self::new(raw.index, raw.columns, rows)
    }
}

impl<Key> From<Table<Key>> for RawTable<Key> {
    fn from(table: Table<Key>) -> Self {
        let rows = table
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(present).collect())
            .collect();

        Self {
            index: table.index,
            columns: table.columns,
            rows,
        }
    }
}

pub(crate) fn present(value: f64) -> Option<f64> {
    (!value.is_nan()).then_some(value)
}
