//! Normalized result sets shared by every backend.

use serde_json::Map;

use crate::db::value::{FromSqlValue, SqlValue};
use crate::error::{DbError, DbResult};

/// One output record: column name to JSON value, in projection order.
pub type Record = Map<String, serde_json::Value>;

/// ## Summary
/// Resolves the column names for a result.
///
/// Driver-reported names win when every one of them is present and they cover
/// the row width. Otherwise the caller's known projection is used if it has the
/// right width, and as a last resort positional `col_N` names are synthesized.
#[must_use]
pub fn resolve_column_names(
    reported: &[Option<String>],
    width: usize,
    projection: Option<&[&str]>,
) -> Vec<String> {
    let complete = reported.len() == width
        && reported
            .iter()
            .all(|name| name.as_deref().is_some_and(|n| !n.is_empty()));
    if complete {
        return reported.iter().flatten().cloned().collect();
    }

    if let Some(projection) = projection
        && projection.len() == width
    {
        tracing::debug!(
            reported = reported.len(),
            width,
            "Column names missing from driver, using known projection"
        );
        return projection.iter().map(ToString::to_string).collect();
    }

    tracing::warn!(
        reported = reported.len(),
        width,
        "Column names unavailable, synthesizing positional names"
    );
    (0..width).map(|i| format!("col_{i}")).collect()
}

/// Rows returned by a statement plus its change metadata.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResultSet {
    columns: Vec<String>,
    rows: Vec<Vec<SqlValue>>,
    rows_affected: u64,
    last_insert_rowid: Option<i64>,
}

impl ResultSet {
    /// ## Summary
    /// Builds a result set from what a driver reported, normalizing the column names.
    ///
    /// ## Errors
    /// Returns `DbError::ProtocolError` if the rows do not share one width.
    pub fn from_driver(
        reported: &[Option<String>],
        rows: Vec<Vec<SqlValue>>,
        projection: Option<&[&str]>,
    ) -> DbResult<Self> {
        let width = rows.first().map_or_else(
            || {
                if reported.is_empty() {
                    projection.map_or(0, <[&str]>::len)
                } else {
                    reported.len()
                }
            },
            Vec::len,
        );
        if let Some(bad) = rows.iter().position(|row| row.len() != width) {
            return Err(DbError::ProtocolError(format!(
                "row {bad} has {} values, expected {width}",
                rows[bad].len()
            )));
        }

        Ok(Self {
            columns: resolve_column_names(reported, width, projection),
            rows,
            rows_affected: 0,
            last_insert_rowid: None,
        })
    }

    /// A result for a statement that changed rows and returned none.
    #[must_use]
    pub const fn changes(rows_affected: u64, last_insert_rowid: Option<i64>) -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
            rows_affected,
            last_insert_rowid,
        }
    }

    #[must_use]
    pub const fn with_changes(mut self, rows_affected: u64, last_insert_rowid: Option<i64>) -> Self {
        self.rows_affected = rows_affected;
        self.last_insert_rowid = last_insert_rowid;
        self
    }

    #[must_use]
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    #[must_use]
    pub const fn rows_affected(&self) -> u64 {
        self.rows_affected
    }

    #[must_use]
    pub const fn last_insert_rowid(&self) -> Option<i64> {
        self.last_insert_rowid
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        self.rows.iter().map(|values| Row {
            columns: &self.columns,
            values,
        })
    }

    /// Converts every row to a JSON record, preserving row order.
    #[must_use]
    pub fn into_records(self) -> Vec<Record> {
        let Self { columns, rows, .. } = self;
        rows.into_iter()
            .map(|values| {
                columns
                    .iter()
                    .cloned()
                    .zip(values.iter().map(SqlValue::to_json))
                    .collect()
            })
            .collect()
    }

    /// ## Summary
    /// Decodes every row into `T`.
    ///
    /// ## Errors
    /// Returns the first decode failure.
    pub fn decode<T: FromRow>(&self) -> DbResult<Vec<T>> {
        self.rows().map(|row| T::from_row(&row)).collect()
    }

    /// ## Summary
    /// Decodes the first row into `T`, if there is one.
    ///
    /// ## Errors
    /// Returns a decode failure for the first row.
    pub fn first<T: FromRow>(&self) -> DbResult<Option<T>> {
        self.rows().next().map(|row| T::from_row(&row)).transpose()
    }
}

/// A borrowed view of one row.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    columns: &'a [String],
    values: &'a [SqlValue],
}

impl<'a> Row<'a> {
    /// Raw value by column name.
    #[must_use]
    pub fn value(&self, column: &str) -> Option<&'a SqlValue> {
        self.columns
            .iter()
            .position(|c| c == column)
            .map(|idx| &self.values[idx])
    }

    /// ## Summary
    /// Typed value by column name.
    ///
    /// ## Errors
    /// Returns `DbError::DecodeError` if the column is absent or the value does not convert.
    pub fn get<T: FromSqlValue>(&self, column: &str) -> DbResult<T> {
        let value = self
            .value(column)
            .ok_or_else(|| DbError::DecodeError(format!("missing column '{column}'")))?;
        T::from_sql(value).map_err(|e| match e {
            DbError::DecodeError(msg) => DbError::DecodeError(format!("column '{column}': {msg}")),
            other => other,
        })
    }

    /// ## Summary
    /// Typed value by position.
    ///
    /// ## Errors
    /// Returns `DbError::DecodeError` if the index is out of range or the value does not convert.
    pub fn get_at<T: FromSqlValue>(&self, index: usize) -> DbResult<T> {
        let value = self
            .values
            .get(index)
            .ok_or_else(|| DbError::DecodeError(format!("missing column #{index}")))?;
        T::from_sql(value)
    }
}

/// Conversion from a row into a typed record.
pub trait FromRow: Sized {
    /// ## Errors
    /// Returns `DbError::DecodeError` when a required column is missing or malformed.
    fn from_row(row: &Row<'_>) -> DbResult<Self>;
}

impl FromRow for Record {
    fn from_row(row: &Row<'_>) -> DbResult<Self> {
        Ok(row
            .columns
            .iter()
            .cloned()
            .zip(row.values.iter().map(SqlValue::to_json))
            .collect())
    }
}
