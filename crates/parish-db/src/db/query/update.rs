use crate::db::DbConnection;
use crate::db::query::column::Column;
use crate::db::statement::Statement;
use crate::db::value::SqlValue;
use crate::error::DbResult;

/// What a partial update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    /// The target row was changed.
    Applied,
    /// Every supplied field was absent; storage was not touched.
    NoChanges,
    /// No row matched the key.
    Missing,
}

/// ## Summary
/// Builds a single-row partial `UPDATE`.
///
/// `None` values mean "leave unchanged" and are dropped. The remaining columns
/// become `SET col = ?` in the order they were supplied, the audit column (if
/// any) is stamped with `CURRENT_TIMESTAMP`, and the key value is bound last.
#[derive(Debug, Clone)]
pub struct UpdateQuery<C: Column> {
    table: &'static str,
    sets: Vec<(C, SqlValue)>,
    touch: Option<C>,
}

impl<C: Column> UpdateQuery<C> {
    #[must_use]
    pub const fn new(table: &'static str) -> Self {
        Self {
            table,
            sets: Vec::new(),
            touch: None,
        }
    }

    /// Sets `column` when `value` is present. A column supplied twice keeps its
    /// first position and its last value.
    #[must_use]
    pub fn set<V: Into<SqlValue>>(mut self, column: C, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.into();
            if let Some(existing) = self.sets.iter_mut().find(|(c, _)| *c == column) {
                existing.1 = value;
            } else {
                self.sets.push((column, value));
            }
        }
        self
    }

    /// Stamps `column` with `CURRENT_TIMESTAMP` whenever the update runs.
    #[must_use]
    pub const fn touch(mut self, column: C) -> Self {
        self.touch = Some(column);
        self
    }

    /// Whether the effective field set is empty.
    #[must_use]
    pub fn is_noop(&self) -> bool {
        self.sets.is_empty()
    }

    /// Renders `UPDATE table SET ... WHERE key = ?`, or `None` for an empty field set.
    #[must_use]
    pub fn build(self, key: C, key_value: impl Into<SqlValue>) -> Option<Statement> {
        if self.is_noop() {
            return None;
        }

        let mut assignments: Vec<String> = self
            .sets
            .iter()
            .map(|(column, _)| format!("{} = ?", column.name()))
            .collect();
        if let Some(touch) = self.touch {
            assignments.push(format!("{} = CURRENT_TIMESTAMP", touch.name()));
        }

        let sql = format!(
            "UPDATE {} SET {} WHERE {} = ?",
            self.table,
            assignments.join(", "),
            key.name()
        );
        let mut args: Vec<SqlValue> = self.sets.into_iter().map(|(_, value)| value).collect();
        args.push(key_value.into());

        Some(Statement {
            sql,
            args,
            projection: None,
        })
    }

    /// ## Summary
    /// Builds and runs the update against one row.
    ///
    /// ## Errors
    /// Returns storage failures. Zero affected rows is reported as
    /// `UpdateOutcome::Missing`, not an error.
    #[tracing::instrument(skip(self, conn, key_value), fields(table = self.table))]
    pub async fn apply(
        self,
        conn: &mut DbConnection,
        key: C,
        key_value: impl Into<SqlValue>,
    ) -> DbResult<UpdateOutcome> {
        let Some(stmt) = self.build(key, key_value) else {
            tracing::debug!("No effective fields, skipping update");
            return Ok(UpdateOutcome::NoChanges);
        };

        let rs = conn.execute(&stmt).await?;
        if rs.rows_affected() == 0 {
            Ok(UpdateOutcome::Missing)
        } else {
            Ok(UpdateOutcome::Applied)
        }
    }
}
