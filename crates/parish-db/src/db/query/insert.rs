use crate::db::query::column::Column;
use crate::db::statement::Statement;
use crate::db::value::SqlValue;

/// Builds `INSERT INTO table (cols) VALUES (?, ...)` from whitelisted columns.
#[derive(Debug, Clone)]
pub struct InsertQuery<C: Column> {
    table: &'static str,
    values: Vec<(C, SqlValue)>,
    or_ignore: bool,
}

impl<C: Column> InsertQuery<C> {
    #[must_use]
    pub const fn new(table: &'static str) -> Self {
        Self {
            table,
            values: Vec::new(),
            or_ignore: false,
        }
    }

    /// Uses `INSERT OR IGNORE`, leaving existing rows that collide on a unique key untouched.
    #[must_use]
    pub const fn or_ignore(mut self) -> Self {
        self.or_ignore = true;
        self
    }

    /// Binds `value` (which may be NULL) to `column`.
    #[must_use]
    pub fn value(mut self, column: C, value: impl Into<SqlValue>) -> Self {
        self.values.push((column, value.into()));
        self
    }

    #[must_use]
    pub fn build(self) -> Statement {
        let columns: Vec<&str> = self.values.iter().map(|(c, _)| c.name()).collect();
        let placeholders = vec!["?"; columns.len()].join(", ");
        let verb = if self.or_ignore {
            "INSERT OR IGNORE INTO"
        } else {
            "INSERT INTO"
        };
        Statement {
            sql: format!(
                "{verb} {} ({}) VALUES ({placeholders})",
                self.table,
                columns.join(", ")
            ),
            args: self.values.into_iter().map(|(_, v)| v).collect(),
            projection: None,
        }
    }
}
