use crate::db::value::SqlValue;

/// A parameterized SQL statement. Values are always bound, never interpolated.
#[derive(Debug, Clone, PartialEq)]
pub struct Statement {
    pub sql: String,
    pub args: Vec<SqlValue>,
    /// Known projection order, used when the driver does not report column names.
    pub projection: Option<&'static [&'static str]>,
}

impl Statement {
    #[must_use]
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            args: Vec::new(),
            projection: None,
        }
    }

    #[must_use]
    pub fn bind(mut self, value: impl Into<SqlValue>) -> Self {
        self.args.push(value.into());
        self
    }

    #[must_use]
    pub const fn with_projection(mut self, columns: &'static [&'static str]) -> Self {
        self.projection = Some(columns);
        self
    }

    /// Whether executing the statement yields a row set rather than just a change count.
    #[must_use]
    pub fn returns_rows(&self) -> bool {
        let head = self.sql.trim_start();
        let keyword = head
            .split(|c: char| c.is_whitespace() || c == '(')
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase();
        matches!(keyword.as_str(), "SELECT" | "WITH" | "PRAGMA" | "VALUES" | "EXPLAIN")
            || head.to_ascii_uppercase().contains(" RETURNING ")
    }
}
