use parish_core::page::Page;

use crate::db::query::column::Column;
use crate::db::statement::Statement;
use crate::db::value::SqlValue;

/// Comparison applied by a filter clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    /// Substring match. The bound value is wrapped in `%` with wildcards escaped.
    Contains,
}

impl Op {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Eq => "= ?",
            Self::NotEq => "!= ?",
            Self::Lt => "< ?",
            Self::LtEq => "<= ?",
            Self::Gt => "> ?",
            Self::GtEq => ">= ?",
            Self::Contains => "LIKE ? ESCAPE '\\'",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Asc,
    Desc,
}

impl Direction {
    const fn as_sql(self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

fn like_pattern(value: SqlValue) -> SqlValue {
    match value {
        SqlValue::Text(text) => {
            let mut escaped = String::with_capacity(text.len() + 2);
            escaped.push('%');
            for c in text.chars() {
                if matches!(c, '\\' | '%' | '_') {
                    escaped.push('\\');
                }
                escaped.push(c);
            }
            escaped.push('%');
            SqlValue::Text(escaped)
        }
        other => other,
    }
}

/// ## Summary
/// Builds a filtered, ordered, paginated `SELECT` over a fixed base query.
///
/// Filter candidates with an absent value contribute nothing. Present ones
/// become `AND column op ?` clauses whose values are bound in clause order,
/// followed by `LIMIT ? OFFSET ?`. The ordering always ends with the key
/// column so pages are stable.
#[derive(Debug, Clone)]
pub struct SelectQuery<C: Column> {
    base: &'static str,
    key: C,
    clauses: Vec<String>,
    args: Vec<SqlValue>,
    order: Vec<(C, Direction)>,
    projection: Option<&'static [&'static str]>,
}

impl<C: Column> SelectQuery<C> {
    /// `base` is a `SELECT ... FROM ...` with any joins but no `WHERE`; `key`
    /// is the unique column that breaks ordering ties.
    #[must_use]
    pub const fn new(base: &'static str, key: C) -> Self {
        Self {
            base,
            key,
            clauses: Vec::new(),
            args: Vec::new(),
            order: Vec::new(),
            projection: None,
        }
    }

    #[must_use]
    pub const fn projection(mut self, columns: &'static [&'static str]) -> Self {
        self.projection = Some(columns);
        self
    }

    /// Adds `AND column op ?` when `value` is present.
    #[must_use]
    pub fn filter<V: Into<SqlValue>>(mut self, column: C, op: Op, value: Option<V>) -> Self {
        if let Some(value) = value {
            let value = value.into();
            let value = if op == Op::Contains {
                like_pattern(value)
            } else {
                value
            };
            self.clauses
                .push(format!("{} {}", column.qualified(), op.as_sql()));
            self.args.push(value);
        }
        self
    }

    /// Shorthand for an `=` filter.
    #[must_use]
    pub fn where_eq<V: Into<SqlValue>>(self, column: C, value: Option<V>) -> Self {
        self.filter(column, Op::Eq, value)
    }

    /// Adds `AND column IS NULL` / `IS NOT NULL` when `value` is present.
    #[must_use]
    pub fn null_check(mut self, column: C, is_null: Option<bool>) -> Self {
        if let Some(is_null) = is_null {
            let check = if is_null { "IS NULL" } else { "IS NOT NULL" };
            self.clauses.push(format!("{} {check}", column.qualified()));
        }
        self
    }

    #[must_use]
    pub fn order_by(mut self, column: C, direction: Direction) -> Self {
        self.order.push((column, direction));
        self
    }

    fn render(&self) -> String {
        let mut sql = String::from(self.base);
        for (idx, clause) in self.clauses.iter().enumerate() {
            sql.push_str(if idx == 0 { " WHERE " } else { " AND " });
            sql.push_str(clause);
        }

        let mut order = self.order.clone();
        if !order.iter().any(|(column, _)| *column == self.key) {
            let direction = order.last().map_or(Direction::Asc, |(_, d)| *d);
            order.push((self.key, direction));
        }
        let rendered: Vec<String> = order
            .iter()
            .map(|(column, direction)| format!("{} {}", column.qualified(), direction.as_sql()))
            .collect();
        sql.push_str(" ORDER BY ");
        sql.push_str(&rendered.join(", "));
        sql
    }

    /// Renders the statement with `LIMIT ? OFFSET ?` as the final two parameters.
    #[must_use]
    pub fn build(self, page: Page) -> Statement {
        let mut sql = self.render();
        sql.push_str(" LIMIT ? OFFSET ?");

        let mut args = self.args;
        args.push(SqlValue::from(page.limit()));
        args.push(SqlValue::from(page.offset()));

        Statement {
            sql,
            args,
            projection: self.projection,
        }
    }

    /// Renders the statement without pagination.
    #[must_use]
    pub fn build_all(self) -> Statement {
        Statement {
            sql: self.render(),
            args: self.args,
            projection: self.projection,
        }
    }
}
