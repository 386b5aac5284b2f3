//! Bundled table definitions.

use crate::db::DbConnection;
use crate::db::statement::Statement;
use crate::error::DbResult;

const SCHEMA_SQL: &str = include_str!("schema.sql");

/// Splits the bundled schema into individual statements, dropping comments.
#[must_use]
pub fn statements() -> Vec<Statement> {
    SCHEMA_SQL
        .split(';')
        .map(|chunk| {
            chunk
                .lines()
                .filter(|line| !line.trim_start().starts_with("--"))
                .collect::<Vec<_>>()
                .join("\n")
        })
        .filter(|sql| !sql.trim().is_empty())
        .map(|sql| Statement::new(sql.trim()))
        .collect()
}

/// ## Summary
/// Creates any missing tables and indexes in one transaction.
///
/// ## Errors
/// Returns the first statement failure; nothing is applied in that case.
#[tracing::instrument(skip(conn))]
pub async fn apply(conn: &mut DbConnection) -> DbResult<()> {
    let stmts = statements();
    conn.execute_batch(&stmts).await?;
    tracing::info!(statements = stmts.len(), "Database schema applied");
    Ok(())
}
