//! Local SQLite backend, used for development and tests.

use std::str::FromStr;

use futures::future::BoxFuture;
use sqlx::pool::PoolConnection;
use sqlx::query::Query;
use sqlx::sqlite::{
    SqliteArguments, SqliteConnectOptions, SqliteConnection, SqlitePoolOptions, SqliteRow,
};
use sqlx::{Column, Row, Sqlite, SqlitePool, TypeInfo, ValueRef};

use crate::db::result::ResultSet;
use crate::db::statement::Statement;
use crate::db::value::SqlValue;
use crate::db::{DbConnection, DbProvider, SqlConnection};
use crate::error::DbResult;

/// A pool of local SQLite connections.
#[derive(Debug, Clone)]
pub struct LocalDb {
    pool: SqlitePool,
}

impl LocalDb {
    /// ## Summary
    /// Opens a pool for a `sqlite:` URL. In-memory databases are pinned to a single
    /// long-lived connection so every session sees the same data.
    ///
    /// ## Errors
    /// Returns an error if the URL is malformed or the database cannot be opened.
    #[tracing::instrument(skip(url), fields(pool_size = max_connections))]
    pub async fn connect(url: &str, max_connections: u32) -> DbResult<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);
        let in_memory = url.contains(":memory:") || url.contains("mode=memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(if in_memory { 1 } else { max_connections.max(1) })
            .min_connections(u32::from(in_memory))
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        tracing::debug!(in_memory, "Local SQLite pool opened");

        Ok(Self { pool })
    }

    /// ## Summary
    /// Opens a fresh private in-memory database.
    ///
    /// ## Errors
    /// Returns an error if SQLite cannot be initialized.
    pub async fn in_memory() -> DbResult<Self> {
        Self::connect("sqlite::memory:", 1).await
    }
}

impl DbProvider for LocalDb {
    fn get_connection<'a>(&'a self) -> BoxFuture<'a, DbResult<DbConnection>> {
        Box::pin(async move {
            let conn = self.pool.acquire().await?;
            Ok(Box::new(LocalConnection { conn }) as DbConnection)
        })
    }
}

struct LocalConnection {
    conn: PoolConnection<Sqlite>,
}

impl SqlConnection for LocalConnection {
    fn execute<'a>(&'a mut self, stmt: &'a Statement) -> BoxFuture<'a, DbResult<ResultSet>> {
        Box::pin(async move { run_statement(&mut self.conn, stmt).await })
    }

    fn execute_batch<'a>(
        &'a mut self,
        stmts: &'a [Statement],
    ) -> BoxFuture<'a, DbResult<Vec<ResultSet>>> {
        Box::pin(async move {
            let mut tx = sqlx::Connection::begin(&mut *self.conn).await?;
            let mut results = Vec::with_capacity(stmts.len());
            for stmt in stmts {
                // An early return drops `tx`, which rolls back.
                results.push(run_statement(&mut tx, stmt).await?);
            }
            tx.commit().await?;
            Ok(results)
        })
    }
}

fn bind_args<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    args: &'q [SqlValue],
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for arg in args {
        query = match arg {
            SqlValue::Null => query.bind(None::<i64>),
            SqlValue::Integer(i) => query.bind(*i),
            SqlValue::Real(f) => query.bind(*f),
            SqlValue::Text(s) => query.bind(s.as_str()),
            SqlValue::Blob(b) => query.bind(b.as_slice()),
        };
    }
    query
}

fn decode_row(row: &SqliteRow) -> DbResult<Vec<SqlValue>> {
    (0..row.len())
        .map(|idx| {
            let raw = row.try_get_raw(idx)?;
            if raw.is_null() {
                return Ok(SqlValue::Null);
            }
            let value = match raw.type_info().name() {
                "INTEGER" | "BOOLEAN" => SqlValue::Integer(row.try_get_unchecked(idx)?),
                "REAL" => SqlValue::Real(row.try_get_unchecked(idx)?),
                "BLOB" => SqlValue::Blob(row.try_get_unchecked(idx)?),
                _ => SqlValue::Text(row.try_get_unchecked(idx)?),
            };
            Ok(value)
        })
        .collect()
}

async fn run_statement(conn: &mut SqliteConnection, stmt: &Statement) -> DbResult<ResultSet> {
    tracing::debug!(sql = %stmt.sql, params = stmt.args.len(), "Executing local statement");

    let query = bind_args(sqlx::query(&stmt.sql), &stmt.args);
    if stmt.returns_rows() {
        let rows = query.fetch_all(&mut *conn).await?;
        let reported: Vec<Option<String>> = rows
            .first()
            .map(|row| {
                row.columns()
                    .iter()
                    .map(|c| Some(c.name().to_string()))
                    .collect()
            })
            .unwrap_or_default();
        let values = rows.iter().map(decode_row).collect::<DbResult<Vec<_>>>()?;
        ResultSet::from_driver(&reported, values, stmt.projection)
    } else {
        let done = query.execute(&mut *conn).await?;
        Ok(ResultSet::changes(
            done.rows_affected(),
            Some(done.last_insert_rowid()),
        ))
    }
}
