use futures::future::BoxFuture;

use crate::error::{DbError, DbResult};

pub mod connection;
pub mod local;
pub mod query;
pub mod remote;
pub mod result;
pub mod schema;
pub mod statement;
pub mod value;

use result::{FromRow, ResultSet};
use statement::Statement;
use value::FromSqlValue;

/// An exclusive session with the store. Released when dropped.
pub trait SqlConnection: Send {
    fn execute<'a>(&'a mut self, stmt: &'a Statement) -> BoxFuture<'a, DbResult<ResultSet>>;

    /// Runs every statement inside one transaction. Either all succeed or none apply.
    fn execute_batch<'a>(
        &'a mut self,
        stmts: &'a [Statement],
    ) -> BoxFuture<'a, DbResult<Vec<ResultSet>>>;
}

pub type DbConnection = Box<dyn SqlConnection>;

pub trait DbProvider: Send + Sync {
    fn get_connection<'a>(&'a self) -> BoxFuture<'a, DbResult<DbConnection>>;
}

impl dyn SqlConnection {
    /// ## Summary
    /// Runs a query and decodes every row.
    ///
    /// ## Errors
    /// Returns storage or decode failures.
    pub async fn fetch_all<T: FromRow>(&mut self, stmt: &Statement) -> DbResult<Vec<T>> {
        self.execute(stmt).await?.decode()
    }

    /// ## Summary
    /// Runs a query and decodes the first row, if any.
    ///
    /// ## Errors
    /// Returns storage or decode failures.
    pub async fn fetch_optional<T: FromRow>(&mut self, stmt: &Statement) -> DbResult<Option<T>> {
        self.execute(stmt).await?.first()
    }

    /// ## Summary
    /// Runs a query and decodes the first column of its first row.
    ///
    /// ## Errors
    /// Returns `DbError::DecodeError` if the query returned no rows.
    pub async fn fetch_scalar<T: FromSqlValue>(&mut self, stmt: &Statement) -> DbResult<T> {
        let rs = self.execute(stmt).await?;
        let row = rs
            .rows()
            .next()
            .ok_or_else(|| DbError::DecodeError("scalar query returned no rows".to_string()))?;
        row.get_at(0)
    }

    /// ## Summary
    /// Runs an `INSERT` and returns the new row id.
    ///
    /// ## Errors
    /// Returns `DbError::ProtocolError` if the store did not report a row id.
    pub async fn insert(&mut self, stmt: &Statement) -> DbResult<i64> {
        let rs = self.execute(stmt).await?;
        rs.last_insert_rowid()
            .ok_or_else(|| DbError::ProtocolError("insert did not report a row id".to_string()))
    }
}
