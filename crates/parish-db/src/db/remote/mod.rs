//! Hosted libSQL backend over the HTTP pipeline protocol.

pub mod wire;

use std::sync::Arc;
use std::time::Duration;

use futures::future::BoxFuture;
use parish_core::error::CoreError;

use crate::db::result::ResultSet;
use crate::db::statement::Statement;
use crate::db::{DbConnection, DbProvider, SqlConnection};
use crate::error::{DbError, DbResult};
use wire::{
    BatchResult, PipelineRequest, PipelineResponse, StreamRequest, StreamResponse, StreamResult,
    WireBatch,
};

/// ## Summary
/// Normalizes a database URL to the HTTP(S) base the pipeline endpoint hangs off.
///
/// ## Errors
/// Returns `CoreError::ConfigError` for schemes other than `libsql`, `https` and `http`.
pub fn normalize_url(url: &str) -> DbResult<String> {
    let url = url.trim().trim_end_matches('/');
    let normalized = if let Some(host) = url.strip_prefix("libsql://") {
        format!("https://{host}")
    } else if url.starts_with("https://") || url.starts_with("http://") {
        url.to_string()
    } else {
        return Err(CoreError::ConfigError(format!(
            "unsupported remote database URL scheme: {url}"
        ))
        .into());
    };
    Ok(normalized)
}

/// Connection factory for the hosted store. Cheap to clone.
#[derive(Clone)]
pub struct RemoteDb {
    client: reqwest::Client,
    base_url: Arc<str>,
    auth_token: Option<Arc<str>>,
}

impl std::fmt::Debug for RemoteDb {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteDb")
            .field("base_url", &self.base_url)
            .finish_non_exhaustive()
    }
}

impl RemoteDb {
    /// ## Summary
    /// Creates a client for the store at `url`.
    ///
    /// ## Errors
    /// Returns an error for an unsupported URL or if the HTTP client cannot be built.
    pub fn new(url: &str, auth_token: Option<String>, timeout: Option<Duration>) -> DbResult<Self> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            base_url: Arc::from(normalize_url(url)?),
            auth_token: auth_token
                .filter(|token| !token.is_empty())
                .map(Arc::from),
        })
    }
}

impl DbProvider for RemoteDb {
    fn get_connection<'a>(&'a self) -> BoxFuture<'a, DbResult<DbConnection>> {
        Box::pin(async move {
            // The stream is opened lazily by the first request.
            Ok(Box::new(RemoteConnection {
                client: self.client.clone(),
                base_url: self.base_url.to_string(),
                auth_token: self.auth_token.clone(),
                baton: None,
            }) as DbConnection)
        })
    }
}

/// One server-side stream, identified by its baton.
struct RemoteConnection {
    client: reqwest::Client,
    base_url: String,
    auth_token: Option<Arc<str>>,
    baton: Option<String>,
}

impl RemoteConnection {
    fn pipeline_url(base_url: &str) -> String {
        format!("{base_url}/v2/pipeline")
    }

    async fn pipeline(&mut self, requests: Vec<StreamRequest<'_>>) -> DbResult<Vec<StreamResult>> {
        let request = {
            let body = PipelineRequest {
                baton: self.baton.as_deref(),
                requests,
            };
            let mut request = self
                .client
                .post(Self::pipeline_url(&self.base_url))
                .json(&body);
            if let Some(token) = &self.auth_token {
                request = request.bearer_auth(token);
            }
            request
        };

        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), body = %body, "Remote database rejected request");
            return Err(DbError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let response: PipelineResponse = response.json().await?;
        self.baton = response.baton;
        if let Some(base_url) = response.base_url {
            self.base_url = base_url.trim_end_matches('/').to_string();
        }
        Ok(response.results)
    }
}

fn batch_results(result: BatchResult, stmts: &[Statement]) -> DbResult<Vec<ResultSet>> {
    let BatchResult {
        step_results,
        step_errors,
    } = result;

    if let Some(error) = step_errors.into_iter().flatten().next() {
        return Err(error.into());
    }

    // Step 0 is BEGIN; statement results follow it.
    let mut step_results = step_results.into_iter().skip(1);
    stmts
        .iter()
        .enumerate()
        .map(|(idx, stmt)| {
            step_results
                .next()
                .flatten()
                .ok_or_else(|| DbError::ProtocolError(format!("batch step {} did not run", idx + 1)))?
                .into_result_set(stmt.projection)
        })
        .collect()
}

impl SqlConnection for RemoteConnection {
    fn execute<'a>(&'a mut self, stmt: &'a Statement) -> BoxFuture<'a, DbResult<ResultSet>> {
        Box::pin(async move {
            tracing::debug!(sql = %stmt.sql, params = stmt.args.len(), "Executing remote statement");

            let results = self
                .pipeline(vec![StreamRequest::Execute { stmt: stmt.into() }])
                .await?;
            match results.into_iter().next() {
                Some(StreamResult::Ok {
                    response: StreamResponse::Execute { result },
                }) => result.into_result_set(stmt.projection),
                Some(StreamResult::Error { error }) => Err(error.into()),
                _ => Err(DbError::ProtocolError(
                    "unexpected response to execute request".to_string(),
                )),
            }
        })
    }

    fn execute_batch<'a>(
        &'a mut self,
        stmts: &'a [Statement],
    ) -> BoxFuture<'a, DbResult<Vec<ResultSet>>> {
        Box::pin(async move {
            tracing::debug!(steps = stmts.len(), "Executing remote batch");

            let results = self
                .pipeline(vec![StreamRequest::Batch {
                    batch: WireBatch::transactional(stmts),
                }])
                .await?;
            match results.into_iter().next() {
                Some(StreamResult::Ok {
                    response: StreamResponse::Batch { result },
                }) => batch_results(result, stmts),
                Some(StreamResult::Error { error }) => Err(error.into()),
                _ => Err(DbError::ProtocolError(
                    "unexpected response to batch request".to_string(),
                )),
            }
        })
    }
}

impl Drop for RemoteConnection {
    fn drop(&mut self) {
        let Some(baton) = self.baton.take() else {
            return;
        };
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            return;
        };

        let client = self.client.clone();
        let url = Self::pipeline_url(&self.base_url);
        let auth_token = self.auth_token.clone();
        handle.spawn(async move {
            let body = PipelineRequest {
                baton: Some(&baton),
                requests: vec![StreamRequest::Close],
            };
            let mut request = client.post(url).json(&body);
            if let Some(token) = &auth_token {
                request = request.bearer_auth(token);
            }
            if let Err(e) = request.send().await {
                tracing::debug!(error = %e, "Failed to close remote stream");
            }
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wire::{StatementResult, WireError};

    #[test_log::test]
    fn libsql_scheme_becomes_https() {
        assert_eq!(
            normalize_url("libsql://parish-db.turso.io/").unwrap(),
            "https://parish-db.turso.io"
        );
        assert_eq!(
            normalize_url("http://127.0.0.1:8080").unwrap(),
            "http://127.0.0.1:8080"
        );
        assert!(normalize_url("postgres://localhost/db").is_err());
    }

    #[test_log::test]
    fn empty_token_is_ignored() {
        let db = RemoteDb::new("libsql://x.turso.io", Some(String::new()), None).unwrap();
        assert!(db.auth_token.is_none());
    }

    fn ok_step() -> Option<StatementResult> {
        Some(StatementResult {
            cols: Vec::new(),
            rows: Vec::new(),
            affected_row_count: 1,
            last_insert_rowid: None,
        })
    }

    #[test_log::test]
    fn batch_results_skip_begin_and_report_statements() {
        let stmts = [Statement::new("DELETE FROM a"), Statement::new("DELETE FROM b")];
        let result = BatchResult {
            step_results: vec![ok_step(), ok_step(), ok_step(), ok_step(), None],
            step_errors: vec![None, None, None, None, None],
        };
        let sets = batch_results(result, &stmts).unwrap();
        assert_eq!(sets.len(), 2);
        assert!(sets.iter().all(|rs| rs.rows_affected() == 1));
    }

    #[test_log::test]
    fn batch_step_error_surfaces() {
        let stmts = [Statement::new("DELETE FROM a")];
        let result = BatchResult {
            step_results: vec![ok_step(), None, None, ok_step()],
            step_errors: vec![
                None,
                Some(WireError {
                    message: "FOREIGN KEY constraint failed".to_string(),
                    code: Some("SQLITE_CONSTRAINT".to_string()),
                }),
                None,
                None,
            ],
        };
        let err = batch_results(result, &stmts).unwrap_err();
        assert!(matches!(err, DbError::SqlError { code: Some(ref c), .. } if c == "SQLITE_CONSTRAINT"));
    }
}
