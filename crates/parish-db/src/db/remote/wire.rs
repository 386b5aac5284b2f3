//! JSON shapes of the libSQL `/v2/pipeline` HTTP protocol.

use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};
use serde::{Deserialize, Serialize};

use crate::db::statement::Statement;
use crate::db::value::SqlValue;
use crate::error::{DbError, DbResult};

const BLOB_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::STANDARD,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

#[derive(Debug, Serialize)]
pub struct PipelineRequest<'a> {
    pub baton: Option<&'a str>,
    pub requests: Vec<StreamRequest<'a>>,
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamRequest<'a> {
    Execute { stmt: WireStatement<'a> },
    Batch { batch: WireBatch<'a> },
    Close,
}

#[derive(Debug, Serialize)]
pub struct WireStatement<'a> {
    pub sql: &'a str,
    pub args: Vec<WireValue>,
    pub want_rows: bool,
}

impl<'a> From<&'a Statement> for WireStatement<'a> {
    fn from(stmt: &'a Statement) -> Self {
        Self {
            sql: &stmt.sql,
            args: stmt.args.iter().map(WireValue::from).collect(),
            want_rows: true,
        }
    }
}

impl<'a> WireStatement<'a> {
    fn bare(sql: &'a str) -> Self {
        Self {
            sql,
            args: Vec::new(),
            want_rows: false,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct WireBatch<'a> {
    pub steps: Vec<BatchStep<'a>>,
}

#[derive(Debug, Serialize)]
pub struct BatchStep<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub condition: Option<BatchCondition>,
    pub stmt: WireStatement<'a>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BatchCondition {
    Ok { step: usize },
    Not { cond: Box<BatchCondition> },
}

impl<'a> WireBatch<'a> {
    /// ## Summary
    /// Wraps `stmts` in `BEGIN` / `COMMIT`, running each step only if the previous
    /// one succeeded and rolling back when the commit did not happen.
    ///
    /// Steps: `0` is `BEGIN`, `1..=n` are the statements, `n + 1` is `COMMIT`
    /// and `n + 2` is `ROLLBACK`.
    #[must_use]
    pub fn transactional(stmts: &'a [Statement]) -> Self {
        let mut steps = Vec::with_capacity(stmts.len() + 3);
        steps.push(BatchStep {
            condition: None,
            stmt: WireStatement::bare("BEGIN"),
        });
        for (idx, stmt) in stmts.iter().enumerate() {
            steps.push(BatchStep {
                condition: Some(BatchCondition::Ok { step: idx }),
                stmt: stmt.into(),
            });
        }
        let commit = stmts.len() + 1;
        steps.push(BatchStep {
            condition: Some(BatchCondition::Ok { step: commit - 1 }),
            stmt: WireStatement::bare("COMMIT"),
        });
        steps.push(BatchStep {
            condition: Some(BatchCondition::Not {
                cond: Box::new(BatchCondition::Ok { step: commit }),
            }),
            stmt: WireStatement::bare("ROLLBACK"),
        });
        Self { steps }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum WireValue {
    Null,
    Integer { value: String },
    Float { value: f64 },
    Text { value: String },
    Blob { base64: String },
}

impl From<&SqlValue> for WireValue {
    fn from(value: &SqlValue) -> Self {
        match value {
            SqlValue::Null => Self::Null,
            SqlValue::Integer(i) => Self::Integer {
                value: i.to_string(),
            },
            SqlValue::Real(f) => Self::Float { value: *f },
            SqlValue::Text(s) => Self::Text { value: s.clone() },
            SqlValue::Blob(b) => Self::Blob {
                base64: BLOB_ENGINE.encode(b),
            },
        }
    }
}

impl TryFrom<WireValue> for SqlValue {
    type Error = DbError;

    fn try_from(value: WireValue) -> DbResult<Self> {
        Ok(match value {
            WireValue::Null => Self::Null,
            WireValue::Integer { value } => Self::Integer(value.parse().map_err(|e| {
                DbError::ProtocolError(format!("invalid integer value '{value}': {e}"))
            })?),
            WireValue::Float { value } => Self::Real(value),
            WireValue::Text { value } => Self::Text(value),
            WireValue::Blob { base64 } => Self::Blob(
                BLOB_ENGINE
                    .decode(base64.as_bytes())
                    .map_err(|e| DbError::ProtocolError(format!("invalid blob value: {e}")))?,
            ),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct PipelineResponse {
    pub baton: Option<String>,
    pub base_url: Option<String>,
    pub results: Vec<StreamResult>,
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamResult {
    Ok { response: StreamResponse },
    Error { error: WireError },
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StreamResponse {
    Execute { result: StatementResult },
    Batch { result: BatchResult },
    Close,
}

/// A column as reported by the server: either a bare name or a descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum WireColumn {
    Name(String),
    Descriptor {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        decltype: Option<String>,
    },
}

impl WireColumn {
    #[must_use]
    pub fn into_name(self) -> Option<String> {
        match self {
            Self::Name(name) => Some(name),
            Self::Descriptor { name, .. } => name,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct StatementResult {
    #[serde(default)]
    pub cols: Vec<WireColumn>,
    #[serde(default)]
    pub rows: Vec<Vec<WireValue>>,
    #[serde(default)]
    pub affected_row_count: u64,
    #[serde(default)]
    pub last_insert_rowid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct BatchResult {
    pub step_results: Vec<Option<StatementResult>>,
    pub step_errors: Vec<Option<WireError>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WireError {
    pub message: String,
    #[serde(default)]
    pub code: Option<String>,
}

impl From<WireError> for DbError {
    fn from(error: WireError) -> Self {
        Self::SqlError {
            message: error.message,
            code: error.code,
        }
    }
}

impl StatementResult {
    /// ## Summary
    /// Converts the wire result into a normalized [`ResultSet`](crate::db::result::ResultSet).
    ///
    /// ## Errors
    /// Returns `DbError::ProtocolError` for malformed values or row ids.
    pub fn into_result_set(
        self,
        projection: Option<&[&str]>,
    ) -> DbResult<crate::db::result::ResultSet> {
        let reported: Vec<Option<String>> =
            self.cols.into_iter().map(WireColumn::into_name).collect();
        let rows = self
            .rows
            .into_iter()
            .map(|row| row.into_iter().map(SqlValue::try_from).collect())
            .collect::<DbResult<Vec<Vec<SqlValue>>>>()?;
        let last_insert_rowid = self
            .last_insert_rowid
            .map(|id| {
                id.parse::<i64>().map_err(|e| {
                    DbError::ProtocolError(format!("invalid last_insert_rowid '{id}': {e}"))
                })
            })
            .transpose()?;

        Ok(
            crate::db::result::ResultSet::from_driver(&reported, rows, projection)?
                .with_changes(self.affected_row_count, last_insert_rowid),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test_log::test]
    fn values_serialize_in_protocol_shape() {
        let stmt = Statement::new("SELECT ?, ?, ?, ?, ?")
            .bind(SqlValue::Null)
            .bind(42_i64)
            .bind(1.5)
            .bind("kim")
            .bind(vec![0xde_u8, 0xad]);
        let wire = WireStatement::from(&stmt);
        assert_eq!(
            serde_json::to_value(&wire).unwrap(),
            json!({
                "sql": "SELECT ?, ?, ?, ?, ?",
                "args": [
                    {"type": "null"},
                    {"type": "integer", "value": "42"},
                    {"type": "float", "value": 1.5},
                    {"type": "text", "value": "kim"},
                    {"type": "blob", "base64": "3q0"},
                ],
                "want_rows": true,
            })
        );
    }

    #[test_log::test]
    fn transactional_batch_chains_conditions() {
        let stmts = [Statement::new("DELETE FROM a"), Statement::new("DELETE FROM b")];
        let batch = WireBatch::transactional(&stmts);
        let json = serde_json::to_value(&batch).unwrap();
        let steps = json["steps"].as_array().unwrap();

        assert_eq!(steps.len(), 5);
        assert_eq!(steps[0]["stmt"]["sql"], "BEGIN");
        assert!(steps[0].get("condition").is_none());
        assert_eq!(steps[1]["condition"], json!({"type": "ok", "step": 0}));
        assert_eq!(steps[2]["condition"], json!({"type": "ok", "step": 1}));
        assert_eq!(steps[3]["stmt"]["sql"], "COMMIT");
        assert_eq!(steps[3]["condition"], json!({"type": "ok", "step": 2}));
        assert_eq!(steps[4]["stmt"]["sql"], "ROLLBACK");
        assert_eq!(
            steps[4]["condition"],
            json!({"type": "not", "cond": {"type": "ok", "step": 3}})
        );
    }

    #[test_log::test]
    fn execute_response_with_descriptor_columns() {
        let body = json!({
            "baton": "b1",
            "base_url": null,
            "results": [
                {"type": "ok", "response": {"type": "execute", "result": {
                    "cols": [{"name": "id", "decltype": "INTEGER"}, {"name": "family_name", "decltype": "TEXT"}],
                    "rows": [[{"type": "integer", "value": "1"}, {"type": "text", "value": "Kim Family"}]],
                    "affected_row_count": 0,
                    "last_insert_rowid": null
                }}},
                {"type": "ok", "response": {"type": "close"}}
            ]
        });
        let response: PipelineResponse = serde_json::from_value(body).unwrap();
        assert_eq!(response.baton.as_deref(), Some("b1"));

        let mut results = response.results.into_iter();
        let Some(StreamResult::Ok {
            response: StreamResponse::Execute { result },
        }) = results.next()
        else {
            panic!("expected execute result");
        };
        let rs = result.into_result_set(None).unwrap();
        assert_eq!(rs.columns(), ["id", "family_name"]);
        let records = rs.into_records();
        assert_eq!(records[0]["family_name"], "Kim Family");
    }

    #[test_log::test]
    fn plain_and_nameless_columns_are_normalized() {
        let body = json!({
            "cols": ["id", {"decltype": "TEXT"}],
            "rows": [[{"type": "integer", "value": "5"}, {"type": "null"}]],
            "affected_row_count": 0,
            "last_insert_rowid": "5"
        });
        let result: StatementResult = serde_json::from_value(body).unwrap();
        let rs = result.into_result_set(Some(&["id", "address"])).unwrap();
        assert_eq!(rs.columns(), ["id", "address"]);
        assert_eq!(rs.last_insert_rowid(), Some(5));
    }

    #[test_log::test]
    fn error_result_maps_to_sql_error() {
        let body = json!({
            "baton": null,
            "base_url": null,
            "results": [{"type": "error", "error": {"message": "no such table: x", "code": "SQLITE_ERROR"}}]
        });
        let response: PipelineResponse = serde_json::from_value(body).unwrap();
        let Some(StreamResult::Error { error }) = response.results.into_iter().next() else {
            panic!("expected error result");
        };
        let err = DbError::from(error);
        assert!(matches!(err, DbError::SqlError { ref message, .. } if message == "no such table: x"));
    }
}
