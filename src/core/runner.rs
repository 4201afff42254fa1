//! Sequential execution of a [`QuerySet`] against one database handle.

use crate::api::models::{QueryResult, Row};
use crate::core::queries::QuerySet;
use crate::error::DatabaseError;
use crate::utils::error_helpers::{convert_query_error, sqlx_error_message};
use async_trait::async_trait;
use sqlx::{Connection, PgConnection};
use tracing::{debug, warn};

/// Error text PostgreSQL returns when the extension is installed but not preloaded.
const PG_STAT_STATEMENTS_NOT_LOADED: &str = "pg_stat_statements must be loaded via";
/// Error text when the extension was never created in this database.
const PG_STAT_STATEMENTS_MISSING: &str = "relation \"pg_stat_statements\" does not exist";

/// Anything that can turn a SQL statement into JSON rows.
#[async_trait]
pub trait QueryExecutor: Send {
    async fn fetch_rows(&mut self, name: &str, sql: &str) -> Result<Vec<Row>, DatabaseError>;
}

/// What to do with a query that fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Leave the query out of the output
    #[default]
    Skip,
    /// Keep the query with empty data and its error text
    Record,
}

/// Why a query did not produce rows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryFailure {
    /// `pg_stat_statements` is unavailable on the server
    ExtensionMissing,
    Other(String),
}

impl QueryFailure {
    pub fn classify(error: &DatabaseError) -> Self {
        let text = error.to_string();
        if text.contains(PG_STAT_STATEMENTS_NOT_LOADED) || text.contains(PG_STAT_STATEMENTS_MISSING)
        {
            QueryFailure::ExtensionMissing
        } else {
            QueryFailure::Other(text)
        }
    }

    pub fn user_message(&self) -> String {
        match self {
            QueryFailure::ExtensionMissing => {
                "pg_stat_statements is not enabled on the database. Please ensure it is properly configured."
                    .to_string()
            }
            QueryFailure::Other(message) => message.clone(),
        }
    }
}

/// Runs every query of a set, one after another, and collects the results.
#[derive(Debug, Clone, Default)]
pub struct QueryRunner {
    policy: FailurePolicy,
}

impl QueryRunner {
    pub fn new(policy: FailurePolicy) -> Self {
        Self { policy }
    }

    /// Execute the set in order. A failing query never aborts the batch.
    pub async fn run<E>(&self, executor: &mut E, queries: &QuerySet) -> Vec<QueryResult>
    where
        E: QueryExecutor + ?Sized,
    {
        debug!(
            version = queries.version(),
            count = queries.len(),
            "Running query set"
        );

        let mut results = Vec::with_capacity(queries.len());
        for (name, sql) in queries.iter() {
            match executor.fetch_rows(name, sql).await {
                Ok(rows) => {
                    debug!(query = name, rows = rows.len(), "Query succeeded");
                    results.push(QueryResult::success(name, rows));
                }
                Err(error) => {
                    let failure = QueryFailure::classify(&error);
                    match &failure {
                        QueryFailure::ExtensionMissing => warn!("{}", failure.user_message()),
                        QueryFailure::Other(_) => {
                            warn!("Failed to execute query ({}): {}", name, error)
                        }
                    }
                    if self.policy == FailurePolicy::Record {
                        results.push(QueryResult::failure(name, failure.user_message()));
                    }
                }
            }
        }
        results
    }
}

/// [`QueryExecutor`] over a single PostgreSQL connection.
///
/// Each statement is wrapped in `row_to_json` so every column type maps
/// to a JSON value without per-type decoding.
pub struct PgExecutor {
    conn: PgConnection,
}

impl PgExecutor {
    /// Open a connection to an already validated DSN and ping it.
    pub async fn connect(dsn: &str) -> Result<Self, DatabaseError> {
        let mut conn = PgConnection::connect(dsn)
            .await
            .map_err(|e| DatabaseError::Connect(sqlx_error_message(&e)))?;
        conn.ping()
            .await
            .map_err(|e| DatabaseError::Ping(sqlx_error_message(&e)))?;
        Ok(Self { conn })
    }

    pub async fn close(self) -> Result<(), DatabaseError> {
        self.conn
            .close()
            .await
            .map_err(|e| DatabaseError::Connect(sqlx_error_message(&e)))
    }
}

/// Wrap a statement so it yields one JSON text column per row.
pub fn json_rows_sql(sql: &str) -> String {
    let body = sql.trim().trim_end_matches(';').trim_end();
    format!("SELECT row_to_json(q)::text FROM (\n{}\n) AS q", body)
}

#[async_trait]
impl QueryExecutor for PgExecutor {
    async fn fetch_rows(&mut self, name: &str, sql: &str) -> Result<Vec<Row>, DatabaseError> {
        let wrapped = json_rows_sql(sql);
        let raw: Vec<String> = sqlx::query_scalar(&wrapped)
            .fetch_all(&mut self.conn)
            .await
            .map_err(|e| convert_query_error(e, name))?;

        raw.iter()
            .map(|text| {
                serde_json::from_str::<Row>(text).map_err(|e| DatabaseError::Decode {
                    query: name.to_string(),
                    message: e.to_string(),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::queries::{OPTIMIZATION, PERFORMANCE, SECURITY};
    use serde_json::json;
    use std::collections::HashMap;

    /// Replays canned outcomes by query name and records call order.
    #[derive(Default)]
    struct FakeExecutor {
        outcomes: HashMap<String, Result<Vec<Row>, String>>,
        calls: Vec<String>,
    }

    impl FakeExecutor {
        fn ok(mut self, name: &str, rows: Vec<Row>) -> Self {
            self.outcomes.insert(name.to_string(), Ok(rows));
            self
        }

        fn fail(mut self, name: &str, message: &str) -> Self {
            self.outcomes
                .insert(name.to_string(), Err(message.to_string()));
            self
        }
    }

    #[async_trait]
    impl QueryExecutor for FakeExecutor {
        async fn fetch_rows(&mut self, name: &str, _sql: &str) -> Result<Vec<Row>, DatabaseError> {
            self.calls.push(name.to_string());
            match self.outcomes.get(name) {
                Some(Ok(rows)) => Ok(rows.clone()),
                Some(Err(message)) => Err(DatabaseError::Query {
                    query: name.to_string(),
                    message: message.clone(),
                }),
                None => Ok(Vec::new()),
            }
        }
    }

    fn row(key: &str, value: serde_json::Value) -> Row {
        let mut row = Row::new();
        row.insert(key.to_string(), value);
        row
    }

    #[tokio::test]
    async fn test_runs_queries_in_lexical_order() {
        let mut executor = FakeExecutor::default();
        let results = QueryRunner::default()
            .run(&mut executor, &QuerySet::diagnostics())
            .await;

        assert_eq!(executor.calls, vec![OPTIMIZATION, PERFORMANCE, SECURITY]);
        let names: Vec<&str> = results.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(names, vec![OPTIMIZATION, PERFORMANCE, SECURITY]);
    }

    #[tokio::test]
    async fn test_missing_pg_stat_statements_is_skipped() {
        let mut executor = FakeExecutor::default()
            .ok(OPTIMIZATION, vec![row("table_name", json!("users"))])
            .fail(
                PERFORMANCE,
                "pg_stat_statements must be loaded via \"shared_preload_libraries\"",
            )
            .ok(SECURITY, vec![row("role_name", json!("postgres"))]);

        let results = QueryRunner::default()
            .run(&mut executor, &QuerySet::diagnostics())
            .await;

        assert_eq!(results.len(), 2);
        assert!(results.iter().all(|r| r.query != PERFORMANCE));
        assert!(results.iter().all(|r| !r.is_failure()));
        assert_eq!(results[0].data[0]["table_name"], json!("users"));
    }

    #[tokio::test]
    async fn test_other_failures_do_not_abort_batch() {
        let mut executor = FakeExecutor::default()
            .fail(OPTIMIZATION, "permission denied for table columns")
            .ok(SECURITY, vec![row("role_name", json!("app"))]);

        let results = QueryRunner::default()
            .run(&mut executor, &QuerySet::diagnostics())
            .await;

        assert_eq!(executor.calls.len(), 3);
        let names: Vec<&str> = results.iter().map(|r| r.query.as_str()).collect();
        assert_eq!(names, vec![PERFORMANCE, SECURITY]);
    }

    #[tokio::test]
    async fn test_record_policy_keeps_failed_queries() {
        let mut executor = FakeExecutor::default()
            .fail(
                PERFORMANCE,
                "pg_stat_statements must be loaded via \"shared_preload_libraries\"",
            )
            .fail(SECURITY, "permission denied for view pg_roles");

        let results = QueryRunner::new(FailurePolicy::Record)
            .run(&mut executor, &QuerySet::diagnostics())
            .await;

        assert_eq!(results.len(), 3);
        assert!(!results[0].is_failure());
        assert!(results[1].error.starts_with("pg_stat_statements is not enabled"));
        assert!(results[2].error.contains("permission denied"));
        assert!(results[2].data.is_empty());
    }

    #[test]
    fn test_classify_failures() {
        let not_loaded = DatabaseError::Query {
            query: PERFORMANCE.to_string(),
            message: "pg_stat_statements must be loaded via \"shared_preload_libraries\""
                .to_string(),
        };
        assert_eq!(
            QueryFailure::classify(&not_loaded),
            QueryFailure::ExtensionMissing
        );

        let missing = DatabaseError::Query {
            query: PERFORMANCE.to_string(),
            message: "relation \"pg_stat_statements\" does not exist".to_string(),
        };
        assert_eq!(
            QueryFailure::classify(&missing),
            QueryFailure::ExtensionMissing
        );

        let other = DatabaseError::Query {
            query: SECURITY.to_string(),
            message: "syntax error".to_string(),
        };
        assert!(matches!(
            QueryFailure::classify(&other),
            QueryFailure::Other(text) if text.contains("syntax error")
        ));
    }

    #[test]
    fn test_json_rows_sql_strips_trailing_semicolon() {
        assert_eq!(
            json_rows_sql("  SELECT 1 AS one;  "),
            "SELECT row_to_json(q)::text FROM (\nSELECT 1 AS one\n) AS q"
        );
    }
}
