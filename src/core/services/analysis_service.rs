use super::types::AnalysisOutcome;
use crate::AppError;
use crate::api::client::DblyserClient;
use crate::api::models::{Output, UploadReceipt};
use crate::core::connection::{normalize_connection_string, redact_password};
use crate::core::queries::QuerySet;
use crate::core::runner::{FailurePolicy, PgExecutor, QueryExecutor, QueryRunner};
use crate::error::AuthError;
use crate::storage::token_store::{AUTH_TOKEN_KEY, TokenStore};
use crate::utils::validation::validate_required;
use tracing::{debug, warn};

/// Options for one `analyse` invocation
#[derive(Debug, Clone)]
pub struct AnalysisRequest {
    pub connection_string: String,
    pub policy: FailurePolicy,
    pub dry_run: bool,
}

/// Collects diagnostics from a database and ships them to the webhook
pub struct AnalysisService {
    client: DblyserClient,
    token_store: TokenStore,
    webhook_url: String,
    queries: QuerySet,
}

impl AnalysisService {
    pub fn new(client: DblyserClient, token_store: TokenStore, webhook_url: String) -> Self {
        Self {
            client,
            token_store,
            webhook_url,
            queries: QuerySet::diagnostics(),
        }
    }

    /// Swap the query set, e.g. for a smaller one in tests
    pub fn with_queries(mut self, queries: QuerySet) -> Self {
        self.queries = queries;
        self
    }

    /// Validate, connect, run every query, then upload (or stop at the payload on a dry run).
    pub async fn analyse(&self, request: &AnalysisRequest) -> Result<AnalysisOutcome, AppError> {
        let token = if request.dry_run {
            None
        } else {
            Some(self.load_token()?)
        };

        let dsn = self.prepare_dsn(&request.connection_string)?;
        debug!(dsn = %redact_password(&dsn), "Connecting to database");

        let mut executor = PgExecutor::connect(&dsn).await?;
        let output = self.collect(&mut executor, dsn, request.policy).await;
        if let Err(e) = executor.close().await {
            warn!("Failed to close database connection cleanly: {}", e);
        }

        match token {
            Some(token) => {
                let receipt = self.submit(&output, &token).await?;
                Ok(AnalysisOutcome::Uploaded { output, receipt })
            }
            None => Ok(AnalysisOutcome::DryRun { output }),
        }
    }

    /// The stored token, refusing a missing or empty one
    pub fn load_token(&self) -> Result<String, AppError> {
        self.token_store
            .get_token(AUTH_TOKEN_KEY)?
            .filter(|t| !t.is_empty())
            .ok_or(AppError::Auth(AuthError::TokenMissing))
    }

    /// Reject an empty flag, then validate and normalize the DSN
    pub fn prepare_dsn(&self, connection_string: &str) -> Result<String, AppError> {
        validate_required(connection_string, "connection-string", "--connection-string")?;
        Ok(normalize_connection_string(connection_string.trim())?)
    }

    /// Run the query set and wrap the results in the upload payload
    pub async fn collect<E>(&self, executor: &mut E, dsn: String, policy: FailurePolicy) -> Output
    where
        E: QueryExecutor + ?Sized,
    {
        let results = QueryRunner::new(policy).run(executor, &self.queries).await;
        Output {
            connection_string: dsn,
            data: results,
        }
    }

    /// Upload a payload with the given bearer token
    pub async fn submit(&self, output: &Output, token: &str) -> Result<UploadReceipt, AppError> {
        debug!(webhook = %self.webhook_url, results = output.data.len(), "Uploading results");
        Ok(self.client.upload(&self.webhook_url, output, token).await?)
    }
}
