use crate::error::{ApiError, DatabaseError};

/// Helper functions for standardizing error conversions across the codebase
/// This module reduces boilerplate and provides consistent error handling patterns.
/// Convert reqwest errors to ApiError with endpoint context
pub fn convert_request_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    if error.is_timeout() {
        return convert_timeout_error(endpoint, crate::api::client::DEFAULT_TIMEOUT_SECS);
    }
    match error.status() {
        Some(status) => ApiError::Http {
            status: status.as_u16(),
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
        None => ApiError::Network {
            endpoint: endpoint.to_string(),
            message: error.to_string(),
        },
    }
}

/// Convert a failure while reading a response body
pub fn convert_body_error(error: reqwest::Error, endpoint: &str) -> ApiError {
    if error.is_timeout() {
        return convert_timeout_error(endpoint, crate::api::client::DEFAULT_TIMEOUT_SECS);
    }
    ApiError::Network {
        endpoint: endpoint.to_string(),
        message: format!("failed to read response body: {}", error),
    }
}

/// Convert a request payload serialization failure
pub fn convert_serialize_error(error: serde_json::Error, endpoint: &str) -> ApiError {
    ApiError::Serialization {
        endpoint: endpoint.to_string(),
        message: error.to_string(),
    }
}

/// Convert timeout errors to ApiError with endpoint context
pub fn convert_timeout_error(endpoint: &str, timeout_secs: u64) -> ApiError {
    ApiError::Timeout {
        timeout_secs,
        endpoint: endpoint.to_string(),
    }
}

/// Convert JSON deserialization errors to ApiError with endpoint context
pub fn convert_json_error(error: serde_json::Error, status: u16, endpoint: &str) -> ApiError {
    ApiError::Http {
        status,
        endpoint: endpoint.to_string(),
        message: format!("JSON parse error: {}", error),
    }
}

/// Flatten a sqlx error into its message.
/// Server-side errors keep only the database's own text.
pub fn sqlx_error_message(error: &sqlx::Error) -> String {
    match error {
        sqlx::Error::Database(db_error) => db_error.message().to_string(),
        other => other.to_string(),
    }
}

/// Convert a sqlx error raised while running a named query
pub fn convert_query_error(error: sqlx::Error, query: &str) -> DatabaseError {
    DatabaseError::Query {
        query: query.to_string(),
        message: sqlx_error_message(&error),
    }
}

/// Helper macro for standardizing map_err patterns
#[macro_export]
macro_rules! map_api_error {
    ($result:expr, $endpoint:expr) => {
        $result.map_err(|e| $crate::utils::error_helpers::convert_request_error(e, $endpoint))
    };
}
