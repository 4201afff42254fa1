use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Authentication models
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Body of a successful login. Every field is optional on the wire.
#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginResponse {
    pub message: String,
    pub token: String,
    pub user: LoginUser,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct LoginUser {
    pub id: String,
    pub email: String,
}

/// One row, column name to JSON value
pub type Row = Map<String, Value>;

// Analysis payload models
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct QueryResult {
    pub query: String,
    pub data: Vec<Row>,
    pub error: String,
}

impl QueryResult {
    pub fn success(query: &str, data: Vec<Row>) -> Self {
        Self {
            query: query.to_string(),
            data,
            error: String::new(),
        }
    }

    pub fn failure(query: &str, error: String) -> Self {
        Self {
            query: query.to_string(),
            data: Vec::new(),
            error,
        }
    }

    pub fn is_failure(&self) -> bool {
        !self.error.is_empty()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Output {
    pub connection_string: String,
    pub data: Vec<QueryResult>,
}

/// What the webhook answered to a successful upload
#[derive(Debug, Clone, PartialEq)]
pub struct UploadReceipt {
    pub status: u16,
    pub message: Option<String>,
}

/// Pull a string `message` field out of a response body, if it is a JSON object.
pub fn response_message(body: &str) -> Option<String> {
    match serde_json::from_str::<Value>(body) {
        Ok(Value::Object(map)) => match map.get("message") {
            Some(Value::String(s)) => Some(s.clone()),
            Some(Value::Null) | None => None,
            Some(other) => Some(other.to_string()),
        },
        _ => None,
    }
}
