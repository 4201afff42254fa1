use crate::api::models::{LoginRequest, LoginResponse, Output, UploadReceipt, response_message};
use crate::error::{ApiError, AppError, AuthError};
use crate::utils::error_helpers::*;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use std::time::Duration;

pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
const USER_AGENT: &str = concat!("dblyser/", env!("CARGO_PKG_VERSION"));
const LOGIN_PATH: &str = "/v1/users/login";

#[derive(Debug, Clone)]
pub struct DblyserClient {
    client: Client,
    pub base_url: String,
}

impl DblyserClient {
    // Create baseClient with default settings
    pub fn new(base_url: String) -> Result<Self, ApiError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| convert_request_error(e, "client_init"))?;

        Ok(DblyserClient {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn build_request(&self, method: Method, path: &str) -> RequestBuilder {
        let url = format!("{}{}", self.base_url, path);
        self.client.request(method, url)
    }

    /// Exchange email and password for a bearer token.
    ///
    /// Fields missing from a successful response come back empty rather
    /// than failing the login.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse, AppError> {
        let endpoint = LOGIN_PATH;
        let payload = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };

        let response = crate::map_api_error!(
            self.build_request(Method::POST, endpoint)
                .json(&payload)
                .send()
                .await,
            endpoint
        )?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| convert_body_error(e, endpoint))?;

        if status.is_success() {
            serde_json::from_str::<LoginResponse>(&body)
                .map_err(|e| AppError::Api(convert_json_error(e, status.as_u16(), endpoint)))
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            Err(AppError::Auth(AuthError::InvalidCredentials))
        } else {
            Err(AppError::Auth(AuthError::LoginFailed {
                status: status.as_u16(),
                message: response_message(&body).unwrap_or(body),
            }))
        }
    }

    /// POST the analysis payload to the webhook with a bearer token.
    pub async fn upload(
        &self,
        webhook_url: &str,
        output: &Output,
        token: &str,
    ) -> Result<UploadReceipt, ApiError> {
        let endpoint = webhook_url;
        let payload =
            serde_json::to_vec(output).map_err(|e| convert_serialize_error(e, endpoint))?;

        let response = crate::map_api_error!(
            self.client
                .post(webhook_url)
                .bearer_auth(token)
                .header(reqwest::header::CONTENT_TYPE, "application/json")
                .body(payload)
                .send()
                .await,
            endpoint
        )?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| convert_body_error(e, endpoint))?;
        let message = response_message(&body);

        if status.is_success() {
            Ok(UploadReceipt {
                status: status.as_u16(),
                message,
            })
        } else if status == StatusCode::UNAUTHORIZED {
            Err(ApiError::Unauthorized {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                server_message: message.unwrap_or(body),
            })
        } else if status == StatusCode::REQUEST_TIMEOUT || status == StatusCode::GATEWAY_TIMEOUT {
            Err(convert_timeout_error(endpoint, DEFAULT_TIMEOUT_SECS))
        } else {
            Err(ApiError::Http {
                status: status.as_u16(),
                endpoint: endpoint.to_string(),
                message: message.unwrap_or(body),
            })
        }
    }
}
