use super::types::AuthStatus;
use crate::AppError;
use crate::api::client::DblyserClient;
use crate::api::models::LoginResponse;
use crate::core::auth::LoginInput;
use crate::storage::token_store::{AUTH_TOKEN_KEY, TokenStore};
use tracing::{debug, warn};

/// Authentication service for managing the local bearer token
pub struct AuthService {
    client: DblyserClient,
    token_store: TokenStore,
}

impl AuthService {
    /// Create new AuthService instance
    pub fn new(client: DblyserClient, token_store: TokenStore) -> Self {
        Self {
            client,
            token_store,
        }
    }

    /// Log in with email and password and persist the returned token
    pub async fn login(&self, input: &LoginInput) -> Result<LoginResponse, AppError> {
        // Nothing goes over the network until the input is valid
        input.validate()?;

        debug!(base_url = %self.client.base_url, "Calling login endpoint");
        let response = self.client.login(&input.email, &input.password).await?;

        if response.token.is_empty() {
            warn!("Login response did not include a token; storing an empty token");
        }

        self.token_store
            .save_token(AUTH_TOKEN_KEY, &response.token)?;
        debug!(path = %self.token_store.path().display(), "Token saved");

        Ok(response)
    }

    /// Forget the stored token. Returns whether one was present.
    pub fn logout(&self) -> Result<bool, AppError> {
        Ok(self.token_store.delete_token(AUTH_TOKEN_KEY)?)
    }

    /// Get current authentication status
    pub fn status(&self) -> Result<AuthStatus, AppError> {
        let token = self.token_store.get_token(AUTH_TOKEN_KEY)?;
        Ok(AuthStatus {
            token_present: token.is_some_and(|t| !t.is_empty()),
            token_path: self.token_store.path().to_path_buf(),
        })
    }
}
