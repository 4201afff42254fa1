use crate::error::AppError;
use crate::utils::validation::validate_required;

/// User login credentials taken from the command line
#[derive(Debug, Clone)]
pub struct LoginInput {
    pub email: String,
    pub password: String,
}

impl LoginInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into().trim().to_string(),
            password: password.into(),
        }
    }

    /// Validate that credentials are not empty
    pub fn validate(&self) -> Result<(), AppError> {
        validate_required(&self.email, "email", "--email or -e")?;
        validate_required(&self.password, "password", "--password or -p")?;
        Ok(())
    }
}
