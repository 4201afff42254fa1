use crate::cli::main_types::{AnalyseArgs, LoginArgs};
use crate::core::auth::LoginInput;
use crate::core::connection::redact_password;
use crate::core::runner::FailurePolicy;
use crate::core::services::analysis_service::{AnalysisRequest, AnalysisService};
use crate::core::services::auth_service::AuthService;
use crate::core::services::types::AnalysisOutcome;
use crate::display::{OperationStatus, TableDisplay, display_status};
use crate::error::{AppError, StorageError};
use crate::storage::config::Settings;
use std::io::IsTerminal;

#[derive(Default)]
pub struct AuthHandler;

impl AuthHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn login(&self, args: LoginArgs, service: &AuthService) -> Result<(), AppError> {
        let input = LoginInput::new(args.email, args.password);
        match service.login(&input).await {
            Ok(response) => {
                let who = if response.user.email.is_empty() {
                    input.email.as_str()
                } else {
                    response.user.email.as_str()
                };
                display_status(
                    &format!("Login successful! Welcome {}.", who),
                    OperationStatus::Success,
                );
                Ok(())
            }
            Err(e) => {
                display_status(&format!("Login failed: {}", e), OperationStatus::Error);
                Err(e)
            }
        }
    }

    pub fn logout(&self, service: &AuthService) -> Result<(), AppError> {
        if service.logout()? {
            display_status("Logged out, token removed", OperationStatus::Success);
        } else {
            display_status("No stored token found", OperationStatus::Warning);
        }
        Ok(())
    }

    pub fn status(&self, service: &AuthService, settings: &Settings) -> Result<(), AppError> {
        let status = service.status()?;

        println!("Authentication Status:");
        println!("=====================");
        if status.token_present {
            println!("Token: ✅ stored");
        } else {
            println!("Token: ❌ not found (use 'dba login' to authenticate)");
        }
        println!("Token file: {}", status.token_path.display());
        println!("\nEndpoints:");
        println!("  Base URL: {}", settings.base_url);
        println!("  Webhook:  {}", settings.webhook_url);

        Ok(())
    }
}

#[derive(Default)]
pub struct AnalyseHandler;

impl AnalyseHandler {
    pub fn new() -> Self {
        Self
    }

    pub async fn handle(&self, args: AnalyseArgs, service: &AnalysisService) -> Result<(), AppError> {
        let request = AnalysisRequest {
            connection_string: args.connection_string,
            policy: if args.include_failed {
                FailurePolicy::Record
            } else {
                FailurePolicy::Skip
            },
            dry_run: args.dry_run,
        };

        let outcome = service.analyse(&request).await?;
        let output = outcome.output();

        let table = TableDisplay::new().with_colors(std::io::stdout().is_terminal());
        match &outcome {
            AnalysisOutcome::DryRun { output } => {
                // The payload goes to stdout so it can be piped; everything else to stderr
                let json = serde_json::to_string_pretty(output).map_err(|e| {
                    StorageError::Serialization {
                        message: e.to_string(),
                    }
                })?;
                println!("{}", json);
                eprintln!("{}", table.render_summary(&output.data));
            }
            AnalysisOutcome::Uploaded { receipt, .. } => {
                println!("Database: {}", redact_password(&output.connection_string));
                println!("{}", table.render_summary(&output.data));
                let message = match &receipt.message {
                    Some(message) => format!(
                        "Data sent to the web server. Response: {}. Message: {}.",
                        receipt.status, message
                    ),
                    None => format!("Data sent to the web server. Response: {}.", receipt.status),
                };
                display_status(&message, OperationStatus::Success);
            }
        }

        Ok(())
    }
}
