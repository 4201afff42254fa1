use crate::api::models::{Output, UploadReceipt};
use std::path::PathBuf;

/// Local authentication state
#[derive(Debug, Clone)]
pub struct AuthStatus {
    pub token_present: bool,
    pub token_path: PathBuf,
}

/// Result of an `analyse` run
#[derive(Debug, Clone)]
pub enum AnalysisOutcome {
    /// Payload was posted to the webhook
    Uploaded {
        output: Output,
        receipt: UploadReceipt,
    },
    /// Payload was built but not sent
    DryRun { output: Output },
}

impl AnalysisOutcome {
    pub fn output(&self) -> &Output {
        match self {
            AnalysisOutcome::Uploaded { output, .. } => output,
            AnalysisOutcome::DryRun { output } => output,
        }
    }
}
