//! Status line output for command results

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum OperationStatus {
    InProgress,
    Success,
    Warning,
    Error,
}

/// Format a one-line status message
pub fn format_status(operation: &str, status: OperationStatus) -> String {
    let symbol = match status {
        OperationStatus::InProgress => "⏳",
        OperationStatus::Success => "✅",
        OperationStatus::Warning => "⚠️",
        OperationStatus::Error => "❌",
    };
    // Leading space keeps wide emoji from being clipped by some terminals
    format!(" {} {}", symbol, operation)
}

/// Print a one-line status message to stdout
pub fn display_status(operation: &str, status: OperationStatus) {
    println!("{}", format_status(operation, status));
}
