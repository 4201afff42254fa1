pub mod progress;
pub mod table;

pub use progress::{OperationStatus, display_status, format_status};
pub use table::TableDisplay;
