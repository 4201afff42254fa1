pub use error::AppError;

/// Main architecture layers (dependency flow: CLI → Core → Storage)
pub mod cli; // Command-line interface
pub mod core; // Validation, query runner, services
pub mod storage; // Configuration and token persistence

/// Support modules (used across layers)
pub mod api; // Remote API client (login, upload)
pub mod display; // Output formatting
pub mod error; // Error handling
pub mod utils; // Shared utilities and helpers

pub type Result<T> = std::result::Result<T, AppError>;
