//! Business logic: connection string validation, the diagnostic query set,
//! the query runner, and the services the CLI drives.

pub mod auth;
pub mod connection;
pub mod queries;
pub mod runner;
pub mod services;
