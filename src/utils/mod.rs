//! Utils module - Shared utilities and helpers
//!
//! This module provides utility functions and helpers that are used across
//! multiple layers of the application architecture.

/// Error conversion helpers for HTTP and database failures
pub mod error_helpers;

/// Tracing subscriber setup
pub mod logging;

/// Input validation and sanitization utilities
pub mod validation;
