//! Error types for the rolodex view core.
//!
//! This module defines the centralized error type [`RolodexError`] and a type alias
//! [`Result`] for convenient error handling throughout the crate. All errors are
//! implemented using the `thiserror` crate for automatic `Error` trait implementation.
//!
//! The view pipeline itself is total: sorting, filtering, pagination, and view
//! composition cannot fail. Errors only arise at the edges, when loading a
//! category file or when a source implementation reports a delivery problem.

use thiserror::Error;

/// The main error type for rolodex operations.
///
/// This enum consolidates all error conditions that can occur outside the pure
/// pipeline: configuration parsing, category file loading, and subscription
/// plumbing. Most variants wrap underlying errors from external crates using
/// `#[from]` for automatic conversion.
///
/// # Examples
///
/// ```
/// use rolodex::domain::RolodexError;
///
/// fn validate_config() -> Result<(), RolodexError> {
///     Err(RolodexError::Config("no page sizes configured".to_string()))
/// }
/// ```
#[derive(Debug, Error)]
pub enum RolodexError {
    /// Configuration is invalid or missing.
    ///
    /// Occurs when required configuration values are missing or malformed.
    /// The string describes the specific configuration problem.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A category file could not be parsed.
    ///
    /// Occurs when a TOML category file exists but does not match the expected
    /// shape. The string contains the parser's description of what went wrong.
    #[error("Category file error: {0}")]
    Categories(String),

    /// Filesystem or I/O operation failed.
    ///
    /// Wraps errors from standard library I/O operations. Automatically converts
    /// from `std::io::Error` using the `#[from]` attribute.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A data source reported a failure.
    ///
    /// Occurs when an [`EntrySource`](crate::source::EntrySource) or
    /// [`AuthSource`](crate::source::AuthSource) implementation cannot deliver
    /// or register a subscription. The string contains details from the source.
    #[error("Source error: {0}")]
    Source(String),
}

/// A specialized `Result` type for rolodex operations.
///
/// This is a type alias for `std::result::Result<T, RolodexError>` that simplifies
/// function signatures throughout the codebase.
pub type Result<T> = std::result::Result<T, RolodexError>;
