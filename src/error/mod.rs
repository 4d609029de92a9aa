//! The unified error handling system for the gate.

// 1. Core Types
pub use cache::CacheError;
pub use config::ConfigError;
pub use types::AuthError;

/// A unified `Result` type for the entire crate.
///
/// All functions that can fail should return this type.
pub type Result<T> = std::result::Result<T, AuthError>;

// 2. Module declarations
pub mod cache;
pub mod config;
pub mod types;

/// Error Category for monitoring and alerting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCategory {
    /// Errors caused by the client (e.g., malformed header, rejected token).
    /// Definitive denials; the caller usually answers 401.
    Client,
    /// Errors caused by the gate or its dependencies (identity provider,
    /// configuration, cache store). Should be logged and alerted on.
    Server,
}
