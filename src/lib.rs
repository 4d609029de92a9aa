//! # Social Auth Gate
//!
//! 第三方身份凭据校验库：确认访问令牌当前有效且属于声称的用户

pub mod auth;
pub mod cache;
pub mod config;
pub mod error;
pub mod logging;

// Re-export commonly used types
pub use auth::{AuthorizationResult, AuthorizationService, Credential, Provider};
pub use config::AppConfig;
pub use error::{AuthError, Result};
