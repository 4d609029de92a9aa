//! # 错误类型定义

use thiserror::Error;

use super::{CacheError, ConfigError, ErrorCategory};
use crate::auth::types::Provider;

/// 认证网关主要错误类型
///
/// 前四种是对凭据本身的确定性判断，`Upstream` 表示与凭据有效性无关的基础设施故障。
#[derive(Debug, Error)]
pub enum AuthError {
    /// 认证头缺失或无法解析
    #[error("Malformed authorization header: {message}")]
    MalformedHeader {
        /// 解析失败原因
        message: String,
    },

    /// 该服务未启用
    #[error("{provider} authentication not supported")]
    UnsupportedProvider {
        /// 认证头中的服务商
        provider: Provider,
    },

    /// 服务商拒绝了令牌，或令牌属于其他用户
    #[error("Access token invalid or does not belong to the current user ({provider}): {message}")]
    InvalidToken {
        /// 拒绝令牌的服务商
        provider: Provider,
        /// 拒绝原因
        message: String,
    },

    /// 令牌有效，但不是要求的用户
    #[error("User {user_id} is unauthorized")]
    UserMismatch {
        /// 校验通过的用户ID
        user_id: String,
        /// 调用方要求的用户ID
        required: String,
    },

    /// 网络或服务商故障
    #[error("Identity provider request failed: {message}")]
    Upstream {
        /// 故障描述
        message: String,
        /// 底层错误
        #[source]
        source: Option<anyhow::Error>,
    },

    /// 配置错误
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// 缓存存储错误
    #[error("Cache error: {0}")]
    Cache(#[from] CacheError),
}

impl AuthError {
    /// 创建认证头格式错误
    pub fn malformed<T: Into<String>>(message: T) -> Self {
        Self::MalformedHeader {
            message: message.into(),
        }
    }

    /// 创建令牌无效错误
    pub fn invalid_token<T: Into<String>>(provider: Provider, message: T) -> Self {
        Self::InvalidToken {
            provider,
            message: message.into(),
        }
    }

    /// 创建上游错误
    pub fn upstream<T: Into<String>>(message: T) -> Self {
        Self::Upstream {
            message: message.into(),
            source: None,
        }
    }

    /// 创建带来源的上游错误
    pub fn upstream_with_source<T: Into<String>, E: Into<anyhow::Error>>(
        message: T,
        source: E,
    ) -> Self {
        Self::Upstream {
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// 错误分类，供调用方决定日志级别和告警
    #[must_use]
    pub const fn category(&self) -> ErrorCategory {
        match self {
            Self::MalformedHeader { .. }
            | Self::UnsupportedProvider { .. }
            | Self::InvalidToken { .. }
            | Self::UserMismatch { .. } => ErrorCategory::Client,
            Self::Upstream { .. } | Self::Config(_) | Self::Cache(_) => ErrorCategory::Server,
        }
    }

    /// 只有上游故障值得调用方重试
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Upstream { .. })
    }

    /// 稳定的错误代码，便于调用方映射为传输层响应
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::MalformedHeader { .. } => "MALFORMED_HEADER",
            Self::UnsupportedProvider { .. } => "UNSUPPORTED_PROVIDER",
            Self::InvalidToken { .. } => "INVALID_TOKEN",
            Self::UserMismatch { .. } => "USER_MISMATCH",
            Self::Upstream { .. } => "UPSTREAM_ERROR",
            Self::Config(_) => "CONFIG_ERROR",
            Self::Cache(_) => "CACHE_ERROR",
        }
    }
}

impl From<reqwest::Error> for AuthError {
    fn from(err: reqwest::Error) -> Self {
        let message = if err.is_timeout() {
            "request timed out".to_string()
        } else if err.is_connect() {
            "connection failed".to_string()
        } else if err.is_decode() {
            "response body could not be decoded".to_string()
        } else {
            "request failed".to_string()
        };
        Self::upstream_with_source(message, err)
    }
}

impl From<redis::RedisError> for AuthError {
    fn from(err: redis::RedisError) -> Self {
        Self::Cache(CacheError::Redis(err))
    }
}
