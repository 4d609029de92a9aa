//! # 缓存错误
//!
//! 缓存存储的配置和读写错误，授权路径上只记录日志，不影响授权结果。

use thiserror::Error;

/// 描述缓存及 Redis 相关的错误。
#[derive(Debug, Error)]
pub enum CacheError {
    /// 缓存配置不完整或不一致
    #[error("缓存配置错误: {0}")]
    Config(String),

    /// TTL 不可用（为零，或 Redis 下不足一秒）
    #[error("缓存 TTL 无效: {0}")]
    InvalidTtl(String),

    /// 存储读写失败
    #[error("缓存操作失败: {0}")]
    Operation(String),

    /// Redis 客户端返回的错误
    #[error("Redis 客户端错误: {0}")]
    Redis(#[from] redis::RedisError),
}

impl CacheError {
    /// 便捷构造函数，统一字符串转换。
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// 构造 [`CacheError::InvalidTtl`]
    pub fn invalid_ttl(message: impl Into<String>) -> Self {
        Self::InvalidTtl(message.into())
    }

    /// 构造 [`CacheError::Operation`]
    pub fn operation(message: impl Into<String>) -> Self {
        Self::Operation(message.into())
    }
}
