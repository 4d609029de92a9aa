//! # 配置错误

use thiserror::Error;

/// 配置加载与校验错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// TOML 语法错误或字段类型不符
    #[error("Configuration parse failed: {0}")]
    Parse(#[from] toml::de::Error),

    /// 配置文件读取失败
    #[error("Configuration load failed: {path}")]
    Load {
        /// 配置文件路径
        path: String,
        /// 底层 IO 错误
        #[source]
        source: std::io::Error,
    },

    /// 配置文件不存在
    #[error("Configuration file not found: {0}")]
    NotFound(String),

    /// 字段取值不合法
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

impl ConfigError {
    /// 便捷构造函数
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::Invalid(message.into())
    }
}
