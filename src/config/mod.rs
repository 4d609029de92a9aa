//! # 配置管理模块
//!
//! 处理应用配置加载和验证

mod app_config;

pub use app_config::{AppConfig, AuthConfig, CacheConfig, CacheType, EndpointsConfig, RedisConfig};

use std::env;
use std::path::Path;

use crate::error::{ConfigError, Result};
use crate::linfo;
use crate::logging::{LogComponent, LogStage};

/// 加载配置文件 - `config/config.{RUST_ENV}.toml`，默认 `dev`
pub fn load_config() -> Result<AppConfig> {
    let env = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());
    load_config_from(format!("config/config.{env}.toml"))
}

/// 从指定路径加载并验证配置
pub fn load_config_from(path: impl AsRef<Path>) -> Result<AppConfig> {
    let path = path.as_ref();
    let shown = path.display().to_string();

    if !path.exists() {
        return Err(ConfigError::NotFound(shown).into());
    }

    let config_content = std::fs::read_to_string(path).map_err(|source| ConfigError::Load {
        path: shown.clone(),
        source,
    })?;

    let config = parse_config(&config_content)?;

    linfo!(
        "system",
        LogStage::Configuration,
        LogComponent::Config,
        "config_loaded",
        "配置加载完成",
        path = %shown,
        supported_services = ?config.auth.supported_services,
        caching = config.auth.use_credential_caching
    );

    Ok(config)
}

/// 解析并验证 TOML 配置内容
pub fn parse_config(content: &str) -> Result<AppConfig> {
    let config: AppConfig = toml::from_str(content).map_err(ConfigError::from)?;
    config.validate()?;
    Ok(config)
}
