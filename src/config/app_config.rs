//! # 应用配置结构定义

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::auth::endpoints::VerificationEndpoint;
use crate::auth::types::Provider;
use crate::cache::DEFAULT_CACHING_PERIOD;
use crate::error::ConfigError;

/// 应用主配置结构
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 认证配置
    #[serde(default)]
    pub auth: AuthConfig,
    /// 缓存配置
    #[serde(default)]
    pub cache: CacheConfig,
}

/// 认证配置
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// 允许的服务商
    pub supported_services: Vec<Provider>,
    /// Twitter 应用 consumer key
    pub consumer_key: Option<String>,
    /// Twitter 应用 consumer secret
    pub consumer_secret: Option<String>,
    /// 是否缓存校验结果
    pub use_credential_caching: bool,
    /// 校验结果缓存时间（秒）
    pub credential_caching_period: u64,
    /// 服务商请求超时（秒）
    pub request_timeout: u64,
    /// 在 debug 日志中输出服务商原始响应
    pub debug: bool,
    /// 覆盖服务商端点
    pub endpoints: EndpointsConfig,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            supported_services: Provider::ALL.to_vec(),
            consumer_key: None,
            consumer_secret: None,
            use_credential_caching: true,
            credential_caching_period: DEFAULT_CACHING_PERIOD,
            request_timeout: 10,
            debug: false,
            endpoints: EndpointsConfig::default(),
        }
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("supported_services", &self.supported_services)
            .field("consumer_key", &self.consumer_key)
            .field(
                "consumer_secret",
                &self.consumer_secret.as_ref().map(|_| "***"),
            )
            .field("use_credential_caching", &self.use_credential_caching)
            .field("credential_caching_period", &self.credential_caching_period)
            .field("request_timeout", &self.request_timeout)
            .field("debug", &self.debug)
            .field("endpoints", &self.endpoints)
            .finish()
    }
}

impl AuthConfig {
    /// 服务商是否在允许列表中
    #[must_use]
    pub fn is_supported(&self, provider: Provider) -> bool {
        self.supported_services.contains(&provider)
    }

    /// 请求超时
    #[must_use]
    pub const fn request_timeout_duration(&self) -> Duration {
        Duration::from_secs(self.request_timeout)
    }

    /// 缓存时间
    #[must_use]
    pub const fn caching_period(&self) -> Duration {
        Duration::from_secs(self.credential_caching_period)
    }

    /// 服务商的校验端点（应用覆盖后）
    #[must_use]
    pub fn endpoint_for(&self, provider: Provider) -> VerificationEndpoint {
        let endpoint = VerificationEndpoint::default_for(provider);
        match self.endpoints.base_url_for(provider) {
            Some(base_url) => endpoint.with_base_url(base_url),
            None => endpoint,
        }
    }

    /// 验证认证配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout == 0 {
            return Err(ConfigError::invalid("auth.request_timeout must be greater than 0"));
        }

        if self.use_credential_caching && self.credential_caching_period == 0 {
            return Err(ConfigError::invalid(
                "auth.credential_caching_period must be greater than 0 when caching is enabled",
            ));
        }

        if self.is_supported(Provider::Twitter) {
            let has_key = self.consumer_key.as_deref().is_some_and(|k| !k.is_empty());
            let has_secret = self
                .consumer_secret
                .as_deref()
                .is_some_and(|s| !s.is_empty());
            if !has_key || !has_secret {
                return Err(ConfigError::invalid(
                    "Twitter is a supported service but auth.consumer_key / auth.consumer_secret are missing",
                ));
            }
        }

        for provider in Provider::ALL {
            if let Some(base_url) = self.endpoints.base_url_for(provider) {
                url::Url::parse(base_url).map_err(|e| {
                    ConfigError::invalid(format!("invalid endpoint URL for {provider}: {e}"))
                })?;
            }
        }

        Ok(())
    }
}

/// 服务商端点覆盖，未设置时使用真实服务商地址
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Google tokeninfo 地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub google: Option<String>,
    /// Facebook Graph `/me` 地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facebook: Option<String>,
    /// Twitter `verify_credentials` 地址
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub twitter: Option<String>,
}

impl EndpointsConfig {
    /// 服务商的覆盖地址
    #[must_use]
    pub fn base_url_for(&self, provider: Provider) -> Option<&str> {
        match provider {
            Provider::Google => self.google.as_deref(),
            Provider::Facebook => self.facebook.as_deref(),
            Provider::Twitter => self.twitter.as_deref(),
        }
    }
}

/// 缓存类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheType {
    /// 内存缓存
    #[default]
    Memory,
    /// Redis缓存
    Redis,
}

/// 缓存配置
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// 缓存类型
    pub cache_type: CacheType,
    /// 内存缓存最大条目数
    pub memory_max_entries: usize,
    /// Redis 缓存配置
    #[serde(skip_serializing_if = "Option::is_none")]
    pub redis: Option<RedisConfig>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            cache_type: CacheType::Memory,
            memory_max_entries: 10000,
            redis: None,
        }
    }
}

impl CacheConfig {
    /// 验证缓存配置
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self.cache_type {
            CacheType::Memory => {
                if self.redis.is_some() {
                    return Err(ConfigError::invalid(
                        "cache.redis 配置仅在 cache_type = \"redis\" 时可用",
                    ));
                }
                if self.memory_max_entries == 0 {
                    return Err(ConfigError::invalid(
                        "cache.memory_max_entries must be greater than 0",
                    ));
                }
            }
            CacheType::Redis => {
                let redis = self.redis.as_ref().ok_or_else(|| {
                    ConfigError::invalid("Redis cache configuration must be provided")
                })?;

                if redis.url.is_empty() {
                    return Err(ConfigError::invalid("Redis URL cannot be empty"));
                }
            }
        }

        Ok(())
    }
}

/// Redis配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedisConfig {
    /// Redis连接URL
    pub url: String,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: "redis://127.0.0.1:6379/0".to_string(),
        }
    }
}

impl AppConfig {
    /// 验证配置的有效性
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.auth.validate()?;
        self.cache.validate()
    }
}
