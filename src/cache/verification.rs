//! # 凭据校验缓存
//!
//! 短时间内校验过的凭据直接放行，避免每个请求都调用服务商。
//! 缓存只会导致"下次重新校验"，不会导致错误放行：读失败视为未命中，写失败只记录日志。

use std::sync::Arc;
use std::time::Duration;

use super::abstract_cache::CacheStore;
use super::keys::CacheKey;
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, lwarn};

/// 默认缓存时间（秒）
pub const DEFAULT_CACHING_PERIOD: u64 = 900;

/// 凭据校验缓存
#[derive(Clone)]
pub struct VerificationCache {
    /// `None` 表示缓存关闭
    store: Option<Arc<dyn CacheStore>>,
    ttl: Duration,
}

impl VerificationCache {
    /// 启用缓存
    pub fn new(store: Arc<dyn CacheStore>, ttl: Duration) -> Self {
        Self {
            store: Some(store),
            ttl,
        }
    }

    /// 关闭缓存：`lookup` 永远未命中，`record` 不做任何事
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            store: None,
            ttl: Duration::from_secs(DEFAULT_CACHING_PERIOD),
        }
    }

    /// 是否启用
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// 配置的缓存时间
    #[must_use]
    pub const fn ttl(&self) -> Duration {
        self.ttl
    }

    /// 是否存在未过期的校验记录
    pub async fn lookup(&self, request_id: &str, key: &CacheKey) -> bool {
        let Some(store) = &self.store else {
            return false;
        };

        match store.get(key.as_str()).await {
            Ok(true) => {
                ldebug!(request_id, LogStage::Cache, LogComponent::Cache, "cache_hit", "Credential cache hit", cache_key = %key);
                true
            }
            Ok(false) => {
                ldebug!(request_id, LogStage::Cache, LogComponent::Cache, "cache_miss", "Credential cache miss", cache_key = %key);
                false
            }
            Err(e) => {
                lwarn!(request_id, LogStage::Cache, LogComponent::Cache, "cache_get_fail", "Credential cache error, treating as miss", cache_key = %key, error = %e);
                false
            }
        }
    }

    /// 记录一次成功校验，`ttl` 后过期
    pub async fn record(&self, request_id: &str, key: &CacheKey, ttl: Duration) {
        let Some(store) = &self.store else {
            return;
        };

        match store.set(key.as_str(), ttl).await {
            Ok(()) => {
                ldebug!(request_id, LogStage::Cache, LogComponent::Cache, "cache_set", "Cached credential verification", cache_key = %key, ttl_seconds = ttl.as_secs());
            }
            Err(e) => {
                // 缓存失败不应该影响授权结果
                lwarn!(request_id, LogStage::Cache, LogComponent::Cache, "cache_set_fail", "Failed to cache verification, continuing without cache", cache_key = %key, error = %e);
            }
        }
    }
}

impl std::fmt::Debug for VerificationCache {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationCache")
            .field("enabled", &self.is_enabled())
            .field("ttl", &self.ttl)
            .finish()
    }
}
