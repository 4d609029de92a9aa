//! # 缓存抽象层
//!
//! 凭据缓存只需要"存在且未过期"这一种语义：`get` 判断存在，`set` 插入或刷新过期时间。
//! 提供内存缓存和 Redis 缓存两种实现。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use redis::AsyncCommands;
use redis::aio::ConnectionManager;
use tokio::sync::RwLock;
use tokio::time::Instant;

use crate::config::{CacheConfig, CacheType};
use crate::error::{CacheError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, linfo};

/// 缓存存储接口
///
/// 由外部提供、进程内共享；写入是幂等的存在标记，不需要额外加锁。
#[async_trait]
pub trait CacheStore: Send + Sync {
    /// 键存在且未过期
    async fn get(&self, key: &str) -> Result<bool>;

    /// 插入或刷新标记，`ttl` 后过期
    async fn set(&self, key: &str, ttl: Duration) -> Result<()>;
}

/// 内存缓存实现
///
/// 键 → 过期时刻。读取时被动过期；容量满时先清理过期项，再淘汰最早过期的项。
pub struct MemoryCache {
    data: RwLock<HashMap<String, Instant>>,
    max_entries: usize,
}

impl MemoryCache {
    /// 创建内存缓存，`max_entries` 至少为 1
    #[must_use]
    pub fn new(max_entries: usize) -> Self {
        Self {
            data: RwLock::new(HashMap::new()),
            max_entries: max_entries.max(1),
        }
    }

    /// 清理所有过期项，返回清理数量
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut data = self.data.write().await;
        let before = data.len();
        data.retain(|_, expires_at| *expires_at > now);
        before - data.len()
    }

    /// 当前条目数（含尚未清理的过期项）
    pub async fn len(&self) -> usize {
        self.data.read().await.len()
    }

    /// 是否为空
    pub async fn is_empty(&self) -> bool {
        self.data.read().await.is_empty()
    }

    fn ensure_capacity(data: &mut HashMap<String, Instant>, max_entries: usize, now: Instant) {
        if data.len() < max_entries {
            return;
        }

        data.retain(|_, expires_at| *expires_at > now);

        if data.len() >= max_entries {
            let oldest = data
                .iter()
                .min_by_key(|(_, expires_at)| **expires_at)
                .map(|(key, _)| key.clone());
            if let Some(key) = oldest {
                data.remove(&key);
            }
        }
    }
}

#[async_trait]
impl CacheStore for MemoryCache {
    async fn get(&self, key: &str) -> Result<bool> {
        let now = Instant::now();
        let live = {
            let data = self.data.read().await;
            data.get(key).map(|expires_at| *expires_at > now)
        };

        match live {
            Some(true) => Ok(true),
            Some(false) => {
                // 读取时被动过期
                self.data.write().await.remove(key);
                Ok(false)
            }
            None => Ok(false),
        }
    }

    async fn set(&self, key: &str, ttl: Duration) -> Result<()> {
        if ttl.is_zero() {
            return Err(CacheError::invalid_ttl("ttl must be greater than zero").into());
        }

        let now = Instant::now();
        let mut data = self.data.write().await;
        if !data.contains_key(key) {
            Self::ensure_capacity(&mut data, self.max_entries, now);
        }
        data.insert(key.to_string(), now + ttl);

        Ok(())
    }
}

/// Redis缓存实现
pub struct RedisCache {
    connection_manager: ConnectionManager,
}

impl RedisCache {
    /// 连接 Redis
    pub async fn connect(redis_url: &str) -> Result<Self> {
        let client = redis::Client::open(redis_url).map_err(CacheError::from)?;
        let connection_manager = ConnectionManager::new(client)
            .await
            .map_err(CacheError::from)?;

        Ok(Self { connection_manager })
    }
}

#[async_trait]
impl CacheStore for RedisCache {
    async fn get(&self, key: &str) -> Result<bool> {
        let mut conn = self.connection_manager.clone();
        let exists: bool = conn.exists(key).await.map_err(CacheError::from)?;
        Ok(exists)
    }

    async fn set(&self, key: &str, ttl: Duration) -> Result<()> {
        let seconds = ttl.as_secs();
        if seconds == 0 {
            return Err(CacheError::invalid_ttl("Redis ttl must be at least one second").into());
        }

        let mut conn = self.connection_manager.clone();
        conn.set_ex::<_, _, ()>(key, 1_u8, seconds)
            .await
            .map_err(CacheError::from)?;
        Ok(())
    }
}

/// 根据配置创建缓存存储
pub async fn build_cache_store(config: &CacheConfig) -> Result<Arc<dyn CacheStore>> {
    match config.cache_type {
        CacheType::Memory => {
            linfo!(
                "system",
                LogStage::Startup,
                LogComponent::Cache,
                "cache_memory",
                &format!("使用内存缓存，最大条目数: {}", config.memory_max_entries)
            );
            Ok(Arc::new(MemoryCache::new(config.memory_max_entries)))
        }
        CacheType::Redis => {
            let redis = config
                .redis
                .as_ref()
                .ok_or_else(|| CacheError::config("cache_type = \"redis\" requires a [cache.redis] section"))?;
            ldebug!(
                "system",
                LogStage::Startup,
                LogComponent::Cache,
                "cache_redis",
                "正在连接 Redis 缓存"
            );
            Ok(Arc::new(RedisCache::connect(&redis.url).await?))
        }
    }
}
