//! # 缓存模块
//!
//! 凭据校验结果缓存：存储抽象、缓存键派生和校验缓存

pub mod abstract_cache;
pub mod keys;
pub mod verification;

pub use abstract_cache::{CacheStore, MemoryCache, RedisCache, build_cache_store};
pub use keys::{CacheKey, key_for};
pub use verification::{DEFAULT_CACHING_PERIOD, VerificationCache};
