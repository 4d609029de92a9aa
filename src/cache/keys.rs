//! # 凭据缓存键
//!
//! 缓存键是 (服务商, 用户ID, 令牌, 令牌密钥) 的 SHA-256 摘要，只作内部查找用，
//! 不可逆、不对外暴露。每个字段带长度前缀，避免字段边界歧义。

use std::fmt;

use sha2::{Digest, Sha256};

use crate::auth::types::{Credential, Provider};

/// 缓存键前缀
pub const KEY_PREFIX: &str = "auth:social";

/// 凭据缓存键 - `auth:social:{sha256_hex}`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// 生成缓存键字符串
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 由凭据生成
    #[must_use]
    pub fn for_credential(credential: &Credential) -> Self {
        key_for(
            credential.provider,
            &credential.user_id,
            &credential.token,
            credential.token_secret.as_deref(),
        )
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

fn update_field(hasher: &mut Sha256, field: &str) {
    hasher.update((field.len() as u64).to_be_bytes());
    hasher.update(field.as_bytes());
}

/// 派生缓存键
///
/// 相同输入总是得到相同的键；任何字段的变化都会得到不同的键。
/// `token_secret` 只在存在时参与摘要。
#[must_use]
pub fn key_for(
    provider: Provider,
    user_id: &str,
    token: &str,
    token_secret: Option<&str>,
) -> CacheKey {
    let mut hasher = Sha256::new();
    update_field(&mut hasher, provider.as_str());
    update_field(&mut hasher, user_id);
    update_field(&mut hasher, token);
    if let Some(secret) = token_secret {
        update_field(&mut hasher, secret);
    }

    CacheKey(format!("{KEY_PREFIX}:{}", hex::encode(hasher.finalize())))
}
