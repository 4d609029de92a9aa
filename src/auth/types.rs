//! # 认证类型定义
//!
//! 定义凭据、服务商和授权结果等核心数据结构

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 外部身份服务商
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Provider {
    /// Google：Bearer 令牌，`tokeninfo` 接口返回 `user_id`
    Google,
    /// Facebook：Bearer 令牌，Graph `me` 接口返回 `id`
    Facebook,
    /// Twitter：`OAuth 1.0a` 签名请求，返回 `id_str`
    Twitter,
}

impl Provider {
    /// 全部支持的服务商
    pub const ALL: [Self; 3] = [Self::Twitter, Self::Facebook, Self::Google];

    /// 认证头中使用的服务名
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Google => "Google",
            Self::Facebook => "Facebook",
            Self::Twitter => "Twitter",
        }
    }

    /// 是否需要请求签名（携带 token secret）
    #[must_use]
    pub const fn requires_signing(&self) -> bool {
        matches!(self, Self::Twitter)
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Provider {
    type Err = String;

    /// 大小写敏感，与认证头前缀一致
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Google" => Ok(Self::Google),
            "Facebook" => Ok(Self::Facebook),
            "Twitter" => Ok(Self::Twitter),
            other => Err(format!("unknown provider: {other}")),
        }
    }
}

/// 从认证头解析出的凭据
///
/// `token_secret` 当且仅当服务商为 Twitter 时存在。
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    /// 服务商
    pub provider: Provider,
    /// 声称的用户ID
    pub user_id: String,
    /// 访问令牌
    pub token: String,
    /// `OAuth1` 令牌密钥（仅 Twitter）
    pub token_secret: Option<String>,
}

impl Credential {
    /// 创建 Bearer 类凭据 (Google / Facebook)
    #[must_use]
    pub fn bearer(provider: Provider, user_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            provider,
            user_id: user_id.into(),
            token: token.into(),
            token_secret: None,
        }
    }

    /// 创建 Twitter 凭据
    #[must_use]
    pub fn twitter(
        user_id: impl Into<String>,
        token: impl Into<String>,
        token_secret: impl Into<String>,
    ) -> Self {
        Self {
            provider: Provider::Twitter,
            user_id: user_id.into(),
            token: token.into(),
            token_secret: Some(token_secret.into()),
        }
    }
}

// 令牌与密钥不进入 Debug 输出，避免意外写入日志
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("provider", &self.provider)
            .field("user_id", &self.user_id)
            .field("token", &"***")
            .field("token_secret", &self.token_secret.as_ref().map(|_| "***"))
            .finish()
    }
}

/// 授权结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorizationResult {
    /// 是否已验证
    pub verified: bool,
    /// 服务商
    pub provider: Provider,
    /// 服务商确认的用户ID
    pub user_id: String,
}

impl AuthorizationResult {
    /// 创建已验证结果
    #[must_use]
    pub fn verified(provider: Provider, user_id: impl Into<String>) -> Self {
        Self {
            verified: true,
            provider,
            user_id: user_id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_round_trip_names() {
        for provider in Provider::ALL {
            assert_eq!(provider.as_str().parse::<Provider>().unwrap(), provider);
        }
        assert!("twitter".parse::<Provider>().is_err());
    }

    #[test]
    fn test_only_twitter_requires_signing() {
        assert!(Provider::Twitter.requires_signing());
        assert!(!Provider::Google.requires_signing());
        assert!(!Provider::Facebook.requires_signing());
    }

    #[test]
    fn test_credential_debug_hides_secrets() {
        let credential = Credential::twitter("789", "tok-secret-value", "sec-value");
        let debug = format!("{credential:?}");
        assert!(debug.contains("789"));
        assert!(!debug.contains("tok-secret-value"));
        assert!(!debug.contains("sec-value"));
    }
}
