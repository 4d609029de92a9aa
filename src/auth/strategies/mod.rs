//! # 令牌校验策略模块
//!
//! Google / Facebook 共用 Bearer 策略，Twitter 使用独立的签名策略。
//! `ProviderVerifier` 把它们收拢为一个枚举，统一分发 `verify`。

pub mod bearer_token;
pub mod traits;
pub mod twitter;

use async_trait::async_trait;

// 导出核心trait和类型
pub use traits::TokenVerifier;

// 导出具体策略实现
pub use bearer_token::BearerTokenVerifier;
pub use twitter::TwitterVerifier;

use crate::auth::types::{Credential, Provider};
use crate::error::Result;

/// 校验策略枚举 - 避免 trait object 的动态分发
#[derive(Debug, Clone)]
pub enum ProviderVerifier {
    /// Google / Facebook
    Bearer(BearerTokenVerifier),
    /// Twitter
    Twitter(TwitterVerifier),
}

#[async_trait]
impl TokenVerifier for ProviderVerifier {
    fn provider(&self) -> Provider {
        match self {
            Self::Bearer(verifier) => verifier.provider(),
            Self::Twitter(verifier) => verifier.provider(),
        }
    }

    async fn verify(&self, credential: &Credential, request_id: &str) -> Result<String> {
        match self {
            Self::Bearer(verifier) => verifier.verify(credential, request_id).await,
            Self::Twitter(verifier) => verifier.verify(credential, request_id).await,
        }
    }
}

impl From<BearerTokenVerifier> for ProviderVerifier {
    fn from(verifier: BearerTokenVerifier) -> Self {
        Self::Bearer(verifier)
    }
}

impl From<TwitterVerifier> for ProviderVerifier {
    fn from(verifier: TwitterVerifier) -> Self {
        Self::Twitter(verifier)
    }
}
