//! # 认证头解析器
//!
//! 从单个 `Authorization` 头中提取凭据，支持以下格式：
//!
//! - `Facebook <user_id>|<token>`
//! - `Google <user_id>|<token>`
//! - `Twitter <user_id>|<token>|<token_secret>`
//!
//! 服务名前缀大小写敏感，不做额外的空白裁剪。
//! 用户ID（以及 Twitter 的令牌）不含 `|`；最后一个字段取到行尾，可以包含 `|`，
//! 例如 Facebook 应用令牌 `appid|secret`。

use std::sync::LazyLock;

use regex::Regex;

use crate::auth::types::{Credential, Provider};
use crate::error::{AuthError, Result};

static BEARER_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(Facebook|Google) ([^|]+)\|(.+)$").expect("bearer header pattern is valid")
});

static TWITTER_HEADER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^Twitter ([^|]+)\|([^|]+)\|(.+)$").expect("twitter header pattern is valid")
});

/// 认证头解析器
pub struct AuthHeaderParser;

impl AuthHeaderParser {
    /// 解析认证头
    ///
    /// # 错误
    /// - 头缺失或为空：`MalformedHeader`
    /// - 与任何格式都不匹配：`MalformedHeader`
    pub fn parse(header: Option<&str>) -> Result<Credential> {
        let header = match header {
            Some(value) if !value.is_empty() => value,
            _ => return Err(AuthError::malformed("Authorization header is required.")),
        };

        if let Some(captures) = BEARER_HEADER_RE.captures(header) {
            let provider = if &captures[1] == "Facebook" {
                Provider::Facebook
            } else {
                Provider::Google
            };
            return Ok(Credential::bearer(provider, &captures[2], &captures[3]));
        }

        if let Some(captures) = TWITTER_HEADER_RE.captures(header) {
            return Ok(Credential::twitter(
                &captures[1],
                &captures[2],
                &captures[3],
            ));
        }

        Err(AuthError::malformed("Malformed authorization header."))
    }

    /// 构建认证头（用于客户端和测试）
    #[must_use]
    pub fn build(credential: &Credential) -> String {
        match &credential.token_secret {
            Some(secret) => format!(
                "{} {}|{}|{}",
                credential.provider, credential.user_id, credential.token, secret
            ),
            None => format!(
                "{} {}|{}",
                credential.provider, credential.user_id, credential.token
            ),
        }
    }
}
