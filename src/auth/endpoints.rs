//! # 身份服务商校验端点
//!
//! 每个服务商一个静态端点配置：基础URL + 响应中用户ID的字段名。
//! 启动时构建一次，之后只读共享。

use crate::auth::types::Provider;

/// Google `tokeninfo` 接口
pub const GOOGLE_TOKENINFO_URL: &str = "https://www.googleapis.com/oauth2/v1/tokeninfo";
/// Facebook Graph `me` 接口
pub const FACEBOOK_ME_URL: &str = "https://graph.facebook.com/me";
/// Twitter `verify_credentials` 接口
pub const TWITTER_VERIFY_CREDENTIALS_URL: &str =
    "https://api.twitter.com/1.1/account/verify_credentials.json";

/// 校验端点
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerificationEndpoint {
    /// 基础URL（不含查询参数）
    pub base_url: String,
    /// 响应JSON中用户ID字段名
    pub user_id_field: &'static str,
}

impl VerificationEndpoint {
    /// 服务商的默认端点
    #[must_use]
    pub fn default_for(provider: Provider) -> Self {
        match provider {
            Provider::Google => Self {
                base_url: GOOGLE_TOKENINFO_URL.to_string(),
                user_id_field: "user_id",
            },
            Provider::Facebook => Self {
                base_url: FACEBOOK_ME_URL.to_string(),
                user_id_field: "id",
            },
            Provider::Twitter => Self {
                base_url: TWITTER_VERIFY_CREDENTIALS_URL.to_string(),
                user_id_field: "id_str",
            },
        }
    }

    /// 覆盖基础URL（测试或预发环境），字段名保持不变
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}
