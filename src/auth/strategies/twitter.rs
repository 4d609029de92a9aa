//! # Twitter 校验策略
//!
//! Twitter 使用 `OAuth 1.0a`：需要应用的 consumer key/secret 以及用户的
//! token/token secret，对 `verify_credentials` 请求签名后发送。

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::AUTHORIZATION;

use super::traits::{TokenVerifier, ensure_credential, execute_verification};
use crate::auth::endpoints::VerificationEndpoint;
use crate::auth::oauth1::{self, OAuthParameters};
use crate::auth::types::{Credential, Provider};
use crate::error::{AuthError, ConfigError, Result};
use crate::logging::LogComponent;

/// Twitter 校验策略
#[derive(Clone)]
pub struct TwitterVerifier {
    endpoint: VerificationEndpoint,
    http_client: Client,
    consumer_key: String,
    consumer_secret: String,
    debug: bool,
}

impl std::fmt::Debug for TwitterVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwitterVerifier")
            .field("endpoint", &self.endpoint)
            .field("consumer_key", &self.consumer_key)
            .field("debug", &self.debug)
            .finish_non_exhaustive()
    }
}

impl TwitterVerifier {
    /// 创建校验策略，consumer key 和 secret 不能为空
    pub fn new(
        endpoint: VerificationEndpoint,
        http_client: Client,
        consumer_key: impl Into<String>,
        consumer_secret: impl Into<String>,
    ) -> Result<Self> {
        let consumer_key = consumer_key.into();
        let consumer_secret = consumer_secret.into();
        if consumer_key.is_empty() || consumer_secret.is_empty() {
            return Err(AuthError::Config(ConfigError::invalid(
                "Twitter verification requires consumer_key and consumer_secret",
            )));
        }

        Ok(Self {
            endpoint,
            http_client,
            consumer_key,
            consumer_secret,
            debug: false,
        })
    }

    /// 是否在 debug 日志中输出服务商原始响应
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 为一次请求生成 `Authorization` 头
    pub fn authorization_header(
        &self,
        params: &OAuthParameters,
        token_secret: &str,
    ) -> Result<String> {
        let signature = oauth1::sign(
            "GET",
            &self.endpoint.base_url,
            params,
            &[],
            &self.consumer_secret,
            token_secret,
        )?;
        Ok(oauth1::authorization_header(params, &signature))
    }
}

#[async_trait]
impl TokenVerifier for TwitterVerifier {
    fn provider(&self) -> Provider {
        Provider::Twitter
    }

    async fn verify(&self, credential: &Credential, request_id: &str) -> Result<String> {
        ensure_credential(Provider::Twitter, credential)?;

        let token_secret = credential
            .token_secret
            .as_deref()
            .filter(|secret| !secret.is_empty())
            .ok_or_else(|| {
                AuthError::invalid_token(Provider::Twitter, "a token secret is required")
            })?;

        let params = OAuthParameters::generate(&self.consumer_key, &credential.token);
        let header = self.authorization_header(&params, token_secret)?;

        let request = self
            .http_client
            .get(&self.endpoint.base_url)
            .header(AUTHORIZATION, header);

        execute_verification(
            request_id,
            request,
            Provider::Twitter,
            &self.endpoint,
            &credential.user_id,
            self.debug,
            LogComponent::TwitterVerifier,
        )
        .await
    }
}
