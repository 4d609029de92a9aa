//! # Bearer 令牌校验策略
//!
//! Google 与 Facebook 共用同一种协议：`GET {base_url}?access_token={token}`，
//! 从 JSON 响应中读取用户ID字段。两者只在端点和字段名上不同。

use async_trait::async_trait;
use reqwest::Client;

use super::traits::{TokenVerifier, ensure_credential, execute_verification};
use crate::auth::endpoints::VerificationEndpoint;
use crate::auth::types::{Credential, Provider};
use crate::error::{AuthError, ConfigError, Result};
use crate::logging::LogComponent;

/// Bearer 令牌校验策略
#[derive(Debug, Clone)]
pub struct BearerTokenVerifier {
    provider: Provider,
    endpoint: VerificationEndpoint,
    http_client: Client,
    debug: bool,
}

impl BearerTokenVerifier {
    /// 创建校验策略
    ///
    /// Twitter 需要签名，不能使用此策略。
    pub fn new(provider: Provider, endpoint: VerificationEndpoint, http_client: Client) -> Result<Self> {
        if provider.requires_signing() {
            return Err(AuthError::Config(ConfigError::invalid(format!(
                "{provider} requires request signing and cannot use bearer verification"
            ))));
        }
        Ok(Self {
            provider,
            endpoint,
            http_client,
            debug: false,
        })
    }

    /// Google 默认端点
    pub fn google(http_client: Client) -> Self {
        Self {
            provider: Provider::Google,
            endpoint: VerificationEndpoint::default_for(Provider::Google),
            http_client,
            debug: false,
        }
    }

    /// Facebook 默认端点
    pub fn facebook(http_client: Client) -> Self {
        Self {
            provider: Provider::Facebook,
            endpoint: VerificationEndpoint::default_for(Provider::Facebook),
            http_client,
            debug: false,
        }
    }

    /// 是否在 debug 日志中输出服务商原始响应
    #[must_use]
    pub const fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// 当前端点
    #[must_use]
    pub const fn endpoint(&self) -> &VerificationEndpoint {
        &self.endpoint
    }
}

#[async_trait]
impl TokenVerifier for BearerTokenVerifier {
    fn provider(&self) -> Provider {
        self.provider
    }

    async fn verify(&self, credential: &Credential, request_id: &str) -> Result<String> {
        ensure_credential(self.provider, credential)?;

        let request = self
            .http_client
            .get(&self.endpoint.base_url)
            .query(&[("access_token", credential.token.as_str())]);

        execute_verification(
            request_id,
            request,
            self.provider,
            &self.endpoint,
            &credential.user_id,
            self.debug,
            LogComponent::BearerVerifier,
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn verifier_for(server: &MockServer, provider: Provider) -> BearerTokenVerifier {
        let endpoint = VerificationEndpoint::default_for(provider)
            .with_base_url(format!("{}/verify", server.uri()));
        BearerTokenVerifier::new(provider, endpoint, Client::new()).unwrap()
    }

    #[test]
    fn test_twitter_is_rejected() {
        let result = BearerTokenVerifier::new(
            Provider::Twitter,
            VerificationEndpoint::default_for(Provider::Twitter),
            Client::new(),
        );
        assert!(matches!(result, Err(AuthError::Config(_))));
    }

    #[test]
    fn test_default_constructors() {
        let google = BearerTokenVerifier::google(Client::new());
        assert_eq!(google.provider(), Provider::Google);
        assert_eq!(google.endpoint().user_id_field, "user_id");

        let facebook = BearerTokenVerifier::facebook(Client::new());
        assert_eq!(facebook.provider(), Provider::Facebook);
        assert_eq!(facebook.endpoint().user_id_field, "id");
    }

    #[tokio::test]
    async fn test_google_matching_user_id() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/verify"))
            .and(query_param("access_token", "goog-token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user_id": "456",
                "expires_in": 3599
            })))
            .expect(1)
            .mount(&server)
            .await;

        let verifier = verifier_for(&server, Provider::Google);
        let credential = Credential::bearer(Provider::Google, "456", "goog-token");
        assert_eq!(verifier.verify(&credential, "test").await.unwrap(), "456");
    }

    #[tokio::test]
    async fn test_facebook_reads_id_field_only() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/verify"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"user_id": "123"})))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server, Provider::Facebook);
        let credential = Credential::bearer(Provider::Facebook, "123", "tok");
        let result = verifier.verify(&credential, "test").await;
        assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
    }

    #[tokio::test]
    async fn test_different_user_is_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "999"})))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server, Provider::Facebook);
        let credential = Credential::bearer(Provider::Facebook, "123", "tok");
        let result = verifier.verify(&credential, "test").await;
        assert!(matches!(result, Err(AuthError::InvalidToken { .. })));
    }

    #[tokio::test]
    async fn test_numeric_id_is_not_a_match() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": 123})))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server, Provider::Facebook);
        let credential = Credential::bearer(Provider::Facebook, "123", "tok");
        assert!(matches!(
            verifier.verify(&credential, "test").await,
            Err(AuthError::InvalidToken { .. })
        ));
    }

    #[tokio::test]
    async fn test_unauthorized_is_invalid_token() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server, Provider::Google);
        let credential = Credential::bearer(Provider::Google, "456", "expired");
        assert!(matches!(
            verifier.verify(&credential, "test").await,
            Err(AuthError::InvalidToken { provider: Provider::Google, .. })
        ));
    }

    #[tokio::test]
    async fn test_server_error_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server, Provider::Google);
        let credential = Credential::bearer(Provider::Google, "456", "tok");
        let err = verifier.verify(&credential, "test").await.unwrap_err();
        assert!(matches!(err, AuthError::Upstream { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_non_json_body_is_upstream() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>oops</html>"))
            .mount(&server)
            .await;

        let verifier = verifier_for(&server, Provider::Facebook).with_debug(true);
        let credential = Credential::bearer(Provider::Facebook, "123", "tok");
        assert!(matches!(
            verifier.verify(&credential, "test").await,
            Err(AuthError::Upstream { .. })
        ));
    }

    #[tokio::test]
    async fn test_empty_token_never_reaches_provider() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let verifier = verifier_for(&server, Provider::Google);
        let credential = Credential::bearer(Provider::Google, "456", "");
        assert!(matches!(
            verifier.verify(&credential, "test").await,
            Err(AuthError::InvalidToken { .. })
        ));
    }
}
