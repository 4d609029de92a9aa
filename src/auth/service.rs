//! # 授权服务
//!
//! 组合认证头解析、服务商白名单、校验缓存和服务商校验策略：
//!
//! 解析 → 白名单 → 缓存命中直接放行 → 远程校验 → 写入缓存 → 指定用户检查
//!
//! 同一凭据的并发请求可能都未命中缓存并各自发起远程校验，这是允许的。

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tracing::Instrument;

use super::header_parser::AuthHeaderParser;
use super::strategies::{BearerTokenVerifier, ProviderVerifier, TokenVerifier, TwitterVerifier};
use super::types::{AuthorizationResult, Credential, Provider};
use crate::cache::{CacheKey, CacheStore, VerificationCache, build_cache_store};
use crate::config::{AppConfig, AuthConfig};
use crate::error::{AuthError, ConfigError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, linfo, lwarn};

/// 授权服务
///
/// 启动时构建一次，之后在请求间共享（`&self` 即可并发调用）。
#[derive(Debug)]
pub struct AuthorizationService {
    verifiers: HashMap<Provider, ProviderVerifier>,
    cache: VerificationCache,
}

impl AuthorizationService {
    /// 根据认证配置创建服务
    ///
    /// 只为白名单中的服务商创建校验策略。`store` 为 `None` 或配置关闭缓存时不使用缓存。
    pub fn new(config: &AuthConfig, store: Option<Arc<dyn CacheStore>>) -> Result<Self> {
        config.validate()?;

        let http_client = Client::builder()
            .timeout(config.request_timeout_duration())
            .build()
            .map_err(|e| ConfigError::invalid(format!("failed to build HTTP client: {e}")))?;

        let mut verifiers = HashMap::new();
        for &provider in &config.supported_services {
            let verifier = Self::build_verifier(config, provider, http_client.clone())?;
            verifiers.insert(provider, verifier);
        }

        let cache = match store {
            Some(store) if config.use_credential_caching => {
                VerificationCache::new(store, config.caching_period())
            }
            _ => VerificationCache::disabled(),
        };

        linfo!(
            "system",
            LogStage::Startup,
            LogComponent::Auth,
            "service_init",
            "Authorization service initialized",
            supported_services = ?config.supported_services,
            caching = cache.is_enabled(),
            caching_period_seconds = cache.ttl().as_secs(),
            request_timeout_seconds = config.request_timeout
        );

        Ok(Self { verifiers, cache })
    }

    /// 根据完整应用配置创建服务，按需连接缓存存储
    pub async fn from_config(config: &AppConfig) -> Result<Self> {
        let store = if config.auth.use_credential_caching {
            Some(build_cache_store(&config.cache).await?)
        } else {
            None
        };
        Self::new(&config.auth, store)
    }

    fn build_verifier(
        config: &AuthConfig,
        provider: Provider,
        http_client: Client,
    ) -> Result<ProviderVerifier> {
        let endpoint = config.endpoint_for(provider);

        let verifier: ProviderVerifier = match provider {
            Provider::Google | Provider::Facebook => {
                BearerTokenVerifier::new(provider, endpoint, http_client)?
                    .with_debug(config.debug)
                    .into()
            }
            Provider::Twitter => TwitterVerifier::new(
                endpoint,
                http_client,
                config.consumer_key.clone().unwrap_or_default(),
                config.consumer_secret.clone().unwrap_or_default(),
            )?
            .with_debug(config.debug)
            .into(),
        };

        Ok(verifier)
    }

    /// 服务商是否启用
    #[must_use]
    pub fn supports(&self, provider: Provider) -> bool {
        self.verifiers.contains_key(&provider)
    }

    /// 缓存是否启用
    #[must_use]
    pub const fn caching_enabled(&self) -> bool {
        self.cache.is_enabled()
    }

    /// 缓存时间
    #[must_use]
    pub const fn caching_period(&self) -> Duration {
        self.cache.ttl()
    }

    /// 授权一次请求
    ///
    /// `header` 为认证头原文；`required_user` 非空时，校验通过的用户ID必须与之相等。
    pub async fn authorize(
        &self,
        header: Option<&str>,
        required_user: Option<&str>,
    ) -> Result<AuthorizationResult> {
        let request_id = uuid::Uuid::new_v4().simple().to_string();
        let span = tracing::info_span!("authorize", request_id = %request_id);

        self.authorize_inner(&request_id, header, required_user)
            .instrument(span)
            .await
    }

    /// 只需要是/否结果的调用方使用，所有失败都返回 `false`
    pub async fn try_authorize(&self, header: Option<&str>, required_user: Option<&str>) -> bool {
        self.authorize(header, required_user).await.is_ok()
    }

    async fn authorize_inner(
        &self,
        request_id: &str,
        header: Option<&str>,
        required_user: Option<&str>,
    ) -> Result<AuthorizationResult> {
        let result = self.verify_credential(request_id, header).await;

        // 空的指定用户等同于不指定
        let result = result.and_then(|result| match required_user {
            Some(required) if !required.is_empty() && required != result.user_id => {
                Err(AuthError::UserMismatch {
                    user_id: result.user_id,
                    required: required.to_string(),
                })
            }
            _ => Ok(result),
        });

        match &result {
            Ok(result) => {
                linfo!(
                    request_id,
                    LogStage::Response,
                    LogComponent::Auth,
                    "authorized",
                    "Request authorized",
                    provider = %result.provider,
                    user_id = %result.user_id
                );
            }
            Err(e) => {
                lwarn!(
                    request_id,
                    LogStage::Response,
                    LogComponent::Auth,
                    "denied",
                    "Request not authorized",
                    error_code = e.error_code(),
                    error = %e
                );
            }
        }

        result
    }

    async fn verify_credential(
        &self,
        request_id: &str,
        header: Option<&str>,
    ) -> Result<AuthorizationResult> {
        let credential = AuthHeaderParser::parse(header)?;
        ldebug!(
            request_id,
            LogStage::Authentication,
            LogComponent::Auth,
            "header_parsed",
            "Authorization header parsed",
            provider = %credential.provider,
            user_id = %credential.user_id
        );

        let verifier = self.verifier_for(&credential)?;

        let key = CacheKey::for_credential(&credential);
        if self.cache.lookup(request_id, &key).await {
            ldebug!(
                request_id,
                LogStage::Cache,
                LogComponent::Auth,
                "cache_short_circuit",
                "Credential verified from cache",
                provider = %credential.provider,
                user_id = %credential.user_id
            );
            return Ok(AuthorizationResult::verified(
                credential.provider,
                credential.user_id,
            ));
        }

        let user_id = verifier.verify(&credential, request_id).await?;
        self.cache.record(request_id, &key, self.cache.ttl()).await;

        Ok(AuthorizationResult::verified(credential.provider, user_id))
    }

    fn verifier_for(&self, credential: &Credential) -> Result<&ProviderVerifier> {
        self.verifiers
            .get(&credential.provider)
            .ok_or(AuthError::UnsupportedProvider {
                provider: credential.provider,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::MemoryCache;
    use crate::config::EndpointsConfig;
    use pretty_assertions::assert_eq;
    use std::io;
    use std::sync::Mutex;

    // 不可达的端点：测试路径不能发出远程调用
    const UNREACHABLE: &str = "http://127.0.0.1:9/unreachable";

    fn offline_config(supported: &[Provider]) -> AuthConfig {
        AuthConfig {
            supported_services: supported.to_vec(),
            consumer_key: Some("ck".to_string()),
            consumer_secret: Some("cs".to_string()),
            request_timeout: 1,
            endpoints: EndpointsConfig {
                google: Some(UNREACHABLE.to_string()),
                facebook: Some(UNREACHABLE.to_string()),
                twitter: Some(UNREACHABLE.to_string()),
            },
            ..AuthConfig::default()
        }
    }

    async fn seeded_service(credential: &Credential) -> AuthorizationService {
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(100));
        store
            .set(
                CacheKey::for_credential(credential).as_str(),
                Duration::from_secs(900),
            )
            .await
            .unwrap();
        AuthorizationService::new(&offline_config(&Provider::ALL), Some(store)).unwrap()
    }

    #[test]
    fn test_only_supported_providers_get_verifiers() {
        let service =
            AuthorizationService::new(&offline_config(&[Provider::Facebook]), None).unwrap();
        assert!(service.supports(Provider::Facebook));
        assert!(!service.supports(Provider::Google));
        assert!(!service.supports(Provider::Twitter));
        assert!(!service.caching_enabled());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = offline_config(&Provider::ALL);
        config.consumer_secret = None;
        assert!(matches!(
            AuthorizationService::new(&config, None),
            Err(AuthError::Config(_))
        ));
    }

    #[test]
    fn test_caching_disabled_by_config() {
        let mut config = offline_config(&Provider::ALL);
        config.use_credential_caching = false;
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(10));
        let service = AuthorizationService::new(&config, Some(store)).unwrap();
        assert!(!service.caching_enabled());
    }

    #[tokio::test]
    async fn test_malformed_header() {
        let service = AuthorizationService::new(&offline_config(&Provider::ALL), None).unwrap();
        assert!(matches!(
            service.authorize(None, None).await,
            Err(AuthError::MalformedHeader { .. })
        ));
        assert!(matches!(
            service.authorize(Some("Bearer abc"), None).await,
            Err(AuthError::MalformedHeader { .. })
        ));
    }

    #[tokio::test]
    async fn test_unsupported_provider_before_cache() {
        // 即使缓存中存在，白名单之外的服务商也被拒绝
        let credential = Credential::bearer(Provider::Google, "42", "tok");
        let store: Arc<dyn CacheStore> = Arc::new(MemoryCache::new(10));
        store
            .set(CacheKey::for_credential(&credential).as_str(), Duration::from_secs(60))
            .await
            .unwrap();
        let service =
            AuthorizationService::new(&offline_config(&[Provider::Facebook]), Some(store)).unwrap();

        assert!(matches!(
            service.authorize(Some("Google 42|tok"), None).await,
            Err(AuthError::UnsupportedProvider { provider: Provider::Google })
        ));
    }

    #[tokio::test]
    async fn test_cache_hit_skips_remote_call() {
        let credential = Credential::twitter("789", "tok", "sec");
        let service = seeded_service(&credential).await;

        let result = service.authorize(Some("Twitter 789|tok|sec"), None).await.unwrap();
        assert_eq!(result, AuthorizationResult::verified(Provider::Twitter, "789"));
    }

    #[tokio::test]
    async fn test_required_user_checked_after_cache_hit() {
        let credential = Credential::bearer(Provider::Facebook, "123", "tokABC");
        let service = seeded_service(&credential).await;

        assert!(service.authorize(Some("Facebook 123|tokABC"), Some("123")).await.is_ok());
        let err = service
            .authorize(Some("Facebook 123|tokABC"), Some("456"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserMismatch { .. }));
        assert_eq!(err.to_string(), "User 123 is unauthorized");
    }

    #[tokio::test]
    async fn test_empty_required_user_is_no_constraint() {
        let credential = Credential::bearer(Provider::Facebook, "123", "tokABC");
        let service = seeded_service(&credential).await;

        let result = service.authorize(Some("Facebook 123|tokABC"), Some("")).await.unwrap();
        assert_eq!(result, AuthorizationResult::verified(Provider::Facebook, "123"));
    }

    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl io::Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    impl CapturedLogs {
        fn lines(&self) -> Vec<String> {
            String::from_utf8(self.0.lock().unwrap().clone())
                .unwrap()
                .lines()
                .map(str::to_string)
                .collect()
        }
    }

    #[tokio::test]
    async fn test_cache_events_carry_request_id() {
        let credential = Credential::bearer(Provider::Facebook, "123", "tokABC");
        let service = seeded_service(&credential).await;

        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        service.authorize(Some("Facebook 123|tokABC"), None).await.unwrap();

        let lines = logs.lines();
        let cache_hit = lines
            .iter()
            .find(|line| line.contains("Credential cache hit"))
            .expect("cache hit event");
        assert!(!cache_hit.contains("request_id=system"), "{cache_hit}");

        // 同一次请求中所有事件的 request_id 一致
        let authorized = lines
            .iter()
            .find(|line| line.contains("Request authorized"))
            .expect("authorized event");
        let request_id = authorized
            .split("request_id=")
            .nth(1)
            .and_then(|rest| rest.split(|c: char| c == '}' || c.is_whitespace()).next())
            .unwrap();
        assert_eq!(request_id.len(), 32);
        assert!(cache_hit.contains(&format!("request_id={request_id}")));
    }

    #[tokio::test]
    async fn test_unreachable_provider_is_upstream() {
        let service = AuthorizationService::new(&offline_config(&Provider::ALL), None).unwrap();
        let err = service.authorize(Some("Facebook 123|tokABC"), None).await.unwrap_err();
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_try_authorize_collapses_errors() {
        let credential = Credential::bearer(Provider::Facebook, "123", "tokABC");
        let service = seeded_service(&credential).await;

        assert!(service.try_authorize(Some("Facebook 123|tokABC"), None).await);
        assert!(!service.try_authorize(Some("Facebook 123|tokABC"), Some("1")).await);
        assert!(!service.try_authorize(None, None).await);
        assert!(!service.try_authorize(Some("Facebook 999|other"), None).await);
    }
}
