//! # 测试辅助
//!
//! 用 wiremock 模拟三个身份服务商，并构建指向它们的授权服务

#![allow(dead_code)]

use std::sync::{Arc, Once};
use std::time::Duration;

use social_auth_gate::AuthorizationService;
use social_auth_gate::auth::Provider;
use social_auth_gate::cache::{CacheStore, MemoryCache};
use social_auth_gate::config::{AuthConfig, EndpointsConfig};
use wiremock::MockServer;

pub const GOOGLE_PATH: &str = "/oauth2/v1/tokeninfo";
pub const FACEBOOK_PATH: &str = "/me";
pub const TWITTER_PATH: &str = "/1.1/account/verify_credentials.json";

pub const CONSUMER_KEY: &str = "test-consumer-key";
pub const CONSUMER_SECRET: &str = "test-consumer-secret";

static INIT: Once = Once::new();

/// 初始化测试日志
pub fn init_test_env() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_env_filter("social_auth_gate=debug")
            .with_test_writer()
            .try_init()
            .ok();
    });
}

/// 模拟身份服务商环境
pub struct MockProviders {
    pub server: MockServer,
    pub store: Arc<MemoryCache>,
}

impl MockProviders {
    pub async fn start() -> Self {
        init_test_env();
        Self {
            server: MockServer::start().await,
            store: Arc::new(MemoryCache::new(1000)),
        }
    }

    /// 所有端点都指向 mock 服务器的认证配置
    pub fn auth_config(&self, supported: &[Provider]) -> AuthConfig {
        let base = self.server.uri();
        AuthConfig {
            supported_services: supported.to_vec(),
            consumer_key: Some(CONSUMER_KEY.to_string()),
            consumer_secret: Some(CONSUMER_SECRET.to_string()),
            request_timeout: 2,
            debug: true,
            endpoints: EndpointsConfig {
                google: Some(format!("{base}{GOOGLE_PATH}")),
                facebook: Some(format!("{base}{FACEBOOK_PATH}")),
                twitter: Some(format!("{base}{TWITTER_PATH}")),
            },
            ..AuthConfig::default()
        }
    }

    /// 使用共享内存缓存的授权服务
    pub fn service(&self, supported: &[Provider]) -> AuthorizationService {
        self.service_with(self.auth_config(supported))
    }

    pub fn service_with(&self, config: AuthConfig) -> AuthorizationService {
        let store: Arc<dyn CacheStore> = self.store.clone();
        AuthorizationService::new(&config, Some(store)).expect("service config is valid")
    }

    pub fn twitter_url(&self) -> String {
        format!("{}{TWITTER_PATH}", self.server.uri())
    }
}

/// 超时测试用的短超时配置
pub fn short_timeout(mut config: AuthConfig) -> AuthConfig {
    config.request_timeout = 1;
    config
}

pub const SLOW_RESPONSE: Duration = Duration::from_secs(3);
