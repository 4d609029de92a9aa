//! # 令牌校验策略特质
//!
//! 定义所有服务商校验策略必须实现的基础接口，以及公共的响应分类逻辑

use async_trait::async_trait;
use reqwest::{RequestBuilder, StatusCode};
use serde_json::Value;

use crate::auth::endpoints::VerificationEndpoint;
use crate::auth::types::{Credential, Provider};
use crate::error::{AuthError, ConfigError, Result};
use crate::logging::{LogComponent, LogStage};
use crate::{ldebug, lwarn};

/// 令牌校验接口
///
/// 一次远程调用，不做重试。成功时返回服务商确认的用户ID；
/// 失败时只会是 `InvalidToken`（客户端问题）或 `Upstream`（基础设施问题）。
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// 策略对应的服务商
    fn provider(&self) -> Provider;

    /// 校验凭据，`request_id` 只用于日志关联
    async fn verify(&self, credential: &Credential, request_id: &str) -> Result<String>;
}

/// 校验前的基本检查：服务商匹配、用户ID和令牌非空
pub(crate) fn ensure_credential(provider: Provider, credential: &Credential) -> Result<()> {
    if credential.provider != provider {
        return Err(AuthError::Config(ConfigError::invalid(format!(
            "{} credential dispatched to {provider} verifier",
            credential.provider
        ))));
    }
    if credential.user_id.is_empty() || credential.token.is_empty() {
        return Err(AuthError::invalid_token(
            provider,
            "a user ID and access token are required",
        ));
    }
    Ok(())
}

/// 发送校验请求并对结果分类
///
/// - 401 → `InvalidToken`
/// - 其他非 2xx、传输失败、超时、非 JSON 响应 → `Upstream`
/// - 字段缺失或与声称的用户ID不一致 → `InvalidToken`
pub(crate) async fn execute_verification(
    request_id: &str,
    request: RequestBuilder,
    provider: Provider,
    endpoint: &VerificationEndpoint,
    expected_user_id: &str,
    debug: bool,
    component: LogComponent,
) -> Result<String> {
    ldebug!(
        request_id,
        LogStage::ExternalApi,
        component,
        "verify_request",
        "Sending verification request",
        provider = %provider,
        user_id = %expected_user_id,
        url = %endpoint.base_url
    );

    let response = request.send().await.map_err(|e| {
        lwarn!(
            request_id,
            LogStage::ExternalApi,
            component,
            "verify_transport_error",
            "Verification request failed",
            provider = %provider,
            error = %e
        );
        AuthError::from(e)
    })?;

    let status = response.status();
    if status == StatusCode::UNAUTHORIZED {
        return Err(AuthError::invalid_token(
            provider,
            "provider rejected the access token",
        ));
    }
    if !status.is_success() {
        lwarn!(
            request_id,
            LogStage::ExternalApi,
            component,
            "verify_upstream_status",
            "Identity provider returned an unexpected status",
            provider = %provider,
            status = status.as_u16()
        );
        return Err(AuthError::upstream(format!(
            "{provider} returned HTTP {status}"
        )));
    }

    let body = response.text().await?;
    if debug {
        ldebug!(
            request_id,
            LogStage::ExternalApi,
            component,
            "verify_response_body",
            &body,
            provider = %provider
        );
    }

    let payload: Value = serde_json::from_str(&body).map_err(|e| {
        AuthError::upstream_with_source(format!("{provider} returned a non-JSON body"), e)
    })?;

    match payload.get(endpoint.user_id_field).and_then(Value::as_str) {
        Some(user_id) if user_id == expected_user_id => Ok(user_id.to_string()),
        Some(_) => Err(AuthError::invalid_token(
            provider,
            "token belongs to a different user",
        )),
        None => Err(AuthError::invalid_token(
            provider,
            format!("response has no `{}` field", endpoint.user_id_field),
        )),
    }
}
