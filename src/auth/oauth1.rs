//! # OAuth 1.0a 请求签名
//!
//! HMAC-SHA1 签名，仅 Twitter 校验使用。nonce 和 timestamp 由调用方传入，
//! 签名函数本身是纯函数。
//!
//! 百分号编码遵循 RFC 3986：只保留 `A-Z a-z 0-9 - . _ ~`。

use std::collections::BTreeMap;

use base64::{Engine as _, engine::general_purpose};
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::Url;

use crate::error::{AuthError, ConfigError, Result};

type HmacSha1 = Hmac<Sha1>;

/// 签名方法
pub const SIGNATURE_METHOD: &str = "HMAC-SHA1";
/// 协议版本
pub const OAUTH_VERSION: &str = "1.0";

/// RFC 3986 百分号编码
#[must_use]
pub fn percent_encode(input: &str) -> String {
    urlencoding::encode(input).into_owned()
}

/// 单次请求的 `OAuth` 协议参数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OAuthParameters {
    /// 应用 consumer key
    pub consumer_key: String,
    /// 用户访问令牌
    pub token: String,
    /// 一次性随机数
    pub nonce: String,
    /// Unix 时间戳（秒）
    pub timestamp: i64,
}

impl OAuthParameters {
    /// 使用给定的 nonce 和时间戳
    #[must_use]
    pub fn new(
        consumer_key: impl Into<String>,
        token: impl Into<String>,
        nonce: impl Into<String>,
        timestamp: i64,
    ) -> Self {
        Self {
            consumer_key: consumer_key.into(),
            token: token.into(),
            nonce: nonce.into(),
            timestamp,
        }
    }

    /// 生成新的 nonce 和当前时间戳
    #[must_use]
    pub fn generate(consumer_key: impl Into<String>, token: impl Into<String>) -> Self {
        Self::new(
            consumer_key,
            token,
            uuid::Uuid::new_v4().simple().to_string(),
            chrono::Utc::now().timestamp(),
        )
    }

    /// 参与签名的协议参数（不含 `oauth_signature`）
    #[must_use]
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), self.nonce.clone()),
            ("oauth_signature_method".to_string(), SIGNATURE_METHOD.to_string()),
            ("oauth_timestamp".to_string(), self.timestamp.to_string()),
            ("oauth_token".to_string(), self.token.clone()),
            ("oauth_version".to_string(), OAUTH_VERSION.to_string()),
        ]
    }
}

/// 规范化请求URL：去掉查询和片段，省略默认端口
fn normalized_url(url: &Url) -> Result<String> {
    let host = url.host_str().ok_or_else(|| {
        AuthError::Config(ConfigError::invalid(format!("URL without host: {url}")))
    })?;
    let authority = match url.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    };
    Ok(format!("{}://{}{}", url.scheme(), authority, url.path()))
}

/// 构造签名基础字符串
///
/// 参数集合 = 协议参数 + URL 查询参数 + `extra_params`，
/// 先编码再按键、值排序。
pub fn signature_base_string(
    method: &str,
    url: &str,
    oauth: &OAuthParameters,
    extra_params: &[(String, String)],
) -> Result<String> {
    let parsed = Url::parse(url).map_err(|e| {
        AuthError::Config(ConfigError::invalid(format!("invalid signing URL {url}: {e}")))
    })?;

    let mut encoded: Vec<(String, String)> = oauth
        .to_pairs()
        .into_iter()
        .chain(
            parsed
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned())),
        )
        .chain(extra_params.iter().cloned())
        .map(|(k, v)| (percent_encode(&k), percent_encode(&v)))
        .collect();
    encoded.sort();

    let parameter_string = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    Ok(format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&normalized_url(&parsed)?),
        percent_encode(&parameter_string)
    ))
}

/// 计算 HMAC-SHA1 签名（base64）
pub fn sign(
    method: &str,
    url: &str,
    oauth: &OAuthParameters,
    extra_params: &[(String, String)],
    consumer_secret: &str,
    token_secret: &str,
) -> Result<String> {
    let base_string = signature_base_string(method, url, oauth, extra_params)?;
    let signing_key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );

    let mut mac = HmacSha1::new_from_slice(signing_key.as_bytes())
        .map_err(|e| AuthError::Config(ConfigError::invalid(format!("HMAC key rejected: {e}"))))?;
    mac.update(base_string.as_bytes());

    Ok(general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

/// 生成 `Authorization: OAuth ...` 头的值
#[must_use]
pub fn authorization_header(oauth: &OAuthParameters, signature: &str) -> String {
    let mut pairs = oauth.to_pairs();
    pairs.push(("oauth_signature".to_string(), signature.to_string()));
    pairs.sort();

    let fields = pairs
        .iter()
        .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

/// 解析 `Authorization: OAuth ...` 头，返回解码后的参数
///
/// 格式不正确时返回 `None`。
#[must_use]
pub fn parse_authorization_header(header: &str) -> Option<BTreeMap<String, String>> {
    let fields = header.strip_prefix("OAuth ")?;
    let mut params = BTreeMap::new();

    for field in fields.split(',') {
        let (key, value) = field.trim().split_once('=')?;
        let value = value.strip_prefix('"')?.strip_suffix('"')?;
        let key = urlencoding::decode(key).ok()?.into_owned();
        let value = urlencoding::decode(value).ok()?.into_owned();
        params.insert(key, value);
    }

    Some(params)
}
