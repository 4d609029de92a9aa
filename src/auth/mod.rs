//! # 认证授权模块
//!
//! 第三方身份凭据校验：认证头解析、服务商校验策略、`OAuth1` 签名和授权服务。
//! 对外只暴露授权服务与核心数据结构，其余实现通过子模块路径访问。

pub mod endpoints;
pub mod header_parser;
pub mod oauth1;
pub mod service;
pub mod strategies;
pub mod types;

pub use header_parser::AuthHeaderParser;
pub use service::AuthorizationService;
pub use types::{AuthorizationResult, Credential, Provider};
