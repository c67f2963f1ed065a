// ==========================================
// BREEAM & LEED 认证看板 - BREEAM 注册库访问层
// ==========================================
// 职责: 注册库 HTTP 访问 + 响应解析
// ==========================================

pub mod client;
pub mod error;
pub mod payload;

// 重导出核心类型
pub use client::{BreeamClient, HttpTransport, RegistryCredentials, RegistryTransport};
pub use error::{RegistryError, RegistryResult};
pub use payload::SchemeOption;
