// ==========================================
// BREEAM & LEED 认证看板 - 注册库客户端错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 注册库客户端错误类型
#[derive(Error, Debug)]
pub enum RegistryError {
    // ===== 凭据错误 =====
    #[error("缺少注册库凭据（BREEAM_USER / BREEAM_PASS）")]
    MissingCredentials,

    #[error("401 Unauthorized: 请检查用户名/密码/权限")]
    Unauthorized,

    // ===== 传输错误 =====
    #[error("注册库返回错误状态: {status} ({path})")]
    Status { status: u16, path: String },

    #[error("HTTP 请求失败: {0}")]
    Http(String),

    // ===== 数据错误 =====
    #[error("注册库响应格式错误: {0}")]
    InvalidPayload(String),
}

impl From<reqwest::Error> for RegistryError {
    fn from(err: reqwest::Error) -> Self {
        RegistryError::Http(err.to_string())
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::InvalidPayload(err.to_string())
    }
}

/// Result 类型别名
pub type RegistryResult<T> = Result<T, RegistryError>;
