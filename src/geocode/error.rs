// ==========================================
// BREEAM & LEED 认证看板 - 地理编码错误类型
// ==========================================

use thiserror::Error;

/// 地理编码错误类型
#[derive(Error, Debug)]
pub enum GeocodeError {
    #[error("地理编码请求失败: {0}")]
    Http(String),

    #[error("地理编码服务返回错误状态: {0}")]
    Status(u16),

    #[error("地理编码响应格式错误: {0}")]
    InvalidResponse(String),
}

impl From<reqwest::Error> for GeocodeError {
    fn from(err: reqwest::Error) -> Self {
        GeocodeError::Http(err.to_string())
    }
}

/// Result 类型别名
pub type GeocodeResult<T> = Result<T, GeocodeError>;
