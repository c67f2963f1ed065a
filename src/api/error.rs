// ==========================================
// BREEAM & LEED 认证看板 - API层错误类型
// ==========================================
// 职责: 定义API层错误类型,转换下层错误为用户可读的错误消息
// ==========================================

use crate::config::ConfigError;
use crate::geocode::GeocodeError;
use crate::importer::ImportError;
use crate::registry::RegistryError;
use crate::repository::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 输入与权限错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("数据验证失败: {0}")]
    ValidationError(String),

    #[error("访问被拒绝: {0}")]
    AccessDenied(String),

    // ==========================================
    // 数据源错误
    // ==========================================
    #[error("文件导入失败: {0}")]
    ImportError(String),

    #[error("{0}")]
    MissingCredentials(String),

    #[error("{0}")]
    Unauthorized(String),

    #[error("注册库请求失败: {0}")]
    RegistryError(String),

    #[error("存储失败: {0}")]
    StorageError(String),

    #[error("配置错误: {0}")]
    ConfigError(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("内部错误: {0}")]
    InternalError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::FileNotFound(path) => ApiError::ImportError(crate::i18n::t_with_args(
                "import.file_not_found",
                &[("path", &path)],
            )),
            ImportError::Other(inner) => ApiError::Other(inner),
            other => ApiError::ImportError(other.to_string()),
        }
    }
}

// ==========================================
// 从 RegistryError 转换
// ==========================================
impl From<RegistryError> for ApiError {
    fn from(err: RegistryError) -> Self {
        match err {
            RegistryError::MissingCredentials => {
                ApiError::MissingCredentials(crate::i18n::t("breeam_api.missing_credentials"))
            }
            RegistryError::Unauthorized => {
                ApiError::Unauthorized(crate::i18n::t("breeam_api.unauthorized"))
            }
            other => ApiError::RegistryError(other.to_string()),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::Other(inner) => ApiError::Other(inner),
            other => ApiError::StorageError(other.to_string()),
        }
    }
}

impl From<ConfigError> for ApiError {
    fn from(err: ConfigError) -> Self {
        ApiError::ConfigError(err.to_string())
    }
}

impl From<GeocodeError> for ApiError {
    fn from(err: GeocodeError) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
