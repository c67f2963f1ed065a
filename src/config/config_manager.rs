// ==========================================
// BREEAM & LEED 认证看板 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 来源: credentials.json（工作目录 → 用户配置目录）+ 环境变量覆写
// 优先级: 环境变量（非空） > 配置文件 > 默认值
// ==========================================

use crate::registry::client::{RegistryCredentials, DEFAULT_BASE_URL};
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// 配置文件名
pub const CREDENTIALS_FILE: &str = "credentials.json";
/// 用户配置目录下的应用子目录
pub const APP_CONFIG_DIR: &str = "breeam-leed-monitor";

/// 配置层错误类型
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件读取失败: {0}")]
    FileReadError(String),

    #[error("配置文件解析失败: {0}")]
    ParseError(String),
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;

// ==========================================
// AppConfig - 解析后的应用配置
// ==========================================
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub credentials: RegistryCredentials,
    pub admin_code: String,
    pub breeam_hist_path: PathBuf,
    pub leed_path: PathBuf,
    pub feedback_path: PathBuf,
    pub geocoder_user_agent: String,
    pub locale: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            credentials: RegistryCredentials {
                user: String::new(),
                pass: String::new(),
                base_url: DEFAULT_BASE_URL.to_string(),
            },
            admin_code: String::new(),
            breeam_hist_path: PathBuf::from(defaults::BREEAM_HIST_PATH),
            leed_path: PathBuf::from(defaults::LEED_PATH),
            feedback_path: PathBuf::from(defaults::FEEDBACK_PATH),
            geocoder_user_agent: defaults::GEOCODER_USER_AGENT.to_string(),
            locale: defaults::LOCALE.to_string(),
        }
    }
}

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    file_values: HashMap<String, String>,
    source: Option<PathBuf>,
}

impl ConfigManager {
    /// 不带配置文件（仅环境变量 + 默认值）
    pub fn empty() -> Self {
        Self {
            file_values: HashMap::new(),
            source: None,
        }
    }

    /// 按默认位置查找配置文件
    ///
    /// 查找顺序: ./credentials.json → {用户配置目录}/breeam-leed-monitor/credentials.json
    /// 均不存在时退化为 empty()
    pub fn new() -> ConfigResult<Self> {
        let candidates = [
            Some(PathBuf::from(CREDENTIALS_FILE)),
            dirs::config_dir().map(|d| d.join(APP_CONFIG_DIR).join(CREDENTIALS_FILE)),
        ];

        match candidates.into_iter().flatten().find(|p| p.is_file()) {
            Some(path) => Self::from_file(path),
            None => {
                debug!("未找到配置文件,使用环境变量与默认值");
                Ok(Self::empty())
            }
        }
    }

    /// 从指定 JSON 文件加载
    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let path = path.as_ref();
        let text =
            fs::read_to_string(path).map_err(|e| ConfigError::FileReadError(e.to_string()))?;
        let value: Value =
            serde_json::from_str(&text).map_err(|e| ConfigError::ParseError(e.to_string()))?;

        let Value::Object(map) = value else {
            return Err(ConfigError::ParseError(
                "配置文件顶层必须为 JSON 对象".to_string(),
            ));
        };

        let file_values = map
            .into_iter()
            .filter_map(|(k, v)| {
                let text = match v {
                    Value::String(s) => s,
                    Value::Number(n) => n.to_string(),
                    Value::Bool(b) => b.to_string(),
                    _ => return None,
                };
                Some((k, text))
            })
            .collect();

        info!(path = %path.display(), "配置文件已加载");
        Ok(Self {
            file_values,
            source: Some(path.to_path_buf()),
        })
    }

    /// 配置文件路径（未加载文件时为 None）
    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    /// 按优先级解析配置（读取进程环境变量）
    pub fn load(&self) -> AppConfig {
        self.load_with_env(|key| std::env::var(key).ok())
    }

    /// 按优先级解析配置（环境变量来源可替换）
    pub fn load_with_env<F>(&self, env: F) -> AppConfig
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| -> Option<String> {
            env(key)
                .filter(|v| !v.trim().is_empty())
                .or_else(|| self.file_values.get(key).cloned())
        };
        let defaults = AppConfig::default();

        AppConfig {
            credentials: RegistryCredentials {
                user: lookup(config_keys::BREEAM_USER).unwrap_or_default(),
                pass: lookup(config_keys::BREEAM_PASS).unwrap_or_default(),
                base_url: lookup(config_keys::BREEAM_API_BASE)
                    .unwrap_or(defaults.credentials.base_url),
            },
            admin_code: lookup(config_keys::ADMIN_CODE).unwrap_or_default(),
            breeam_hist_path: lookup(config_keys::BREEAM_HIST_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.breeam_hist_path),
            leed_path: lookup(config_keys::LEED_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.leed_path),
            feedback_path: lookup(config_keys::FEEDBACK_PATH)
                .map(PathBuf::from)
                .unwrap_or(defaults.feedback_path),
            geocoder_user_agent: lookup(config_keys::GEOCODER_USER_AGENT)
                .unwrap_or(defaults.geocoder_user_agent),
            locale: lookup(config_keys::APP_LOCALE).unwrap_or(defaults.locale),
        }
    }
}

// ==========================================
// 配置键（同时作为环境变量名与 JSON 键）
// ==========================================
pub mod config_keys {
    // 注册库
    pub const BREEAM_USER: &str = "BREEAM_USER";
    pub const BREEAM_PASS: &str = "BREEAM_PASS";
    pub const BREEAM_API_BASE: &str = "BREEAM_API_BASE";

    // 管理员
    pub const ADMIN_CODE: &str = "ADMIN_CODE";

    // 本地文件
    pub const BREEAM_HIST_PATH: &str = "BREEAM_HIST_PATH";
    pub const LEED_PATH: &str = "LEED_PATH";
    pub const FEEDBACK_PATH: &str = "FEEDBACK_PATH";

    // 地理编码
    pub const GEOCODER_USER_AGENT: &str = "GEOCODER_USER_AGENT";

    // 界面语言
    pub const APP_LOCALE: &str = "APP_LOCALE";
}

// ==========================================
// 默认值
// ==========================================
pub mod defaults {
    pub const BREEAM_HIST_PATH: &str = "BREEAM.xlsx";
    pub const LEED_PATH: &str = "PublicLEEDProjectDirectory.xlsx";
    pub const FEEDBACK_PATH: &str = "feedback.csv";
    pub const GEOCODER_USER_AGENT: &str = "breeam-leed-monitor";
    pub const LOCALE: &str = "pl";
}
