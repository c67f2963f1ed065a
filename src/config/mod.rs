// ==========================================
// BREEAM & LEED 认证看板 - 配置层
// ==========================================
// 职责: 凭据与本地路径配置,支持环境变量覆写
// 存储: credentials.json
// ==========================================

pub mod config_manager;

// 重导出核心配置管理器
pub use config_manager::{
    config_keys, defaults, AppConfig, ConfigError, ConfigManager, ConfigResult,
};
