// ==========================================
// BREEAM & LEED 认证看板 - 应用层
// ==========================================
// 职责: 组装配置、共享缓存与各页面 API
// ==========================================

pub mod state;

// 重导出
pub use state::{load_config, AppState};
