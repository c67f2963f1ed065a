// ==========================================
// BREEAM & LEED 认证看板 - 数据仓储层
// ==========================================
// 红线: Repository 不含业务逻辑
// ==========================================
// 职责: 提供本地文件存取接口,屏蔽文件格式细节
// ==========================================

pub mod error;
pub mod feedback_repo;

// 重导出核心仓储
pub use error::{RepositoryError, RepositoryResult};
pub use feedback_repo::FeedbackRepository;
