// ==========================================
// BREEAM & LEED 认证看板 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型
// 红线: 不含数据访问逻辑,不含引擎逻辑
// ==========================================

pub mod feedback;
pub mod record;
pub mod types;

// 重导出核心类型
pub use feedback::FeedbackEntry;
pub use record::{CertificationRecord, EvaluatedRecord, RawRow, RawValue};
pub use types::{DayMonthOrder, ExpiryBasis, ExpiryBucket, SourceKind};
