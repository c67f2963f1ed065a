// ==========================================
// BREEAM & LEED 认证看板 - 引擎层
// ==========================================
// 职责: 有效期计算规则（日期规范化 → 剩余月数 → 等级）+ 地址组装
// 红线: 引擎不做 I/O, "今天"由调用方显式传入
// ==========================================

pub mod address;
pub mod date_normalizer;
pub mod horizon;
pub mod pipeline;
pub mod severity;

// 重导出核心引擎
pub use address::AddressBuilder;
pub use date_normalizer::DateNormalizer;
pub use horizon::HorizonCalculator;
pub use pipeline::ExpiryPipeline;
pub use severity::{BucketSummary, ExpiryView, SeverityClassifier};
