// ==========================================
// BREEAM & LEED 认证看板 - API 层
// ==========================================
// 职责: 每个页面一个 API,供命令行 / 界面调用
// ==========================================

pub mod breeam_api;
pub mod breeam_expired_api;
pub mod dto;
pub mod error;
pub mod home_api;
pub mod leed_api;

// 重导出核心类型
pub use breeam_api::BreeamApi;
pub use breeam_expired_api::BreeamExpiredApi;
pub use dto::{
    BucketCount, PageView, RecordDetail, RecordRow, SelectOptions, SummaryDto, DEFAULT_COUNTRY,
};
pub use error::{ApiError, ApiResult};
pub use home_api::{AdminSession, HomeApi, HOME_PAGE};
pub use leed_api::LeedApi;
