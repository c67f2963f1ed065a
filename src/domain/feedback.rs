// ==========================================
// BREEAM & LEED 认证看板 - 用户反馈领域模型
// ==========================================

use serde::{Deserialize, Serialize};

/// 反馈记录（feedback.csv 的一行）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedbackEntry {
    pub timestamp: String, // 本地时间, ISO 秒精度
    pub page: String,      // 页面标识
    pub full_name: String, // 提交人
    pub message: String,
}

impl FeedbackEntry {
    /// CSV 表头
    pub const HEADER: [&'static str; 4] = ["timestamp", "page", "full_name", "message"];
}
