// ==========================================
// BREEAM & LEED 认证看板 - 首页 API
// ==========================================
// 职责: 用户反馈提交 / 管理员解锁 / 反馈文件导出
// 红线: 未配置管理员口令时永不解锁
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::domain::feedback::FeedbackEntry;
use crate::repository::FeedbackRepository;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tracing::{info, warn};

/// 首页反馈的页面标识
pub const HOME_PAGE: &str = "Home";

/// 反馈时间戳格式（本地时间,秒精度）
const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S";

/// 管理员会话凭证（仅由 unlock_admin 签发）
#[derive(Debug)]
pub struct AdminSession {
    _private: (),
}

pub struct HomeApi {
    feedback_repo: Arc<FeedbackRepository>,
    admin_code: String,
}

impl HomeApi {
    pub fn new(feedback_repo: Arc<FeedbackRepository>, admin_code: String) -> Self {
        Self {
            feedback_repo,
            admin_code,
        }
    }

    /// 提交反馈
    ///
    /// # 参数
    /// - full_name / message: 去除首尾空白后不能为空
    /// - page: 页面标识
    /// - now: 提交时间
    pub fn submit_feedback(
        &self,
        full_name: &str,
        message: &str,
        page: &str,
        now: NaiveDateTime,
    ) -> ApiResult<FeedbackEntry> {
        let full_name = full_name.trim();
        let message = message.trim();

        if full_name.is_empty() {
            return Err(ApiError::ValidationError(crate::i18n::t(
                "feedback.name_required",
            )));
        }
        if message.is_empty() {
            return Err(ApiError::ValidationError(crate::i18n::t(
                "feedback.message_required",
            )));
        }

        let entry = FeedbackEntry {
            timestamp: now.format(TIMESTAMP_FORMAT).to_string(),
            page: page.to_string(),
            full_name: full_name.to_string(),
            message: message.to_string(),
        };
        self.feedback_repo.append(&entry)?;
        Ok(entry)
    }

    /// 管理员解锁
    pub fn unlock_admin(&self, code: &str) -> ApiResult<AdminSession> {
        if self.admin_code.is_empty() {
            warn!("管理员口令未配置");
            return Err(ApiError::AccessDenied(crate::i18n::t("admin.not_configured")));
        }
        if code != self.admin_code {
            warn!("管理员口令错误");
            return Err(ApiError::AccessDenied(crate::i18n::t("admin.wrong_code")));
        }
        info!("管理员面板已解锁");
        Ok(AdminSession { _private: () })
    }

    /// 导出 feedback.csv 原始内容（尚无反馈时返回 None）
    pub fn export_feedback(&self, _session: &AdminSession) -> ApiResult<Option<Vec<u8>>> {
        Ok(self.feedback_repo.export_raw()?)
    }

    pub fn list_feedback(&self, _session: &AdminSession) -> ApiResult<Vec<FeedbackEntry>> {
        Ok(self.feedback_repo.list_all()?)
    }
}
