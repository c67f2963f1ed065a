// ==========================================
// BREEAM & LEED 认证看板 - 有效期等级判定
// ==========================================
// 职责: 剩余月数 → 有效期等级 + 范围筛选 + 汇总计数
// 红线: 着色、筛选、计数共用同一判定函数,阈值只在此处定义
// ==========================================

use crate::domain::record::EvaluatedRecord;
use crate::domain::types::ExpiryBucket;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// 紧急区间上限（含）
pub const URGENT_MAX_MONTHS: i32 = 6;
/// 警告区间上限（含）
pub const WARNING_MAX_MONTHS: i32 = 12;
/// 关注区间上限（含）
pub const CAUTION_MAX_MONTHS: i32 = 18;

pub struct SeverityClassifier;

impl SeverityClassifier {
    /// 剩余月数 → 有效期等级
    ///
    /// | 条件 | 等级 |
    /// |---|---|
    /// | None | NoDate |
    /// | < 0 | Expired |
    /// | 0..=6 | Urgent |
    /// | 7..=12 | Warning |
    /// | 13..=18 | Caution |
    /// | > 18 | Ok |
    pub fn classify(months: Option<i32>) -> ExpiryBucket {
        match months {
            None => ExpiryBucket::NoDate,
            Some(m) if m < 0 => ExpiryBucket::Expired,
            Some(m) if m <= URGENT_MAX_MONTHS => ExpiryBucket::Urgent,
            Some(m) if m <= WARNING_MAX_MONTHS => ExpiryBucket::Warning,
            Some(m) if m <= CAUTION_MAX_MONTHS => ExpiryBucket::Caution,
            Some(_) => ExpiryBucket::Ok,
        }
    }
}

// ==========================================
// ExpiryView - 可见范围筛选
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryView {
    #[default]
    All,
    Only(ExpiryBucket),
}

impl ExpiryView {
    /// 记录是否在可见范围内
    pub fn matches(&self, months: Option<i32>) -> bool {
        match self {
            ExpiryView::All => true,
            ExpiryView::Only(bucket) => SeverityClassifier::classify(months) == *bucket,
        }
    }

    /// 从字符串解析（"all" 或等级名）
    pub fn from_str(s: &str) -> Option<Self> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Some(ExpiryView::All);
        }
        ExpiryBucket::from_str(s).map(ExpiryView::Only)
    }

    pub fn label(&self) -> String {
        match self {
            ExpiryView::All => crate::i18n::t("view.all"),
            ExpiryView::Only(bucket) => bucket.label(),
        }
    }

    /// 按可见范围筛选
    pub fn apply(&self, records: Vec<EvaluatedRecord>) -> Vec<EvaluatedRecord> {
        records
            .into_iter()
            .filter(|r| self.matches(r.months_to_expiry))
            .collect()
    }
}

impl fmt::Display for ExpiryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryView::All => write!(f, "ALL"),
            ExpiryView::Only(bucket) => write!(f, "{}", bucket),
        }
    }
}

// ==========================================
// BucketSummary - 等级汇总计数
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSummary {
    pub total: usize,
    pub counts: BTreeMap<ExpiryBucket, usize>,
}

impl BucketSummary {
    pub fn from_records(records: &[EvaluatedRecord]) -> Self {
        let mut summary = BucketSummary::default();
        for bucket in ExpiryBucket::ALL {
            summary.counts.insert(bucket, 0);
        }
        for record in records {
            summary.total += 1;
            *summary
                .counts
                .entry(SeverityClassifier::classify(record.months_to_expiry))
                .or_insert(0) += 1;
        }
        summary
    }

    pub fn count(&self, bucket: ExpiryBucket) -> usize {
        self.counts.get(&bucket).copied().unwrap_or(0)
    }
}
