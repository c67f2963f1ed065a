// ==========================================
// BREEAM & LEED 认证看板 - 页面 DTO
// ==========================================
// 职责: 表格行 / 汇总 / 详情 / 下拉选项的展示结构
// ==========================================

use crate::domain::record::EvaluatedRecord;
use crate::domain::types::ExpiryBucket;
use crate::engine::address::AddressBuilder;
use crate::engine::severity::BucketSummary;
use crate::geocode::GeocodeMatch;
use serde::{Deserialize, Serialize};

/// 国家下拉框默认选中值
pub const DEFAULT_COUNTRY: &str = "Poland";

// ==========================================
// 表格行
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordRow {
    pub name: String,
    pub project_type: Option<String>,
    pub standard: Option<String>,
    pub scheme: Option<String>,
    pub version_tag: Option<String>,
    pub level: Option<String>,
    pub expiry_date: Option<String>, // YYYY-MM-DD
    pub months_to_expiry: Option<i32>,
    pub bucket: ExpiryBucket,
    pub bucket_label: String,
    pub bucket_color: Option<String>, // 行背景色
    pub assessor: Option<String>,
}

impl From<&EvaluatedRecord> for RecordRow {
    fn from(evaluated: &EvaluatedRecord) -> Self {
        let record = &evaluated.record;
        Self {
            name: record.display_name(),
            project_type: record.project_type.clone(),
            standard: record.standard.clone(),
            scheme: record.scheme.clone(),
            version_tag: record.version_tag.clone(),
            level: record.level.clone(),
            expiry_date: evaluated
                .expiry_date
                .map(|d| d.format("%Y-%m-%d").to_string()),
            months_to_expiry: evaluated.months_to_expiry,
            bucket: evaluated.bucket,
            bucket_label: evaluated.bucket.label(),
            bucket_color: evaluated.bucket.color().map(str::to_string),
            assessor: record.assessor.clone(),
        }
    }
}

// ==========================================
// 汇总
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BucketCount {
    pub bucket: ExpiryBucket,
    pub label: String,
    pub color: Option<String>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SummaryDto {
    pub total: usize,
    pub counts: Vec<BucketCount>,
}

impl From<&BucketSummary> for SummaryDto {
    fn from(summary: &BucketSummary) -> Self {
        Self {
            total: summary.total,
            counts: ExpiryBucket::ALL
                .iter()
                .map(|bucket| BucketCount {
                    bucket: *bucket,
                    label: bucket.label(),
                    color: bucket.color().map(str::to_string),
                    count: summary.count(*bucket),
                })
                .collect(),
        }
    }
}

impl SummaryDto {
    pub fn count(&self, bucket: ExpiryBucket) -> usize {
        self.counts
            .iter()
            .find(|c| c.bucket == bucket)
            .map(|c| c.count)
            .unwrap_or(0)
    }
}

// ==========================================
// 页面视图
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageView {
    pub rows: Vec<RecordRow>,
    pub summary: SummaryDto,
    pub notices: Vec<String>, // 本地化提示信息
}

// ==========================================
// 下拉选项
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectOptions<T> {
    pub options: Vec<T>,
    pub default_index: Option<usize>, // None 表示"不限"
}

impl SelectOptions<String> {
    /// 国家选项: 存在 Poland 时默认选中
    pub fn countries(options: Vec<String>) -> Self {
        let default_index = options.iter().position(|c| c == DEFAULT_COUNTRY);
        Self {
            options,
            default_index,
        }
    }
}

// ==========================================
// 记录详情
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordDetail {
    pub row: RecordRow,
    pub identity: Option<String>,
    pub address: String,
    pub public_url: Option<String>,
    pub location: Option<GeocodeMatch>,
    pub notice: Option<String>,
}

impl RecordDetail {
    pub fn new(
        evaluated: &EvaluatedRecord,
        default_country: Option<&str>,
        location: Option<GeocodeMatch>,
    ) -> Self {
        let notice = location
            .is_none()
            .then(|| crate::i18n::t("detail.no_location"));
        Self {
            row: RecordRow::from(evaluated),
            identity: evaluated.record.identity.clone(),
            address: AddressBuilder::display_address(&evaluated.record, default_country),
            public_url: evaluated.record.public_url.clone(),
            location,
            notice,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_country_default_poland() {
        let with_pl = SelectOptions::countries(vec!["Austria".to_string(), "Poland".to_string()]);
        assert_eq!(with_pl.default_index, Some(1));

        let without_pl = SelectOptions::countries(vec!["Austria".to_string()]);
        assert_eq!(without_pl.default_index, None);
    }
}
