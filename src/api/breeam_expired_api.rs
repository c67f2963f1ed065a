// ==========================================
// BREEAM & LEED 认证看板 - BREEAM 已过期认证 API
// ==========================================
// 职责: 读取 BREEAM.xlsx → 有效期评估 → 仅保留已过期 → 视图 / 详情
// 红线: 地理编码只针对当前选中的记录
// ==========================================

use crate::api::dto::{PageView, RecordDetail, RecordRow, SummaryDto, DEFAULT_COUNTRY};
use crate::api::error::ApiResult;
use crate::domain::record::EvaluatedRecord;
use crate::domain::types::SourceKind;
use crate::engine::address::AddressBuilder;
use crate::engine::pipeline::ExpiryPipeline;
use crate::engine::severity::BucketSummary;
use crate::geocode::{Geocoder, GeocodingService};
use crate::importer::RecordImporter;
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct BreeamExpiredApi<G: Geocoder> {
    path: PathBuf,
    importer: RecordImporter,
    geocoding: Arc<GeocodingService<G>>,
}

impl<G: Geocoder> BreeamExpiredApi<G> {
    pub fn new<P: AsRef<Path>>(path: P, geocoding: Arc<GeocodingService<G>>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            importer: RecordImporter::default(),
            geocoding,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 读取表格,仅保留剩余月数 < 0 的记录
    #[instrument(skip(self))]
    pub fn load(&self, today: NaiveDate) -> ApiResult<Vec<EvaluatedRecord>> {
        let outcome = self
            .importer
            .import_file(&self.path, SourceKind::BreeamSpreadsheet)?;
        let evaluated = ExpiryPipeline::new(today).evaluate_batch(outcome.records);
        let expired: Vec<EvaluatedRecord> =
            evaluated.into_iter().filter(|r| r.is_expired()).collect();

        info!(total = outcome.total_rows, expired = expired.len(), "BREEAM 已过期记录已加载");
        Ok(expired)
    }

    /// 页面视图
    pub fn view(records: &[EvaluatedRecord]) -> PageView {
        let mut notices = Vec::new();
        if records.is_empty() {
            notices.push(crate::i18n::t("breeam_expired.no_expired"));
        }
        PageView {
            rows: records.iter().map(RecordRow::from).collect(),
            summary: SummaryDto::from(&BucketSummary::from_records(records)),
            notices,
        }
    }

    /// 备选地址（供页面展示与人工修正参考）
    pub fn address_variants(record: &EvaluatedRecord, manual: Option<&str>) -> Vec<String> {
        AddressBuilder::address_variants(&record.record, manual, Some(DEFAULT_COUNTRY))
    }

    /// 记录详情（按备选地址地理编码,人工地址优先）
    pub fn detail(&self, record: &EvaluatedRecord, manual: Option<&str>) -> RecordDetail {
        let location = self
            .geocoding
            .locate(&record.record, manual, Some(DEFAULT_COUNTRY));
        RecordDetail::new(record, Some(DEFAULT_COUNTRY), location)
    }
}
