// ==========================================
// BREEAM & LEED 认证看板 - LEED 认证 API
// ==========================================
// 职责: 读取 LEED 项目目录 → 有效期评估（认证日 + 5/3 年）→ 国家/版本筛选 → 视图
// ==========================================

use crate::api::dto::{PageView, RecordDetail, RecordRow, SelectOptions, SummaryDto};
use crate::api::error::ApiResult;
use crate::domain::record::EvaluatedRecord;
use crate::domain::types::SourceKind;
use crate::engine::address::AddressBuilder;
use crate::engine::pipeline::ExpiryPipeline;
use crate::engine::severity::{BucketSummary, ExpiryView};
use crate::geocode::{Geocoder, GeocodingService};
use crate::importer::RecordImporter;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, instrument};

pub struct LeedApi<G: Geocoder> {
    path: PathBuf,
    importer: RecordImporter,
    geocoding: Arc<GeocodingService<G>>,
}

impl<G: Geocoder> LeedApi<G> {
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

    /// 读取项目目录并计算有效期
    #[instrument(skip(self))]
    pub fn load(&self, today: NaiveDate) -> ApiResult<Vec<EvaluatedRecord>> {
        let outcome = self
            .importer
            .import_file(&self.path, SourceKind::LeedSpreadsheet)?;
        let evaluated = ExpiryPipeline::new(today).evaluate_batch(outcome.records);
        info!(total = evaluated.len(), "LEED 记录已加载");
        Ok(evaluated)
    }

    /// 国家选项（存在 Poland 时默认选中）
    pub fn country_options(records: &[EvaluatedRecord]) -> SelectOptions<String> {
        let countries = records
            .iter()
            .filter_map(|r| r.record.country.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        SelectOptions::countries(countries)
    }

    /// 体系版本选项（在国家筛选结果内）
    pub fn version_options(records: &[EvaluatedRecord], country: Option<&str>) -> Vec<String> {
        records
            .iter()
            .filter(|r| Self::country_matches(r, country))
            .filter_map(|r| r.record.version_tag.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    fn country_matches(record: &EvaluatedRecord, country: Option<&str>) -> bool {
        match country {
            None => true,
            Some(c) => record.record.country.as_deref() == Some(c),
        }
    }

    fn version_matches(record: &EvaluatedRecord, version: Option<&str>) -> bool {
        match version {
            None => true,
            Some(v) => record.record.version_tag.as_deref() == Some(v),
        }
    }

    /// 按国家/版本筛选
    pub fn select(
        records: &[EvaluatedRecord],
        country: Option<&str>,
        version: Option<&str>,
    ) -> Vec<EvaluatedRecord> {
        records
            .iter()
            .filter(|r| Self::country_matches(r, country) && Self::version_matches(r, version))
            .cloned()
            .collect()
    }

    /// 页面视图
    ///
    /// 汇总基于国家/版本筛选后的全部记录（含已过期）,表格再按可见范围筛选
    pub fn view(
        records: &[EvaluatedRecord],
        country: Option<&str>,
        version: Option<&str>,
        view: ExpiryView,
    ) -> PageView {
        let filtered = Self::select(records, country, version);
        let summary = BucketSummary::from_records(&filtered);
        let visible = view.apply(filtered);

        let mut notices = Vec::new();
        if visible.is_empty() {
            notices.push(crate::i18n::t("common.no_records"));
        }

        PageView {
            rows: visible.iter().map(RecordRow::from).collect(),
            summary: SummaryDto::from(&summary),
            notices,
        }
    }

    /// 记录详情（自动对显示地址地理编码）
    pub fn detail(&self, record: &EvaluatedRecord) -> RecordDetail {
        let query = AddressBuilder::geocoding_query(&record.record, None);
        let location = self.geocoding.geocode_query(&query);
        RecordDetail::new(record, None, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ExpiryBucket;
    use crate::geocode::GeocodeResult;
    use std::io::Write;
    use std::sync::Mutex;
    use tempfile::Builder;

    #[derive(Default)]
    struct RecordingGeocoder {
        queries: Mutex<Vec<String>>,
    }

    impl Geocoder for RecordingGeocoder {
        fn geocode(&self, query: &str) -> GeocodeResult<Option<(f64, f64)>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(Some((50.0, 20.0)))
        }
    }

    fn load_fixture() -> Vec<EvaluatedRecord> {
        let mut file = Builder::new().suffix(".csv").tempfile().unwrap();
        writeln!(
            file,
            "Project Name,Country,City,Street,LEEDSystemVersion,Certification Date"
        )
        .unwrap();
        // 2009 版本 +5 年: 2020-03-04 → 2025-03-04
        writeln!(file, "Alpha,Poland,Warszawa,Prosta 1,v2009,03/04/2020").unwrap();
        // 其他版本 +3 年: 2020-03-04 → 2023-03-04（已过期）
        writeln!(file, "Beta,Poland,Kraków,,v4,03/04/2020").unwrap();
        writeln!(file, "Gamma,Germany,Berlin,,v4.1,2023-06-01").unwrap();
        writeln!(file, "Delta,Poland,Łódź,,v4,").unwrap();

        let api = LeedApi::new(
            file.path(),
            Arc::new(GeocodingService::new(RecordingGeocoder::default())),
        );
        api.load(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()).unwrap()
    }

    #[test]
    fn test_load_applies_version_years_and_month_first() {
        let records = load_fixture();
        assert_eq!(records.len(), 4);

        assert_eq!(records[0].parsed_date, NaiveDate::from_ymd_opt(2020, 3, 4));
        assert_eq!(records[0].expiry_date, NaiveDate::from_ymd_opt(2025, 3, 4));
        assert_eq!(records[0].bucket, ExpiryBucket::Warning);

        assert_eq!(records[1].expiry_date, NaiveDate::from_ymd_opt(2023, 3, 4));
        assert_eq!(records[1].bucket, ExpiryBucket::Expired);

        assert_eq!(records[3].bucket, ExpiryBucket::NoDate);
    }

    #[test]
    fn test_country_and_version_filters() {
        let records = load_fixture();

        let countries = LeedApi::<RecordingGeocoder>::country_options(&records);
        assert_eq!(countries.options, vec!["Germany", "Poland"]);
        assert_eq!(countries.default_index, Some(1));

        let versions = LeedApi::<RecordingGeocoder>::version_options(&records, Some("Poland"));
        assert_eq!(versions, vec!["v2009", "v4"]);

        let page = LeedApi::<RecordingGeocoder>::view(
            &records,
            Some("Poland"),
            None,
            ExpiryView::Only(ExpiryBucket::Expired),
        );
        assert_eq!(page.summary.total, 3);
        assert_eq!(page.summary.count(ExpiryBucket::Expired), 1);
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.rows[0].name, "Beta");

        let v2009 = LeedApi::<RecordingGeocoder>::view(&records, None, Some("v2009"), ExpiryView::All);
        assert_eq!(v2009.rows.len(), 1);
    }

    #[test]
    fn test_detail_geocodes_display_query() {
        let records = load_fixture();
        let geocoding = Arc::new(GeocodingService::new(RecordingGeocoder::default()));
        let api = LeedApi::new("unused.csv", geocoding.clone());

        let detail = api.detail(&records[0]);

        let location = detail.location.unwrap();
        assert_eq!(location.matched, "Prosta 1, Warszawa, Poland");
    }
}
