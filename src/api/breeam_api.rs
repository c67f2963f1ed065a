// ==========================================
// BREEAM & LEED 认证看板 - BREEAM 在用认证 API
// ==========================================
// 职责: 国家/方案选项 → 拉取注册库 → 有效期评估 → 项目类型筛选 → 视图
// 红线: 凭据缺失时拒绝请求,不发起网络调用
// ==========================================

use crate::api::dto::{PageView, RecordDetail, RecordRow, SelectOptions, SummaryDto};
use crate::api::error::{ApiError, ApiResult};
use crate::domain::record::EvaluatedRecord;
use crate::domain::types::SourceKind;
use crate::engine::address::AddressBuilder;
use crate::engine::pipeline::ExpiryPipeline;
use crate::engine::severity::{BucketSummary, ExpiryView};
use crate::geocode::GeocodeMatch;
use crate::importer::RecordImporter;
use crate::registry::payload::{self, SchemeOption};
use crate::registry::{BreeamClient, HttpTransport, RegistryCredentials, RegistryTransport};
use chrono::NaiveDate;
use std::collections::BTreeSet;
use tracing::{info, instrument, warn};

// ==========================================
// BreeamApi - BREEAM 在用认证 API
// ==========================================
pub struct BreeamApi<T: RegistryTransport = HttpTransport> {
    // 凭据缺失时为 None
    client: Option<BreeamClient<T>>,
    importer: RecordImporter,
}

impl BreeamApi<HttpTransport> {
    /// 按凭据创建（凭据不完整时页面仍可创建,但所有请求返回 MissingCredentials）
    pub fn new(credentials: RegistryCredentials) -> Self {
        let client = match BreeamClient::<HttpTransport>::connect(credentials) {
            Ok(client) => Some(client),
            Err(e) => {
                warn!(error = %e, "注册库客户端不可用");
                None
            }
        };
        Self {
            client,
            importer: RecordImporter::default(),
        }
    }
}

impl<T: RegistryTransport> BreeamApi<T> {
    pub fn with_client(client: BreeamClient<T>) -> Self {
        Self {
            client: Some(client),
            importer: RecordImporter::default(),
        }
    }

    pub fn is_configured(&self) -> bool {
        self.client.is_some()
    }

    fn client(&self) -> ApiResult<&BreeamClient<T>> {
        self.client.as_ref().ok_or_else(|| {
            ApiError::MissingCredentials(crate::i18n::t("breeam_api.missing_credentials"))
        })
    }

    /// 国家选项（存在 Poland 时默认选中）
    pub fn country_options(&self) -> ApiResult<SelectOptions<String>> {
        let countries = self.client()?.countries()?;
        Ok(SelectOptions::countries(countries))
    }

    /// 在用方案选项
    ///
    /// 方案列表为空时返回空选项,拉取时不带方案编号
    pub fn scheme_options(&self) -> ApiResult<SelectOptions<SchemeOption>> {
        let schemes = self.client()?.schemes()?;
        if schemes.is_empty() {
            return Ok(SelectOptions {
                options: Vec::new(),
                default_index: None,
            });
        }
        let (options, default_index) = payload::select_in_use(&schemes);
        Ok(SelectOptions {
            options,
            default_index: Some(default_index),
        })
    }

    /// 拉取认证评估并计算有效期
    #[instrument(skip(self))]
    pub fn fetch(
        &self,
        country: Option<&str>,
        scheme_id: Option<&str>,
        today: NaiveDate,
    ) -> ApiResult<Vec<EvaluatedRecord>> {
        let rows = self.client()?.assessments(country, scheme_id)?;
        let records = self.importer.map_rows(&rows, SourceKind::BreeamApi);
        let evaluated = ExpiryPipeline::new(today).evaluate_batch(records);
        info!(count = evaluated.len(), "BREEAM 注册库记录已评估");
        Ok(evaluated)
    }

    /// 项目类型选项（去重排序）
    pub fn project_types(records: &[EvaluatedRecord]) -> Vec<String> {
        records
            .iter()
            .filter_map(|r| r.record.project_type.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// 清理已失效的多选值（保持原顺序）
    pub fn sanitize_selection(selected: &[String], options: &[String]) -> Vec<String> {
        selected
            .iter()
            .filter(|s| options.contains(s))
            .cloned()
            .collect()
    }

    /// 按项目类型筛选
    ///
    /// None 表示不按类型筛选；Some 时仅保留所选类型（无类型的记录被排除）
    pub fn select(
        records: &[EvaluatedRecord],
        project_types: Option<&[String]>,
    ) -> Vec<EvaluatedRecord> {
        match project_types {
            None => records.to_vec(),
            Some(selected) => records
                .iter()
                .filter(|r| {
                    r.record
                        .project_type
                        .as_ref()
                        .map(|pt| selected.contains(pt))
                        .unwrap_or(false)
                })
                .cloned()
                .collect(),
        }
    }

    /// 页面视图（汇总基于类型筛选结果,表格再按可见范围筛选）
    pub fn view(
        records: &[EvaluatedRecord],
        project_types: Option<&[String]>,
        view: ExpiryView,
    ) -> PageView {
        let mut notices = Vec::new();
        if project_types.is_some_and(|selected| selected.is_empty()) {
            notices.push(crate::i18n::t("breeam_api.no_project_type_selected"));
        }

        let filtered = Self::select(records, project_types);
        let summary = BucketSummary::from_records(&filtered);
        let visible = view.apply(filtered);
        if visible.is_empty() {
            notices.push(crate::i18n::t("common.no_records"));
        }

        PageView {
            rows: visible.iter().map(RecordRow::from).collect(),
            summary: SummaryDto::from(&summary),
            notices,
        }
    }

    /// 记录详情（坐标来自注册库数据）
    pub fn detail(record: &EvaluatedRecord) -> RecordDetail {
        let location = record
            .record
            .coordinates()
            .map(|(latitude, longitude)| GeocodeMatch {
                latitude,
                longitude,
                matched: AddressBuilder::display_address(&record.record, None),
            });
        RecordDetail::new(record, None, location)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{RegistryError, RegistryResult};
    use serde_json::{json, Value};

    struct StaticTransport(Value);

    impl RegistryTransport for StaticTransport {
        fn get_json(&self, path: &str, _query: &[(String, String)]) -> RegistryResult<Value> {
            match path {
                "/countries" => Ok(json!({"countries": ["Poland", "Austria"]})),
                "/schemes" => Ok(json!({"schemes": [
                    {"schemeID": 1, "schemeName": "New Construction"},
                    {"schemeID": 2, "schemeName": "In-Use"}
                ]})),
                p if p.starts_with("/assessments") => Ok(self.0.clone()),
                _ => Err(RegistryError::Status { status: 404, path: path.to_string() }),
            }
        }
    }

    fn api() -> BreeamApi<StaticTransport> {
        BreeamApi::with_client(BreeamClient::with_transport(StaticTransport(json!({
            "assessments": [
                {"buildingName": "A", "projectType": "Office", "stage": "20.09.2024"},
                {"buildingName": "B", "projectType": "Retail", "stage": "10.03.2023"},
                {"buildingName": "C", "stage": "brak"},
                {"buildingName": "D", "projectType": "Office", "stage": "01.01.2030",
                 "latitude": "52.1", "longitude": "21.0"}
            ]
        }))))
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()
    }

    #[test]
    fn test_missing_credentials() {
        let api = BreeamApi::<HttpTransport>::new(RegistryCredentials::default());
        assert!(!api.is_configured());
        assert!(matches!(api.country_options(), Err(ApiError::MissingCredentials(_))));
    }

    #[test]
    fn test_options() {
        let api = api();
        let countries = api.country_options().unwrap();
        assert_eq!(countries.options, vec!["Austria", "Poland"]);
        assert_eq!(countries.default_index, Some(1));

        let schemes = api.scheme_options().unwrap();
        assert_eq!(schemes.options.len(), 1);
        assert_eq!(schemes.options[0].scheme_id, "2");
    }

    #[test]
    fn test_fetch_and_view() {
        let api = api();
        let records = api.fetch(Some("Poland"), Some("2"), today()).unwrap();
        assert_eq!(records.len(), 4);
        assert_eq!(records[0].months_to_expiry, Some(7));
        assert_eq!(records[1].months_to_expiry, Some(-13));

        let types = BreeamApi::<StaticTransport>::project_types(&records);
        assert_eq!(types, vec!["Office", "Retail"]);

        let offices = vec!["Office".to_string()];
        let page = BreeamApi::<StaticTransport>::view(&records, Some(offices.as_slice()), ExpiryView::All);
        assert_eq!(page.rows.len(), 2);
        assert_eq!(page.summary.total, 2);

        let all = BreeamApi::<StaticTransport>::view(&records, None, ExpiryView::All);
        assert_eq!(all.rows.len(), 4);
    }

    #[test]
    fn test_sanitize_selection() {
        let selected = vec!["Office".to_string(), "Gone".to_string()];
        let options = vec!["Office".to_string(), "Retail".to_string()];
        assert_eq!(
            BreeamApi::<StaticTransport>::sanitize_selection(&selected, &options),
            vec!["Office".to_string()]
        );
    }

    #[test]
    fn test_detail_uses_payload_coordinates() {
        let records = api().fetch(None, None, today()).unwrap();
        let detail = BreeamApi::<StaticTransport>::detail(&records[3]);
        let location = detail.location.unwrap();
        assert_eq!((location.latitude, location.longitude), (52.1, 21.0));
        assert!(detail.notice.is_none());
    }
}
