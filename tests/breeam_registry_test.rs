// ==========================================
// BREEAM 注册库页面集成测试
// ==========================================
// 测试目标: 选项 → 拉取 → 缓存 → 类型筛选 → 视图 / 详情
// ==========================================

mod test_helpers;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use breeam_leed_monitor::api::{ApiError, BreeamApi};
use breeam_leed_monitor::engine::ExpiryView;
use breeam_leed_monitor::registry::{
    BreeamClient, RegistryError, RegistryResult, RegistryTransport,
};
use breeam_leed_monitor::ExpiryBucket;
use serde_json::{json, Value};
use test_helpers::today;

/// 模拟注册库,统计各路径请求次数
struct MockRegistry {
    assessment_calls: Arc<AtomicUsize>,
}

impl RegistryTransport for MockRegistry {
    fn get_json(&self, path: &str, query: &[(String, String)]) -> RegistryResult<Value> {
        match path {
            "/countries" => Ok(json!({"results": {"countries": {
                "country": ["Poland", "Czech Republic", "Austria"]
            }}})),
            "/schemes" => Ok(json!({"results": {"schemes": {"scheme": [
                {"schemeID": "10", "schemeName": "New Construction"},
                {"schemeID": "20", "schemeName": "In-Use",
                 "subSchemes": {"scheme": {"schemeID": "21", "schemeName": "Commercial"}}}
            ]}}})),
            "/assessments/21" => {
                self.assessment_calls.fetch_add(1, Ordering::SeqCst);
                let country = query
                    .iter()
                    .find(|(k, _)| k == "country")
                    .map(|(_, v)| v.clone())
                    .unwrap_or_default();
                Ok(json!({"results": {"assessments": {"assessment": [
                    {"certNo": "BREEAM-0001", "buildingName": "Galeria", "projectType": "Retail",
                     "country": country, "town": "Gdańsk", "addressLine1": "Grunwaldzka 141",
                     "stage": "Expiry date 30/06/2024", "latitude": 54.38, "longitude": 18.60},
                    {"certNo": "BREEAM-0002", "buildingName": "Biurowiec", "projectType": "Office",
                     "country": country, "stage": "01/02/2027"},
                    {"certNo": "BREEAM-0003", "projectType": null, "stage": "n/a"}
                ]}}}))
            }
            _ => Err(RegistryError::Status {
                status: 404,
                path: path.to_string(),
            }),
        }
    }
}

fn api() -> (BreeamApi<MockRegistry>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let transport = MockRegistry {
        assessment_calls: calls.clone(),
    };
    (
        BreeamApi::with_client(BreeamClient::with_transport(transport)),
        calls,
    )
}

#[test]
fn test_options_default_to_poland_and_in_use() {
    let (api, _) = api();

    let countries = api.country_options().unwrap();
    assert_eq!(countries.options, vec!["Austria", "Czech Republic", "Poland"]);
    assert_eq!(countries.default_index, Some(2));

    let schemes = api.scheme_options().unwrap();
    let names: Vec<&str> = schemes.options.iter().map(|s| s.scheme_name.as_str()).collect();
    assert_eq!(names, vec!["In-Use", "In-Use / Commercial"]);
    assert_eq!(schemes.default_index, Some(0));
}

#[test]
fn test_fetch_is_cached_per_query() {
    let (api, calls) = api();

    let first = api.fetch(Some("Poland"), Some("21"), today()).unwrap();
    let again = api.fetch(Some("Poland"), Some("21"), today()).unwrap();
    assert_eq!(first.len(), again.len());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    api.fetch(Some("Austria"), Some("21"), today()).unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fetch_evaluates_and_filters() {
    let (api, _) = api();
    let records = api.fetch(Some("Poland"), Some("21"), today()).unwrap();

    // 30/06/2024 → 4 个月; 01/02/2027 → 35 个月; 无日期
    assert_eq!(records[0].months_to_expiry, Some(4));
    assert_eq!(records[0].bucket, ExpiryBucket::Urgent);
    assert_eq!(records[1].bucket, ExpiryBucket::Ok);
    assert_eq!(records[2].bucket, ExpiryBucket::NoDate);
    assert_eq!(records[2].record.display_name(), "BREEAM-0003");

    type Api = BreeamApi<MockRegistry>;
    let types = Api::project_types(&records);
    assert_eq!(types, vec!["Office", "Retail"]);

    let selected = Api::sanitize_selection(&["Retail".to_string(), "Hotel".to_string()], &types);
    let page = Api::view(&records, Some(selected.as_slice()), ExpiryView::All);
    assert_eq!(page.rows.len(), 1);
    assert_eq!(page.rows[0].name, "Galeria");

    let nothing: Vec<String> = Vec::new();
    let none_selected = Api::view(&records, Some(nothing.as_slice()), ExpiryView::All);
    assert!(none_selected.rows.is_empty());
    assert_eq!(none_selected.notices.len(), 2);

    let urgent = Api::view(&records, None, ExpiryView::Only(ExpiryBucket::Urgent));
    assert_eq!(urgent.summary.total, 3);
    assert_eq!(urgent.rows.len(), 1);

    let detail = Api::detail(&records[0]);
    let location = detail.location.unwrap();
    assert_eq!((location.latitude, location.longitude), (54.38, 18.60));
    assert_eq!(detail.identity.as_deref(), Some("BREEAM-0001"));
}

#[test]
fn test_unknown_scheme_surfaces_registry_error() {
    let (api, _) = api();
    let result = api.fetch(None, Some("99"), today());
    assert!(matches!(result, Err(ApiError::RegistryError(_))));
}
