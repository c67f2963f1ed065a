// ==========================================
// BREEAM & LEED 认证看板 - BREEAM 注册库客户端
// ==========================================
// 职责: 基本认证 GET 请求 + 30 分钟响应缓存 + 响应解析
// 红线: 同步阻塞调用,单次请求超时 60 秒
// ==========================================

use crate::cache::{normalize_key, TtlCache, REGISTRY_TTL};
use crate::domain::record::RawRow;
use crate::registry::error::{RegistryError, RegistryResult};
use crate::registry::payload::{self, SchemeOption, RAW_TEXT_KEY};
use reqwest::blocking::Client;
use reqwest::header::ACCEPT;
use reqwest::StatusCode;
use serde_json::{Map, Value};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// 注册库默认地址
pub const DEFAULT_BASE_URL: &str = "https://api.breeam.com/datav1";
/// 单次请求超时
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// 注册库凭据
#[derive(Debug, Clone, Default)]
pub struct RegistryCredentials {
    pub user: String,
    pub pass: String,
    pub base_url: String,
}

impl RegistryCredentials {
    /// 用户名和密码均非空
    pub fn is_complete(&self) -> bool {
        !self.user.trim().is_empty() && !self.pass.trim().is_empty()
    }
}

// ==========================================
// RegistryTransport Trait
// ==========================================
// 用途: 隔离 HTTP 传输,便于替换
// 实现者: HttpTransport
pub trait RegistryTransport: Send + Sync {
    /// GET 请求并返回 JSON（非 JSON 响应体包裹为 {"_raw_text": 响应体}）
    fn get_json(&self, path: &str, query: &[(String, String)]) -> RegistryResult<Value>;
}

// ==========================================
// HttpTransport - reqwest 阻塞实现
// ==========================================
pub struct HttpTransport {
    client: Client,
    credentials: RegistryCredentials,
}

impl HttpTransport {
    pub fn new(credentials: RegistryCredentials) -> RegistryResult<Self> {
        if !credentials.is_complete() {
            return Err(RegistryError::MissingCredentials);
        }
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            credentials,
        })
    }

    fn url(&self, path: &str) -> String {
        let base = if self.credentials.base_url.trim().is_empty() {
            DEFAULT_BASE_URL
        } else {
            self.credentials.base_url.trim()
        };
        format!("{}/{}", base.trim_end_matches('/'), path.trim_start_matches('/'))
    }
}

impl RegistryTransport for HttpTransport {
    fn get_json(&self, path: &str, query: &[(String, String)]) -> RegistryResult<Value> {
        let url = self.url(path);
        debug!(url = %url, "请求注册库");

        let response = self
            .client
            .get(&url)
            .basic_auth(&self.credentials.user, Some(&self.credentials.pass))
            .header(ACCEPT, "application/json")
            .query(query)
            .send()?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            return Err(RegistryError::Unauthorized);
        }
        if !status.is_success() {
            return Err(RegistryError::Status {
                status: status.as_u16(),
                path: path.to_string(),
            });
        }

        let body = response.text()?;
        match serde_json::from_str::<Value>(&body) {
            Ok(value) => Ok(value),
            Err(_) => {
                warn!(path = %path, "注册库返回非 JSON 响应");
                let mut wrapped = Map::new();
                wrapped.insert(RAW_TEXT_KEY.to_string(), Value::String(body));
                Ok(Value::Object(wrapped))
            }
        }
    }
}

// ==========================================
// BreeamClient - 注册库客户端
// ==========================================
pub struct BreeamClient<T: RegistryTransport = HttpTransport> {
    transport: T,
    cache: TtlCache<Value>,
}

impl BreeamClient<HttpTransport> {
    /// 使用 HTTP 传输创建客户端（凭据缺失时返回 MissingCredentials）
    pub fn connect(credentials: RegistryCredentials) -> RegistryResult<Self> {
        Ok(Self::with_transport(HttpTransport::new(credentials)?))
    }
}

impl<T: RegistryTransport> BreeamClient<T> {
    pub fn with_transport(transport: T) -> Self {
        Self {
            transport,
            cache: TtlCache::new(REGISTRY_TTL),
        }
    }

    /// 缓存键: 路径 + 排序后的查询参数
    fn cache_key(path: &str, query: &[(String, String)]) -> String {
        let mut parts: Vec<String> = query.iter().map(|(k, v)| format!("{}={}", k, v)).collect();
        parts.sort();
        parts.insert(0, path.to_string());
        normalize_key(&parts)
    }

    /// GET（命中缓存时不发请求）
    pub fn get(&self, path: &str, query: &[(String, String)]) -> RegistryResult<Value> {
        let key = Self::cache_key(path, query);
        self.cache
            .get_or_try_insert_with(&key, || self.transport.get_json(path, query))
    }

    /// 国家列表（排序）
    #[instrument(skip(self))]
    pub fn countries(&self) -> RegistryResult<Vec<String>> {
        let payload = self.get("/countries", &[])?;
        let countries = payload::parse_countries(&payload);
        debug!(count = countries.len(), "国家列表已加载");
        Ok(countries)
    }

    /// 方案列表（含子方案）
    #[instrument(skip(self))]
    pub fn schemes(&self) -> RegistryResult<Vec<SchemeOption>> {
        let payload = self.get("/schemes", &[])?;
        let schemes = payload::parse_schemes(&payload);
        if schemes.is_empty() {
            warn!("方案列表为空,将不按方案查询");
        }
        Ok(schemes)
    }

    /// 认证评估列表
    ///
    /// # 参数
    /// - country: 国家过滤（None 表示不限）
    /// - scheme_id: 方案编号（None 或空时请求 /assessments）
    #[instrument(skip(self))]
    pub fn assessments(
        &self,
        country: Option<&str>,
        scheme_id: Option<&str>,
    ) -> RegistryResult<Vec<RawRow>> {
        let path = match scheme_id.map(str::trim).filter(|s| !s.is_empty()) {
            Some(id) => format!("/assessments/{}", id),
            None => "/assessments".to_string(),
        };
        let query: Vec<(String, String)> = country
            .map(|c| vec![("country".to_string(), c.to_string())])
            .unwrap_or_default();

        let payload = self.get(&path, &query)?;
        let rows = payload::parse_assessments(&payload);
        info!(path = %path, count = rows.len(), "认证评估已加载");
        Ok(rows)
    }

    /// 清空响应缓存
    pub fn clear_cache(&self) {
        self.cache.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// 记录调用次数的固定响应传输
    struct FakeTransport {
        calls: AtomicUsize,
        payload: Value,
    }

    impl FakeTransport {
        fn new(payload: Value) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                payload,
            }
        }
    }

    impl RegistryTransport for FakeTransport {
        fn get_json(&self, _path: &str, _query: &[(String, String)]) -> RegistryResult<Value> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(self.payload.clone())
        }
    }

    struct UnauthorizedTransport;

    impl RegistryTransport for UnauthorizedTransport {
        fn get_json(&self, _path: &str, _query: &[(String, String)]) -> RegistryResult<Value> {
            Err(RegistryError::Unauthorized)
        }
    }

    #[test]
    fn test_missing_credentials() {
        let result = BreeamClient::<HttpTransport>::connect(RegistryCredentials {
            user: "user".to_string(),
            pass: "  ".to_string(),
            base_url: String::new(),
        });
        assert!(matches!(result, Err(RegistryError::MissingCredentials)));
    }

    #[test]
    fn test_url_join() {
        let transport = HttpTransport::new(RegistryCredentials {
            user: "u".to_string(),
            pass: "p".to_string(),
            base_url: "https://example.org/api/".to_string(),
        })
        .unwrap();
        assert_eq!(transport.url("/countries"), "https://example.org/api/countries");
    }

    #[test]
    fn test_responses_are_cached() {
        let client = BreeamClient::with_transport(FakeTransport::new(
            json!({"countries": ["Poland", "Austria"]}),
        ));

        assert_eq!(client.countries().unwrap(), vec!["Austria", "Poland"]);
        assert_eq!(client.countries().unwrap(), vec!["Austria", "Poland"]);
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 1);

        client.clear_cache();
        client.countries().unwrap();
        assert_eq!(client.transport.calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_cache_key_ignores_query_order() {
        let a = BreeamClient::<FakeTransport>::cache_key(
            "/assessments",
            &[("country".into(), "Poland".into()), ("page".into(), "1".into())],
        );
        let b = BreeamClient::<FakeTransport>::cache_key(
            "/assessments",
            &[("page".into(), "1".into()), ("country".into(), "poland".into())],
        );
        assert_eq!(a, b);
    }

    #[test]
    fn test_unauthorized_is_not_cached() {
        let client = BreeamClient::with_transport(UnauthorizedTransport);
        assert!(matches!(client.countries(), Err(RegistryError::Unauthorized)));
        assert!(client.cache.is_empty());
    }

    #[test]
    fn test_assessments_rows() {
        let client = BreeamClient::with_transport(FakeTransport::new(json!({
            "assessments": [{"buildingName": "A"}, {"buildingName": "B"}]
        })));
        let rows = client.assessments(Some("Poland"), Some("  ")).unwrap();
        assert_eq!(rows.len(), 2);
    }
}
