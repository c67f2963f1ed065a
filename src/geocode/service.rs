// ==========================================
// BREEAM & LEED 认证看板 - 地理编码服务
// ==========================================
// 职责: 按备选地址顺序查询,第一个命中即返回 + 24 小时结果缓存
// 红线: 只为当前选中的记录查询,不批量地理编码
// ==========================================

use crate::cache::{normalize_key, TtlCache, GEOCODE_TTL};
use crate::domain::record::CertificationRecord;
use crate::engine::address::AddressBuilder;
use crate::geocode::nominatim::Geocoder;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

/// 地理编码命中结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeocodeMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub matched: String, // 命中的地址文本
}

pub struct GeocodingService<G: Geocoder> {
    geocoder: G,
    cache: TtlCache<Option<GeocodeMatch>>,
}

impl<G: Geocoder> GeocodingService<G> {
    pub fn new(geocoder: G) -> Self {
        Self {
            geocoder,
            cache: TtlCache::new(GEOCODE_TTL),
        }
    }

    /// 依次尝试备选地址,返回第一个命中
    ///
    /// 单个地址查询失败视为未命中,继续下一个
    pub fn geocode_variants(&self, variants: &[String]) -> Option<GeocodeMatch> {
        if variants.is_empty() {
            return None;
        }

        let key = normalize_key(variants);
        if let Some(cached) = self.cache.get(&key) {
            debug!(hit = cached.is_some(), "地理编码缓存命中");
            return cached;
        }

        let mut found = None;
        for variant in variants {
            match self.geocoder.geocode(variant) {
                Ok(Some((latitude, longitude))) => {
                    found = Some(GeocodeMatch {
                        latitude,
                        longitude,
                        matched: variant.clone(),
                    });
                    break;
                }
                Ok(None) => debug!(variant = %variant, "地址未命中"),
                Err(e) => warn!(variant = %variant, error = %e, "地址查询失败"),
            }
        }

        info!(tried = variants.len(), hit = found.is_some(), "地理编码完成");
        self.cache.insert(&key, found.clone());
        found
    }

    /// 单地址查询
    pub fn geocode_query(&self, query: &str) -> Option<GeocodeMatch> {
        let query = query.trim();
        if query.is_empty() {
            return None;
        }
        self.geocode_variants(&[query.to_string()])
    }

    /// 定位记录: 记录自带坐标时直接使用,否则按备选地址查询
    pub fn locate(
        &self,
        record: &CertificationRecord,
        manual: Option<&str>,
        default_country: Option<&str>,
    ) -> Option<GeocodeMatch> {
        if let Some((latitude, longitude)) = record.coordinates() {
            return Some(GeocodeMatch {
                latitude,
                longitude,
                matched: AddressBuilder::display_address(record, default_country),
            });
        }
        let manual = manual.map(str::trim).filter(|m| !m.is_empty());
        let variants = AddressBuilder::address_variants(record, manual, default_country);
        self.geocode_variants(&variants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::error::{GeocodeError, GeocodeResult};
    use std::sync::Mutex;

    /// 仅对指定地址命中,并记录查询顺序
    struct ScriptedGeocoder {
        known: Vec<(&'static str, (f64, f64))>,
        failing: Vec<&'static str>,
        queries: Mutex<Vec<String>>,
    }

    impl ScriptedGeocoder {
        fn new(known: Vec<(&'static str, (f64, f64))>) -> Self {
            Self {
                known,
                failing: Vec::new(),
                queries: Mutex::new(Vec::new()),
            }
        }
    }

    impl Geocoder for ScriptedGeocoder {
        fn geocode(&self, query: &str) -> GeocodeResult<Option<(f64, f64)>> {
            self.queries.lock().unwrap().push(query.to_string());
            if self.failing.iter().any(|f| *f == query) {
                return Err(GeocodeError::Status(503));
            }
            Ok(self
                .known
                .iter()
                .find(|(addr, _)| *addr == query)
                .map(|(_, point)| *point))
        }
    }

    #[test]
    fn test_first_hit_wins() {
        let mut geocoder = ScriptedGeocoder::new(vec![
            ("Warszawa, Poland", (52.23, 21.01)),
            ("mazowieckie, Poland", (52.0, 21.0)),
        ]);
        geocoder.failing.push("Złota 44, Warszawa, Poland");
        let service = GeocodingService::new(geocoder);

        let variants = vec![
            "Złota 44, Warszawa, Poland".to_string(),
            "Warszawa, Poland".to_string(),
            "mazowieckie, Poland".to_string(),
        ];
        let hit = service.geocode_variants(&variants).unwrap();

        assert_eq!(hit.matched, "Warszawa, Poland");
        assert_eq!((hit.latitude, hit.longitude), (52.23, 21.01));
        // 命中后不再查询后续地址
        assert_eq!(service.geocoder.queries.lock().unwrap().len(), 2);
    }

    #[test]
    fn test_results_and_misses_are_cached() {
        let service = GeocodingService::new(ScriptedGeocoder::new(vec![]));
        let variants = vec!["Nowhere 1".to_string()];

        assert_eq!(service.geocode_variants(&variants), None);
        assert_eq!(service.geocode_variants(&variants), None);
        assert_eq!(service.geocoder.queries.lock().unwrap().len(), 1);
    }

    #[test]
    fn test_locate_uses_record_coordinates() {
        let service = GeocodingService::new(ScriptedGeocoder::new(vec![]));
        let record = CertificationRecord {
            latitude: Some(50.06),
            longitude: Some(19.94),
            city: Some("Kraków".to_string()),
            ..Default::default()
        };

        let hit = service.locate(&record, None, None).unwrap();

        assert_eq!((hit.latitude, hit.longitude), (50.06, 19.94));
        assert!(service.geocoder.queries.lock().unwrap().is_empty());
    }

    #[test]
    fn test_locate_tries_manual_address_first() {
        let service = GeocodingService::new(ScriptedGeocoder::new(vec![(
            "Rondo ONZ 1, Warszawa",
            (52.23, 20.99),
        )]));
        let record = CertificationRecord {
            city: Some("Warszawa".to_string()),
            ..Default::default()
        };

        let hit = service
            .locate(&record, Some(" Rondo ONZ 1, Warszawa "), Some("Poland"))
            .unwrap();

        assert_eq!(hit.matched, "Rondo ONZ 1, Warszawa");
    }

    #[test]
    fn test_blank_query() {
        let service = GeocodingService::new(ScriptedGeocoder::new(vec![]));
        assert_eq!(service.geocode_query("   "), None);
    }
}
