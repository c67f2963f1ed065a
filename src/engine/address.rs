// ==========================================
// BREEAM & LEED 认证看板 - 地址组装
// ==========================================
// 职责: 显示地址 / 地理编码查询地址 / 逐级简化的备选地址
// ==========================================

use crate::domain::record::CertificationRecord;
use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

/// 地址缺失时的占位符
pub const EMPTY_ADDRESS: &str = "–";

/// 波兰街道前缀（ul. / al. / pl. / os.）
fn street_prefix_regex() -> &'static Regex {
    static RX: OnceLock<Regex> = OnceLock::new();
    RX.get_or_init(|| Regex::new(r"(?i)^\s*(ul\.|al\.|pl\.|os\.)\s*").expect("街道前缀正则非法"))
}

pub struct AddressBuilder;

impl AddressBuilder {
    /// 显示地址: "街道 街道2, 邮编 城市, 地区, 国家"
    pub fn display_address(record: &CertificationRecord, default_country: Option<&str>) -> String {
        let mut parts: Vec<String> = [&record.street, &record.street2]
            .into_iter()
            .filter_map(|p| p.clone())
            .collect();

        let place = [&record.postcode, &record.city]
            .into_iter()
            .filter_map(|p| p.as_deref())
            .collect::<Vec<_>>()
            .join(" ");
        if !place.is_empty() {
            parts.push(place);
        }
        if let Some(region) = &record.region {
            parts.push(region.clone());
        }
        if let Some(country) = Self::country(record, default_country) {
            parts.push(country);
        }

        if parts.is_empty() {
            EMPTY_ADDRESS.to_string()
        } else {
            parts.join(", ")
        }
    }

    /// 默认地理编码查询: 街道(截至第一个逗号), 邮编, 城市, 地区, 国家
    pub fn geocoding_query(record: &CertificationRecord, default_country: Option<&str>) -> String {
        let street_main = record
            .street
            .as_deref()
            .and_then(|s| s.split(',').next())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty());

        [
            street_main,
            record.postcode.clone(),
            record.city.clone(),
            record.region.clone(),
            Self::country(record, default_country),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(", ")
    }

    /// 逐级简化的备选地址（去重，保持顺序）
    ///
    /// 人工修正的地址排在最前
    pub fn address_variants(
        record: &CertificationRecord,
        manual: Option<&str>,
        default_country: Option<&str>,
    ) -> Vec<String> {
        let street = record.street.clone().unwrap_or_default();
        let city = record.city.clone().unwrap_or_default();
        let region = record.region.clone().unwrap_or_default();
        let postcode = record.postcode.clone().unwrap_or_default();
        let country = Self::country(record, default_country).unwrap_or_default();

        let street_no_prefix = street_prefix_regex().replace(&street, "").trim().to_string();

        let mut candidates = Vec::new();
        if let Some(m) = manual {
            candidates.push(m.to_string());
        }
        if !street.is_empty() && !city.is_empty() {
            candidates.push(format!("{}, {}, {}", street, city, country));
        }
        if !street_no_prefix.is_empty() && !city.is_empty() {
            candidates.push(format!("{}, {}, {}", street_no_prefix, city, country));
        }
        if !street.is_empty() && !postcode.is_empty() && !city.is_empty() {
            candidates.push(format!("{}, {} {}, {}", street, postcode, city, country));
        }
        if !street_no_prefix.is_empty() && !postcode.is_empty() && !city.is_empty() {
            candidates.push(format!("{}, {} {}, {}", street_no_prefix, postcode, city, country));
        }
        if !city.is_empty() && !region.is_empty() {
            candidates.push(format!("{}, {}, {}", city, region, country));
        }
        if !city.is_empty() {
            candidates.push(format!("{}, {}", city, country));
        }
        if !region.is_empty() {
            candidates.push(format!("{}, {}", region, country));
        }

        let mut seen = HashSet::new();
        candidates
            .into_iter()
            .map(|a| a.trim().trim_end_matches(',').trim().to_string())
            .filter(|a| !a.is_empty() && seen.insert(a.clone()))
            .collect()
    }

    fn country(record: &CertificationRecord, default_country: Option<&str>) -> Option<String> {
        record
            .country
            .clone()
            .or_else(|| default_country.map(str::to_string))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warsaw_record() -> CertificationRecord {
        CertificationRecord {
            street: Some("ul. Marszałkowska 146 A, B".to_string()),
            city: Some("Warszawa".to_string()),
            region: Some("mazowieckie".to_string()),
            postcode: Some("00-061".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_display_address() {
        let mut record = warsaw_record();
        record.street2 = Some("lok. 5".to_string());
        assert_eq!(
            AddressBuilder::display_address(&record, Some("Poland")),
            "ul. Marszałkowska 146 A, B, lok. 5, 00-061 Warszawa, mazowieckie, Poland"
        );
    }

    #[test]
    fn test_display_address_empty() {
        let record = CertificationRecord::default();
        assert_eq!(AddressBuilder::display_address(&record, None), EMPTY_ADDRESS);
    }

    #[test]
    fn test_geocoding_query_cuts_street_at_comma() {
        let record = warsaw_record();
        assert_eq!(
            AddressBuilder::geocoding_query(&record, Some("Poland")),
            "ul. Marszałkowska 146 A, 00-061, Warszawa, mazowieckie, Poland"
        );
    }

    #[test]
    fn test_variants_order_and_dedup() {
        let record = warsaw_record();
        let variants =
            AddressBuilder::address_variants(&record, Some("Marszałkowska 146, Warszawa"), Some("Poland"));

        assert_eq!(variants[0], "Marszałkowska 146, Warszawa");
        assert_eq!(variants[1], "ul. Marszałkowska 146 A, B, Warszawa, Poland");
        assert_eq!(variants[2], "Marszałkowska 146 A, B, Warszawa, Poland");
        assert!(variants.contains(&"Warszawa, mazowieckie, Poland".to_string()));
        assert_eq!(variants.last().unwrap(), "mazowieckie, Poland");

        let unique: HashSet<_> = variants.iter().collect();
        assert_eq!(unique.len(), variants.len());
    }

    #[test]
    fn test_variants_without_prefix_are_deduplicated() {
        let record = CertificationRecord {
            street: Some("Prosta 20".to_string()),
            city: Some("Warszawa".to_string()),
            country: Some("Poland".to_string()),
            ..Default::default()
        };
        let variants = AddressBuilder::address_variants(&record, None, None);
        assert_eq!(
            variants,
            vec!["Prosta 20, Warszawa, Poland".to_string(), "Warszawa, Poland".to_string()]
        );
    }
}
