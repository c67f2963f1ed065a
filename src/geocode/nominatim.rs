// ==========================================
// BREEAM & LEED 认证看板 - Nominatim 地理编码
// ==========================================
// 职责: 单地址查询（format=json&limit=1）
// 红线: 两次请求间隔至少 1 秒,必须携带可识别的 User-Agent
// ==========================================

use crate::geocode::error::{GeocodeError, GeocodeResult};
use reqwest::blocking::Client;
use reqwest::header::USER_AGENT;
use serde::Deserialize;
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};
use tracing::debug;

/// Nominatim 默认地址
pub const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
/// 两次请求最小间隔
pub const MIN_DELAY: Duration = Duration::from_secs(1);
/// 默认 User-Agent
pub const DEFAULT_USER_AGENT: &str = "breeam-leed-monitor";

// ==========================================
// Geocoder Trait
// ==========================================
// 实现者: NominatimGeocoder
pub trait Geocoder: Send + Sync {
    /// 查询单个地址
    ///
    /// # 返回
    /// - Ok(Some((纬度, 经度))): 命中
    /// - Ok(None): 无结果
    fn geocode(&self, query: &str) -> GeocodeResult<Option<(f64, f64)>>;
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

pub struct NominatimGeocoder {
    client: Client,
    endpoint: String,
    user_agent: String,
    last_call: Mutex<Option<Instant>>,
}

impl NominatimGeocoder {
    pub fn new(user_agent: &str) -> GeocodeResult<Self> {
        Self::with_endpoint(NOMINATIM_URL, user_agent)
    }

    pub fn with_endpoint(endpoint: &str, user_agent: &str) -> GeocodeResult<Self> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        let user_agent = if user_agent.trim().is_empty() {
            DEFAULT_USER_AGENT.to_string()
        } else {
            user_agent.trim().to_string()
        };
        Ok(Self {
            client,
            endpoint: endpoint.to_string(),
            user_agent,
            last_call: Mutex::new(None),
        })
    }

    /// 距上次请求不足 MIN_DELAY 时休眠补足
    fn throttle(&self) {
        let mut last_call = self
            .last_call
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < MIN_DELAY {
                thread::sleep(MIN_DELAY - elapsed);
            }
        }
        *last_call = Some(Instant::now());
    }

    fn parse_places(body: &str) -> GeocodeResult<Option<(f64, f64)>> {
        let places: Vec<NominatimPlace> = serde_json::from_str(body)
            .map_err(|e| GeocodeError::InvalidResponse(e.to_string()))?;

        let Some(place) = places.first() else {
            return Ok(None);
        };
        let lat = place
            .lat
            .parse::<f64>()
            .map_err(|e| GeocodeError::InvalidResponse(format!("lat: {}", e)))?;
        let lon = place
            .lon
            .parse::<f64>()
            .map_err(|e| GeocodeError::InvalidResponse(format!("lon: {}", e)))?;
        Ok(Some((lat, lon)))
    }
}

impl Geocoder for NominatimGeocoder {
    fn geocode(&self, query: &str) -> GeocodeResult<Option<(f64, f64)>> {
        self.throttle();
        debug!(query = %query, "Nominatim 查询");

        let response = self
            .client
            .get(&self.endpoint)
            .header(USER_AGENT, &self.user_agent)
            .query(&[("q", query), ("format", "json"), ("limit", "1")])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(GeocodeError::Status(status.as_u16()));
        }

        let body = response.text()?;
        Self::parse_places(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_places_hit() {
        let body = r#"[{"place_id": 1, "lat": "52.2319581", "lon": "21.0067249", "display_name": "Warszawa"}]"#;
        let hit = NominatimGeocoder::parse_places(body).unwrap();
        assert_eq!(hit, Some((52.2319581, 21.0067249)));
    }

    #[test]
    fn test_parse_places_empty() {
        assert_eq!(NominatimGeocoder::parse_places("[]").unwrap(), None);
    }

    #[test]
    fn test_parse_places_invalid() {
        let result = NominatimGeocoder::parse_places("<html>rate limited</html>");
        assert!(matches!(result, Err(GeocodeError::InvalidResponse(_))));
    }

    #[test]
    fn test_blank_user_agent_falls_back() {
        let geocoder = NominatimGeocoder::new("  ").unwrap();
        assert_eq!(geocoder.user_agent, DEFAULT_USER_AGENT);
    }
}
