// ==========================================
// BREEAM & LEED 认证看板 - 地理编码层
// ==========================================
// 职责: 地址 → 坐标（Nominatim）
// ==========================================

pub mod error;
pub mod nominatim;
pub mod service;

// 重导出核心类型
pub use error::{GeocodeError, GeocodeResult};
pub use nominatim::{Geocoder, NominatimGeocoder};
pub use service::{GeocodeMatch, GeocodingService};
