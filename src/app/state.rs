// ==========================================
// BREEAM & LEED 认证看板 - 应用状态
// ==========================================
// 职责: 管理应用级别的共享状态和API实例
// ==========================================

use std::sync::Arc;

use crate::api::{ApiResult, BreeamApi, BreeamExpiredApi, HomeApi, LeedApi};
use crate::config::{AppConfig, ConfigManager};
use crate::geocode::{Geocoder, GeocodingService, NominatimGeocoder};
use crate::repository::FeedbackRepository;

/// 应用状态
///
/// 包含所有页面API实例和共享资源（地理编码缓存在页面间共享）
pub struct AppState<G: Geocoder = NominatimGeocoder> {
    /// 生效配置
    pub config: AppConfig,

    /// 首页（反馈 / 管理员）
    pub home_api: Arc<HomeApi>,

    /// BREEAM 在用认证（注册库）
    pub breeam_api: Arc<BreeamApi>,

    /// BREEAM 已过期认证（表格）
    pub breeam_expired_api: Arc<BreeamExpiredApi<G>>,

    /// LEED 认证（表格）
    pub leed_api: Arc<LeedApi<G>>,
}

impl AppState<NominatimGeocoder> {
    /// 创建AppState实例（使用 Nominatim 地理编码）
    pub fn new(config: AppConfig) -> ApiResult<Self> {
        let geocoder = NominatimGeocoder::new(&config.geocoder_user_agent)?;
        Ok(Self::with_geocoder(config, geocoder))
    }
}

impl<G: Geocoder> AppState<G> {
    /// 使用指定地理编码器创建AppState
    pub fn with_geocoder(config: AppConfig, geocoder: G) -> Self {
        tracing::info!(
            breeam_hist = %config.breeam_hist_path.display(),
            leed = %config.leed_path.display(),
            feedback = %config.feedback_path.display(),
            "初始化AppState"
        );
        crate::i18n::set_locale(&config.locale);

        let geocoding = Arc::new(GeocodingService::new(geocoder));
        let feedback_repo = Arc::new(FeedbackRepository::new(&config.feedback_path));

        let home_api = Arc::new(HomeApi::new(feedback_repo, config.admin_code.clone()));
        let breeam_api = Arc::new(BreeamApi::new(config.credentials.clone()));
        let breeam_expired_api = Arc::new(BreeamExpiredApi::new(
            &config.breeam_hist_path,
            geocoding.clone(),
        ));
        let leed_api = Arc::new(LeedApi::new(&config.leed_path, geocoding));

        tracing::info!(registry = breeam_api.is_configured(), "AppState初始化成功");

        Self {
            config,
            home_api,
            breeam_api,
            breeam_expired_api,
            leed_api,
        }
    }
}

/// 读取生效配置
///
/// 凭据文件无法读取时记录警告并仅使用环境变量与默认值
pub fn load_config() -> AppConfig {
    match ConfigManager::new() {
        Ok(manager) => {
            if let Some(source) = manager.source() {
                tracing::info!(path = %source.display(), "已读取凭据文件");
            }
            manager.load()
        }
        Err(e) => {
            tracing::warn!(error = %e, "凭据文件读取失败,仅使用环境变量");
            ConfigManager::empty().load()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geocode::GeocodeResult;
    use tempfile::TempDir;

    struct NoGeocoder;

    impl Geocoder for NoGeocoder {
        fn geocode(&self, _query: &str) -> GeocodeResult<Option<(f64, f64)>> {
            Ok(None)
        }
    }

    #[test]
    fn test_state_without_credentials() {
        let _guard = crate::i18n::LOCALE_TEST_LOCK
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        let dir = TempDir::new().unwrap();
        let config = AppConfig {
            feedback_path: dir.path().join("feedback.csv"),
            breeam_hist_path: dir.path().join("BREEAM.xlsx"),
            leed_path: dir.path().join("leed.xlsx"),
            ..AppConfig::default()
        };

        let state = AppState::with_geocoder(config, NoGeocoder);

        assert!(!state.breeam_api.is_configured());
        assert_eq!(state.breeam_expired_api.path(), dir.path().join("BREEAM.xlsx"));
        assert_eq!(state.leed_api.path(), dir.path().join("leed.xlsx"));
    }
}
