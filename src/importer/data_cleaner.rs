// ==========================================
// BREEAM & LEED 认证看板 - 数据清洗器实现
// ==========================================
// 职责: TRIM / NULL 标准化 / 坐标解析
// ==========================================

use crate::importer::record_importer_trait::DataCleaner as DataCleanerTrait;

/// 视为空值的占位文本（不区分大小写）
const NULL_TOKENS: [&str; 3] = ["nan", "none", "null"];

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_token(&self, value: &str) -> Option<String> {
        let trimmed = value.trim();
        if trimmed.is_empty() || NULL_TOKENS.iter().any(|t| trimmed.eq_ignore_ascii_case(t)) {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    fn parse_coordinate(&self, value: &str, limit: f64) -> Option<f64> {
        let cleaned = self.clean_token(value)?;
        // 兼容逗号小数点
        let parsed = cleaned.replace(',', ".").parse::<f64>().ok()?;
        if parsed.is_finite() && parsed.abs() <= limit {
            Some(parsed)
        } else {
            None
        }
    }
}

impl DataCleaner {
    /// 清洗可选值（None 透传）
    pub fn normalize_null(&self, value: Option<&str>) -> Option<String> {
        value.and_then(|v| self.clean_token(v))
    }
}
