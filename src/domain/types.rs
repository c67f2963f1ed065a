// ==========================================
// BREEAM & LEED 认证看板 - 领域类型定义
// ==========================================
// 职责: 有效期等级、日月顺序策略、数据来源
// 红线: 有效期等级是"等级制",只由剩余月数决定
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 有效期等级 (Expiry Bucket)
// ==========================================
// 顺序: NoDate < Expired < Urgent < Warning < Caution < Ok
// 表格着色与范围筛选共用同一组等级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryBucket {
    NoDate,  // 无日期
    Expired, // 已过期
    Urgent,  // ≤ 6 个月
    Warning, // 6–12 个月
    Caution, // 12–18 个月
    Ok,      // > 18 个月
}

impl ExpiryBucket {
    /// 全部等级（按序）
    pub const ALL: [ExpiryBucket; 6] = [
        ExpiryBucket::NoDate,
        ExpiryBucket::Expired,
        ExpiryBucket::Urgent,
        ExpiryBucket::Warning,
        ExpiryBucket::Caution,
        ExpiryBucket::Ok,
    ];

    /// 行背景色（NoDate 不着色）
    pub fn color(&self) -> Option<&'static str> {
        match self {
            ExpiryBucket::NoDate => None,
            ExpiryBucket::Expired => Some("#ffcccc"),
            ExpiryBucket::Urgent => Some("#ffe0cc"),
            ExpiryBucket::Warning => Some("#fff2cc"),
            ExpiryBucket::Caution => Some("#fff7cc"),
            ExpiryBucket::Ok => Some("#e6ffea"),
        }
    }

    /// 翻译键
    pub fn label_key(&self) -> &'static str {
        match self {
            ExpiryBucket::NoDate => "bucket.no_date",
            ExpiryBucket::Expired => "bucket.expired",
            ExpiryBucket::Urgent => "bucket.urgent",
            ExpiryBucket::Warning => "bucket.warning",
            ExpiryBucket::Caution => "bucket.caution",
            ExpiryBucket::Ok => "bucket.ok",
        }
    }

    /// 当前语言下的显示标签
    pub fn label(&self) -> String {
        crate::i18n::t(self.label_key())
    }

    /// 从字符串解析等级（命令行 / 前端参数）
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_uppercase().replace('-', "_").as_str() {
            "NO_DATE" => Some(ExpiryBucket::NoDate),
            "EXPIRED" => Some(ExpiryBucket::Expired),
            "URGENT" => Some(ExpiryBucket::Urgent),
            "WARNING" => Some(ExpiryBucket::Warning),
            "CAUTION" => Some(ExpiryBucket::Caution),
            "OK" => Some(ExpiryBucket::Ok),
            _ => None,
        }
    }
}

impl fmt::Display for ExpiryBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpiryBucket::NoDate => write!(f, "NO_DATE"),
            ExpiryBucket::Expired => write!(f, "EXPIRED"),
            ExpiryBucket::Urgent => write!(f, "URGENT"),
            ExpiryBucket::Warning => write!(f, "WARNING"),
            ExpiryBucket::Caution => write!(f, "CAUTION"),
            ExpiryBucket::Ok => write!(f, "OK"),
        }
    }
}

// ==========================================
// 日月顺序策略 (Day/Month Order)
// ==========================================
// 用于解析 "03/04/2024" 这类歧义日期
// 按数据来源配置，不做全局设置
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DayMonthOrder {
    MonthFirst, // 03/04 → 3月4日
    DayFirst,   // 03/04 → 4月3日
}

impl fmt::Display for DayMonthOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DayMonthOrder::MonthFirst => write!(f, "MONTH_FIRST"),
            DayMonthOrder::DayFirst => write!(f, "DAY_FIRST"),
        }
    }
}

// ==========================================
// 数据来源 (Source Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SourceKind {
    BreeamApi,         // BREEAM 注册库 API（在用认证）
    BreeamSpreadsheet, // BREEAM.xlsx（已过期认证）
    LeedSpreadsheet,   // PublicLEEDProjectDirectory.xlsx
}

impl SourceKind {
    /// 该来源的歧义日期解析策略
    ///
    /// BREEAM 两个来源按日在前解析，LEED 按月在前解析
    pub fn date_order(&self) -> DayMonthOrder {
        match self {
            SourceKind::BreeamApi | SourceKind::BreeamSpreadsheet => DayMonthOrder::DayFirst,
            SourceKind::LeedSpreadsheet => DayMonthOrder::MonthFirst,
        }
    }

    /// 认证体系名称
    pub fn system(&self) -> &'static str {
        match self {
            SourceKind::BreeamApi | SourceKind::BreeamSpreadsheet => "BREEAM",
            SourceKind::LeedSpreadsheet => "LEED",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::BreeamApi => write!(f, "BREEAM_API"),
            SourceKind::BreeamSpreadsheet => write!(f, "BREEAM_SPREADSHEET"),
            SourceKind::LeedSpreadsheet => write!(f, "LEED_SPREADSHEET"),
        }
    }
}

// ==========================================
// 有效期计算基准 (Expiry Basis)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExpiryBasis {
    DirectExpiry,   // 源字段本身即到期日
    YearsAfter(u32), // 源字段为认证日期，到期日 = 认证日期 + N 年
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bucket_ordering() {
        assert!(ExpiryBucket::Expired < ExpiryBucket::Urgent);
        assert!(ExpiryBucket::Caution < ExpiryBucket::Ok);
        assert_eq!(ExpiryBucket::ALL.len(), 6);
    }

    #[test]
    fn test_bucket_from_str() {
        assert_eq!(ExpiryBucket::from_str("expired"), Some(ExpiryBucket::Expired));
        assert_eq!(ExpiryBucket::from_str("no-date"), Some(ExpiryBucket::NoDate));
        assert_eq!(ExpiryBucket::from_str(" ok "), Some(ExpiryBucket::Ok));
        assert_eq!(ExpiryBucket::from_str("soon"), None);
    }

    #[test]
    fn test_bucket_colors_are_distinct() {
        let colors: Vec<_> = ExpiryBucket::ALL.iter().filter_map(|b| b.color()).collect();
        assert_eq!(colors.len(), 5);
        let mut dedup = colors.clone();
        dedup.sort();
        dedup.dedup();
        assert_eq!(dedup.len(), colors.len());
    }

    #[test]
    fn test_source_date_order() {
        assert_eq!(SourceKind::BreeamApi.date_order(), DayMonthOrder::DayFirst);
        assert_eq!(SourceKind::BreeamSpreadsheet.date_order(), DayMonthOrder::DayFirst);
        assert_eq!(SourceKind::LeedSpreadsheet.date_order(), DayMonthOrder::MonthFirst);
    }
}
