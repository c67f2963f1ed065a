// ==========================================
// BREEAM & LEED 认证看板 - 认证记录领域模型
// ==========================================
// 职责: 标准记录结构（与来源无关）+ 派生有效期字段
// 红线: 派生字段每次加载/筛选重新计算,不单独存储
// ==========================================

use crate::domain::types::{ExpiryBucket, SourceKind};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 原始行记录（列名 → 单元格文本）
pub type RawRow = HashMap<String, String>;

// ==========================================
// RawValue - 日期规范化器的输入值
// ==========================================
#[derive(Debug, Clone, PartialEq)]
pub enum RawValue {
    Null,
    Text(String),
    Number(f64),
}

impl From<Option<&str>> for RawValue {
    fn from(value: Option<&str>) -> Self {
        match value {
            Some(s) => RawValue::Text(s.to_string()),
            None => RawValue::Null,
        }
    }
}

impl From<&str> for RawValue {
    fn from(value: &str) -> Self {
        RawValue::Text(value.to_string())
    }
}

// ==========================================
// CertificationRecord - 标准认证记录
// ==========================================
// 用途: 导入层写入,引擎层只读
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CertificationRecord {
    // ===== 标识 =====
    pub identity: Option<String>,   // 项目编号（LEED Project ID / BREEAM certNo）
    pub asset_name: Option<String>, // 建筑名称

    // ===== 地址 =====
    pub country: Option<String>,
    pub region: Option<String>, // 省/州/县
    pub city: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub postcode: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,

    // ===== 认证信息 =====
    pub system: Option<String>,       // 认证体系
    pub project_type: Option<String>, // 项目类型
    pub standard: Option<String>,
    pub scheme: Option<String>,
    pub rating: Option<String>,
    pub level: Option<String>,       // LEED 认证等级
    pub version_tag: Option<String>, // LEED 体系版本（如 v2009 / v4.1）
    pub assessor: Option<String>,
    pub public_url: Option<String>,

    // ===== 日期源字段 =====
    pub raw_date_text: Option<String>, // 到期标记 或 认证日期（视来源而定）

    // ===== 元信息 =====
    pub source: Option<SourceKind>,
    pub row_number: usize,
}

impl CertificationRecord {
    /// 显示名称（缺失时回退到项目编号）
    pub fn display_name(&self) -> String {
        self.asset_name
            .clone()
            .or_else(|| self.identity.clone())
            .unwrap_or_else(|| crate::i18n::t("common.no_name"))
    }

    /// 选择键（项目编号 | 名称），用于检测所选项目是否变化
    pub fn selection_key(&self) -> String {
        format!(
            "{}|{}",
            self.identity.as_deref().unwrap_or(""),
            self.asset_name.as_deref().unwrap_or("")
        )
    }

    /// 记录自带坐标（API 数据）
    pub fn coordinates(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat.is_finite() && lon.is_finite() => Some((lat, lon)),
            _ => None,
        }
    }
}

// ==========================================
// EvaluatedRecord - 带派生有效期字段的记录
// ==========================================
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluatedRecord {
    pub record: CertificationRecord,
    pub parsed_date: Option<NaiveDate>,   // 日期规范化器输出
    pub expiry_date: Option<NaiveDate>,   // 到期日
    pub months_to_expiry: Option<i32>,    // 剩余月数（带符号）
    pub bucket: ExpiryBucket,             // 有效期等级
}

impl EvaluatedRecord {
    pub fn is_expired(&self) -> bool {
        matches!(self.months_to_expiry, Some(m) if m < 0)
    }
}
