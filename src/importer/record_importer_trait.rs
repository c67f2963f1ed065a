// ==========================================
// BREEAM & LEED 认证看板 - 记录导入 Trait
// ==========================================
// 职责: 定义导入管道各阶段接口（不包含实现）
// 管道: 文件解析 → 字段映射（含清洗）→ 标准记录
// ==========================================

use crate::domain::record::{CertificationRecord, RawRow};
use crate::domain::types::SourceKind;
use crate::importer::error::ImportResult;
use std::path::Path;

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件解析接口（阶段 0）
// 实现者: CsvParser, ExcelParser
pub trait FileParser: Send + Sync {
    /// 解析文件为原始行记录（HashMap<列名, 值>）
    ///
    /// # 返回
    /// - Ok(Vec<RawRow>): 行记录列表（已跳过完全空白的行）
    /// - Err: 文件不存在、格式错误
    fn parse_to_raw_rows(&self, file_path: &Path) -> ImportResult<Vec<RawRow>>;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 单元格清洗接口
// 实现者: DataCleaner
pub trait DataCleaner: Send + Sync {
    /// 清洗单元格文本
    ///
    /// # 返回
    /// - Some(String): 去除首尾空白后的非空值
    /// - None: 空白 / "nan" / "none" / "null"
    fn clean_token(&self, value: &str) -> Option<String>;

    /// 解析坐标（经度/纬度）
    ///
    /// 无法解析或超出范围时返回 None
    fn parse_coordinate(&self, value: &str, limit: f64) -> Option<f64>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 字段映射接口（阶段 1）
// 实现者: FieldMapper
pub trait FieldMapper: Send + Sync {
    /// 将原始行记录映射为标准记录
    ///
    /// # 参数
    /// - row: 原始行记录
    /// - source: 数据来源（决定列名别名表）
    /// - row_number: 行号（从 1 开始，不含表头）
    ///
    /// # 说明
    /// 缺失的列映射为 None，不会使整批导入失败
    fn map_to_record(&self, row: &RawRow, source: SourceKind, row_number: usize)
        -> CertificationRecord;
}
