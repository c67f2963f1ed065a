// ==========================================
// BREEAM & LEED 认证看板 - 认证记录导入器
// ==========================================
// 职责: 整合导入流程,从文件/API 行到标准记录
// 流程: 解析 → 映射（含清洗）→ 缺列告警
// 红线: 单行缺字段不阻断导入,缺失值保持 None
// ==========================================

use crate::domain::record::{CertificationRecord, RawRow};
use crate::domain::types::SourceKind;
use crate::importer::error::ImportResult;
use crate::importer::field_mapper::{CanonicalField, FieldMapper};
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::record_importer_trait::FieldMapper as FieldMapperTrait;
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// 导入结果
#[derive(Debug, Clone)]
pub struct ImportOutcome {
    pub records: Vec<CertificationRecord>,
    pub total_rows: usize,
    pub missing_fields: Vec<CanonicalField>, // 所有别名均缺失的标准字段
    pub elapsed_time: Duration,
}

// ==========================================
// RecordImporter - 认证记录导入器
// ==========================================
pub struct RecordImporter {
    file_parser: UniversalFileParser,
    field_mapper: Box<dyn FieldMapperTrait>,
}

impl Default for RecordImporter {
    fn default() -> Self {
        Self::new(Box::new(FieldMapper))
    }
}

impl RecordImporter {
    pub fn new(field_mapper: Box<dyn FieldMapperTrait>) -> Self {
        Self {
            file_parser: UniversalFileParser,
            field_mapper,
        }
    }

    /// 从表格文件导入（.xlsx/.xls/.csv）
    #[instrument(skip(self, file_path))]
    pub fn import_file<P: AsRef<Path>>(
        &self,
        file_path: P,
        source: SourceKind,
    ) -> ImportResult<ImportOutcome> {
        let start_time = Instant::now();
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入认证数据");

        // === 步骤 1: 解析文件 ===
        let raw_rows = self.file_parser.parse(path)?;
        let total_rows = raw_rows.len();
        debug!(total_rows, "文件解析完成");

        // === 步骤 2: 缺列检测 ===
        let missing_fields = Self::detect_missing_fields(&raw_rows, source);
        if !missing_fields.is_empty() {
            warn!(missing = ?missing_fields, "表格缺少部分标准字段");
        }

        // === 步骤 3: 字段映射 ===
        let records = self.map_rows(&raw_rows, source);

        let elapsed_time = start_time.elapsed();
        info!(
            total = total_rows,
            elapsed_ms = elapsed_time.as_millis(),
            "认证数据导入完成"
        );

        Ok(ImportOutcome {
            records,
            total_rows,
            missing_fields,
            elapsed_time,
        })
    }

    /// 映射已解析的行（API 数据走此入口）
    pub fn map_rows(&self, rows: &[RawRow], source: SourceKind) -> Vec<CertificationRecord> {
        rows.iter()
            .enumerate()
            .map(|(idx, row)| self.field_mapper.map_to_record(row, source, idx + 1))
            .collect()
    }

    fn detect_missing_fields(rows: &[RawRow], source: SourceKind) -> Vec<CanonicalField> {
        let Some(first) = rows.first() else {
            return Vec::new();
        };
        let headers: Vec<&str> = first.keys().map(String::as_str).collect();
        FieldMapper::missing_fields(&headers, source)
    }
}
