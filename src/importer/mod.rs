// ==========================================
// BREEAM & LEED 认证看板 - 导入层
// ==========================================
// 职责: 外部表格 / API 行 → 标准认证记录
// 支持: Excel, CSV, BREEAM API 行
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod record_importer;
pub mod record_importer_trait;

// 重导出核心类型
pub use data_cleaner::DataCleaner as DataCleanerImpl;
pub use error::{ImportError, ImportResult};
pub use field_mapper::{CanonicalField, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use record_importer::{ImportOutcome, RecordImporter};

// 重导出 Trait 接口
pub use record_importer_trait::{DataCleaner, FieldMapper, FileParser};
