// ==========================================
// BREEAM & LEED 认证看板 - 导入模块错误类型
// ==========================================
// 覆盖: 文件定位 / 格式识别 / 工作簿与 CSV 读取
// 日期与字段缺失不在此报错 (记录级降级为 None)
// ==========================================

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImportError {
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("工作簿没有工作表: {path}")]
    NoWorksheet { path: String },

    #[error("工作表缺少表头行: {path}")]
    MissingHeaderRow { path: String },

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        match err.kind() {
            csv::ErrorKind::Io(io) => ImportError::FileReadError(io.to_string()),
            _ => ImportError::CsvParseError(err.to_string()),
        }
    }
}

// open_workbook_auto / worksheet_range 返回 calamine::Error
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

impl From<calamine::XlsxError> for ImportError {
    fn from(err: calamine::XlsxError) -> Self {
        ImportError::ExcelParseError(format!("xlsx: {}", err))
    }
}

pub type ImportResult<T> = Result<T, ImportError>;
