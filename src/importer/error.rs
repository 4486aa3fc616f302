// ==========================================
// 学校管理门户 - 导入模块错误类型
// ==========================================
// 工具: thiserror 派生宏
// 传播策略:
// - 单个工作表的启发式失败（无表头/非名册）在导入器内部跳过
// - 结果为空或文件解析失败才返回给调用方
// ==========================================

use crate::domain::types::RosterKind;
use thiserror::Error;

/// 导入模块错误类型
#[derive(Error, Debug)]
pub enum ImportError {
    // ===== 文件相关错误 =====
    #[error("文件不存在: {0}")]
    FileNotFound(String),

    #[error("文件格式不支持: {0}（仅支持 .xlsx/.xls/.ods/.csv）")]
    UnsupportedFormat(String),

    #[error("文件读取失败: {0}")]
    FileReadError(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    #[error("CSV 解析失败: {0}")]
    CsvParseError(String),

    // ===== 工作表启发式 =====
    #[error("工作表 {sheet} 未找到表头行")]
    NoHeaderRowFound { sheet: String },

    #[error("工作表 {sheet} 不是名册（缺少 email / fullName / firstName 列）")]
    NotARosterSheet { sheet: String },

    #[error("未找到任何{kind}数据行，请检查表头")]
    EmptyImportResult { kind: RosterKind },

    // ===== 配置错误 =====
    #[error("配置读取失败 (key: {key}): {message}")]
    ConfigReadError { key: String, message: String },

    #[error("配置值格式错误 (key: {key}, value: {value}): {message}")]
    ConfigValueError {
        key: String,
        value: String,
        message: String,
    },

    // ===== 模板 =====
    #[error("模板写入失败: {0}")]
    TemplateWriteError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ImportError {
    /// 是否为文件格式/内容层面的失败（前端统一提示"请检查文件格式"）
    pub fn is_malformed_file(&self) -> bool {
        matches!(
            self,
            ImportError::UnsupportedFormat(_)
                | ImportError::FileReadError(_)
                | ImportError::ExcelParseError(_)
                | ImportError::CsvParseError(_)
        )
    }
}

// 实现 From<std::io::Error>
impl From<std::io::Error> for ImportError {
    fn from(err: std::io::Error) -> Self {
        ImportError::FileReadError(err.to_string())
    }
}

// 实现 From<csv::Error>
impl From<csv::Error> for ImportError {
    fn from(err: csv::Error) -> Self {
        ImportError::CsvParseError(err.to_string())
    }
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ImportError {
    fn from(err: calamine::Error) -> Self {
        ImportError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ImportResult<T> = Result<T, ImportError>;
