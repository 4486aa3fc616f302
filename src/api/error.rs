// ==========================================
// 学校管理门户 - API层错误类型
// ==========================================
// 职责: 将导入/仓储层的技术错误转换为用户可读（已本地化）的提示
// ==========================================

use crate::domain::types::RosterKind;
use crate::i18n::{t, t_with_args};
use crate::importer::error::ImportError;
use crate::repository::error::RepositoryError;
use thiserror::Error;

/// API层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ==========================================
    // 导入错误（消息面向最终用户）
    // ==========================================
    /// 所有工作表都没有识别出数据行
    #[error("{0}")]
    EmptyImport(String),

    /// 文件格式/内容无法解析
    #[error("{0}")]
    ImportFailed(String),

    // ==========================================
    // 业务规则错误
    // ==========================================
    #[error("无效输入: {0}")]
    InvalidInput(String),

    #[error("资源未找到: {0}")]
    NotFound(String),

    // ==========================================
    // 数据访问错误
    // ==========================================
    #[error("数据库错误: {0}")]
    DatabaseError(String),

    #[error("数据库连接失败: {0}")]
    DatabaseConnectionError(String),

    /// 重复导入同一批次/人员ID
    #[error("数据冲突: {0}")]
    Conflict(String),

    // ==========================================
    // 通用错误
    // ==========================================
    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// 名册种类的本地化名称
pub fn kind_label(kind: RosterKind) -> String {
    match kind {
        RosterKind::Teacher => t("roster.teacher"),
        RosterKind::Student => t("roster.student"),
    }
}

// ==========================================
// 从 ImportError 转换
// ==========================================
impl From<ImportError> for ApiError {
    fn from(err: ImportError) -> Self {
        match err {
            ImportError::EmptyImportResult { kind } => ApiError::EmptyImport(t_with_args(
                "import.no_rows",
                &[("kind", kind_label(kind).as_str())],
            )),
            ImportError::FileNotFound(path) => {
                ApiError::NotFound(t_with_args("import.file_not_found", &[("path", path.as_str())]))
            }
            ImportError::ConfigReadError { key, message }
            | ImportError::ConfigValueError { key, message, .. } => {
                ApiError::ConfigError(format!("{}: {}", key, message))
            }
            ImportError::TemplateWriteError(msg) => ApiError::InvalidInput(msg),
            ImportError::Other(e) => ApiError::Other(e),
            // 文件格式、解析失败，以及未被导入器消化的工作表级错误
            _ => ApiError::ImportFailed(t("import.failed")),
        }
    }
}

// ==========================================
// 从 RepositoryError 转换
// ==========================================
impl From<RepositoryError> for ApiError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound { entity, id } => {
                ApiError::NotFound(format!("{}(id={})不存在", entity, id))
            }
            RepositoryError::LockError(msg) => {
                ApiError::DatabaseConnectionError(format!("数据库锁获取失败: {}", msg))
            }
            RepositoryError::UniqueConstraintViolation(msg) => ApiError::Conflict(msg),
            RepositoryError::DatabaseQueryError(msg)
            | RepositoryError::ForeignKeyViolation(msg) => ApiError::DatabaseError(msg),
            RepositoryError::FieldValueError { field, message } => {
                ApiError::DatabaseError(format!("字段 {} 数据损坏: {}", field, message))
            }
        }
    }
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;
