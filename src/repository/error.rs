// ==========================================
// 学校管理门户 - 仓储层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 说明: 约束冲突按 SQLite 扩展错误码区分（重复ID / 批次不存在）
// ==========================================

use rusqlite::ffi;
use thiserror::Error;

/// 仓储层错误类型
#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error("记录未找到: {entity} with id={id}")]
    NotFound { entity: String, id: String },

    #[error("数据库锁获取失败: {0}")]
    LockError(String),

    #[error("数据库查询失败: {0}")]
    DatabaseQueryError(String),

    /// 人员ID或批次ID重复
    #[error("唯一约束违反: {0}")]
    UniqueConstraintViolation(String),

    /// 人员引用了不存在的批次
    #[error("外键约束违反: {0}")]
    ForeignKeyViolation(String),

    /// 落库数据无法还原（状态/种类/科目 JSON/时间戳）
    #[error("字段值错误 (field={field}): {message}")]
    FieldValueError { field: String, message: String },
}

impl From<rusqlite::Error> for RepositoryError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(code, _) => match code.extended_code {
                ffi::SQLITE_CONSTRAINT_PRIMARYKEY | ffi::SQLITE_CONSTRAINT_UNIQUE => {
                    RepositoryError::UniqueConstraintViolation(err.to_string())
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    RepositoryError::ForeignKeyViolation(err.to_string())
                }
                _ => RepositoryError::DatabaseQueryError(err.to_string()),
            },
            rusqlite::Error::QueryReturnedNoRows => RepositoryError::NotFound {
                entity: "roster".to_string(),
                id: "unknown".to_string(),
            },
            _ => RepositoryError::DatabaseQueryError(err.to_string()),
        }
    }
}

// 科目列表以 JSON 存储
impl From<serde_json::Error> for RepositoryError {
    fn from(err: serde_json::Error) -> Self {
        RepositoryError::FieldValueError {
            field: "subjects_json".to_string(),
            message: err.to_string(),
        }
    }
}

/// Result 类型别名
pub type RepositoryResult<T> = Result<T, RepositoryError>;
