// ==========================================
// 学校管理门户 - API 层
// ==========================================
// 职责: 面向调用方（CLI / 上层应用）的业务接口
// 约束: 错误消息已本地化，可直接展示给用户
// ==========================================

pub mod error;
pub mod roster_import_api;

pub use error::{ApiError, ApiResult};
pub use roster_import_api::{RosterImportApi, RosterImportApiResponse};
