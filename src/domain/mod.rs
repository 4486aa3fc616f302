// ==========================================
// 学校管理门户 - 领域模型层
// ==========================================
// 职责: 定义领域实体、类型、导入中间结构
// 红线: 不含数据访问逻辑,不含导入算法
// ==========================================

pub mod grid;
pub mod person;
pub mod roster;
pub mod types;

// 重导出核心类型
pub use grid::{CellValue, SheetGrid, Workbook};
pub use person::{NameParts, PersonProfile, RosterEntity, Student, Teacher};
pub use roster::{
    HeaderAlias, HeaderRow, RosterImportBatch, RosterImportResult, RosterRecord, SheetOutcome,
    SheetReport,
};
pub use types::{PersonStatus, RosterField, RosterKind};
