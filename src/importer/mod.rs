// ==========================================
// 学校管理门户 - 导入层
// ==========================================
// 职责: 教师/学生名册表格导入与归一化
// 支持: Excel (.xlsx/.xls/.ods), CSV
// ==========================================

// 模块声明
pub mod data_cleaner;
pub mod error;
pub mod field_mapper;
pub mod file_parser;
pub mod header_locator;
pub mod roster_importer_impl;
pub mod roster_importer_trait;
pub mod row_extractor;
pub mod template;

// 重导出核心类型
pub use data_cleaner::{normalize_status, normalize_token, split_full_name, DataCleaner as DataCleanerImpl};
pub use error::{ImportError, ImportResult};
pub use field_mapper::{create_header_alias, FieldMapper as FieldMapperImpl};
pub use file_parser::{CsvParser, ExcelParser, UniversalFileParser};
pub use header_locator::locate_header_row;
pub use roster_importer_impl::RosterImporterImpl;
pub use row_extractor::extract_rows;
pub use template::RosterTemplateWriter;

// 重导出 Trait 接口
pub use roster_importer_trait::{DataCleaner, FieldMapper, FileParser, RosterImporter};
