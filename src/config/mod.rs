// ==========================================
// 学校管理门户 - 配置层
// ==========================================
// 职责: 名册导入配置（默认值 + config_kv 覆写）
// 存储: config_kv 表
// ==========================================

pub mod config_manager;
pub mod import_config_trait;
pub mod roster_import_config;

// 重导出核心配置管理器
pub use config_manager::{config_keys, ConfigManager};
pub use import_config_trait::ImportConfigReader;
pub use roster_import_config::{FieldCandidates, RosterImportConfig};
