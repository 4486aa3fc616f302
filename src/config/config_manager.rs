// ==========================================
// 学校管理门户 - 配置管理器
// ==========================================
// 职责: 配置加载、查询、覆写管理
// 存储: config_kv 表 (key-value + scope)
// ==========================================

use crate::config::import_config_trait::ImportConfigReader;
use crate::config::roster_import_config::{
    FieldCandidates, DEFAULT_DATA_SIGNAL_TOKENS, DEFAULT_FOOTER_MARKERS,
    DEFAULT_FOOTER_NOTE_PREFIXES, DEFAULT_HEADER_MATCH_THRESHOLD, DEFAULT_HEADER_VOCABULARY,
    DEFAULT_ROW_NUMBER_TOKENS,
};
use crate::db::open_sqlite_connection;
use crate::domain::types::RosterKind;
use crate::importer::error::ImportError;
use async_trait::async_trait;
use rusqlite::{params, Connection};
use serde_json::json;
use std::collections::HashMap;
use std::error::Error;
use std::sync::{Arc, Mutex};

// ==========================================
// ConfigManager - 配置管理器
// ==========================================
pub struct ConfigManager {
    conn: Arc<Mutex<Connection>>,
}

impl ConfigManager {
    /// 创建新的 ConfigManager 实例
    ///
    /// # 参数
    /// - db_path: 数据库文件路径
    pub fn new(db_path: &str) -> Result<Self, Box<dyn Error>> {
        let conn = open_sqlite_connection(db_path)?;
        crate::db::ensure_schema(&conn)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 从已有连接创建 ConfigManager
    ///
    /// 说明：为保证连接行为一致，会对传入连接再次应用统一 PRAGMA（幂等）。
    pub fn from_connection(conn: Arc<Mutex<Connection>>) -> Result<Self, Box<dyn Error>> {
        {
            let conn_guard = conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
            crate::db::configure_sqlite_connection(&conn_guard)?;
            crate::db::ensure_schema(&conn_guard)?;
        }

        Ok(Self { conn })
    }

    /// 从 config_kv 表读取配置值（scope_id='global'）
    ///
    /// # 返回
    /// - Some(String): 配置值
    /// - None: 配置不存在
    fn get_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let result = conn.query_row(
            "SELECT value FROM config_kv WHERE scope_id = 'global' AND key = ?1",
            params![key],
            |row| row.get::<_, String>(0),
        );

        match result {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(Box::new(ImportError::ConfigReadError {
                key: key.to_string(),
                message: e.to_string(),
            })),
        }
    }

    /// 读取 global scope 的配置值（公开方法，供其他模块复用）
    pub fn get_global_config_value(&self, key: &str) -> Result<Option<String>, Box<dyn Error>> {
        self.get_config_value(key)
    }

    /// 写入 global scope 配置值（存在则覆盖）
    pub fn set_global_config_value(&self, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;
        conn.execute(
            r#"
            INSERT INTO config_kv (scope_id, key, value, updated_at)
            VALUES ('global', ?1, ?2, datetime('now'))
            ON CONFLICT(scope_id, key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
            params![key, value],
        )?;
        Ok(())
    }

    /// 读取逗号分隔的列表配置，未配置或为空时使用默认值
    fn get_list_or_default(&self, key: &str, default: &[&str]) -> Result<Vec<String>, Box<dyn Error>> {
        let items: Vec<String> = match self.get_config_value(key)? {
            Some(value) => value
                .split(',')
                .map(|s| s.trim().to_lowercase())
                .filter(|s| !s.is_empty())
                .collect(),
            None => Vec::new(),
        };

        if items.is_empty() {
            Ok(default.iter().map(|s| s.to_string()).collect())
        } else {
            Ok(items)
        }
    }

    /// 获取所有配置的快照（JSON格式）
    ///
    /// # 用途
    /// - 导入批次记录所用配置，便于事后追溯
    pub fn get_config_snapshot(&self) -> Result<String, Box<dyn Error>> {
        let conn = self.conn.lock().map_err(|e| format!("锁获取失败: {}", e))?;

        let mut stmt =
            conn.prepare("SELECT key, value FROM config_kv WHERE scope_id = 'global' ORDER BY key")?;

        let mut config_map: HashMap<String, String> = HashMap::new();
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        for row in rows {
            let (key, value) = row?;
            config_map.insert(key, value);
        }

        let json_value = json!(config_map);
        Ok(serde_json::to_string(&json_value)?)
    }
}

#[async_trait]
impl ImportConfigReader for ConfigManager {
    // ===== 表头检测 =====

    async fn get_header_vocabulary(&self) -> Result<Vec<String>, Box<dyn Error>> {
        self.get_list_or_default(config_keys::HEADER_VOCABULARY, &DEFAULT_HEADER_VOCABULARY)
    }

    async fn get_header_match_threshold(&self) -> Result<usize, Box<dyn Error>> {
        let value = self.get_config_value(config_keys::HEADER_MATCH_THRESHOLD)?;
        Ok(value
            .and_then(|v| v.trim().parse::<usize>().ok())
            .filter(|&n| n > 0)
            .unwrap_or(DEFAULT_HEADER_MATCH_THRESHOLD))
    }

    async fn get_data_signal_tokens(&self) -> Result<Vec<String>, Box<dyn Error>> {
        self.get_list_or_default(config_keys::DATA_SIGNAL_TOKENS, &DEFAULT_DATA_SIGNAL_TOKENS)
    }

    // ===== 页脚识别 =====

    async fn get_footer_note_prefixes(&self) -> Result<Vec<String>, Box<dyn Error>> {
        self.get_list_or_default(config_keys::FOOTER_NOTE_PREFIXES, &DEFAULT_FOOTER_NOTE_PREFIXES)
    }

    async fn get_footer_markers(&self) -> Result<Vec<String>, Box<dyn Error>> {
        self.get_list_or_default(config_keys::FOOTER_MARKERS, &DEFAULT_FOOTER_MARKERS)
    }

    async fn get_row_number_tokens(&self) -> Result<Vec<String>, Box<dyn Error>> {
        self.get_list_or_default(config_keys::ROW_NUMBER_TOKENS, &DEFAULT_ROW_NUMBER_TOKENS)
    }

    // ===== 候选表头 =====

    async fn get_candidate_overrides(
        &self,
        kind: RosterKind,
    ) -> Result<Option<FieldCandidates>, Box<dyn Error>> {
        let key = config_keys::candidates_key(kind);
        let raw = match self.get_config_value(&key)? {
            Some(v) if !v.trim().is_empty() => v,
            _ => return Ok(None),
        };

        let overrides: FieldCandidates =
            serde_json::from_str(&raw).map_err(|e| ImportError::ConfigValueError {
                key: key.clone(),
                value: raw.clone(),
                message: e.to_string(),
            })?;
        Ok(Some(overrides))
    }
}

// ==========================================
// 配置键常量
// ==========================================
pub mod config_keys {
    use crate::domain::types::RosterKind;

    // 表头检测
    pub const HEADER_VOCABULARY: &str = "roster_import/header_vocabulary";
    pub const HEADER_MATCH_THRESHOLD: &str = "roster_import/header_match_threshold";
    pub const DATA_SIGNAL_TOKENS: &str = "roster_import/data_signal_tokens";

    // 页脚识别
    pub const FOOTER_NOTE_PREFIXES: &str = "roster_import/footer_note_prefixes";
    pub const FOOTER_MARKERS: &str = "roster_import/footer_markers";
    pub const ROW_NUMBER_TOKENS: &str = "roster_import/row_number_tokens";

    /// 候选表头覆写（JSON: {"fullName": ["Name", ...]}）
    pub fn candidates_key(kind: RosterKind) -> String {
        format!("roster_import/candidates/{}", kind.as_str())
    }
}
