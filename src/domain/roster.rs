// ==========================================
// 学校管理门户 - 名册导入领域模型
// ==========================================
// 职责: 导入管道中间产物与导入结果
// - HeaderRow / HeaderAlias / RosterRecord: 仅在导入流程内
// - RosterImportResult / RosterImportBatch: 返回给调用方并落库
// ==========================================

use crate::domain::grid::CellValue;
use crate::domain::person::RosterEntity;
use crate::domain::types::{RosterField, RosterKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

// ==========================================
// HeaderRow - 检测到的表头行
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderRow {
    /// 表头在网格中的行号（相对已用区域，0 基）
    pub index: usize,
    /// 表头单元格文本（已 trim，保持列顺序）
    pub cells: Vec<String>,
}

// ==========================================
// HeaderAlias - 规范字段 → 实际表头文本
// ==========================================
// 未命中的字段返回空串，调用方以空串表示"本表无此列"
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HeaderAlias {
    entries: BTreeMap<RosterField, String>,
}

impl HeaderAlias {
    pub fn new(entries: BTreeMap<RosterField, String>) -> Self {
        Self { entries }
    }

    pub fn get(&self, field: RosterField) -> &str {
        self.entries.get(&field).map(String::as_str).unwrap_or("")
    }

    pub fn is_present(&self, field: RosterField) -> bool {
        !self.get(field).is_empty()
    }

    /// 是否像一张名册（email / fullName / firstName 至少命中一个）
    pub fn looks_like_roster(&self) -> bool {
        self.is_present(RosterField::Email)
            || self.is_present(RosterField::FullName)
            || self.is_present(RosterField::FirstName)
    }
}

// ==========================================
// RosterRecord - 一行数据（表头文本 → 原始值）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterRecord {
    pub sheet_name: String,
    /// 工作表行号（1 基）
    pub row_number: usize,
    pub fields: HashMap<String, CellValue>,
}

impl RosterRecord {
    /// 按表头读取单元格，表头为空或不存在时返回 None
    pub fn value(&self, header: &str) -> Option<&CellValue> {
        if header.is_empty() {
            return None;
        }
        self.fields.get(header)
    }

    /// 按表头读取文本（trim 后），不存在返回空串
    pub fn text(&self, header: &str) -> String {
        self.value(header)
            .map(|v| v.as_text().trim().to_string())
            .unwrap_or_default()
    }
}

// ==========================================
// 工作表处理结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SheetOutcome {
    /// 已导入（header_row 为工作表行号，1 基）
    Imported { header_row: usize, rows: usize },
    /// 没有任何一行达到表头词汇阈值
    NoHeaderRowFound,
    /// 找到表头，但 email / fullName / firstName 均未命中
    NotARosterSheet,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetReport {
    pub sheet_name: String,
    pub outcome: SheetOutcome,
}

impl SheetReport {
    pub fn is_skipped(&self) -> bool {
        !matches!(self.outcome, SheetOutcome::Imported { .. })
    }
}

// ==========================================
// RosterImportResult - 一次导入的结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterImportResult {
    pub batch_id: String,
    pub kind: RosterKind,
    pub file_name: Option<String>,
    pub entities: Vec<RosterEntity>,
    pub sheets: Vec<SheetReport>,
}

impl RosterImportResult {
    pub fn skipped_sheets(&self) -> usize {
        self.sheets.iter().filter(|s| s.is_skipped()).count()
    }
}

// ==========================================
// RosterImportBatch - 导入批次（落库）
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterImportBatch {
    pub batch_id: String,
    pub kind: RosterKind,
    pub file_name: Option<String>,
    pub file_path: Option<String>,
    pub sheet_count: i32,
    pub imported_rows: i32,
    pub skipped_sheets: i32,
    pub imported_at: DateTime<Utc>,
    pub elapsed_ms: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_missing_field_is_empty() {
        let mut entries = BTreeMap::new();
        entries.insert(RosterField::Email, "E-mail".to_string());
        let alias = HeaderAlias::new(entries);

        assert_eq!(alias.get(RosterField::Email), "E-mail");
        assert_eq!(alias.get(RosterField::Phone), "");
        assert!(alias.looks_like_roster());
        assert!(!HeaderAlias::default().looks_like_roster());
    }

    #[test]
    fn test_record_text_trims_and_ignores_empty_header() {
        let mut fields = HashMap::new();
        fields.insert("Name".to_string(), CellValue::Text("  Dara  ".to_string()));
        let record = RosterRecord {
            sheet_name: "S".to_string(),
            row_number: 4,
            fields,
        };
        assert_eq!(record.text("Name"), "Dara");
        assert_eq!(record.text(""), "");
        assert_eq!(record.text("Email"), "");
    }

    #[test]
    fn test_sheet_outcome_serialization() {
        let json = serde_json::to_value(SheetOutcome::NotARosterSheet).unwrap();
        assert_eq!(json["status"], "NOT_A_ROSTER_SHEET");
    }
}
