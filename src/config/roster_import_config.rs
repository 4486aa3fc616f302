// ==========================================
// 学校管理门户 - 名册导入配置
// ==========================================
// 职责: 表头检测词汇、阈值、页脚识别短语、候选表头标签
// 说明: 页脚短语与语言相关，全部作为配置项，可由 config_kv 覆写
// ==========================================

use crate::domain::types::{RosterField, RosterKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 表头行最少命中词汇数
pub const DEFAULT_HEADER_MATCH_THRESHOLD: usize = 3;

pub const DEFAULT_HEADER_VOCABULARY: [&str; 7] = [
    "name",
    "gender",
    "dateofbirth",
    "placeofbirth",
    "phone",
    "email",
    "address",
];

/// 判定"像数据行"的字段（字段键归一化后匹配，经表头别名定位到列）
pub const DEFAULT_DATA_SIGNAL_TOKENS: [&str; 4] = ["fullname", "firstname", "email", "phone"];

pub const DEFAULT_FOOTER_NOTE_PREFIXES: [&str; 1] = ["note"];

pub const DEFAULT_FOOTER_MARKERS: [&str; 2] = ["deputy director", "date:"];

/// 序号列表头（导出记录时移除）
pub const DEFAULT_ROW_NUMBER_TOKENS: [&str; 2] = ["no", "n"];

// ==========================================
// FieldCandidates - 字段 → 有序候选表头标签
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct FieldCandidates(pub BTreeMap<RosterField, Vec<String>>);

impl FieldCandidates {
    /// 默认候选标签（教师与学生仅 fullName / department / class 不同）
    pub fn defaults_for(kind: RosterKind) -> Self {
        let mut map = BTreeMap::new();
        let full_name = match kind {
            RosterKind::Teacher => vec!["Name", "Full Name", "Teacher Name"],
            RosterKind::Student => vec!["Name", "Full Name", "Student Name"],
        };

        let table: Vec<(RosterField, Vec<&str>)> = vec![
            (RosterField::FullName, full_name),
            (RosterField::FirstName, vec!["First Name", "Given Name"]),
            (RosterField::LastName, vec!["Last Name", "Surname", "Family Name"]),
            (RosterField::Gender, vec!["Gender", "Sex"]),
            (RosterField::DateOfBirth, vec!["Date of Birth", "DOB", "Birth Date"]),
            (RosterField::PlaceOfBirth, vec!["Place of Birth", "Birthplace"]),
            (RosterField::Phone, vec!["Phone", "Phone Number", "Mobile", "Tel"]),
            (RosterField::Email, vec!["Email", "E-mail", "Email Address"]),
            (RosterField::CurrentAddress, vec!["Address", "Current Address"]),
            (RosterField::Department, vec!["Department"]),
            (RosterField::Class, vec!["Class", "Classroom"]),
            (RosterField::Subjects, vec!["Subjects", "Subject"]),
            (RosterField::Status, vec!["Status"]),
            (RosterField::Avatar, vec!["Avatar", "Photo"]),
        ];

        for (field, labels) in table {
            if field.applies_to(kind) {
                map.insert(field, labels.iter().map(|s| s.to_string()).collect());
            }
        }
        Self(map)
    }

    pub fn labels(&self, field: RosterField) -> &[String] {
        self.0.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn fields(&self) -> impl Iterator<Item = RosterField> + '_ {
        self.0.keys().copied()
    }

    /// 用覆写值替换对应字段（未出现的字段保留原值）
    pub fn merge(&mut self, overrides: FieldCandidates) {
        for (field, labels) in overrides.0 {
            if !labels.is_empty() {
                self.0.insert(field, labels);
            }
        }
    }
}

// ==========================================
// RosterImportConfig - 导入配置快照
// ==========================================
// 一次导入期间不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterImportConfig {
    pub header_vocabulary: Vec<String>,
    pub header_match_threshold: usize,
    pub data_signal_tokens: Vec<String>,
    pub footer_note_prefixes: Vec<String>,
    pub footer_markers: Vec<String>,
    pub row_number_tokens: Vec<String>,
    pub teacher_candidates: FieldCandidates,
    pub student_candidates: FieldCandidates,
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for RosterImportConfig {
    fn default() -> Self {
        Self {
            header_vocabulary: owned(&DEFAULT_HEADER_VOCABULARY),
            header_match_threshold: DEFAULT_HEADER_MATCH_THRESHOLD,
            data_signal_tokens: owned(&DEFAULT_DATA_SIGNAL_TOKENS),
            footer_note_prefixes: owned(&DEFAULT_FOOTER_NOTE_PREFIXES),
            footer_markers: owned(&DEFAULT_FOOTER_MARKERS),
            row_number_tokens: owned(&DEFAULT_ROW_NUMBER_TOKENS),
            teacher_candidates: FieldCandidates::defaults_for(RosterKind::Teacher),
            student_candidates: FieldCandidates::defaults_for(RosterKind::Student),
        }
    }
}

impl RosterImportConfig {
    pub fn candidates(&self, kind: RosterKind) -> &FieldCandidates {
        match kind {
            RosterKind::Teacher => &self.teacher_candidates,
            RosterKind::Student => &self.student_candidates,
        }
    }

    pub fn candidates_mut(&mut self, kind: RosterKind) -> &mut FieldCandidates {
        match kind {
            RosterKind::Teacher => &mut self.teacher_candidates,
            RosterKind::Student => &mut self.student_candidates,
        }
    }

    /// 模板表头: 序号列 + 每个字段的首选标签
    ///
    /// 拆分姓名列（firstName / lastName）不进模板，模板只用全名列
    pub fn template_headers(&self, kind: RosterKind) -> Vec<String> {
        let mut headers = vec!["No".to_string()];
        for field in RosterField::ALL {
            if matches!(field, RosterField::FirstName | RosterField::LastName) {
                continue;
            }
            if !field.applies_to(kind) {
                continue;
            }
            if let Some(label) = self.candidates(kind).labels(field).first() {
                headers.push(label.clone());
            }
        }
        headers
    }
}
