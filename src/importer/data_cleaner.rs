// ==========================================
// 学校管理门户 - 数据清洗器实现
// ==========================================
// 职责: 表头归一化 / 姓名拆分 / 状态归一 / 科目拆分
// 红线: 全部为纯函数，不会失败
// ==========================================

use crate::domain::person::NameParts;
use crate::domain::types::PersonStatus;
use crate::importer::roster_importer_trait::DataCleaner as DataCleanerTrait;

/// 表头比较键: "Date of Birth" / "date_of_birth" / " DATE-OF-BIRTH " → "dateofbirth"
pub fn normalize_token(value: &str) -> String {
    value
        .to_lowercase()
        .chars()
        .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        .collect()
}

/// 折叠所有空白（含不换行空格）为单个空格，并去除首尾空白
pub fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// 拆分全名
///
/// - 含逗号: 按第一个逗号拆为 "姓, 名"；逗号后为空时整段作为名
/// - 不含逗号: 最后一个词为姓，其余为名
pub fn split_full_name(raw: &str) -> NameParts {
    let name = collapse_whitespace(raw);
    if name.is_empty() {
        return NameParts::default();
    }

    if let Some((before, after)) = name.split_once(',') {
        let last = before.trim();
        let first = after.trim();
        if first.is_empty() {
            return NameParts::new(last, "");
        }
        return NameParts::new(first, last);
    }

    let tokens: Vec<&str> = name.split(' ').collect();
    match tokens.split_last() {
        Some((last, rest)) if !rest.is_empty() => NameParts::new(rest.join(" "), *last),
        _ => NameParts::new(name.as_str(), ""),
    }
}

/// 状态归一: grad* → graduated, inact* → inactive, 其余 → active
pub fn normalize_status(raw: &str) -> PersonStatus {
    let value = raw.trim().to_lowercase();
    if value.starts_with("grad") {
        PersonStatus::Graduated
    } else if value.starts_with("inact") {
        PersonStatus::Inactive
    } else {
        PersonStatus::Active
    }
}

/// 科目拆分（丢弃空片段）
pub fn split_subjects(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| collapse_whitespace(s))
        .filter(|s| !s.is_empty())
        .collect()
}

pub struct DataCleaner;

impl DataCleanerTrait for DataCleaner {
    fn clean_text(&self, value: &str) -> String {
        collapse_whitespace(value)
    }

    fn normalize_null(&self, value: Option<String>) -> Option<String> {
        value.and_then(|v| {
            let cleaned = collapse_whitespace(&v);
            if cleaned.is_empty() {
                None
            } else {
                Some(cleaned)
            }
        })
    }

    fn normalize_token(&self, value: &str) -> String {
        normalize_token(value)
    }

    fn split_full_name(&self, raw: &str) -> NameParts {
        split_full_name(raw)
    }

    fn normalize_status(&self, raw: &str) -> PersonStatus {
        normalize_status(raw)
    }

    fn split_subjects(&self, raw: &str) -> Vec<String> {
        split_subjects(raw)
    }
}
