// ==========================================
// 学校管理门户 - 字段映射器实现
// ==========================================
// 职责: 实际表头 → 规范字段（别名匹配）+ 行记录 → 教师/学生实体
// 匹配规则: 归一化后先精确匹配，再按表头顺序做前缀匹配
// ==========================================

use crate::config::roster_import_config::FieldCandidates;
use crate::domain::person::{NameParts, PersonProfile, RosterEntity, Student, Teacher};
use crate::domain::roster::{HeaderAlias, RosterRecord};
use crate::domain::types::{RosterField, RosterKind};
use crate::importer::data_cleaner::normalize_token;
use crate::importer::roster_importer_trait::{DataCleaner, FieldMapper as FieldMapperTrait};
use std::collections::BTreeMap;
use uuid::Uuid;

// ==========================================
// NormalizedHeaders - 有序的 (归一化键, 原始表头)
// ==========================================
// 重复键: 后出现者覆盖原始表头，位置保持首次出现处
pub(crate) struct NormalizedHeaders {
    entries: Vec<(String, String)>,
}

impl NormalizedHeaders {
    pub(crate) fn new(headers: &[String]) -> Self {
        let mut entries: Vec<(String, String)> = Vec::with_capacity(headers.len());
        for header in headers {
            let token = normalize_token(header);
            if token.is_empty() {
                continue;
            }
            match entries.iter_mut().find(|(key, _)| *key == token) {
                Some(entry) => entry.1 = header.clone(),
                None => entries.push((token, header.clone())),
            }
        }
        Self { entries }
    }

    /// 按已归一化的候选键查找: 精确匹配优先，否则取第一个以其为前缀的键
    pub(crate) fn resolve(&self, candidate_token: &str) -> Option<&str> {
        if candidate_token.is_empty() {
            return None;
        }
        self.entries
            .iter()
            .find(|(key, _)| key == candidate_token)
            .or_else(|| {
                self.entries
                    .iter()
                    .find(|(key, _)| key.starts_with(candidate_token))
            })
            .map(|(_, header)| header.as_str())
    }
}

/// 构建表头别名映射（不会失败，未命中的字段为空串）
pub fn create_header_alias(headers: &[String], candidates: &FieldCandidates) -> HeaderAlias {
    let normalized = NormalizedHeaders::new(headers);
    let mut entries = BTreeMap::new();

    for field in candidates.fields() {
        let hit = candidates
            .labels(field)
            .iter()
            .find_map(|label| normalized.resolve(&normalize_token(label)));
        if let Some(header) = hit {
            entries.insert(field, header.to_string());
        }
    }

    HeaderAlias::new(entries)
}

pub struct FieldMapper;

impl FieldMapperTrait for FieldMapper {
    fn create_header_alias(&self, headers: &[String], candidates: &FieldCandidates) -> HeaderAlias {
        create_header_alias(headers, candidates)
    }

    fn map_to_entity(
        &self,
        record: &RosterRecord,
        alias: &HeaderAlias,
        kind: RosterKind,
        cleaner: &dyn DataCleaner,
    ) -> RosterEntity {
        let names = self.resolve_names(record, alias, cleaner);
        let optional = |field: RosterField| cleaner.normalize_null(Some(record.text(alias.get(field))));

        let profile = PersonProfile {
            id: Uuid::new_v4().to_string(),
            first_name: names.first_name,
            last_name: names.last_name,
            gender: optional(RosterField::Gender),
            date_of_birth: optional(RosterField::DateOfBirth),
            place_of_birth: optional(RosterField::PlaceOfBirth),
            phone: optional(RosterField::Phone),
            email: optional(RosterField::Email),
            current_address: optional(RosterField::CurrentAddress),
            status: cleaner.normalize_status(&record.text(alias.get(RosterField::Status))),
            avatar: optional(RosterField::Avatar),
        };
        let subjects = cleaner.split_subjects(&record.text(alias.get(RosterField::Subjects)));

        match kind {
            RosterKind::Teacher => RosterEntity::Teacher(Teacher {
                profile,
                department: optional(RosterField::Department),
                subjects,
            }),
            RosterKind::Student => RosterEntity::Student(Student {
                profile,
                class_name: optional(RosterField::Class),
                subjects,
            }),
        }
    }
}

impl FieldMapper {
    /// 姓名来源: 全名列（非空）优先；其次名列 + 姓列
    ///
    /// 姓列有值时名列整体作为名，不再拆分；姓列为空时名列按全名规则拆分
    fn resolve_names(
        &self,
        record: &RosterRecord,
        alias: &HeaderAlias,
        cleaner: &dyn DataCleaner,
    ) -> NameParts {
        let full_name = record.text(alias.get(RosterField::FullName));
        if !full_name.is_empty() {
            return cleaner.split_full_name(&full_name);
        }

        let first_name = cleaner.clean_text(&record.text(alias.get(RosterField::FirstName)));
        let last_name = cleaner.clean_text(&record.text(alias.get(RosterField::LastName)));
        if last_name.is_empty() {
            return cleaner.split_full_name(&first_name);
        }
        NameParts::new(first_name, last_name)
    }
}
