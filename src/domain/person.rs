// ==========================================
// 学校管理门户 - 人员领域模型
// ==========================================
// 用途: 名册导入的最终产物（教师 / 学生）
// 约束:
// - id 每次导入重新生成
// - first_name 在输入姓名非空时必然非空，last_name 可为空
// - status 缺省为 active
// ==========================================

use crate::domain::types::{PersonStatus, RosterKind};
use serde::{Deserialize, Serialize};

// ==========================================
// NameParts - 姓名拆分结果
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct NameParts {
    pub first_name: String,
    pub last_name: String,
}

impl NameParts {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
        Self {
            first_name: first_name.into(),
            last_name: last_name.into(),
        }
    }
}

// ==========================================
// PersonProfile - 教师/学生共有字段
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonProfile {
    pub id: String,
    pub first_name: String,
    pub last_name: String,
    pub gender: Option<String>,
    pub date_of_birth: Option<String>,
    pub place_of_birth: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub current_address: Option<String>,
    pub status: PersonStatus,
    pub avatar: Option<String>,
}

impl PersonProfile {
    /// 显示用全名（名在前，姓在后）
    pub fn display_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Teacher {
    #[serde(flatten)]
    pub profile: PersonProfile,
    pub department: Option<String>,
    pub subjects: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Student {
    #[serde(flatten)]
    pub profile: PersonProfile,
    pub class_name: Option<String>,
    pub subjects: Vec<String>,
}

// ==========================================
// RosterEntity - 导入结果单元
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum RosterEntity {
    Teacher(Teacher),
    Student(Student),
}

impl RosterEntity {
    pub fn kind(&self) -> RosterKind {
        match self {
            RosterEntity::Teacher(_) => RosterKind::Teacher,
            RosterEntity::Student(_) => RosterKind::Student,
        }
    }

    pub fn profile(&self) -> &PersonProfile {
        match self {
            RosterEntity::Teacher(t) => &t.profile,
            RosterEntity::Student(s) => &s.profile,
        }
    }

    pub fn id(&self) -> &str {
        &self.profile().id
    }

    pub fn subjects(&self) -> &[String] {
        match self {
            RosterEntity::Teacher(t) => &t.subjects,
            RosterEntity::Student(s) => &s.subjects,
        }
    }

    /// 教师的部门 / 学生的班级
    pub fn group(&self) -> Option<&str> {
        match self {
            RosterEntity::Teacher(t) => t.department.as_deref(),
            RosterEntity::Student(s) => s.class_name.as_deref(),
        }
    }

    /// 清空 id 后的副本（比较两次导入结果时使用）
    pub fn without_id(&self) -> RosterEntity {
        let mut copy = self.clone();
        match &mut copy {
            RosterEntity::Teacher(t) => t.profile.id.clear(),
            RosterEntity::Student(s) => s.profile.id.clear(),
        }
        copy
    }
}
