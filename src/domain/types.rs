// ==========================================
// 学校管理门户 - 领域类型定义
// ==========================================
// 职责: 名册种类、人员状态、规范字段键
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ==========================================
// 名册种类 (Roster Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RosterKind {
    Teacher, // 教师名册
    Student, // 学生名册
}

impl RosterKind {
    /// 数据库与 CLI 使用的小写标识
    pub fn as_str(&self) -> &'static str {
        match self {
            RosterKind::Teacher => "teacher",
            RosterKind::Student => "student",
        }
    }
}

impl fmt::Display for RosterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RosterKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "teacher" | "teachers" => Ok(RosterKind::Teacher),
            "student" | "students" => Ok(RosterKind::Student),
            other => Err(format!("未知名册种类: {}", other)),
        }
    }
}

// ==========================================
// 人员状态 (Person Status)
// ==========================================
// 未识别的自由文本一律归为 Active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonStatus {
    #[default]
    Active,    // 在职/在读
    Inactive,  // 停用
    Graduated, // 已毕业
}

impl PersonStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PersonStatus::Active => "active",
            PersonStatus::Inactive => "inactive",
            PersonStatus::Graduated => "graduated",
        }
    }
}

impl fmt::Display for PersonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ==========================================
// 规范字段键 (Roster Field)
// ==========================================
// 表头别名映射的目标键，序列化为 camelCase（与前端字段名一致）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum RosterField {
    FullName,
    FirstName,
    LastName,
    Email,
    Phone,
    Gender,
    PlaceOfBirth,
    DateOfBirth,
    CurrentAddress,
    Department,
    Class,
    Subjects,
    Status,
    Avatar,
}

impl RosterField {
    /// 全部规范字段（模板列顺序）
    pub const ALL: [RosterField; 14] = [
        RosterField::FullName,
        RosterField::FirstName,
        RosterField::LastName,
        RosterField::Gender,
        RosterField::DateOfBirth,
        RosterField::PlaceOfBirth,
        RosterField::Phone,
        RosterField::Email,
        RosterField::CurrentAddress,
        RosterField::Department,
        RosterField::Class,
        RosterField::Subjects,
        RosterField::Status,
        RosterField::Avatar,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            RosterField::FullName => "fullName",
            RosterField::FirstName => "firstName",
            RosterField::LastName => "lastName",
            RosterField::Email => "email",
            RosterField::Phone => "phone",
            RosterField::Gender => "gender",
            RosterField::PlaceOfBirth => "placeOfBirth",
            RosterField::DateOfBirth => "dateOfBirth",
            RosterField::CurrentAddress => "currentAddress",
            RosterField::Department => "department",
            RosterField::Class => "class",
            RosterField::Subjects => "subjects",
            RosterField::Status => "status",
            RosterField::Avatar => "avatar",
        }
    }

    /// 该字段是否属于指定名册种类
    ///
    /// department 仅教师，class 仅学生，其余通用
    pub fn applies_to(&self, kind: RosterKind) -> bool {
        match self {
            RosterField::Department => kind == RosterKind::Teacher,
            RosterField::Class => kind == RosterKind::Student,
            _ => true,
        }
    }
}

impl fmt::Display for RosterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key())
    }
}
