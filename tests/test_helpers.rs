// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的数据库初始化、CSV 夹具生成等功能
// ==========================================

#![allow(dead_code)]

use rusqlite::{params, Connection};
use rust_xlsxwriter::{ExcelDateTime, Format, Workbook};
use school_roster::db::{ensure_schema, open_sqlite_connection};
use std::error::Error;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::{NamedTempFile, TempDir};

/// 创建临时测试数据库并初始化 schema
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file
        .path()
        .to_str()
        .ok_or("临时文件路径不是 UTF-8")?
        .to_string();

    let conn = open_sqlite_connection(&db_path)?;
    ensure_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 写入 global scope 配置
pub fn insert_config(db_path: &str, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    let conn = Connection::open(db_path)?;
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value, updated_at) VALUES ('global', ?1, ?2, datetime('now'))",
        params![key, value],
    )?;
    Ok(())
}

/// 在目录下生成 CSV 夹具
pub fn write_csv(dir: &Path, name: &str, lines: &[&str]) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    let mut file = std::fs::File::create(&path)?;
    for line in lines {
        writeln!(file, "{}", line)?;
    }
    Ok(path)
}

/// 典型的教师名册: 标题块 + 表头 + 3 行数据 + 备注 + 签名
pub const TEACHER_ROSTER_CSV: &[&str] = &[
    "Kingdom of Cambodia,,,,,,,",
    "Sunrise High School - Teacher List,,,,,,,",
    "No,Name,Gender,Date of birth,Place of Birth,Phone,Email,Address",
    "1,\"Doe, John\",M,1980-02-01,Kampot,012345678,john@sunrise.edu,Phnom Penh",
    "2,Sok Dara,F,1985-07-09,Takeo,,dara@sunrise.edu,",
    "3,Madonna,F,,,099887766,,",
    "Note: list verified by the office,,,,,,,",
    ",,,,,Deputy Director,,",
    "4,Ghost Row,M,,,011,ghost@sunrise.edu,",
];

/// 生成两个工作表的教师名册 xlsx
///
/// - Teachers: 标题在 B2（已用区域原点为 (1, 1)），表头在第 3 行，出生日期为日期单元格
/// - Support Staff: 表头在 A1
pub fn write_teacher_xlsx(dir: &Path, name: &str) -> Result<PathBuf, Box<dyn Error>> {
    let path = dir.join(name);
    let mut workbook = Workbook::new();
    let date_format = Format::new().set_num_format("yyyy-mm-dd");

    let teachers = workbook.add_worksheet().set_name("Teachers")?;
    teachers.write_string(1, 1, "Sunrise High School - Teacher List")?;
    for (col, label) in ["No", "Name", "Gender", "Date of birth", "Phone", "Email"]
        .iter()
        .enumerate()
    {
        teachers.write_string(2, 1 + col as u16, *label)?;
    }
    teachers.write_number(3, 1, 1.0)?;
    teachers.write_string(3, 2, "Doe, John")?;
    teachers.write_string(3, 3, "M")?;
    teachers.write_datetime_with_format(3, 4, &ExcelDateTime::from_ymd(1980, 2, 1)?, &date_format)?;
    teachers.write_string(3, 5, "012345678")?;
    teachers.write_string(3, 6, "john@sunrise.edu")?;
    teachers.write_number(4, 1, 2.0)?;
    teachers.write_string(4, 2, "Sok Dara")?;
    teachers.write_string(4, 3, "F")?;
    teachers.write_datetime_with_format(4, 4, &ExcelDateTime::from_ymd(1985, 7, 9)?, &date_format)?;
    teachers.write_string(4, 6, "dara@sunrise.edu")?;

    let staff = workbook.add_worksheet().set_name("Support Staff")?;
    for (col, label) in ["Name", "Gender", "Email", "Phone"].iter().enumerate() {
        staff.write_string(0, col as u16, *label)?;
    }
    staff.write_string(1, 0, "Keo Rithy")?;
    staff.write_string(1, 1, "M")?;
    staff.write_string(1, 2, "rithy@sunrise.edu")?;
    staff.write_string(1, 3, "015")?;

    workbook.save(&path)?;
    Ok(path)
}

/// 创建临时目录
pub fn temp_dir() -> TempDir {
    TempDir::new().expect("创建临时目录失败")
}
