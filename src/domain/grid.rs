// ==========================================
// 学校管理门户 - 单元格网格模型
// ==========================================
// 用途: 文件解析层的输出，导入器的只读输入
// 生命周期: 仅在一次导入调用内
// ==========================================

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// CellValue - 原始单元格值
// ==========================================
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    DateTime(NaiveDateTime),
}

static EMPTY_CELL: CellValue = CellValue::Empty;

impl CellValue {
    /// 渲染为文本（不做 trim）
    ///
    /// - 整数值的浮点数不带小数部分（电话号码常被读成 Float）
    /// - 日期时间: 时间部分为零时只输出 YYYY-MM-DD
    pub fn as_text(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Text(s) => s.clone(),
            CellValue::Int(i) => i.to_string(),
            CellValue::Float(f) => {
                if f.fract() == 0.0 && f.is_finite() && f.abs() < 1e15 {
                    format!("{}", *f as i64)
                } else {
                    f.to_string()
                }
            }
            CellValue::Bool(b) => b.to_string(),
            CellValue::DateTime(dt) => {
                if dt.time() == chrono::NaiveTime::MIN {
                    dt.format("%Y-%m-%d").to_string()
                } else {
                    dt.format("%Y-%m-%d %H:%M:%S").to_string()
                }
            }
        }
    }

    /// 去除空白后是否为空
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }

    /// 从文本构造（空白文本视为 Empty）
    pub fn from_text(value: &str) -> Self {
        if value.trim().is_empty() {
            CellValue::Empty
        } else {
            CellValue::Text(value.to_string())
        }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_text())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::from_text(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Float(value)
    }
}

// ==========================================
// SheetGrid - 单个工作表的已用区域
// ==========================================
// origin: 已用区域左上角在工作表中的绝对位置（0 基）
// rows:   按行存储，行长度不足的位置读为 Empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SheetGrid {
    pub name: String,
    pub origin: (usize, usize),
    rows: Vec<Vec<CellValue>>,
    width: usize,
}

impl SheetGrid {
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self::with_origin(name, (0, 0), rows)
    }

    pub fn with_origin(
        name: impl Into<String>,
        origin: (usize, usize),
        rows: Vec<Vec<CellValue>>,
    ) -> Self {
        let width = rows.iter().map(|r| r.len()).max().unwrap_or(0);
        Self {
            name: name.into(),
            origin,
            rows,
            width,
        }
    }

    /// 从文本二维数组构造（测试与 CSV 使用）
    pub fn from_text_rows<S: AsRef<str>>(name: impl Into<String>, rows: &[Vec<S>]) -> Self {
        let rows = rows
            .iter()
            .map(|row| row.iter().map(|c| CellValue::from_text(c.as_ref())).collect())
            .collect();
        Self::new(name, rows)
    }

    pub fn height(&self) -> usize {
        self.rows.len()
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty() || self.width == 0
    }

    /// 读取单元格（相对坐标），越界返回 Empty
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.rows
            .get(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// 相对行号 → 工作表行号（1 基，与 Excel 行号一致）
    pub fn sheet_row_number(&self, row: usize) -> usize {
        self.origin.0 + row + 1
    }

    /// 相对列号 → 绝对列号（0 基）
    pub fn absolute_col(&self, col: usize) -> usize {
        self.origin.1 + col
    }
}

// ==========================================
// Workbook - 工作簿（工作表按原始顺序）
// ==========================================
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Workbook {
    pub sheets: Vec<SheetGrid>,
}

impl Workbook {
    pub fn new(sheets: Vec<SheetGrid>) -> Self {
        Self { sheets }
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.name.as_str()).collect()
    }
}
