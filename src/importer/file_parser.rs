// ==========================================
// 学校管理门户 - 文件解析器实现
// ==========================================
// 阶段 0: 文件 → 工作簿（单元格网格）
// 支持: Excel (.xlsx/.xlsm/.xls/.ods) / CSV (.csv)
// 说明: 不假设表头位置，保留所有工作表及已用区域的原点
// ==========================================

use crate::domain::grid::{CellValue, SheetGrid, Workbook};
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::roster_importer_trait::FileParser;
use calamine::{open_workbook_auto, Data, ExcelDateTime, Reader};
use chrono::{NaiveDate, NaiveDateTime};
use csv::ReaderBuilder;
use std::path::Path;
use tracing::debug;

const EXCEL_EXTENSIONS: [&str; 4] = ["xlsx", "xlsm", "xls", "ods"];

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase()
}

fn ensure_exists(path: &Path) -> ImportResult<()> {
    if !path.exists() {
        return Err(ImportError::FileNotFound(path.display().to_string()));
    }
    Ok(())
}

// ==========================================
// CSV Parser 实现
// ==========================================
// 整个文件视为一个工作表，表名取文件名（不含扩展名）
pub struct CsvParser;

impl FileParser for CsvParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        let path = file_path;

        // 检查文件存在
        ensure_exists(path)?;

        // 检查扩展名
        let ext = extension_of(path);
        if ext != "csv" {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        let mut reader = ReaderBuilder::new()
            .has_headers(false)
            .flexible(true) // 允许行长度不一致
            .from_path(path)?;

        let mut rows = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(CellValue::from_text).collect::<Vec<_>>());
        }

        let sheet_name = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| "Sheet1".to_string());

        debug!(sheet = %sheet_name, rows = rows.len(), "CSV 解析完成");
        Ok(Workbook::new(vec![SheetGrid::new(sheet_name, rows)]))
    }
}

// ==========================================
// Excel Parser 实现
// ==========================================
pub struct ExcelParser;

impl FileParser for ExcelParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        let path = file_path;

        // 检查文件存在
        ensure_exists(path)?;

        // 检查扩展名
        let ext = extension_of(path);
        if !EXCEL_EXTENSIONS.contains(&ext.as_str()) {
            return Err(ImportError::UnsupportedFormat(ext));
        }

        // 打开工作簿（按扩展名自动识别格式）
        let mut workbook = open_workbook_auto(path)?;

        let mut sheets = Vec::new();
        for sheet_name in workbook.sheet_names() {
            let range = workbook.worksheet_range(&sheet_name)?;

            // 已用区域原点（空表为 None）
            let origin = range
                .start()
                .map(|(row, col)| (row as usize, col as usize))
                .unwrap_or((0, 0));

            let rows: Vec<Vec<CellValue>> = range
                .rows()
                .map(|row| row.iter().map(convert_cell).collect())
                .collect();

            debug!(sheet = %sheet_name, origin = ?origin, rows = rows.len(), "工作表读取完成");
            sheets.push(SheetGrid::with_origin(sheet_name, origin, rows));
        }

        Ok(Workbook::new(sheets))
    }
}

/// calamine 单元格 → CellValue
fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::from_text(s),
        Data::Int(i) => CellValue::Int(*i),
        Data::Float(f) => CellValue::Float(*f),
        Data::Bool(b) => CellValue::Bool(*b),
        Data::DateTime(dt) => convert_excel_datetime(dt),
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::from_text(s)),
        Data::DurationIso(s) => CellValue::from_text(s),
        Data::Error(e) => CellValue::Text(format!("#{:?}", e)),
    }
}

/// 日期单元格 → NaiveDateTime（日期系统 1900/1904 由工作簿决定）
///
/// 时长格式（如 [h]:mm）或超出范围的序列号保留原始数值
fn convert_excel_datetime(dt: &ExcelDateTime) -> CellValue {
    if dt.is_duration() {
        return CellValue::Float(dt.as_f64());
    }
    dt.as_datetime()
        .map(CellValue::DateTime)
        .unwrap_or(CellValue::Float(dt.as_f64()))
}

fn parse_iso_datetime(value: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}

// ==========================================
// 通用文件解析器（根据扩展名自动选择）
// ==========================================
pub struct UniversalFileParser;

impl UniversalFileParser {
    pub fn parse<P: AsRef<Path>>(&self, file_path: P) -> ImportResult<Workbook> {
        let path = file_path.as_ref();
        ensure_exists(path)?;

        let ext = extension_of(path);
        match ext.as_str() {
            "csv" => CsvParser.parse_workbook(path),
            e if EXCEL_EXTENSIONS.contains(&e) => ExcelParser.parse_workbook(path),
            _ => Err(ImportError::UnsupportedFormat(ext)),
        }
    }
}

impl FileParser for UniversalFileParser {
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook> {
        self.parse(file_path)
    }
}
