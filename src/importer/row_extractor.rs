// ==========================================
// 学校管理门户 - 数据行提取
// ==========================================
// 职责: 表头下方逐行生成 RosterRecord，遇到页脚/签名区即停止
// 停止条件（满足任一，停止而非跳过）:
// 1. 整行为空
// 2. 像备注/签名行（首格以备注前缀开头，或整行包含页脚标记）
// 3. 数据信号列（别名映射到姓名/邮箱/电话的列）均为空，且非空单元格 <= 2
// 收尾: 首列为序号列时，从所有记录中移除该列
// ==========================================

use crate::config::roster_import_config::RosterImportConfig;
use crate::domain::grid::SheetGrid;
use crate::domain::roster::{HeaderAlias, HeaderRow, RosterRecord};
use crate::domain::types::RosterField;
use crate::importer::data_cleaner::normalize_token;
use std::collections::HashMap;

/// 提取数据行（纯函数，不会失败）
///
/// alias 用于定位数据信号列: 与表头别名映射一致，
/// 例如 "Student Name" / "Mobile" 同样算作姓名 / 电话列
pub fn extract_rows(
    grid: &SheetGrid,
    header: &HeaderRow,
    alias: &HeaderAlias,
    config: &RosterImportConfig,
) -> Vec<RosterRecord> {
    let keys: Vec<String> = (0..grid.width())
        .map(|col| match header.cells.get(col) {
            Some(label) if !label.trim().is_empty() => label.clone(),
            _ => format!("col_{}", grid.absolute_col(col)),
        })
        .collect();
    let signal_cols = data_signal_columns(&header.cells, alias, &config.data_signal_tokens);

    let mut records = Vec::new();
    for row in (header.index + 1)..grid.height() {
        let non_empty = (0..grid.width())
            .filter(|&col| !grid.cell(row, col).is_blank())
            .count();
        let looks_like_data = signal_cols
            .iter()
            .any(|&col| !grid.cell(row, col).is_blank());

        if non_empty == 0
            || looks_like_note(grid, row, config)
            || (!looks_like_data && non_empty <= 2)
        {
            break;
        }

        let fields: HashMap<String, _> = keys
            .iter()
            .enumerate()
            .map(|(col, key)| (key.clone(), grid.cell(row, col).clone()))
            .collect();

        records.push(RosterRecord {
            sheet_name: grid.name.clone(),
            row_number: grid.sheet_row_number(row),
            fields,
        });
    }

    if let Some(first_header) = header.cells.first() {
        let token = normalize_token(first_header);
        if !token.is_empty() && config.row_number_tokens.iter().any(|t| normalize_token(t) == token) {
            for record in &mut records {
                record.fields.remove(first_header);
            }
        }
    }

    records
}

/// 数据信号列: 信号字段（按字段键归一化匹配）经别名映射后所在的列号
pub(crate) fn data_signal_columns(
    header_cells: &[String],
    alias: &HeaderAlias,
    signal_tokens: &[String],
) -> Vec<usize> {
    let signals: Vec<String> = signal_tokens.iter().map(|s| normalize_token(s)).collect();

    let mut columns = Vec::new();
    for field in RosterField::ALL {
        if !signals.contains(&normalize_token(field.key())) || !alias.is_present(field) {
            continue;
        }
        let label = alias.get(field);
        for (col, cell) in header_cells.iter().enumerate() {
            if cell.trim() == label && !columns.contains(&col) {
                columns.push(col);
            }
        }
    }
    columns.sort_unstable();
    columns
}

fn looks_like_note(grid: &SheetGrid, row: usize, config: &RosterImportConfig) -> bool {
    let first = grid.cell(row, 0).as_text().trim().to_lowercase();
    if config
        .footer_note_prefixes
        .iter()
        .any(|prefix| !prefix.is_empty() && first.starts_with(&prefix.to_lowercase()))
    {
        return true;
    }

    let joined = (0..grid.width())
        .map(|col| grid.cell(row, col).as_text())
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    config
        .footer_markers
        .iter()
        .any(|marker| !marker.is_empty() && joined.contains(&marker.to_lowercase()))
}
