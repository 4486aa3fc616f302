// ==========================================
// 学校管理门户 - 表头行定位
// ==========================================
// 场景: 名册表格顶部常有校名/标题/徽标块，真正的表头在其下方
// 规则: 自上而下扫描，首个命中词汇数 >= 阈值的行即为表头
// ==========================================

use crate::config::roster_import_config::RosterImportConfig;
use crate::domain::grid::SheetGrid;
use crate::domain::roster::HeaderRow;
use crate::importer::data_cleaner::normalize_token;
use std::collections::HashSet;

/// 定位表头行，找不到返回 None（调用方跳过该工作表）
pub fn locate_header_row(grid: &SheetGrid, config: &RosterImportConfig) -> Option<HeaderRow> {
    let vocabulary: HashSet<String> = config
        .header_vocabulary
        .iter()
        .map(|word| normalize_token(word))
        .filter(|token| !token.is_empty())
        .collect();

    (0..grid.height())
        .find(|&row| count_vocabulary_hits(grid, row, &vocabulary) >= config.header_match_threshold)
        .map(|row| HeaderRow {
            index: row,
            cells: (0..grid.width())
                .map(|col| grid.cell(row, col).as_text().trim().to_string())
                .collect(),
        })
}

fn count_vocabulary_hits(grid: &SheetGrid, row: usize, vocabulary: &HashSet<String>) -> usize {
    (0..grid.width())
        .filter(|&col| vocabulary.contains(&normalize_token(&grid.cell(row, col).as_text())))
        .count()
}
