// ==========================================
// 学校管理门户 - 名册导入器实现
// ==========================================
// 职责: 整合导入流程，从工作簿到教师/学生实体
// 流程（逐个工作表）: 表头定位 → 别名映射 → 行提取 → 实体投影
// 红线: 单个工作表失败只跳过该表；全部为空才报错
// ==========================================

use crate::config::roster_import_config::{FieldCandidates, RosterImportConfig};
use crate::domain::grid::{SheetGrid, Workbook};
use crate::domain::person::RosterEntity;
use crate::domain::roster::{RosterImportResult, SheetOutcome, SheetReport};
use crate::domain::types::RosterKind;
use crate::importer::data_cleaner::DataCleaner as DataCleanerImpl;
use crate::importer::error::{ImportError, ImportResult};
use crate::importer::field_mapper::FieldMapper as FieldMapperImpl;
use crate::importer::file_parser::UniversalFileParser;
use crate::importer::header_locator::locate_header_row;
use crate::importer::roster_importer_trait::{DataCleaner, FieldMapper, FileParser, RosterImporter};
use crate::importer::row_extractor::extract_rows;
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

// ==========================================
// RosterImporterImpl - 名册导入器实现
// ==========================================
pub struct RosterImporterImpl {
    // 导入配置快照（一次导入期间不变）
    config: RosterImportConfig,

    // 导入组件
    file_parser: Box<dyn FileParser>,
    field_mapper: Box<dyn FieldMapper>,
    data_cleaner: Box<dyn DataCleaner>,
}

impl RosterImporterImpl {
    /// 创建新的 RosterImporter 实例
    ///
    /// # 参数
    /// - config: 导入配置
    /// - file_parser: 文件解析器
    /// - field_mapper: 字段映射器
    /// - data_cleaner: 数据清洗器
    pub fn new(
        config: RosterImportConfig,
        file_parser: Box<dyn FileParser>,
        field_mapper: Box<dyn FieldMapper>,
        data_cleaner: Box<dyn DataCleaner>,
    ) -> Self {
        Self {
            config,
            file_parser,
            field_mapper,
            data_cleaner,
        }
    }

    /// 使用默认组件（按扩展名选择解析器）
    pub fn with_config(config: RosterImportConfig) -> Self {
        Self::new(
            config,
            Box::new(UniversalFileParser),
            Box::new(FieldMapperImpl),
            Box::new(DataCleanerImpl),
        )
    }

    pub fn config(&self) -> &RosterImportConfig {
        &self.config
    }

    /// 导入单个工作表
    ///
    /// # 返回
    /// - Ok((表头工作表行号, 实体))
    /// - Err(NoHeaderRowFound / NotARosterSheet): 调用方跳过该表
    fn import_sheet(
        &self,
        grid: &SheetGrid,
        kind: RosterKind,
        candidates: &FieldCandidates,
    ) -> ImportResult<(usize, Vec<RosterEntity>)> {
        // === 步骤 1: 表头定位 ===
        let header = locate_header_row(grid, &self.config).ok_or_else(|| {
            ImportError::NoHeaderRowFound {
                sheet: grid.name.clone(),
            }
        })?;
        debug!(sheet = %grid.name, header_index = header.index, "表头定位完成");

        // === 步骤 2: 别名映射 ===
        let alias = self.field_mapper.create_header_alias(&header.cells, candidates);
        if !alias.looks_like_roster() {
            return Err(ImportError::NotARosterSheet {
                sheet: grid.name.clone(),
            });
        }

        // === 步骤 3: 行提取 ===
        let records = extract_rows(grid, &header, &alias, &self.config);
        debug!(sheet = %grid.name, rows = records.len(), "数据行提取完成");

        // === 步骤 4: 实体投影 ===
        let entities = records
            .iter()
            .map(|record| {
                self.field_mapper
                    .map_to_entity(record, &alias, kind, self.data_cleaner.as_ref())
            })
            .collect();

        Ok((grid.sheet_row_number(header.index), entities))
    }
}

#[async_trait::async_trait]
impl RosterImporter for RosterImporterImpl {
    #[instrument(skip(self, workbook), fields(kind = %kind, sheets = workbook.sheets.len()))]
    fn import_roster(
        &self,
        workbook: &Workbook,
        kind: RosterKind,
    ) -> ImportResult<RosterImportResult> {
        let batch_id = Uuid::new_v4().to_string();
        let candidates = self.config.candidates(kind);

        let mut entities = Vec::new();
        let mut sheets = Vec::with_capacity(workbook.sheets.len());

        for grid in &workbook.sheets {
            let outcome = match self.import_sheet(grid, kind, candidates) {
                Ok((header_row, sheet_entities)) => {
                    let rows = sheet_entities.len();
                    entities.extend(sheet_entities);
                    SheetOutcome::Imported { header_row, rows }
                }
                Err(e @ ImportError::NoHeaderRowFound { .. }) => {
                    debug!(error = %e, "跳过工作表");
                    SheetOutcome::NoHeaderRowFound
                }
                Err(e @ ImportError::NotARosterSheet { .. }) => {
                    debug!(error = %e, "跳过工作表");
                    SheetOutcome::NotARosterSheet
                }
                Err(e) => return Err(e),
            };
            sheets.push(SheetReport {
                sheet_name: grid.name.clone(),
                outcome,
            });
        }

        if entities.is_empty() {
            warn!(sheets = sheets.len(), "所有工作表均未产出数据行");
            return Err(ImportError::EmptyImportResult { kind });
        }

        info!(
            batch_id = %batch_id,
            entities = entities.len(),
            skipped_sheets = sheets.iter().filter(|s| s.is_skipped()).count(),
            "名册映射完成"
        );

        Ok(RosterImportResult {
            batch_id,
            kind,
            file_name: None,
            entities,
            sheets,
        })
    }

    /// 从文件导入名册
    ///
    /// # 参数
    /// - file_path: .xlsx / .xls / .ods / .csv
    /// - kind: 教师 / 学生
    ///
    /// # 返回
    /// - Ok(RosterImportResult): file_name 为文件名
    /// - Err: 文件错误 / 结果为空
    #[instrument(skip(self, file_path), fields(kind = %kind))]
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        kind: RosterKind,
    ) -> ImportResult<RosterImportResult> {
        let start_time = Instant::now();
        let path = file_path.as_ref();
        info!(file_path = %path.display(), "开始导入名册");

        // === 步骤 0: 解析文件 ===
        let workbook = self.file_parser.parse_workbook(path).map_err(|e| {
            error!(error = %e, "文件解析失败");
            e
        })?;
        info!(sheets = ?workbook.sheet_names(), "文件解析完成");

        let mut result = self.import_roster(&workbook, kind)?;
        result.file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().to_string());

        info!(
            batch_id = %result.batch_id,
            imported = result.entities.len(),
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            "名册导入完成"
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::PersonStatus;
    use std::io::Write;

    fn importer() -> RosterImporterImpl {
        RosterImporterImpl::with_config(RosterImportConfig::default())
    }

    fn teacher_sheet(name: &str) -> SheetGrid {
        SheetGrid::from_text_rows(
            name,
            &[
                vec!["Ministry of Education", "", "", "", "", "", "", ""],
                vec!["Teacher List", "", "", "", "", "", "", ""],
                vec![
                    "No",
                    "Name",
                    "Gender",
                    "Date of birth",
                    "Place of Birth",
                    "Phone",
                    "Email",
                    "Address",
                ],
                vec!["1", "Doe, John", "M", "1980-02-01", "Kampot", "012", "john@s.edu", "PP"],
                vec!["2", "Sok Dara", "F", "1985-07-09", "Takeo", "", "dara@s.edu", ""],
                vec!["3", "Madonna", "F", "", "", "099", "", ""],
                vec!["Note: verified by the office", "", "", "", "", "", "", ""],
                vec!["4", "Late Row", "M", "", "", "011", "late@s.edu", ""],
            ],
        )
    }

    #[test]
    fn test_end_to_end_title_block_and_note_footer() {
        let workbook = Workbook::new(vec![teacher_sheet("Teachers")]);
        let result = importer()
            .import_roster(&workbook, RosterKind::Teacher)
            .unwrap();

        assert_eq!(result.entities.len(), 3);
        assert_eq!(
            result.sheets[0].outcome,
            SheetOutcome::Imported {
                header_row: 3,
                rows: 3
            }
        );

        let names: Vec<(String, String)> = result
            .entities
            .iter()
            .map(|e| (e.profile().first_name.clone(), e.profile().last_name.clone()))
            .collect();
        assert_eq!(
            names,
            vec![
                ("John".to_string(), "Doe".to_string()),
                ("Sok".to_string(), "Dara".to_string()),
                ("Madonna".to_string(), String::new()),
            ]
        );

        let first = result.entities[0].profile();
        assert_eq!(first.date_of_birth.as_deref(), Some("1980-02-01"));
        assert_eq!(first.place_of_birth.as_deref(), Some("Kampot"));
        assert_eq!(first.current_address.as_deref(), Some("PP"));
        assert_eq!(first.status, PersonStatus::Active);
        assert!(result.entities.iter().all(|e| e.kind() == RosterKind::Teacher));
    }

    #[test]
    fn test_sparse_rows_under_aliased_name_header_are_imported() {
        let sheet = SheetGrid::from_text_rows(
            "Grade 9",
            &[
                vec!["Student Name", "Gender", "Date of Birth", "Place of Birth", "Address"],
                vec!["Sok Dara", "F", "", "", ""],
            ],
        );
        let result = importer()
            .import_roster(&Workbook::new(vec![sheet]), RosterKind::Student)
            .unwrap();

        assert_eq!(result.entities.len(), 1);
        assert_eq!(result.entities[0].profile().display_name(), "Sok Dara");
        assert_eq!(result.entities[0].profile().gender.as_deref(), Some("F"));
    }

    #[test]
    fn test_import_is_deterministic_modulo_ids() {
        let workbook = Workbook::new(vec![teacher_sheet("Teachers")]);
        let imp = importer();

        let first = imp.import_roster(&workbook, RosterKind::Teacher).unwrap();
        let second = imp.import_roster(&workbook, RosterKind::Teacher).unwrap();

        let strip = |r: &RosterImportResult| -> Vec<RosterEntity> {
            r.entities.iter().map(|e| e.without_id()).collect()
        };
        assert_eq!(strip(&first), strip(&second));
        assert_ne!(first.entities[0].id(), second.entities[0].id());
        assert_ne!(first.batch_id, second.batch_id);
    }

    #[test]
    fn test_skipped_sheets_are_reported() {
        let cover = SheetGrid::from_text_rows("Cover", &[vec!["Annual report"], vec!["2024"]]);
        let grades = SheetGrid::from_text_rows(
            "Grades",
            &[vec!["Gender", "Phone", "Address", "Score"], vec!["F", "1", "PP", "90"]],
        );
        let workbook = Workbook::new(vec![cover, teacher_sheet("Teachers"), grades]);

        let result = importer()
            .import_roster(&workbook, RosterKind::Teacher)
            .unwrap();

        assert_eq!(result.entities.len(), 3);
        assert_eq!(result.skipped_sheets(), 2);
        assert_eq!(result.sheets[0].outcome, SheetOutcome::NoHeaderRowFound);
        assert_eq!(result.sheets[2].outcome, SheetOutcome::NotARosterSheet);
    }

    #[test]
    fn test_entities_concatenate_in_sheet_order() {
        let second = SheetGrid::from_text_rows(
            "Morning",
            &[
                vec!["Name", "Email", "Phone", "Class"],
                vec!["Chan Vanna", "v@s.edu", "1", "7A"],
            ],
        );
        let workbook = Workbook::new(vec![teacher_sheet("Afternoon"), second]);

        let result = importer()
            .import_roster(&workbook, RosterKind::Student)
            .unwrap();

        assert_eq!(result.entities.len(), 4);
        assert_eq!(result.entities[3].profile().first_name, "Chan");
        assert_eq!(result.entities[3].group(), Some("7A"));
        assert_eq!(result.entities[0].group(), None);
    }

    #[test]
    fn test_empty_workbook_is_error() {
        let workbook = Workbook::new(vec![SheetGrid::from_text_rows(
            "Only headers",
            &[vec!["Name", "Email", "Phone"]],
        )]);

        let err = importer()
            .import_roster(&workbook, RosterKind::Student)
            .unwrap_err();
        assert!(matches!(
            err,
            ImportError::EmptyImportResult {
                kind: RosterKind::Student
            }
        ));
    }

    #[tokio::test]
    async fn test_import_from_csv_file() {
        let mut temp_file = tempfile::Builder::new()
            .prefix("students_")
            .suffix(".csv")
            .tempfile()
            .unwrap();
        writeln!(temp_file, "Sunrise School,,,,").unwrap();
        writeln!(temp_file, "No,Name,Gender,Phone,Status").unwrap();
        writeln!(temp_file, "1,Sok Dara,F,012,Graduated").unwrap();
        writeln!(temp_file, "2,\"Chan, Vanna\",M,013,inactive").unwrap();
        writeln!(temp_file, ",,,,").unwrap();

        let result = importer()
            .import_from_file(temp_file.path(), RosterKind::Student)
            .await
            .unwrap();

        assert_eq!(result.entities.len(), 2);
        assert!(result
            .file_name
            .as_deref()
            .unwrap_or_default()
            .starts_with("students_"));
        assert_eq!(result.entities[0].profile().status, PersonStatus::Graduated);
        assert_eq!(result.entities[1].profile().first_name, "Vanna");
        assert_eq!(result.entities[1].profile().status, PersonStatus::Inactive);
    }
}
