// ==========================================
// 学校管理门户 - 导入模板生成
// ==========================================
// 输出: 单行 CSV，序号列 + 每个字段的首选标签
// 约束: 生成的模板本身必须能被表头定位识别
// ==========================================

use crate::config::roster_import_config::RosterImportConfig;
use crate::domain::types::RosterKind;
use crate::importer::error::{ImportError, ImportResult};
use csv::Writer;
use std::path::Path;
use tracing::info;

pub struct RosterTemplateWriter;

impl RosterTemplateWriter {
    pub fn write_csv<P: AsRef<Path>>(
        &self,
        kind: RosterKind,
        path: P,
        config: &RosterImportConfig,
    ) -> ImportResult<Vec<String>> {
        let path = path.as_ref();
        let headers = config.template_headers(kind);

        let mut writer = Writer::from_path(path)
            .map_err(|e| ImportError::TemplateWriteError(e.to_string()))?;
        writer
            .write_record(&headers)
            .map_err(|e| ImportError::TemplateWriteError(e.to_string()))?;
        writer
            .flush()
            .map_err(|e| ImportError::TemplateWriteError(e.to_string()))?;

        info!(kind = %kind, path = %path.display(), columns = headers.len(), "模板已生成");
        Ok(headers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::importer::file_parser::CsvParser;
    use crate::importer::header_locator::locate_header_row;
    use crate::importer::roster_importer_trait::FileParser;
    use tempfile::TempDir;

    #[test]
    fn test_template_is_detected_as_header() {
        let dir = TempDir::new().unwrap();
        let config = RosterImportConfig::default();

        for kind in [RosterKind::Teacher, RosterKind::Student] {
            let path = dir.path().join(format!("{}_template.csv", kind));
            let headers = RosterTemplateWriter.write_csv(kind, &path, &config).unwrap();

            let workbook = CsvParser.parse_workbook(&path).unwrap();
            let header = locate_header_row(&workbook.sheets[0], &config).unwrap();
            assert_eq!(header.index, 0);
            assert_eq!(header.cells, headers);
        }
    }

    #[test]
    fn test_template_write_to_missing_dir_fails() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("missing").join("t.csv");
        let result = RosterTemplateWriter.write_csv(
            RosterKind::Student,
            &path,
            &RosterImportConfig::default(),
        );
        assert!(matches!(result, Err(ImportError::TemplateWriteError(_))));
    }
}
