// ==========================================
// 名册导入API
// ==========================================
// 职责: 文件 → 导入器 → 仓储，封装教师/学生名册导入
// 红线: 导入失败或结果为空时不落库
// ==========================================

use crate::api::error::{ApiError, ApiResult};
use crate::config::{ConfigManager, ImportConfigReader, RosterImportConfig};
use crate::domain::person::RosterEntity;
use crate::domain::roster::{RosterImportBatch, SheetReport};
use crate::domain::types::RosterKind;
use crate::importer::{RosterImporter, RosterImporterImpl, RosterTemplateWriter};
use crate::repository::RosterRepository;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, error, info, instrument, warn};

/// 导入API响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterImportApiResponse {
    /// 批次ID
    pub batch_id: String,
    /// 名册种类
    pub kind: RosterKind,
    /// 导入的人员数量
    pub imported: usize,
    /// 被跳过的工作表数量
    pub skipped_sheets: usize,
    /// 各工作表处理结果
    pub sheets: Vec<SheetReport>,
    /// 导入耗时（毫秒）
    pub elapsed_ms: i64,
}

/// 名册导入API
pub struct RosterImportApi {
    db_path: String,
}

impl RosterImportApi {
    /// 创建新的RosterImportApi实例
    pub fn new(db_path: impl Into<String>) -> Self {
        Self {
            db_path: db_path.into(),
        }
    }

    pub fn db_path(&self) -> &str {
        &self.db_path
    }

    /// 加载导入配置（默认值 + config_kv 覆写）
    async fn load_config(&self) -> ApiResult<RosterImportConfig> {
        let config_manager = ConfigManager::new(&self.db_path)
            .map_err(|e| ApiError::DatabaseConnectionError(format!("创建配置管理器失败: {}", e)))?;
        match config_manager.get_config_snapshot() {
            Ok(snapshot) => debug!(snapshot = %snapshot, "导入配置快照"),
            Err(e) => warn!(error = %e, "读取配置快照失败"),
        }
        config_manager
            .load_roster_import_config()
            .await
            .map_err(|e| ApiError::ConfigError(e.to_string()))
    }

    fn repository(&self) -> ApiResult<RosterRepository> {
        RosterRepository::new(&self.db_path).map_err(ApiError::from)
    }

    /// 导入名册文件
    ///
    /// # 参数
    /// - file_path: 文件路径（.xlsx / .xls / .ods / .csv）
    /// - kind: 教师 / 学生
    ///
    /// # 返回
    /// - Ok(RosterImportApiResponse): 导入结果
    /// - Err(ApiError::EmptyImport): 未识别出任何数据行
    /// - Err(ApiError::ImportFailed): 文件格式错误
    #[instrument(skip(self), fields(kind = %kind))]
    pub async fn import_roster_file(
        &self,
        file_path: &str,
        kind: RosterKind,
    ) -> ApiResult<RosterImportApiResponse> {
        let start_time = Instant::now();

        let config = self.load_config().await?;
        let importer = RosterImporterImpl::with_config(config);

        let result = importer
            .import_from_file(file_path, kind)
            .await
            .map_err(|e| {
                if e.is_malformed_file() {
                    warn!(error = %e, file_path = %file_path, "文件格式或内容无法解析");
                } else {
                    warn!(error = %e, "名册导入失败");
                }
                ApiError::from(e)
            })?;

        let elapsed_ms = start_time.elapsed().as_millis() as i64;
        let skipped_sheets = result.skipped_sheets();
        let batch = RosterImportBatch {
            batch_id: result.batch_id.clone(),
            kind,
            file_name: result.file_name.clone(),
            file_path: Some(file_path.to_string()),
            sheet_count: result.sheets.len() as i32,
            imported_rows: result.entities.len() as i32,
            skipped_sheets: skipped_sheets as i32,
            imported_at: Utc::now(),
            elapsed_ms,
        };

        let repo = self.repository()?;
        let imported = repo.save_import(&batch, &result.entities).map_err(|e| {
            error!(error = %e, batch_id = %batch.batch_id, "名册落库失败");
            ApiError::from(e)
        })?;

        info!(
            batch_id = %batch.batch_id,
            imported = imported,
            skipped_sheets = skipped_sheets,
            "名册已落库"
        );

        Ok(RosterImportApiResponse {
            batch_id: result.batch_id,
            kind,
            imported,
            skipped_sheets,
            sheets: result.sheets,
            elapsed_ms,
        })
    }

    /// 列出已导入的人员（按导入顺序）
    pub fn list_roster(&self, kind: RosterKind) -> ApiResult<Vec<RosterEntity>> {
        Ok(self.repository()?.list_by_kind(kind)?)
    }

    /// 查询导入批次
    pub fn get_batch(&self, batch_id: &str) -> ApiResult<RosterImportBatch> {
        if batch_id.trim().is_empty() {
            return Err(ApiError::InvalidInput("batch_id 不能为空".to_string()));
        }
        self.repository()?
            .find_batch(batch_id)?
            .ok_or_else(|| ApiError::NotFound(format!("导入批次(id={})不存在", batch_id)))
    }

    /// 生成导入模板（使用当前配置的首选表头）
    ///
    /// # 返回
    /// - Ok(Vec<String>): 写入的表头
    pub async fn write_template<P: AsRef<Path>>(
        &self,
        kind: RosterKind,
        path: P,
    ) -> ApiResult<Vec<String>> {
        let config = self.load_config().await?;
        Ok(RosterTemplateWriter.write_csv(kind, path, &config)?)
    }
}
