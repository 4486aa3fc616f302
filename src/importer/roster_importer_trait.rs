// ==========================================
// 学校管理门户 - 名册导入 Trait
// ==========================================
// 职责: 定义名册导入接口（不包含实现）
// 管道: 文件解析 → 表头定位 → 别名映射 → 行提取 → 清洗 → 实体投影
// ==========================================

use crate::config::roster_import_config::FieldCandidates;
use crate::domain::grid::Workbook;
use crate::domain::person::{NameParts, RosterEntity};
use crate::domain::roster::{HeaderAlias, RosterImportResult, RosterRecord};
use crate::domain::types::{PersonStatus, RosterKind};
use crate::importer::error::ImportResult;
use async_trait::async_trait;
use std::path::Path;

// ==========================================
// RosterImporter Trait
// ==========================================
// 用途: 名册导入主接口
// 实现者: RosterImporterImpl
#[async_trait]
pub trait RosterImporter: Send + Sync {
    /// 从内存工作簿导入名册（纯计算，无 I/O）
    ///
    /// # 参数
    /// - workbook: 已解析的工作簿
    /// - kind: 教师 / 学生
    ///
    /// # 返回
    /// - Ok(RosterImportResult): 实体按工作表顺序、行顺序排列
    /// - Err(EmptyImportResult): 所有工作表都没有产出实体
    ///
    /// # 流程（逐个工作表）
    /// 1. 表头定位（失败则跳过该表）
    /// 2. 表头别名映射（非名册则跳过该表）
    /// 3. 数据行提取（遇到页脚即停止）
    /// 4. 实体投影（姓名拆分 / 状态归一 / 科目拆分）
    fn import_roster(&self, workbook: &Workbook, kind: RosterKind)
        -> ImportResult<RosterImportResult>;

    /// 从文件导入名册
    ///
    /// # 参数
    /// - file_path: .xlsx / .xls / .ods / .csv
    /// - kind: 教师 / 学生
    ///
    /// # 返回
    /// - Err: 文件不存在、格式错误、结果为空
    async fn import_from_file<P: AsRef<Path> + Send>(
        &self,
        file_path: P,
        kind: RosterKind,
    ) -> ImportResult<RosterImportResult>;
}

// ==========================================
// FileParser Trait
// ==========================================
// 用途: 文件 → 单元格网格（阶段 0）
// 实现者: ExcelParser, CsvParser
pub trait FileParser: Send + Sync {
    /// 解析文件为工作簿（保留所有工作表及其已用区域）
    fn parse_workbook(&self, file_path: &Path) -> ImportResult<Workbook>;
}

// ==========================================
// FieldMapper Trait
// ==========================================
// 用途: 表头别名映射 + 行记录 → 领域实体
// 实现者: FieldMapperImpl
pub trait FieldMapper: Send + Sync {
    /// 根据实际表头构建别名映射
    ///
    /// # 参数
    /// - headers: 表头行文本（保持列顺序）
    /// - candidates: 每个规范字段的有序候选标签
    fn create_header_alias(&self, headers: &[String], candidates: &FieldCandidates) -> HeaderAlias;

    /// 将行记录投影为教师或学生实体（id 新生成，文本经 cleaner 归一）
    fn map_to_entity(
        &self,
        record: &RosterRecord,
        alias: &HeaderAlias,
        kind: RosterKind,
        cleaner: &dyn DataCleaner,
    ) -> RosterEntity;
}

// ==========================================
// DataCleaner Trait
// ==========================================
// 用途: 字符串清洗与归一化（纯函数）
// 实现者: DataCleanerImpl
pub trait DataCleaner: Send + Sync {
    /// 清洗文本字段（折叠空白 + TRIM）
    fn clean_text(&self, value: &str) -> String;

    /// 标准化 NULL 值（空字符串/空白 → None）
    fn normalize_null(&self, value: Option<String>) -> Option<String>;

    /// 表头比较键: 小写，仅保留 [a-z0-9]
    fn normalize_token(&self, value: &str) -> String;

    /// 拆分全名为名 / 姓
    fn split_full_name(&self, raw: &str) -> NameParts;

    /// 自由文本 → 人员状态（未识别为 Active）
    fn normalize_status(&self, raw: &str) -> PersonStatus;

    /// 逗号分隔的科目列表 → 有序、已 trim 的科目
    fn split_subjects(&self, raw: &str) -> Vec<String>;
}
