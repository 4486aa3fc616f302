// ==========================================
// 学校管理门户 - 导入配置读取 Trait
// ==========================================
// 职责: 定义导入模块所需的配置读取接口（不包含实现）
// 红线: 不包含配置写入、不包含业务逻辑
// ==========================================

use crate::config::roster_import_config::{FieldCandidates, RosterImportConfig};
use crate::domain::types::RosterKind;
use async_trait::async_trait;
use std::error::Error;

// ==========================================
// ImportConfigReader Trait
// ==========================================
// 用途: 名册导入所需的配置读取接口
// 实现者: ConfigManager（从 config_kv 表读取）
#[async_trait]
pub trait ImportConfigReader: Send + Sync {
    // ===== 表头检测 =====

    /// 表头检测词汇（归一化后的 token）
    ///
    /// # 默认值
    /// - name, gender, dateofbirth, placeofbirth, phone, email, address
    async fn get_header_vocabulary(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// 表头行最少命中数
    ///
    /// # 默认值
    /// - 3
    async fn get_header_match_threshold(&self) -> Result<usize, Box<dyn Error>>;

    /// 判定数据行的信号字段（规范字段键的归一化 token，经表头别名定位到列）
    ///
    /// # 默认值
    /// - fullname, firstname, email, phone
    async fn get_data_signal_tokens(&self) -> Result<Vec<String>, Box<dyn Error>>;

    // ===== 页脚识别 =====

    /// 首列以这些前缀开头即视为备注行
    ///
    /// # 默认值
    /// - note
    async fn get_footer_note_prefixes(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// 整行文本包含这些短语即视为签名/日期页脚
    ///
    /// # 默认值
    /// - deputy director, date:
    async fn get_footer_markers(&self) -> Result<Vec<String>, Box<dyn Error>>;

    /// 序号列表头 token
    ///
    /// # 默认值
    /// - no, n
    async fn get_row_number_tokens(&self) -> Result<Vec<String>, Box<dyn Error>>;

    // ===== 候选表头 =====

    /// 指定名册种类的候选表头覆写（仅返回被覆写的字段）
    async fn get_candidate_overrides(
        &self,
        kind: RosterKind,
    ) -> Result<Option<FieldCandidates>, Box<dyn Error>>;

    /// 组装完整配置快照（未配置的项使用默认值）
    async fn load_roster_import_config(&self) -> Result<RosterImportConfig, Box<dyn Error>> {
        // 每个 await 单独成句，临时值不跨 await 存活（future 需为 Send）
        let header_vocabulary = self.get_header_vocabulary().await?;
        let header_match_threshold = self.get_header_match_threshold().await?;
        let data_signal_tokens = self.get_data_signal_tokens().await?;
        let footer_note_prefixes = self.get_footer_note_prefixes().await?;
        let footer_markers = self.get_footer_markers().await?;
        let row_number_tokens = self.get_row_number_tokens().await?;

        let mut config = RosterImportConfig {
            header_vocabulary,
            header_match_threshold,
            data_signal_tokens,
            footer_note_prefixes,
            footer_markers,
            row_number_tokens,
            ..RosterImportConfig::default()
        };

        for kind in [RosterKind::Teacher, RosterKind::Student] {
            let overrides = self.get_candidate_overrides(kind).await?;
            if let Some(overrides) = overrides {
                config.candidates_mut(kind).merge(overrides);
            }
        }

        Ok(config)
    }
}
