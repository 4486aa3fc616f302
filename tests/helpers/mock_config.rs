// ==========================================
// Mock 配置实现 - 用于集成测试
// ==========================================

use async_trait::async_trait;
use school_roster::config::{FieldCandidates, ImportConfigReader, RosterImportConfig};
use school_roster::RosterKind;
use std::error::Error;

/// Mock 配置结构（默认值来自 RosterImportConfig::default）
#[derive(Debug, Clone)]
pub struct MockConfig {
    pub base: RosterImportConfig,
    pub teacher_overrides: Option<FieldCandidates>,
    pub student_overrides: Option<FieldCandidates>,
}

impl MockConfig {
    /// 创建默认配置
    pub fn default() -> Self {
        Self {
            base: RosterImportConfig::default(),
            teacher_overrides: None,
            student_overrides: None,
        }
    }

    /// 自定义页脚标记（例如非英文学校的签名行）
    pub fn with_footer_markers(markers: &[&str]) -> Self {
        let mut config = Self::default();
        config.base.footer_markers = markers.iter().map(|s| s.to_string()).collect();
        config
    }
}

#[async_trait]
impl ImportConfigReader for MockConfig {
    async fn get_header_vocabulary(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.base.header_vocabulary.clone())
    }

    async fn get_header_match_threshold(&self) -> Result<usize, Box<dyn Error>> {
        Ok(self.base.header_match_threshold)
    }

    async fn get_data_signal_tokens(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.base.data_signal_tokens.clone())
    }

    async fn get_footer_note_prefixes(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.base.footer_note_prefixes.clone())
    }

    async fn get_footer_markers(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.base.footer_markers.clone())
    }

    async fn get_row_number_tokens(&self) -> Result<Vec<String>, Box<dyn Error>> {
        Ok(self.base.row_number_tokens.clone())
    }

    async fn get_candidate_overrides(
        &self,
        kind: RosterKind,
    ) -> Result<Option<FieldCandidates>, Box<dyn Error>> {
        Ok(match kind {
            RosterKind::Teacher => self.teacher_overrides.clone(),
            RosterKind::Student => self.student_overrides.clone(),
        })
    }
}
