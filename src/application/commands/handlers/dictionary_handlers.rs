//! Dictionary Command Handlers

use std::sync::Arc;

use crate::application::commands::{RegisterWord, RemoveWord};
use crate::application::error::ApplicationError;
use crate::application::ports::SettingsCachePort;
use crate::domain::dictionary::{DictionaryEntry, Pronunciation, Word};

// ============================================================================
// RegisterWord
// ============================================================================

/// 登录响应
#[derive(Debug, Clone)]
pub struct RegisterWordResponse {
    pub entry: DictionaryEntry,
    pub message: String,
}

/// RegisterWord Handler
pub struct RegisterWordHandler {
    settings: Arc<dyn SettingsCachePort>,
}

impl RegisterWordHandler {
    pub fn new(settings: Arc<dyn SettingsCachePort>) -> Self {
        Self { settings }
    }

    /// 读法校验失败时不写入任何东西
    pub async fn handle(
        &self,
        cmd: RegisterWord,
    ) -> Result<RegisterWordResponse, ApplicationError> {
        let pronunciation = Pronunciation::new(cmd.pronunciation)?;
        let word = Word::new(cmd.word)?;
        let entry = DictionaryEntry::new(word, pronunciation, cmd.author);

        self.settings
            .add_dictionary_entry(cmd.guild_id, entry.clone())
            .await?;

        tracing::info!(
            guild_id = %cmd.guild_id,
            entry_id = %entry.id,
            word = %entry.word,
            "Dictionary entry registered"
        );

        let message = format!(
            "[{}] を [{}] に置き換えしました！",
            entry.word, entry.pronunciation
        );
        Ok(RegisterWordResponse { entry, message })
    }
}

// ============================================================================
// RemoveWord
// ============================================================================

/// 删除响应
#[derive(Debug, Clone)]
pub struct RemoveWordResponse {
    pub removed: Option<DictionaryEntry>,
    pub message: String,
}

/// RemoveWord Handler
pub struct RemoveWordHandler {
    settings: Arc<dyn SettingsCachePort>,
}

impl RemoveWordHandler {
    pub fn new(settings: Arc<dyn SettingsCachePort>) -> Self {
        Self { settings }
    }

    pub async fn handle(&self, cmd: RemoveWord) -> Result<RemoveWordResponse, ApplicationError> {
        let removed = self
            .settings
            .remove_dictionary_word(cmd.guild_id, &cmd.word)
            .await?;

        let message = match &removed {
            Some(entry) => {
                tracing::info!(
                    guild_id = %cmd.guild_id,
                    entry_id = %entry.id,
                    word = %cmd.word,
                    "Dictionary entry removed"
                );
                format!("\"{}\" を辞書から削除しました。", cmd.word)
            }
            None => format!("\"{}\" は辞書に登録されていません。", cmd.word),
        };

        Ok(RemoveWordResponse { removed, message })
    }
}
