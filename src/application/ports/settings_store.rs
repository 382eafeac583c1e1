//! Settings Store Port - 持久化存储
//!
//! 用户语音设置与 Guild 辞书的读写，upsert 语义，两个集合之间无事务保证

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::dictionary::GuildDictionary;
use crate::domain::voice::UserVoiceSettings;
use crate::domain::{GuildId, UserId};

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found: {0}")]
    NotFound(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

/// Settings Store Port
#[async_trait]
pub trait SettingsStorePort: Send + Sync {
    /// 读取用户语音设置，不存在时返回 None
    async fn load_user_settings(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserVoiceSettings>, RepositoryError>;

    /// 保存用户语音设置（upsert）
    async fn save_user_settings(&self, settings: &UserVoiceSettings) -> Result<(), RepositoryError>;

    /// 读取 Guild 辞书，不存在时返回 None
    async fn load_dictionary(
        &self,
        guild_id: GuildId,
    ) -> Result<Option<GuildDictionary>, RepositoryError>;

    /// 整体保存 Guild 辞书（保持条目顺序）
    async fn save_dictionary(
        &self,
        guild_id: GuildId,
        dictionary: &GuildDictionary,
    ) -> Result<(), RepositoryError>;
}
