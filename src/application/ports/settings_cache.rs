//! Settings Cache Port - 设置的进程内读穿缓存
//!
//! - 读：首次访问时从存储加载；存储读取失败时返回空 / 默认值且不缓存（fail-open）
//! - 写：先更新缓存再持久化；持久化失败会返回错误，已应用的内存状态保留

use async_trait::async_trait;
use std::sync::Arc;

use super::RepositoryError;
use crate::domain::dictionary::{DictionaryEntry, GuildDictionary};
use crate::domain::voice::{SpeakerChoice, UserVoiceSettings, VoiceParams};
use crate::domain::{GuildId, UserId};

#[async_trait]
pub trait SettingsCachePort: Send + Sync {
    /// Guild 辞书快照
    async fn dictionary(&self, guild_id: GuildId) -> Arc<GuildDictionary>;

    /// 用户语音设置，未设置时为 None
    async fn user_settings(&self, user_id: UserId) -> Option<UserVoiceSettings>;

    /// 追加辞书条目
    async fn add_dictionary_entry(
        &self,
        guild_id: GuildId,
        entry: DictionaryEntry,
    ) -> Result<(), RepositoryError>;

    /// 删除第一个匹配 word 的条目，未找到时返回 Ok(None) 且不写存储
    async fn remove_dictionary_word(
        &self,
        guild_id: GuildId,
        word: &str,
    ) -> Result<Option<DictionaryEntry>, RepositoryError>;

    /// 更新话者选择
    async fn set_speaker(
        &self,
        user_id: UserId,
        choice: SpeakerChoice,
    ) -> Result<UserVoiceSettings, RepositoryError>;

    /// 更新合成参数
    async fn set_voice_params(
        &self,
        user_id: UserId,
        params: VoiceParams,
    ) -> Result<UserVoiceSettings, RepositoryError>;
}
