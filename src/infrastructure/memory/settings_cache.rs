//! In-Memory Settings Cache Implementation
//!
//! Guild 辞书与用户语音设置的读穿缓存。
//! 同一 key 的写操作串行化（读-改-写期间持有 key 级锁），读不加锁。

use async_trait::async_trait;
use dashmap::DashMap;
use std::hash::Hash;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::application::ports::{RepositoryError, SettingsCachePort, SettingsStorePort};
use crate::domain::dictionary::{DictionaryEntry, GuildDictionary};
use crate::domain::voice::{SpeakerChoice, UserVoiceSettings, VoiceParams};
use crate::domain::{GuildId, UserId};

/// key 级写锁
struct KeyLocks<K: Eq + Hash>(DashMap<K, Arc<Mutex<()>>>);

impl<K: Eq + Hash + Copy> KeyLocks<K> {
    fn new() -> Self {
        Self(DashMap::new())
    }

    fn get(&self, key: K) -> Arc<Mutex<()>> {
        self.0.entry(key).or_default().clone()
    }
}

/// 内存设置缓存
pub struct InMemorySettingsCache {
    store: Arc<dyn SettingsStorePort>,
    dictionaries: DashMap<GuildId, Arc<GuildDictionary>>,
    /// None 表示存储中确实没有该用户的设置
    users: DashMap<UserId, Option<UserVoiceSettings>>,
    guild_locks: KeyLocks<GuildId>,
    user_locks: KeyLocks<UserId>,
}

impl InMemorySettingsCache {
    pub fn new(store: Arc<dyn SettingsStorePort>) -> Self {
        Self {
            store,
            dictionaries: DashMap::new(),
            users: DashMap::new(),
            guild_locks: KeyLocks::new(),
            user_locks: KeyLocks::new(),
        }
    }

    pub fn arc(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// 写路径的加载：存储读取失败时返回错误，避免用空辞书覆盖已有数据
    async fn dictionary_for_write(
        &self,
        guild_id: GuildId,
    ) -> Result<GuildDictionary, RepositoryError> {
        if let Some(cached) = self.dictionaries.get(&guild_id) {
            return Ok(GuildDictionary::clone(&cached));
        }
        Ok(self
            .store
            .load_dictionary(guild_id)
            .await?
            .unwrap_or_default())
    }

    async fn user_for_write(&self, user_id: UserId) -> Result<UserVoiceSettings, RepositoryError> {
        if let Some(cached) = self.users.get(&user_id) {
            return Ok(cached
                .clone()
                .unwrap_or_else(|| UserVoiceSettings::new(user_id)));
        }
        Ok(self
            .store
            .load_user_settings(user_id)
            .await?
            .unwrap_or_else(|| UserVoiceSettings::new(user_id)))
    }

    /// 先写缓存再持久化
    async fn commit_dictionary(
        &self,
        guild_id: GuildId,
        dictionary: GuildDictionary,
    ) -> Result<(), RepositoryError> {
        let snapshot = Arc::new(dictionary);
        self.dictionaries.insert(guild_id, snapshot.clone());
        self.store
            .save_dictionary(guild_id, &snapshot)
            .await
            .inspect_err(|e| {
                tracing::error!(guild_id = %guild_id, error = %e, "Failed to persist dictionary");
            })
    }

    async fn commit_user(&self, settings: UserVoiceSettings) -> Result<(), RepositoryError> {
        let user_id = settings.user_id;
        self.users.insert(user_id, Some(settings.clone()));
        self.store
            .save_user_settings(&settings)
            .await
            .inspect_err(|e| {
                tracing::error!(user_id = %user_id, error = %e, "Failed to persist user settings");
            })
    }
}

#[async_trait]
impl SettingsCachePort for InMemorySettingsCache {
    async fn dictionary(&self, guild_id: GuildId) -> Arc<GuildDictionary> {
        if let Some(cached) = self.dictionaries.get(&guild_id) {
            return cached.clone();
        }

        match self.store.load_dictionary(guild_id).await {
            Ok(loaded) => {
                let loaded = Arc::new(loaded.unwrap_or_default());
                // 并发加载时保留先写入者（可能是刚提交的写操作）
                self.dictionaries
                    .entry(guild_id)
                    .or_insert(loaded)
                    .clone()
            }
            Err(e) => {
                tracing::warn!(
                    guild_id = %guild_id,
                    error = %e,
                    "Failed to load dictionary, using empty dictionary"
                );
                Arc::new(GuildDictionary::new())
            }
        }
    }

    async fn user_settings(&self, user_id: UserId) -> Option<UserVoiceSettings> {
        if let Some(cached) = self.users.get(&user_id) {
            return cached.clone();
        }

        match self.store.load_user_settings(user_id).await {
            Ok(loaded) => self.users.entry(user_id).or_insert(loaded).clone(),
            Err(e) => {
                tracing::warn!(
                    user_id = %user_id,
                    error = %e,
                    "Failed to load user settings, using defaults"
                );
                None
            }
        }
    }

    async fn add_dictionary_entry(
        &self,
        guild_id: GuildId,
        entry: DictionaryEntry,
    ) -> Result<(), RepositoryError> {
        let lock = self.guild_locks.get(guild_id);
        let _guard = lock.lock().await;

        let mut dictionary = self.dictionary_for_write(guild_id).await?;
        dictionary.add(entry);
        self.commit_dictionary(guild_id, dictionary).await
    }

    async fn remove_dictionary_word(
        &self,
        guild_id: GuildId,
        word: &str,
    ) -> Result<Option<DictionaryEntry>, RepositoryError> {
        let lock = self.guild_locks.get(guild_id);
        let _guard = lock.lock().await;

        let mut dictionary = self.dictionary_for_write(guild_id).await?;
        let Some(removed) = dictionary.remove_first_by_word(word) else {
            return Ok(None);
        };
        self.commit_dictionary(guild_id, dictionary).await?;
        Ok(Some(removed))
    }

    async fn set_speaker(
        &self,
        user_id: UserId,
        choice: SpeakerChoice,
    ) -> Result<UserVoiceSettings, RepositoryError> {
        let lock = self.user_locks.get(user_id);
        let _guard = lock.lock().await;

        let mut settings = self.user_for_write(user_id).await?;
        settings.set_speaker(choice);
        self.commit_user(settings.clone()).await?;
        Ok(settings)
    }

    async fn set_voice_params(
        &self,
        user_id: UserId,
        params: VoiceParams,
    ) -> Result<UserVoiceSettings, RepositoryError> {
        let lock = self.user_locks.get(user_id);
        let _guard = lock.lock().await;

        let mut settings = self.user_for_write(user_id).await?;
        settings.set_params(params);
        self.commit_user(settings.clone()).await?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::dictionary::{Pronunciation, Word};
    use crate::domain::voice::StyleId;
    use crate::test_support::MemorySettingsStore;

    fn entry(word: &str, reading: &str) -> DictionaryEntry {
        DictionaryEntry::new(
            Word::new(word).unwrap(),
            Pronunciation::new(reading).unwrap(),
            "tester",
        )
    }

    fn setup() -> (Arc<MemorySettingsStore>, InMemorySettingsCache) {
        let store = Arc::new(MemorySettingsStore::new());
        let cache = InMemorySettingsCache::new(store.clone());
        (store, cache)
    }

    #[tokio::test]
    async fn test_dictionary_read_through_once() {
        let (store, cache) = setup();
        let guild = GuildId::new(1);
        let mut dict = GuildDictionary::new();
        dict.add(entry("foo", "バー"));
        store.put_dictionary(guild, dict);

        assert_eq!(cache.dictionary(guild).await.len(), 1);
        assert_eq!(cache.dictionary(guild).await.len(), 1);
        assert_eq!(store.dictionary_loads(), 1);
    }

    #[tokio::test]
    async fn test_read_failure_is_fail_open_and_not_cached() {
        let (store, cache) = setup();
        let guild = GuildId::new(1);
        let mut dict = GuildDictionary::new();
        dict.add(entry("foo", "バー"));
        store.put_dictionary(guild, dict);

        store.set_fail_reads(true);
        assert!(cache.dictionary(guild).await.is_empty());
        assert!(cache.user_settings(UserId::new(5)).await.is_none());

        // 恢复后下一次读取重新加载
        store.set_fail_reads(false);
        assert_eq!(cache.dictionary(guild).await.len(), 1);
    }

    #[tokio::test]
    async fn test_write_updates_cache_before_ack() {
        let (store, cache) = setup();
        let guild = GuildId::new(1);

        cache.add_dictionary_entry(guild, entry("w", "ダブリュー")).await.unwrap();
        assert_eq!(cache.dictionary(guild).await.substitute("w"), "ダブリュー");
        assert_eq!(store.dictionary(guild).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_failed_persist_keeps_applied_value() {
        let (store, cache) = setup();
        let guild = GuildId::new(1);

        store.set_fail_writes(true);
        let result = cache.add_dictionary_entry(guild, entry("w", "ダブリュー")).await;
        assert!(result.is_err());
        assert_eq!(cache.dictionary(guild).await.len(), 1);
    }

    #[tokio::test]
    async fn test_write_refuses_to_clobber_unreadable_store() {
        let (store, cache) = setup();
        let guild = GuildId::new(1);
        let mut dict = GuildDictionary::new();
        dict.add(entry("foo", "バー"));
        store.put_dictionary(guild, dict);

        store.set_fail_reads(true);
        assert!(cache.add_dictionary_entry(guild, entry("w", "ダブリュー")).await.is_err());

        store.set_fail_reads(false);
        assert_eq!(store.dictionary(guild).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_remove_missing_word_does_not_write() {
        let (store, cache) = setup();
        let guild = GuildId::new(1);

        assert_eq!(cache.remove_dictionary_word(guild, "nope").await.unwrap(), None);
        assert_eq!(store.dictionary_saves(), 0);
    }

    #[tokio::test]
    async fn test_concurrent_adds_are_not_lost() {
        let (store, cache) = setup();
        let cache = Arc::new(cache);
        let guild = GuildId::new(1);

        let mut handles = Vec::new();
        for i in 0..20 {
            let cache = cache.clone();
            handles.push(tokio::spawn(async move {
                cache
                    .add_dictionary_entry(guild, entry(&format!("w{}", i), "ア"))
                    .await
                    .unwrap();
            }));
        }
        for h in handles {
            h.await.unwrap();
        }

        assert_eq!(cache.dictionary(guild).await.len(), 20);
        assert_eq!(store.dictionary(guild).unwrap().len(), 20);
    }

    #[tokio::test]
    async fn test_speaker_and_params_merge() {
        let (store, cache) = setup();
        let user = UserId::new(9);

        cache
            .set_speaker(
                user,
                SpeakerChoice {
                    speaker_name: "ずんだもん".to_string(),
                    style_name: "ノーマル".to_string(),
                    style_id: StyleId::new(3),
                },
            )
            .await
            .unwrap();
        let settings = cache
            .set_voice_params(user, VoiceParams::new(1.2, 0.1, 1.5).unwrap())
            .await
            .unwrap();

        assert_eq!(settings.speaker.as_ref().unwrap().style_id, StyleId::new(3));
        assert_eq!(settings.speed, Some(1.5));
        assert_eq!(store.user(user).unwrap(), settings);
    }
}
