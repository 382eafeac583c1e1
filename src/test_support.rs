//! 测试用的端口替身

use async_trait::async_trait;
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::application::ports::{
    AudioClip, AudioPlayerPort, AudioStorageError, AudioStoragePort, GatewayError,
    MediaSenderPort, NotifierPort, PlaybackCompletion, PlaybackOutcome, PlayerError,
    RepositoryError, SettingsStorePort, SynthesisCause, SynthesisEnginePort, SynthesisError,
    SynthesizedAudio, VoiceGatewayPort,
};
use crate::application::VoiceProfileResolver;
use crate::domain::dictionary::GuildDictionary;
use crate::domain::voice::{StyleId, UserVoiceSettings, VoiceProfile};
use crate::domain::{ChannelId, GuildId, UserId};
use crate::infrastructure::memory::InMemorySettingsCache;
use crate::infrastructure::worker::{PlaybackDeps, PlaybackEngine, PlaybackEngineConfig};

/// 轮询直到条件成立，2 秒后失败
pub async fn wait_until(cond: impl Fn() -> bool) {
    for _ in 0..400 {
        if cond() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met in time");
}

/// 跨替身共享的事件记录
#[derive(Clone, Default)]
pub struct EventLog(Arc<Mutex<Vec<String>>>);

impl EventLog {
    pub fn push(&self, entry: impl Into<String>) {
        self.0.lock().unwrap().push(entry.into());
    }

    pub fn entries(&self) -> Vec<String> {
        self.0.lock().unwrap().clone()
    }
}

// ============================================================================
// SettingsStore
// ============================================================================

#[derive(Default)]
pub struct MemorySettingsStore {
    users: Mutex<HashMap<UserId, UserVoiceSettings>>,
    dictionaries: Mutex<HashMap<GuildId, GuildDictionary>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
    dictionary_loads: AtomicUsize,
    dictionary_saves: AtomicUsize,
}

impl MemorySettingsStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    pub fn put_dictionary(&self, guild_id: GuildId, dictionary: GuildDictionary) {
        self.dictionaries.lock().unwrap().insert(guild_id, dictionary);
    }

    pub fn dictionary(&self, guild_id: GuildId) -> Option<GuildDictionary> {
        self.dictionaries.lock().unwrap().get(&guild_id).cloned()
    }

    pub fn user(&self, user_id: UserId) -> Option<UserVoiceSettings> {
        self.users.lock().unwrap().get(&user_id).cloned()
    }

    pub fn dictionary_loads(&self) -> usize {
        self.dictionary_loads.load(Ordering::SeqCst)
    }

    pub fn dictionary_saves(&self) -> usize {
        self.dictionary_saves.load(Ordering::SeqCst)
    }

    fn check_read(&self) -> Result<(), RepositoryError> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseError("read failed".to_string()));
        }
        Ok(())
    }

    fn check_write(&self) -> Result<(), RepositoryError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(RepositoryError::DatabaseError("write failed".to_string()));
        }
        Ok(())
    }
}

#[async_trait]
impl SettingsStorePort for MemorySettingsStore {
    async fn load_user_settings(
        &self,
        user_id: UserId,
    ) -> Result<Option<UserVoiceSettings>, RepositoryError> {
        self.check_read()?;
        Ok(self.user(user_id))
    }

    async fn save_user_settings(
        &self,
        settings: &UserVoiceSettings,
    ) -> Result<(), RepositoryError> {
        self.check_write()?;
        self.users
            .lock()
            .unwrap()
            .insert(settings.user_id, settings.clone());
        Ok(())
    }

    async fn load_dictionary(
        &self,
        guild_id: GuildId,
    ) -> Result<Option<GuildDictionary>, RepositoryError> {
        self.check_read()?;
        self.dictionary_loads.fetch_add(1, Ordering::SeqCst);
        Ok(self.dictionary(guild_id))
    }

    async fn save_dictionary(
        &self,
        guild_id: GuildId,
        dictionary: &GuildDictionary,
    ) -> Result<(), RepositoryError> {
        self.check_write()?;
        self.dictionary_saves.fetch_add(1, Ordering::SeqCst);
        self.put_dictionary(guild_id, dictionary.clone());
        Ok(())
    }
}

// ============================================================================
// Synthesis
// ============================================================================

/// 音频数据就是合成时的文本
#[derive(Default)]
pub struct FakeSynthesizer {
    calls: Mutex<Vec<String>>,
    failing: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, Duration>>,
}

impl FakeSynthesizer {
    pub fn fail_on(&self, text: &str) {
        self.failing.lock().unwrap().insert(text.to_string());
    }

    pub fn delay_on(&self, text: &str, delay: Duration) {
        self.delays.lock().unwrap().insert(text.to_string(), delay);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl SynthesisEnginePort for FakeSynthesizer {
    async fn synthesize(
        &self,
        text: &str,
        profile: &VoiceProfile,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        self.calls.lock().unwrap().push(text.to_string());

        let delay = self.delays.lock().unwrap().get(text).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing.lock().unwrap().contains(text) {
            return Err(SynthesisError::synthesis(SynthesisCause::ServiceError {
                status: 500,
                body: "boom".to_string(),
            }));
        }

        Ok(SynthesizedAudio {
            audio_data: text.as_bytes().to_vec(),
            style_id: profile.style_id,
        })
    }
}

// ============================================================================
// AudioStorage
// ============================================================================

pub struct MemoryAudioStorage {
    clips: Mutex<HashMap<Uuid, Vec<u8>>>,
    saved: Mutex<usize>,
    duration_ms: Option<u64>,
}

impl MemoryAudioStorage {
    pub fn new() -> Self {
        Self {
            clips: Mutex::new(HashMap::new()),
            saved: Mutex::new(0),
            duration_ms: Some(10),
        }
    }

    /// 累计保存过的音频数
    pub fn saved_count(&self) -> usize {
        *self.saved.lock().unwrap()
    }

    pub fn live_count(&self) -> usize {
        self.clips.lock().unwrap().len()
    }

    pub fn text_of(&self, clip_id: Uuid) -> Option<String> {
        self.clips
            .lock()
            .unwrap()
            .get(&clip_id)
            .map(|b| String::from_utf8_lossy(b).into_owned())
    }
}

#[async_trait]
impl AudioStoragePort for MemoryAudioStorage {
    async fn save_clip(&self, data: &[u8]) -> Result<AudioClip, AudioStorageError> {
        let id = Uuid::new_v4();
        self.clips.lock().unwrap().insert(id, data.to_vec());
        *self.saved.lock().unwrap() += 1;
        Ok(AudioClip {
            id,
            path: format!("/memory/{}.wav", id).into(),
            size_bytes: data.len() as u64,
            duration_ms: self.duration_ms,
        })
    }

    async fn read_clip(&self, clip_id: Uuid) -> Result<Vec<u8>, AudioStorageError> {
        self.clips
            .lock()
            .unwrap()
            .get(&clip_id)
            .cloned()
            .ok_or_else(|| AudioStorageError::FileNotFound(clip_id.to_string()))
    }

    async fn release_clip(&self, clip_id: Uuid) -> Result<(), AudioStorageError> {
        self.clips.lock().unwrap().remove(&clip_id);
        Ok(())
    }

    async fn purge_all(&self) -> Result<u64, AudioStorageError> {
        let mut clips = self.clips.lock().unwrap();
        let count = clips.len() as u64;
        clips.clear();
        Ok(count)
    }
}

// ============================================================================
// Player
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub enum PlayerMode {
    /// 延迟后自动以 Finished 完成
    AutoComplete(Duration),
    /// 由测试调用 finish_current 完成
    Manual,
    /// play 直接返回错误
    Reject,
}

pub struct FakePlayer {
    mode: PlayerMode,
    storage: Arc<MemoryAudioStorage>,
    log: EventLog,
    pending: Arc<Mutex<HashMap<GuildId, PlaybackCompletion>>>,
    active: Arc<AtomicUsize>,
    max_active: AtomicUsize,
    played: Mutex<Vec<String>>,
    outcomes: Arc<Mutex<Vec<PlaybackOutcome>>>,
}

impl FakePlayer {
    pub fn new(mode: PlayerMode, storage: Arc<MemoryAudioStorage>, log: EventLog) -> Self {
        Self {
            mode,
            storage,
            log,
            pending: Arc::new(Mutex::new(HashMap::new())),
            active: Arc::new(AtomicUsize::new(0)),
            max_active: AtomicUsize::new(0),
            played: Mutex::new(Vec::new()),
            outcomes: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn played(&self) -> Vec<String> {
        self.played.lock().unwrap().clone()
    }

    pub fn max_active(&self) -> usize {
        self.max_active.load(Ordering::SeqCst)
    }

    pub fn outcomes(&self) -> Vec<PlaybackOutcome> {
        self.outcomes.lock().unwrap().clone()
    }

    /// 以 Finished 完成当前播放，返回是否有正在播放的条目
    pub fn finish_current(&self, guild_id: GuildId) -> bool {
        complete_pending(
            &self.pending,
            &self.active,
            &self.outcomes,
            guild_id,
            PlaybackOutcome::Finished,
        )
    }
}

fn complete_pending(
    pending: &Mutex<HashMap<GuildId, PlaybackCompletion>>,
    active: &AtomicUsize,
    outcomes: &Mutex<Vec<PlaybackOutcome>>,
    guild_id: GuildId,
    outcome: PlaybackOutcome,
) -> bool {
    let completion = pending.lock().unwrap().remove(&guild_id);
    match completion {
        Some(completion) => {
            active.fetch_sub(1, Ordering::SeqCst);
            outcomes.lock().unwrap().push(outcome.clone());
            completion.complete(outcome);
            true
        }
        None => false,
    }
}

#[async_trait]
impl AudioPlayerPort for FakePlayer {
    async fn play(
        &self,
        guild_id: GuildId,
        clip: &AudioClip,
        on_complete: PlaybackCompletion,
    ) -> Result<(), PlayerError> {
        if let PlayerMode::Reject = self.mode {
            return Err(PlayerError::Unavailable("rejected".to_string()));
        }

        let text = self.storage.text_of(clip.id).unwrap_or_default();
        let now_active = self.active.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_active.fetch_max(now_active, Ordering::SeqCst);
        self.played.lock().unwrap().push(text.clone());
        self.log.push(format!("play:{}", text));
        self.pending.lock().unwrap().insert(guild_id, on_complete);

        if let PlayerMode::AutoComplete(delay) = self.mode {
            let pending = self.pending.clone();
            let active = self.active.clone();
            let outcomes = self.outcomes.clone();
            tokio::spawn(async move {
                tokio::time::sleep(delay).await;
                complete_pending(&pending, &active, &outcomes, guild_id, PlaybackOutcome::Finished);
            });
        }
        Ok(())
    }

    async fn stop(&self, guild_id: GuildId) -> Result<(), PlayerError> {
        complete_pending(
            &self.pending,
            &self.active,
            &self.outcomes,
            guild_id,
            PlaybackOutcome::Stopped,
        );
        Ok(())
    }
}

// ============================================================================
// Gateway
// ============================================================================

pub struct FakeGateway {
    log: EventLog,
    fail_join: AtomicBool,
}

impl FakeGateway {
    pub fn new(log: EventLog) -> Self {
        Self {
            log,
            fail_join: AtomicBool::new(false),
        }
    }

    pub fn set_fail_join(&self, fail: bool) {
        self.fail_join.store(fail, Ordering::SeqCst);
    }
}

#[async_trait]
impl VoiceGatewayPort for FakeGateway {
    async fn join(&self, guild_id: GuildId, channel_id: ChannelId) -> Result<(), GatewayError> {
        if self.fail_join.load(Ordering::SeqCst) {
            return Err(GatewayError::NotConnected);
        }
        self.log.push(format!("join:{}:{}", guild_id, channel_id));
        Ok(())
    }

    async fn leave(&self, guild_id: GuildId) -> Result<(), GatewayError> {
        self.log.push(format!("leave:{}", guild_id));
        Ok(())
    }
}

#[async_trait]
impl NotifierPort for FakeGateway {
    async fn notify(&self, channel_id: ChannelId, message: &str) -> Result<(), GatewayError> {
        self.log.push(format!("notify:{}:{}", channel_id, message));
        Ok(())
    }
}

#[async_trait]
impl MediaSenderPort for FakeGateway {
    async fn send_media(&self, channel_id: ChannelId, url: &str) -> Result<(), GatewayError> {
        self.log.push(format!("media:{}:{}", channel_id, url));
        Ok(())
    }
}

// ============================================================================
// Engine harness
// ============================================================================

pub const DEFAULT_STYLE: StyleId = StyleId::new(3);

pub struct EngineHarness {
    pub engine: Arc<PlaybackEngine>,
    pub synthesizer: Arc<FakeSynthesizer>,
    pub storage: Arc<MemoryAudioStorage>,
    pub player: Arc<FakePlayer>,
    pub gateway: Arc<FakeGateway>,
    pub store: Arc<MemorySettingsStore>,
    pub cache: Arc<InMemorySettingsCache>,
    pub log: EventLog,
}

impl EngineHarness {
    pub fn new(mode: PlayerMode, config: PlaybackEngineConfig) -> Self {
        let log = EventLog::default();
        let synthesizer = Arc::new(FakeSynthesizer::default());
        let storage = Arc::new(MemoryAudioStorage::new());
        let player = Arc::new(FakePlayer::new(mode, storage.clone(), log.clone()));
        let gateway = Arc::new(FakeGateway::new(log.clone()));
        let store = Arc::new(MemorySettingsStore::new());
        let cache = InMemorySettingsCache::new(store.clone()).arc();

        let deps = PlaybackDeps {
            synthesizer: synthesizer.clone(),
            settings: cache.clone(),
            profiles: VoiceProfileResolver::new(cache.clone(), DEFAULT_STYLE),
            storage: storage.clone(),
            player: player.clone(),
            media: gateway.clone(),
        };
        let engine = PlaybackEngine::new(deps, config).arc();

        Self {
            engine,
            synthesizer,
            storage,
            player,
            gateway,
            store,
            cache,
            log,
        }
    }
}
