//! Voice Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{SpeakerChoice, StyleId, VoiceParams, VoiceProfile};
use crate::domain::UserId;

/// 用户语音设置聚合根
///
/// 每个字段都可能缺失，缺失时在解析阶段回落到系统默认值。
/// 写入为最后写入者获胜，无版本控制。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserVoiceSettings {
    pub user_id: UserId,
    pub speaker: Option<SpeakerChoice>,
    pub intensity: Option<f64>,
    pub pitch: Option<f64>,
    pub speed: Option<f64>,
    pub updated_at: DateTime<Utc>,
}

impl UserVoiceSettings {
    pub fn new(user_id: UserId) -> Self {
        Self {
            user_id,
            speaker: None,
            intensity: None,
            pitch: None,
            speed: None,
            updated_at: Utc::now(),
        }
    }

    /// 更新话者选择，保留合成参数
    pub fn set_speaker(&mut self, choice: SpeakerChoice) {
        self.speaker = Some(choice);
        self.updated_at = Utc::now();
    }

    /// 更新合成参数，保留话者选择
    pub fn set_params(&mut self, params: VoiceParams) {
        self.intensity = Some(params.intensity);
        self.pitch = Some(params.pitch);
        self.speed = Some(params.speed);
        self.updated_at = Utc::now();
    }

    /// 解析为完整配置，缺失字段取默认值
    pub fn resolve(&self, default_style: StyleId) -> VoiceProfile {
        let defaults = VoiceParams::default();
        VoiceProfile {
            style_id: self
                .speaker
                .as_ref()
                .map(|s| s.style_id)
                .unwrap_or(default_style),
            speaker: self.speaker.clone(),
            intensity: self.intensity.unwrap_or(defaults.intensity),
            pitch: self.pitch.unwrap_or(defaults.pitch),
            speed: self.speed.unwrap_or(defaults.speed),
        }
    }
}
