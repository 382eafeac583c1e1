//! Voice Context - Value Objects

use serde::{Deserialize, Serialize};
use std::ops::RangeInclusive;

use super::VoiceError;

/// 抑扬（intonationScale）允许范围
pub const INTENSITY_RANGE: RangeInclusive<f64> = 0.5..=1.5;
/// 音高（pitchScale）允许范围
pub const PITCH_RANGE: RangeInclusive<f64> = 0.0..=0.15;
/// 语速（speedScale）允许范围
pub const SPEED_RANGE: RangeInclusive<f64> = 0.5..=2.0;

pub const DEFAULT_INTENSITY: f64 = 1.0;
pub const DEFAULT_PITCH: f64 = 0.0;
pub const DEFAULT_SPEED: f64 = 1.0;

/// VOICEVOX 风格 ID（即合成接口的 `speaker` 参数）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StyleId(u32);

impl StyleId {
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StyleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// 用户选择的话者与风格
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerChoice {
    pub speaker_name: String,
    pub style_name: String,
    pub style_id: StyleId,
}

/// 合成参数
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceParams {
    /// 抑扬 (0.5 - 1.5)
    pub intensity: f64,
    /// 音高 (0.0 - 0.15)
    pub pitch: f64,
    /// 语速 (0.5 - 2.0)
    pub speed: f64,
}

impl Default for VoiceParams {
    fn default() -> Self {
        Self {
            intensity: DEFAULT_INTENSITY,
            pitch: DEFAULT_PITCH,
            speed: DEFAULT_SPEED,
        }
    }
}

fn check_range(
    field: &'static str,
    value: f64,
    range: &RangeInclusive<f64>,
) -> Result<(), VoiceError> {
    if range.contains(&value) {
        Ok(())
    } else {
        Err(VoiceError::OutOfRange {
            field,
            value,
            min: *range.start(),
            max: *range.end(),
        })
    }
}

impl VoiceParams {
    pub fn new(intensity: f64, pitch: f64, speed: f64) -> Result<Self, VoiceError> {
        let params = Self {
            intensity,
            pitch,
            speed,
        };
        params.validate()?;
        Ok(params)
    }

    pub fn validate(&self) -> Result<(), VoiceError> {
        check_range("intensity", self.intensity, &INTENSITY_RANGE)?;
        check_range("pitch", self.pitch, &PITCH_RANGE)?;
        check_range("speed", self.speed, &SPEED_RANGE)?;
        Ok(())
    }
}

/// 解析后的完整合成配置
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VoiceProfile {
    /// 未设置话者时为 None（使用系统默认风格）
    pub speaker: Option<SpeakerChoice>,
    pub style_id: StyleId,
    pub intensity: f64,
    pub pitch: f64,
    pub speed: f64,
}

impl VoiceProfile {
    /// 系统默认配置
    pub fn system_default(default_style: StyleId) -> Self {
        let params = VoiceParams::default();
        Self {
            speaker: None,
            style_id: default_style,
            intensity: params.intensity,
            pitch: params.pitch,
            speed: params.speed,
        }
    }
}
