//! Voice Commands

use crate::domain::UserId;

/// 设置话者与风格
#[derive(Debug, Clone)]
pub struct SetSpeaker {
    pub user_id: UserId,
    pub speaker_name: String,
    /// 缺省为「ノーマル」
    pub style_name: Option<String>,
}

/// 设置合成参数
#[derive(Debug, Clone)]
pub struct SetVoiceSettings {
    pub user_id: UserId,
    pub intensity: f64,
    pub pitch: f64,
    pub speed: f64,
}
