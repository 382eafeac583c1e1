//! Voice Context - 用户语音配置限界上下文
//!
//! 职责:
//! - 话者目录（话者名 / 风格名 / 风格 ID）
//! - 用户语音设置（部分字段可缺失）
//! - 解析为完整的合成配置

mod aggregate;
mod catalog;
mod errors;
mod value_objects;

pub use aggregate::UserVoiceSettings;
pub use catalog::{SpeakerCatalog, NORMAL_STYLE};
pub use errors::VoiceError;
pub use value_objects::{
    SpeakerChoice, StyleId, VoiceParams, VoiceProfile, DEFAULT_INTENSITY, DEFAULT_PITCH,
    DEFAULT_SPEED, INTENSITY_RANGE, PITCH_RANGE, SPEED_RANGE,
};
