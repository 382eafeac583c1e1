//! Voice Context - Errors

use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum VoiceError {
    #[error("無効な話者名です: {name}（有効な話者: {valid}）")]
    UnknownSpeaker { name: String, valid: String },

    #[error("話者 {0} にはノーマルスタイルがありません")]
    NoDefaultStyle(String),

    #[error("{field} は {min} から {max} の範囲で指定してください: {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
