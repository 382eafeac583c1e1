//! Synthesis Engine Port - 语音合成服务抽象
//!
//! 两步调用：先取合成参数（recipe），写入用户配置后再合成音频。
//! 任一步失败都返回单个 SynthesisError，不返回部分音频，不做重试。

use async_trait::async_trait;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::domain::voice::{StyleId, VoiceProfile};

/// 失败发生的步骤
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisStep {
    /// audio_query
    Query,
    /// synthesis
    Synthesis,
}

impl SynthesisStep {
    pub fn as_str(&self) -> &'static str {
        match self {
            SynthesisStep::Query => "query",
            SynthesisStep::Synthesis => "synthesis",
        }
    }
}

impl std::fmt::Display for SynthesisStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 底层原因
#[derive(Debug, Error)]
pub enum SynthesisCause {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: HTTP {status}: {body}")]
    ServiceError { status: u16, body: String },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 合成错误
#[derive(Debug, Error)]
#[error("Synthesis failed at {step} step: {cause}")]
pub struct SynthesisError {
    pub step: SynthesisStep,
    #[source]
    pub cause: SynthesisCause,
}

impl SynthesisError {
    pub fn new(step: SynthesisStep, cause: SynthesisCause) -> Self {
        Self { step, cause }
    }

    pub fn query(cause: SynthesisCause) -> Self {
        Self::new(SynthesisStep::Query, cause)
    }

    pub fn synthesis(cause: SynthesisCause) -> Self {
        Self::new(SynthesisStep::Synthesis, cause)
    }
}

pub const INTONATION_SCALE: &str = "intonationScale";
pub const PITCH_SCALE: &str = "pitchScale";
pub const SPEED_SCALE: &str = "speedScale";

/// 合成参数（audio_query 的返回值）
///
/// 只改写三个缩放字段，其余字段原样回传给 synthesis
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisRecipe(Map<String, Value>);

impl SynthesisRecipe {
    pub fn from_value(value: Value) -> Result<Self, SynthesisCause> {
        match value {
            Value::Object(map) => Ok(Self(map)),
            other => Err(SynthesisCause::InvalidResponse(format!(
                "audio query is not an object: {}",
                other
            ))),
        }
    }

    /// 写入用户的抑扬 / 音高 / 语速
    pub fn apply_profile(&mut self, profile: &VoiceProfile) {
        self.set_f64(INTONATION_SCALE, profile.intensity);
        self.set_f64(PITCH_SCALE, profile.pitch);
        self.set_f64(SPEED_SCALE, profile.speed);
    }

    fn set_f64(&mut self, key: &str, value: f64) {
        let number = serde_json::Number::from_f64(value)
            .map(Value::Number)
            .unwrap_or(Value::Null);
        self.0.insert(key.to_string(), number);
    }

    pub fn get_f64(&self, key: &str) -> Option<f64> {
        self.0.get(key).and_then(Value::as_f64)
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

/// 合成结果
#[derive(Debug, Clone)]
pub struct SynthesizedAudio {
    /// 原始音频数据（WAV）
    pub audio_data: Vec<u8>,
    pub style_id: StyleId,
}

/// Synthesis Engine Port
#[async_trait]
pub trait SynthesisEnginePort: Send + Sync {
    /// 执行 query -> 改写 -> synthesis 两步合成
    async fn synthesize(
        &self,
        text: &str,
        profile: &VoiceProfile,
    ) -> Result<SynthesizedAudio, SynthesisError>;

    /// 检查合成服务是否可用
    async fn health_check(&self) -> bool {
        true
    }
}
