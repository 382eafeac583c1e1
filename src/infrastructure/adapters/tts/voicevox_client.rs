//! VOICEVOX Client - 调用 VOICEVOX ENGINE HTTP API
//!
//! 实现 SynthesisEnginePort，两步调用：
//! POST {base}/audio_query?text=..&speaker=..   -> 合成参数 (JSON)
//! POST {base}/synthesis?speaker=..  body=参数   -> audio/wav

use async_trait::async_trait;
use reqwest::{Client, Response};
use serde_json::Value;
use std::time::Duration;

use crate::application::ports::{
    SynthesisCause, SynthesisEnginePort, SynthesisError, SynthesisRecipe, SynthesisStep,
    SynthesizedAudio,
};
use crate::domain::voice::VoiceProfile;

/// VOICEVOX 客户端配置
#[derive(Debug, Clone)]
pub struct VoicevoxClientConfig {
    /// VOICEVOX ENGINE 基础 URL
    pub base_url: String,
    /// 单次请求超时时间（秒）
    pub timeout_secs: u64,
}

impl Default for VoicevoxClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:50021".to_string(),
            timeout_secs: 30,
        }
    }
}

impl VoicevoxClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// VOICEVOX 客户端
pub struct VoicevoxClient {
    client: Client,
    base_url: String,
}

fn transport_error(step: SynthesisStep, e: reqwest::Error) -> SynthesisError {
    let cause = if e.is_timeout() {
        SynthesisCause::Timeout
    } else if e.is_connect() {
        SynthesisCause::NetworkError(format!("Cannot connect to VOICEVOX: {}", e))
    } else {
        SynthesisCause::NetworkError(e.to_string())
    };
    SynthesisError::new(step, cause)
}

/// 非 2xx 状态转换为 ServiceError
async fn ensure_success(
    step: SynthesisStep,
    response: Response,
) -> Result<Response, SynthesisError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(SynthesisError::new(
        step,
        SynthesisCause::ServiceError {
            status: status.as_u16(),
            body,
        },
    ))
}

impl VoicevoxClient {
    pub fn new(config: VoicevoxClientConfig) -> Result<Self, SynthesisError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SynthesisError::query(SynthesisCause::NetworkError(e.to_string())))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// 第一步：取合成参数
    async fn audio_query(
        &self,
        text: &str,
        speaker: u32,
    ) -> Result<SynthesisRecipe, SynthesisError> {
        let step = SynthesisStep::Query;
        let response = self
            .client
            .post(self.url("audio_query"))
            .query(&[("text", text.to_string()), ("speaker", speaker.to_string())])
            .send()
            .await
            .map_err(|e| transport_error(step, e))?;
        let response = ensure_success(step, response).await?;

        let value: Value = response.json().await.map_err(|e| {
            SynthesisError::new(step, SynthesisCause::InvalidResponse(e.to_string()))
        })?;
        SynthesisRecipe::from_value(value).map_err(|cause| SynthesisError::new(step, cause))
    }

    /// 第二步：用改写后的参数合成
    async fn synthesis(
        &self,
        recipe: &SynthesisRecipe,
        speaker: u32,
    ) -> Result<Vec<u8>, SynthesisError> {
        let step = SynthesisStep::Synthesis;
        let response = self
            .client
            .post(self.url("synthesis"))
            .query(&[("speaker", speaker.to_string())])
            .json(recipe.as_map())
            .send()
            .await
            .map_err(|e| transport_error(step, e))?;
        let response = ensure_success(step, response).await?;

        let audio = response.bytes().await.map_err(|e| {
            SynthesisError::new(
                step,
                SynthesisCause::InvalidResponse(format!("Failed to read audio: {}", e)),
            )
        })?;
        if audio.is_empty() {
            return Err(SynthesisError::new(
                step,
                SynthesisCause::InvalidResponse("empty audio body".to_string()),
            ));
        }
        Ok(audio.to_vec())
    }
}

#[async_trait]
impl SynthesisEnginePort for VoicevoxClient {
    async fn synthesize(
        &self,
        text: &str,
        profile: &VoiceProfile,
    ) -> Result<SynthesizedAudio, SynthesisError> {
        let speaker = profile.style_id.get();

        tracing::debug!(
            speaker = speaker,
            text_len = text.chars().count(),
            "Sending audio query"
        );
        let mut recipe = self.audio_query(text, speaker).await?;
        recipe.apply_profile(profile);

        let audio_data = self.synthesis(&recipe, speaker).await?;

        tracing::info!(
            speaker = speaker,
            audio_size = audio_data.len(),
            "Synthesis completed"
        );

        Ok(SynthesizedAudio {
            audio_data,
            style_id: profile.style_id,
        })
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.url("version"))
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}
