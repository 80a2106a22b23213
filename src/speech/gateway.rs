use anyhow::{bail, Context};
use async_trait::async_trait;
use bytes::{Bytes, BytesMut};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{config::GatewayConfig, outbound};

/// Voices the speech engine is allowed to use. Anything else falls
/// back to the default before the gateway is invoked.
pub const VALID_VOICES: &[&str] = &[
    "ja-JP-NanamiNeural",
    "ja-JP-KeitaNeural",
    "ja-JP-AoiNeural",
    "ja-JP-DaichiNeural",
    "ja-JP-MayuNeural",
    "ja-JP-NaokiNeural",
    "ja-JP-ShioriNeural",
];
pub const DEFAULT_VOICE: &str = "ja-JP-NanamiNeural";

pub fn resolve_voice(requested: Option<&str>) -> &'static str {
    requested
        .and_then(|v| VALID_VOICES.iter().find(|known| **known == v))
        .copied()
        .unwrap_or(DEFAULT_VOICE)
}

/// Stateless proxy to the ASR container.
#[async_trait]
pub trait TranscriptionGateway: Send + Sync {
    async fn transcribe(
        &self,
        file_name: String,
        content_type: String,
        audio: Bytes,
    ) -> anyhow::Result<String>;
}

/// Proxy to the speech-synthesis engine.
#[async_trait]
pub trait SpeechGateway: Send + Sync {
    async fn synthesize(&self, text: &str, voice: &str) -> anyhow::Result<Bytes>;
}

#[derive(Debug, Deserialize)]
struct AsrResponse {
    #[serde(default)]
    text: String,
}

pub struct WhisperClient {
    http: reqwest::Client,
    base_url: String,
}

impl WhisperClient {
    pub fn new(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: outbound::client(cfg.timeout_secs)?,
            base_url: cfg.whisper_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl TranscriptionGateway for WhisperClient {
    async fn transcribe(
        &self,
        file_name: String,
        content_type: String,
        audio: Bytes,
    ) -> anyhow::Result<String> {
        let url = format!("{}/asr", self.base_url);

        // The form is rebuilt per attempt; Bytes clones are cheap.
        let response = outbound::send_with_retry("whisper", || {
            let part = reqwest::multipart::Part::bytes(audio.to_vec())
                .file_name(file_name.clone());
            let part = match part.mime_str(&content_type) {
                Ok(p) => p,
                Err(_) => reqwest::multipart::Part::bytes(audio.to_vec())
                    .file_name(file_name.clone()),
            };
            self.http
                .post(&url)
                .query(&[("language", "ja"), ("output", "json")])
                .multipart(reqwest::multipart::Form::new().part("audio_file", part))
        })
        .await?;

        if !response.status().is_success() {
            bail!("Transcription failed");
        }

        let parsed: AsrResponse = response.json().await.context("decode ASR reply")?;
        Ok(parsed.text)
    }
}

pub struct TtsClient {
    http: reqwest::Client,
    base_url: String,
}

impl TtsClient {
    pub fn new(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: outbound::client(cfg.timeout_secs)?,
            base_url: cfg.tts_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl SpeechGateway for TtsClient {
    /// Consume the engine's chunk stream and hand back one buffer.
    /// Any mid-stream error discards everything accumulated so far;
    /// partial audio is never returned.
    async fn synthesize(&self, text: &str, voice: &str) -> anyhow::Result<Bytes> {
        let url = format!("{}/synthesize", self.base_url);
        let body = json!({ "text": text, "voice": voice });

        let mut response =
            outbound::send_with_retry("tts", || self.http.post(&url).json(&body)).await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            bail!("speech engine returned {status}: {detail}");
        }

        let mut audio = BytesMut::new();
        while let Some(chunk) = response.chunk().await.context("read audio stream")? {
            audio.extend_from_slice(&chunk);
        }
        debug!(bytes = audio.len(), voice, "speech synthesized");
        Ok(audio.freeze())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_voice_is_kept() {
        assert_eq!(resolve_voice(Some("ja-JP-KeitaNeural")), "ja-JP-KeitaNeural");
    }

    #[test]
    fn unknown_voice_falls_back_to_default() {
        assert_eq!(resolve_voice(Some("en-US-GuyNeural")), DEFAULT_VOICE);
        assert_eq!(resolve_voice(Some("")), DEFAULT_VOICE);
        assert_eq!(resolve_voice(None), DEFAULT_VOICE);
    }

    #[test]
    fn default_voice_is_in_the_allow_list() {
        assert!(VALID_VOICES.contains(&DEFAULT_VOICE));
    }

    #[test]
    fn asr_reply_without_text_defaults_to_empty() {
        let parsed: AsrResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.text.is_empty());
    }
}
