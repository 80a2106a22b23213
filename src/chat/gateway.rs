use anyhow::{bail, Context};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::{config::GatewayConfig, outbound};

use super::dto::TutorResponse;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-flash-latest";

/// Gateway to the generative tutor model. Object-safe so tests can
/// swap in a fake.
#[async_trait]
pub trait TutorGateway: Send + Sync {
    async fn generate(
        &self,
        message: &str,
        level_context: &str,
        vocab_context: &str,
    ) -> anyhow::Result<TutorResponse>;
}

/// The prompt template is the trusted format string; all three inputs
/// are untrusted user text embedded verbatim (injection risk inherited
/// from the product's contract, not sanitized here).
fn build_prompt(message: &str, level_context: &str, vocab_context: &str) -> String {
    format!(
        r#"You are a Japanese language tutor.
**User Profile:** Level: {level_context} | Known Vocab: {vocab_context}
**Instructions:**
1. Reply naturally to: "{message}"
2. Prioritize using KNOWN grammar/vocab.
3. Output JSON only.
4. "reading" must be in HIRAGANA/KATAKANA.
5. If token is PARTICLE/GRAMMAR, provide detailed 'explanation'.

**Output Schema:**
{{
  "segments": [
     {{ "text": "猫", "reading": "ねこ", "meaning": "cat", "explanation": "optional note", "function": "noun" }}
  ],
  "english": "English translation.",
  "grammar_point": "Brief summary."
}}"#
    )
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

pub struct GeminiClient {
    http: reqwest::Client,
    api_key: Option<String>,
}

impl GeminiClient {
    pub fn new(cfg: &GatewayConfig) -> anyhow::Result<Self> {
        Ok(Self {
            http: outbound::client(cfg.timeout_secs)?,
            api_key: cfg.gemini_api_key.clone(),
        })
    }
}

#[async_trait]
impl TutorGateway for GeminiClient {
    async fn generate(
        &self,
        message: &str,
        level_context: &str,
        vocab_context: &str,
    ) -> anyhow::Result<TutorResponse> {
        let Some(api_key) = self.api_key.as_deref() else {
            bail!("AI API key is not configured");
        };

        let prompt = build_prompt(message, level_context, vocab_context);
        let url = format!("{GEMINI_BASE_URL}/{GEMINI_MODEL}:generateContent");
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": { "responseMimeType": "application/json" }
        });

        let response = outbound::send_with_retry("gemini", || {
            self.http
                .post(&url)
                .query(&[("key", api_key)])
                .json(&body)
        })
        .await?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            bail!("tutor model returned {status}: {text}");
        }

        let parsed: GenerateContentResponse =
            response.json().await.context("decode tutor model reply")?;
        let text = parsed
            .candidates
            .first()
            .and_then(|c| c.content.parts.first())
            .map(|p| p.text.as_str())
            .unwrap_or_default();
        debug!(bytes = text.len(), "tutor model replied");

        let reply: TutorResponse =
            serde_json::from_str(text).context("tutor reply is not the expected JSON shape")?;
        reply
            .check_conformance()
            .map_err(|e| anyhow::anyhow!("tutor reply failed schema check: {e}"))?;
        Ok(reply)
    }
}
