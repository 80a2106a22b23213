use std::sync::Arc;

use crate::{
    chat::gateway::{GeminiClient, TutorGateway},
    config::AppConfig,
    db::Db,
    speech::gateway::{SpeechGateway, TranscriptionGateway, TtsClient, WhisperClient},
};

#[derive(Clone)]
pub struct AppState {
    pub db: Db,
    pub config: Arc<AppConfig>,
    pub tutor: Arc<dyn TutorGateway>,
    pub asr: Arc<dyn TranscriptionGateway>,
    pub tts: Arc<dyn SpeechGateway>,
}

impl AppState {
    pub fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env());
        let db = Db::connect(config.database_url.as_deref());

        let tutor = Arc::new(GeminiClient::new(&config.gateways)?) as Arc<dyn TutorGateway>;
        let asr = Arc::new(WhisperClient::new(&config.gateways)?) as Arc<dyn TranscriptionGateway>;
        let tts = Arc::new(TtsClient::new(&config.gateways)?) as Arc<dyn SpeechGateway>;

        Ok(Self {
            db,
            config,
            tutor,
            asr,
            tts,
        })
    }

    /// State with fake gateways and no database, for unit tests.
    pub fn fake() -> Self {
        use axum::async_trait;
        use bytes::Bytes;

        use crate::chat::dto::{TutorResponse, TutorSegment};
        use crate::config::{GatewayConfig, JwtConfig};

        struct FakeTutor;
        #[async_trait]
        impl TutorGateway for FakeTutor {
            async fn generate(
                &self,
                message: &str,
                _level_context: &str,
                _vocab_context: &str,
            ) -> anyhow::Result<TutorResponse> {
                Ok(TutorResponse {
                    segments: vec![TutorSegment {
                        text: "猫".into(),
                        reading: "ねこ".into(),
                        meaning: "cat".into(),
                        explanation: None,
                        function: "noun".into(),
                    }],
                    english: format!("echo: {message}"),
                    grammar_point: String::new(),
                })
            }
        }

        struct FakeAsr;
        #[async_trait]
        impl TranscriptionGateway for FakeAsr {
            async fn transcribe(
                &self,
                _file_name: String,
                _content_type: String,
                _audio: Bytes,
            ) -> anyhow::Result<String> {
                Ok("こんにちは".into())
            }
        }

        struct FakeTts;
        #[async_trait]
        impl SpeechGateway for FakeTts {
            async fn synthesize(&self, text: &str, voice: &str) -> anyhow::Result<Bytes> {
                Ok(Bytes::from(format!("{voice}:{text}")))
            }
        }

        let config = Arc::new(AppConfig {
            database_url: None,
            jwt: JwtConfig {
                secret: "test".into(),
                issuer: "test-issuer".into(),
                audience: "test-aud".into(),
                ttl_days: 7,
            },
            gateways: GatewayConfig {
                gemini_api_key: None,
                whisper_url: "http://whisper.invalid".into(),
                tts_url: "http://tts.invalid".into(),
                timeout_secs: 5,
            },
        });

        Self {
            db: Db::unavailable(),
            config,
            tutor: Arc::new(FakeTutor),
            asr: Arc::new(FakeAsr),
            tts: Arc::new(FakeTts),
        }
    }
}
