use tracing::warn;

#[derive(Debug, Clone)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_days: i64,
}

/// Endpoints and credentials for the outbound gateways (AI tutor,
/// speech transcription, speech synthesis).
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub gemini_api_key: Option<String>,
    pub whisper_url: String,
    pub tts_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Absent DSN puts the whole persistence layer into a permanent
    /// unavailable state; the process still starts.
    pub database_url: Option<String>,
    pub jwt: JwtConfig,
    pub gateways: GatewayConfig,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.into())
}

impl AppConfig {
    pub fn from_env() -> Self {
        let database_url = std::env::var("DATABASE_URL").ok();

        let secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
            warn!("JWT_SECRET not set, using development default");
            "dev-secret-change-in-production".into()
        });
        let jwt = JwtConfig {
            secret,
            issuer: env_or("JWT_ISSUER", "kotoba"),
            audience: env_or("JWT_AUDIENCE", "kotoba-users"),
            ttl_days: std::env::var("JWT_TTL_DAYS")
                .ok()
                .and_then(|v| v.parse::<i64>().ok())
                .unwrap_or(7),
        };

        let gateways = GatewayConfig {
            // Both variable names are in circulation; prefer the specific one.
            gemini_api_key: std::env::var("GEMINI_API_KEY")
                .ok()
                .or_else(|| std::env::var("AI_API_KEY").ok()),
            whisper_url: env_or("WHISPER_URL", "http://whisper:9000"),
            tts_url: env_or("TTS_URL", "http://tts:5500"),
            timeout_secs: std::env::var("GATEWAY_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(30),
        };

        Self {
            database_url,
            jwt,
            gateways,
        }
    }
}
