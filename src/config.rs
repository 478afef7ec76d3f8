use crate::error::{Error, Result};
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub database_url: String,
    pub gemini_api_key: String,
    pub gemini_base_url: String,
    pub quiz_model: String,
    pub resume_model: String,
    pub markdown_proxy_url: String,
    pub public_base_url: String,
    pub cors_origin: Option<String>,
    pub generation_rps: u32,
    pub public_rps: u32,
    pub session_ttl_minutes: u64,
    pub http_timeout_secs: u64,
    pub shuffle_options: bool,
    pub log_format: LogFormat,
    pub generation: GenerationSettings,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Pretty,
    Json,
}

impl std::str::FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pretty" | "text" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format '{}'", other)),
        }
    }
}

/// Sampling parameters sent with every quiz generation request.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationSettings {
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            temperature: 1.0,
            top_p: 0.95,
            top_k: 64,
            max_output_tokens: 8192,
        }
    }
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();

        let defaults = GenerationSettings::default();

        Ok(Self {
            server_address: get_env("SERVER_ADDRESS")?,
            database_url: get_env("DATABASE_URL")?,
            gemini_api_key: get_env("GEMINI_API_KEY")?,
            gemini_base_url: get_env_or(
                "GEMINI_BASE_URL",
                "https://generativelanguage.googleapis.com",
            ),
            quiz_model: get_env_or("QUIZ_MODEL", "gemini-1.5-flash"),
            resume_model: get_env_or("RESUME_MODEL", "gemini-pro"),
            markdown_proxy_url: get_env_or("MARKDOWN_PROXY_URL", "https://md.dhr.wtf"),
            public_base_url: get_env_or("PUBLIC_BASE_URL", "http://localhost:3000"),
            cors_origin: env::var("CORS_ORIGIN").ok().filter(|v| !v.trim().is_empty()),
            generation_rps: get_env_parse_or("GENERATION_RPS", 5)?,
            public_rps: get_env_parse_or("PUBLIC_RPS", 50)?,
            session_ttl_minutes: get_env_parse_or("SESSION_TTL_MINUTES", 120)?,
            http_timeout_secs: get_env_parse_or("HTTP_TIMEOUT_SECS", 60)?,
            shuffle_options: get_env_parse_or("SHUFFLE_OPTIONS", false)?,
            log_format: get_env_parse_or("LOG_FORMAT", LogFormat::Pretty)?,
            generation: GenerationSettings {
                temperature: get_env_parse_or("GENERATION_TEMPERATURE", defaults.temperature)?,
                top_p: get_env_parse_or("GENERATION_TOP_P", defaults.top_p)?,
                top_k: get_env_parse_or("GENERATION_TOP_K", defaults.top_k)?,
                max_output_tokens: get_env_parse_or(
                    "GENERATION_MAX_OUTPUT_TOKENS",
                    defaults.max_output_tokens,
                )?,
            },
        })
    }

    pub fn share_url(&self, quiz_id: uuid::Uuid) -> String {
        format!("{}/quiz/{}", self.public_base_url.trim_end_matches('/'), quiz_id)
    }
}

fn get_env(name: &str) -> Result<String> {
    env::var(name).map_err(|_| Error::Config(format!("Missing environment variable: {}", name)))
}

fn get_env_or(name: &str, default: &str) -> String {
    env::var(name)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(name) {
        Ok(raw) if !raw.trim().is_empty() => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        _ => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn share_url_joins_base_and_id() {
        let id = uuid::Uuid::nil();
        let config = Config {
            server_address: "127.0.0.1:0".into(),
            database_url: "postgres://localhost/quiz".into(),
            gemini_api_key: "test".into(),
            gemini_base_url: "http://localhost".into(),
            quiz_model: "gemini-1.5-flash".into(),
            resume_model: "gemini-pro".into(),
            markdown_proxy_url: "http://localhost".into(),
            public_base_url: "https://quiz.example.com/".into(),
            cors_origin: None,
            generation_rps: 5,
            public_rps: 50,
            session_ttl_minutes: 120,
            http_timeout_secs: 60,
            shuffle_options: false,
            log_format: LogFormat::Pretty,
            generation: GenerationSettings::default(),
        };
        assert_eq!(
            config.share_url(id),
            "https://quiz.example.com/quiz/00000000-0000-0000-0000-000000000000"
        );
    }

    #[test]
    fn log_format_parses_case_insensitively() {
        assert_eq!("JSON".parse::<LogFormat>(), Ok(LogFormat::Json));
        assert_eq!("pretty".parse::<LogFormat>(), Ok(LogFormat::Pretty));
        assert!("xml".parse::<LogFormat>().is_err());
    }
}
