use std::net::SocketAddr;
use std::str::FromStr;

use thiserror::Error;

/// Application-level constants
pub const APP_NAME: &str = "Inner Canvas";
pub const APP_VERSION: &str = env!("CARGO_PKG_VERSION");

/// OpenAI-compatible endpoint of Baidu AI Studio.
pub const DEFAULT_BASE_URL: &str = "https://aistudio.baidu.com/llm/lmapi/v3";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";
/// Vite and CRA dev servers.
pub const DEFAULT_ALLOWED_ORIGINS: &[&str] = &["http://localhost:5173", "http://localhost:3000"];

pub const CHAT_MODEL: &str = "ernie-4.5-21b-a3b";
pub const CHAT_TEMPERATURE: f32 = 0.7;
pub const IMAGE_MODEL: &str = "Stable-Diffusion-XL";
pub const IMAGE_SIZE: &str = "1024x1024";

/// Upper bound on every upstream call. Expiry is a connectivity failure.
pub const UPSTREAM_TIMEOUT_SECS: u64 = 60;

pub const ENV_API_KEY: &str = "AI_STUDIO_API_KEY";
pub const ENV_BASE_URL: &str = "AI_STUDIO_BASE_URL";
pub const ENV_BIND_ADDR: &str = "INNER_CANVAS_BIND";
pub const ENV_ALLOWED_ORIGINS: &str = "INNER_CANVAS_ALLOWED_ORIGINS";
pub const ENV_SCHEMA_MODE: &str = "INNER_CANVAS_SCHEMA_MODE";

/// Log filter used when `RUST_LOG` is unset.
pub fn default_log_filter() -> &'static str {
    "inner_canvas_lib=info,tower_http=info"
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ConfigError {
    #[error("AI_STUDIO_API_KEY environment variable is required")]
    MissingApiKey,

    #[error("Invalid bind address {value:?}: {reason}")]
    InvalidBindAddr { value: String, reason: String },

    #[error("Invalid schema mode {0:?} (expected json_schema, json_object or off)")]
    InvalidSchemaMode(String),
}

/// How the output contract is attached to completion requests.
///
/// Providers differ in what `response_format` they honor, so this is
/// chosen at startup rather than probed per request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SchemaMode {
    /// Full JSON schema of the response object.
    #[default]
    JsonSchema,
    /// Plain JSON mode, no structure.
    JsonObject,
    /// No `response_format` at all.
    Off,
}

impl FromStr for SchemaMode {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json_schema" => Ok(Self::JsonSchema),
            "json_object" => Ok(Self::JsonObject),
            "off" | "none" => Ok(Self::Off),
            _ => Err(ConfigError::InvalidSchemaMode(s.to_string())),
        }
    }
}

/// Process-wide settings. Loaded once at startup, never mutated.
#[derive(Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub bind_addr: SocketAddr,
    pub allowed_origins: Vec<String>,
    pub schema_mode: SchemaMode,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .field("bind_addr", &self.bind_addr)
            .field("allowed_origins", &self.allowed_origins)
            .field("schema_mode", &self.schema_mode)
            .finish()
    }
}

impl AppConfig {
    /// Load from process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load through an arbitrary variable lookup. Blank values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let api_key = get(ENV_API_KEY).ok_or(ConfigError::MissingApiKey)?;

        let base_url = get(ENV_BASE_URL)
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string())
            .trim_end_matches('/')
            .to_string();

        let bind_raw = get(ENV_BIND_ADDR).unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let bind_addr = bind_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::InvalidBindAddr {
                value: bind_raw.clone(),
                reason: e.to_string(),
            })?;

        let allowed_origins = match get(ENV_ALLOWED_ORIGINS) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|o| !o.is_empty())
                .map(String::from)
                .collect(),
            None => DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
        };

        let schema_mode = match get(ENV_SCHEMA_MODE) {
            Some(raw) => raw.parse()?,
            None => SchemaMode::default(),
        };

        Ok(Self {
            api_key,
            base_url,
            bind_addr,
            allowed_origins,
            schema_mode,
        })
    }
}
