//! Service configuration and provider factory.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use interviewbot_core::error::ServiceError;
use interviewbot_core::gateway::GatewayModels;
use interviewbot_core::prompts::{DEFAULT_CHAT_MODEL, DEFAULT_TRANSCRIPTION_MODEL};
use interviewbot_core::traits::ModelProvider;

use crate::groq::{GroqProvider, DEFAULT_TIMEOUT_SECS};

/// Environment variable holding the remote API credential.
pub const API_KEY_ENV: &str = "GROQ_API_KEY";

/// Connection settings for the remote model API.
///
/// Note: Custom Debug impl masks the API key to prevent accidental exposure in logs.
#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &"***")
            .field("base_url", &self.base_url)
            .field("timeout_secs", &self.timeout_secs)
            .finish()
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: None,
            timeout_secs: default_timeout(),
        }
    }
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Default cap on audio uploads, matching the remote transcription limit.
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;

/// HTTP server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Origins allowed to call the API from a browser.
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
    /// Where uploads are staged while being transcribed. Defaults to the
    /// system temp directory.
    #[serde(default)]
    pub scratch_dir: Option<PathBuf>,
    /// Largest audio upload accepted, in bytes.
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8000
}
fn default_max_upload_bytes() -> usize {
    DEFAULT_MAX_UPLOAD_BYTES
}
fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:5173".to_string(),
        "http://127.0.0.1:5173".to_string(),
    ]
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            allowed_origins: default_allowed_origins(),
            scratch_dir: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Top-level interviewbot configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InterviewbotConfig {
    #[serde(default)]
    pub provider: ProviderConfig,
    /// Chat-completion model for questions and evaluations.
    #[serde(default = "default_chat_model")]
    pub chat_model: String,
    /// Speech-to-text model.
    #[serde(default = "default_transcription_model")]
    pub transcription_model: String,
    /// SQLite file holding the `sessions` table.
    #[serde(default = "default_database_path")]
    pub database_path: PathBuf,
    #[serde(default)]
    pub server: ServerConfig,
}

fn default_chat_model() -> String {
    DEFAULT_CHAT_MODEL.to_string()
}
fn default_transcription_model() -> String {
    DEFAULT_TRANSCRIPTION_MODEL.to_string()
}
fn default_database_path() -> PathBuf {
    PathBuf::from("ai_interview.db")
}

impl Default for InterviewbotConfig {
    fn default() -> Self {
        Self {
            provider: ProviderConfig::default(),
            chat_model: default_chat_model(),
            transcription_model: default_transcription_model(),
            database_path: default_database_path(),
            server: ServerConfig::default(),
        }
    }
}

impl InterviewbotConfig {
    /// Model identifiers for the gateway.
    pub fn gateway_models(&self) -> GatewayModels {
        GatewayModels {
            chat: self.chat_model.clone(),
            transcription: self.transcription_model.clone(),
        }
    }

    /// Apply the API key from the environment, if one is set.
    pub fn apply_api_key(&mut self, key: Option<String>) {
        if let Some(key) = key.filter(|k| !k.trim().is_empty()) {
            self.provider.api_key = key;
        }
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
fn resolve_env_vars(s: &str) -> String {
    let mut result = s.to_string();
    while let Some(start) = result.find("${") {
        if let Some(end) = result[start..].find('}') {
            let var_name = &result[start + 2..start + end];
            let value = std::env::var(var_name).unwrap_or_default();
            result = format!(
                "{}{}{}",
                &result[..start],
                value,
                &result[start + end + 1..]
            );
        } else {
            break;
        }
    }
    result
}

/// Load config from an explicit path, or search the well-known paths.
///
/// Search order:
/// 1. `interviewbot.toml` in the current directory
/// 2. `~/.config/interviewbot/config.toml`
///
/// `GROQ_API_KEY` overrides any key found in a file.
pub fn load_config_from(path: Option<&Path>) -> Result<InterviewbotConfig, ServiceError> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            return Err(ServiceError::Config(format!(
                "config file not found: {}",
                p.display()
            )));
        }
    } else {
        let local = PathBuf::from("interviewbot.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path).map_err(|e| {
                ServiceError::Config(format!("failed to read config {}: {e}", path.display()))
            })?;
            parse_config(&content).map_err(|e| {
                ServiceError::Config(format!("failed to parse config {}: {e}", path.display()))
            })?
        }
        None => InterviewbotConfig::default(),
    };

    config.apply_api_key(std::env::var(API_KEY_ENV).ok());

    Ok(config)
}

/// Parse a TOML config document, resolving `${VAR}` references in provider settings.
pub fn parse_config(content: &str) -> Result<InterviewbotConfig, toml::de::Error> {
    let mut config: InterviewbotConfig = toml::from_str(content)?;
    config.provider.api_key = resolve_env_vars(&config.provider.api_key);
    config.provider.base_url = config.provider.base_url.as_deref().map(resolve_env_vars);
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("interviewbot"))
}

/// Create the provider described by `config`.
///
/// Fails when no API key is configured, so a misconfigured process never
/// serves a request.
pub fn create_provider(config: &ProviderConfig) -> Result<Arc<dyn ModelProvider>, ServiceError> {
    if config.api_key.trim().is_empty() {
        return Err(ServiceError::Config(format!(
            "{API_KEY_ENV} not set. Please create a .env file or export {API_KEY_ENV}."
        )));
    }

    let provider = GroqProvider::new(&config.api_key, config.base_url.clone(), config.timeout_secs)?;
    Ok(Arc::new(provider))
}
