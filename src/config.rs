use std::env;
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::infra::llm::DEFAULT_GEMINI_MODEL;
use crate::workflow::classify::DEFAULT_TIMEOUT;

const CONFIG_DIR_NAME: &str = "triage";
const CONFIG_FILE_NAME: &str = "config.json";

pub const ENV_GEMINI_API_KEY: &str = "GEMINI_API_KEY";
pub const ENV_GEMINI_MODEL: &str = "TRIAGE_GEMINI_MODEL";
pub const ENV_LLM_PROVIDER: &str = "TRIAGE_LLM_PROVIDER";
pub const ENV_TIMEOUT_SECS: &str = "TRIAGE_TIMEOUT_SECS";

/// Runtime configuration, resolved once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub llm_provider: LlmProvider,
    pub request_timeout: Duration,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LlmProvider {
    Gemini,
    Custom(String),
}

impl LlmProvider {
    fn parse(value: &str) -> Self {
        match value.to_lowercase().as_str() {
            "gemini" => LlmProvider::Gemini,
            other => LlmProvider::Custom(other.to_string()),
        }
    }
}

impl AppConfig {
    pub fn load() -> AppResult<Self> {
        let stored = StoredConfig::load()?;
        Self::from_sources(stored, |name| env::var(name).ok())
    }

    /// Merge the stored file with environment overrides; the environment wins.
    pub fn from_sources<F>(stored: StoredConfig, lookup: F) -> AppResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| lookup(name).and_then(non_empty);

        let gemini_api_key = read(ENV_GEMINI_API_KEY).or(stored.gemini_api_key.and_then(non_empty));
        let gemini_model = read(ENV_GEMINI_MODEL)
            .or(stored.gemini_model.and_then(non_empty))
            .unwrap_or_else(|| DEFAULT_GEMINI_MODEL.to_string());
        let llm_provider = read(ENV_LLM_PROVIDER)
            .or(stored.llm_provider.and_then(non_empty))
            .map(|provider| LlmProvider::parse(&provider))
            .unwrap_or(LlmProvider::Gemini);

        let request_timeout = match read(ENV_TIMEOUT_SECS) {
            Some(raw) => parse_timeout(&raw)?,
            None => match stored.timeout_secs {
                Some(secs) => timeout_from_secs(secs)?,
                None => DEFAULT_TIMEOUT,
            },
        };

        Ok(Self {
            gemini_api_key,
            gemini_model,
            llm_provider,
            request_timeout,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

fn parse_timeout(raw: &str) -> AppResult<Duration> {
    let secs = raw.parse::<u64>().map_err(|_| {
        AppError::Configuration(format!("{ENV_TIMEOUT_SECS} must be a whole number of seconds, got '{raw}'"))
    })?;
    timeout_from_secs(secs)
}

fn timeout_from_secs(secs: u64) -> AppResult<Duration> {
    if secs == 0 {
        return Err(AppError::Configuration(
            "request timeout cannot be 0 seconds".to_string(),
        ));
    }
    Ok(Duration::from_secs(secs))
}

/// On-disk configuration written by `triage config init`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoredConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gemini_model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub llm_provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl StoredConfig {
    pub fn load() -> AppResult<Self> {
        let path = config_file_path()?;
        match fs::read_to_string(&path) {
            Ok(contents) => Self::from_json(&contents),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(StoredConfig::default()),
            Err(err) => Err(AppError::Io(err)),
        }
    }

    pub fn from_json(contents: &str) -> AppResult<Self> {
        serde_json::from_str(contents)
            .map_err(|err| AppError::Configuration(format!("invalid config file: {err}")))
    }

    pub fn save(&self) -> AppResult<()> {
        let path = config_file_path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let data = serde_json::to_string_pretty(self)?;
        fs::write(&path, data)?;
        Ok(())
    }
}

pub fn config_directory() -> AppResult<PathBuf> {
    dirs::config_dir()
        .map(|dir| dir.join(CONFIG_DIR_NAME))
        .ok_or_else(|| {
            AppError::Configuration("unable to determine the user config directory".to_string())
        })
}

pub fn config_file_path() -> AppResult<PathBuf> {
    Ok(config_directory()?.join(CONFIG_FILE_NAME))
}
