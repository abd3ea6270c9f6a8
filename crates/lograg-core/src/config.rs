//! Configuration loader and typed settings.
//!
//! Uses Figment to merge `config.toml` + `config.<env>.toml` + `APP_*` env vars
//! (`__` separates nested keys, e.g. `APP_INGEST__BATCH_SIZE`). Every setting
//! has a default, so an empty configuration is valid.

use figment::{
    providers::{Env, Format, Toml},
    Figment,
};
use serde::Deserialize;
use std::env;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::extract::{default_rules, FieldRule};

pub struct Config {
    figment: Figment,
}

impl Config {
    pub fn load() -> Result<Self> { Self::load_from(None) }

    /// Like [`Config::load`], but reads `path` instead of `config.toml` when given.
    pub fn load_from(path: Option<&Path>) -> Result<Self> {
        let env_name = env::var("RUST_ENV").unwrap_or_else(|_| "dev".to_string());

        let base = path.map_or_else(|| PathBuf::from("config.toml"), Path::to_path_buf);
        let mut figment = Figment::new().merge(Toml::file(&base));
        match env_name.as_str() {
            "dev" | "development" => figment = figment.merge(Toml::file("config.dev.toml")),
            "prod" | "production" => figment = figment.merge(Toml::file("config.prod.toml")),
            "test" | "testing" => figment = figment.merge(Toml::file("config.test.toml")),
            _ => {}
        }
        figment = figment.merge(Env::prefixed("APP_").split("__"));
        tracing::debug!(env = %env_name, file = %base.display(), "configuration sources merged");

        Ok(Self { figment })
    }

    pub fn from_figment(figment: Figment) -> Self { Self { figment } }

    pub fn from_toml_str(toml: &str) -> Self { Self { figment: Figment::new().merge(Toml::string(toml)) } }

    pub fn get<T>(&self, key: &str) -> anyhow::Result<T>
    where
        T: serde::de::DeserializeOwned,
    {
        self.figment
            .extract_inner(key)
            .map_err(|e| anyhow::anyhow!("Failed to get '{}': {}", key, e))
    }

    /// Typed settings with defaults for every missing key, validated.
    pub fn settings(&self) -> Result<Settings> {
        let settings: Settings = self.figment.extract().map_err(Box::new)?;
        settings.validate()?;
        Ok(settings)
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub ingest: IngestSettings,
    pub embedding: EmbeddingSettings,
    pub llm: LlmSettings,
    pub summary: SummarySettings,
    pub log: LogSettings,
    pub rules: Vec<FieldRule>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            ingest: IngestSettings::default(),
            embedding: EmbeddingSettings::default(),
            llm: LlmSettings::default(),
            summary: SummarySettings::default(),
            log: LogSettings::default(),
            rules: default_rules(),
        }
    }
}

impl Settings {
    fn validate(&self) -> Result<()> {
        if self.ingest.batch_size == 0 {
            return Err(Error::InvalidConfig("ingest.batch_size must be greater than zero".into()));
        }
        if self.summary.chunk_size == 0 {
            return Err(Error::InvalidConfig("summary.chunk_size must be greater than zero".into()));
        }
        if self.embedding.dimensions == Some(0) {
            return Err(Error::InvalidConfig("embedding.dimensions must be greater than zero".into()));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct IngestSettings {
    pub batch_size: usize,
    pub skip_blank_lines: bool,
}

impl Default for IngestSettings {
    fn default() -> Self { Self { batch_size: 100, skip_blank_lines: true } }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EmbeddingSettings {
    /// `openai` or `hash`.
    pub provider: String,
    pub base_url: String,
    pub model: String,
    pub dimensions: Option<usize>,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: "openai".to_string(),
            base_url: "https://api.openai.com/v1".to_string(),
            model: "text-embedding-3-small".to_string(),
            dimensions: None,
            api_key: None,
            timeout_secs: 60,
        }
    }
}

impl EmbeddingSettings {
    pub fn api_key(&self) -> Option<String> { resolve_api_key(self.api_key.as_deref()) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub base_url: String,
    pub model: String,
    pub max_tokens: u32,
    pub api_key: Option<String>,
    pub timeout_secs: u64,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            base_url: "https://api.openai.com/v1".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            max_tokens: 1500,
            api_key: None,
            timeout_secs: 120,
        }
    }
}

impl LlmSettings {
    pub fn api_key(&self) -> Option<String> { resolve_api_key(self.api_key.as_deref()) }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SummarySettings {
    pub chunk_size: usize,
}

impl Default for SummarySettings {
    fn default() -> Self { Self { chunk_size: 2000 } }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LogSettings {
    pub level: String,
}

impl Default for LogSettings {
    fn default() -> Self { Self { level: "info".to_string() } }
}

fn resolve_api_key(configured: Option<&str>) -> Option<String> {
    configured
        .filter(|k| !k.trim().is_empty())
        .map(str::to_string)
        .or_else(|| env::var("OPENAI_API_KEY").ok().filter(|k| !k.trim().is_empty()))
}

/// Expand a user-provided path string:
/// - Expands leading '~' to the user's home directory
/// - Expands ${VAR} and $VAR environment variables
/// - Returns a PathBuf without attempting to canonicalize
pub fn expand_path<S: AsRef<str>>(input: S) -> PathBuf {
    let s = input.as_ref();
    // Expand env vars first
    let expanded_env = shellexpand::env(s).unwrap_or(std::borrow::Cow::Borrowed(s));
    // Expand ~ at start
    let expanded = shellexpand::tilde(&expanded_env);
    PathBuf::from(expanded.as_ref())
}
