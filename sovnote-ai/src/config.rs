//! Configuration for sovnote-ai
//!
//! **Priority:** CLI argument → environment variable → TOML → compiled default
//!
//! CLI and environment values arrive together through `clap` (each flag has an
//! `env` fallback) as [`CliOverrides`]; they are layered on top of the TOML
//! file located by [`sovnote_common::config::resolve_config_path`].
//!
//! Example `~/.config/sovnote/sovnote-ai.toml`:
//!
//! ```toml
//! [server]
//! host = "0.0.0.0"
//! port = 8000
//!
//! [logging]
//! level = "sovnote_ai=debug,info"
//!
//! [wikipedia]
//! sentences = 3
//! timeout_secs = 20
//!
//! [embedder]
//! backend = "fastembed"
//! cache_dir = "/var/cache/sovnote/models"
//! ```

use serde::{Deserialize, Serialize};
use sovnote_common::config::{load_toml_config, resolve_config_path, LoggingConfig};
use sovnote_common::{Error, Result};
use std::path::{Path, PathBuf};

pub const MODULE_NAME: &str = "sovnote-ai";

/// Environment variable naming an explicit config file
pub const CONFIG_ENV_VAR: &str = "SOVNOTE_CONFIG";

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 8000;

pub const DEFAULT_WIKIPEDIA_API_URL: &str = "https://en.wikipedia.org/w/api.php";
pub const DEFAULT_USER_AGENT: &str = "SovNoteStudyTool/1.0 (contact: student@sovnote.com)";
pub const DEFAULT_SUMMARY_SENTENCES: u32 = 3;
pub const DEFAULT_SEARCH_LIMIT: u32 = 10;

/// Environment variable holding the embedding API key, if any
pub const DEFAULT_EMBEDDER_API_KEY_ENV: &str = "SOVNOTE_EMBEDDER_API_KEY";

pub const DEFAULT_PLACEHOLDER_SUMMARY: &str =
    "Topic context unavailable via Wikipedia API. Reverting to internal LLM knowledge.";

/// MediaWiki caps `exsentences` at 10
const MAX_SUMMARY_SENTENCES: u32 = 10;
/// MediaWiki caps `srlimit` at 500
const MAX_SEARCH_LIMIT: u32 = 500;

/// Root of the sovnote-ai TOML file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AiConfig {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub wikipedia: WikipediaConfig,
    pub embedder: EmbedderConfig,
    pub analysis: AnalysisConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

/// Wikipedia client settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    /// Action API endpoint (`.../w/api.php`)
    pub api_url: String,
    pub user_agent: String,
    /// Sentences per summary (1-10)
    pub sentences: u32,
    /// Max search hits requested
    pub search_limit: u32,
    /// Per-request timeout; unset means no timeout
    pub timeout_secs: Option<u64>,
    /// Minimum interval between requests; unset disables rate limiting
    pub rate_limit_ms: Option<u64>,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_WIKIPEDIA_API_URL.to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            sentences: DEFAULT_SUMMARY_SENTENCES,
            search_limit: DEFAULT_SEARCH_LIMIT,
            timeout_secs: None,
            rate_limit_ms: None,
        }
    }
}

/// Which embedding backend to construct at startup
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum EmbedderBackend {
    /// all-MiniLM-L6-v2 run in process
    #[default]
    #[value(name = "fastembed")]
    FastEmbed,
    /// Lexical feature-hashing embedder, no model download
    Hashing,
    /// OpenAI-compatible embeddings endpoint
    Http,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmbedderConfig {
    pub backend: EmbedderBackend,
    /// Model cache of the fastembed backend; unset uses fastembed's default
    pub cache_dir: Option<PathBuf>,
    /// Vector width of the hashing backend
    pub dimensions: usize,
    /// Base URL of the HTTP backend (e.g. `https://api.openai.com/v1`)
    pub url: Option<String>,
    /// Model name sent to the HTTP backend
    pub model: Option<String>,
    /// Name of the env var holding the HTTP backend's API key
    pub api_key_env: String,
    pub timeout_secs: Option<u64>,
}

impl Default for EmbedderConfig {
    fn default() -> Self {
        Self {
            backend: EmbedderBackend::FastEmbed,
            cache_dir: None,
            dimensions: crate::services::embedder::DEFAULT_DIMENSIONS,
            url: None,
            model: None,
            api_key_env: DEFAULT_EMBEDDER_API_KEY_ENV.to_string(),
            timeout_secs: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Returned as `wiki_summary` when no reference summary is available
    pub placeholder_summary: String,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            placeholder_summary: DEFAULT_PLACEHOLDER_SUMMARY.to_string(),
        }
    }
}

/// Values supplied on the command line or through their env fallbacks
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub host: Option<String>,
    pub port: Option<u16>,
    pub log_level: Option<String>,
    pub wikipedia_url: Option<String>,
    pub embedder: Option<EmbedderBackend>,
    pub embedder_url: Option<String>,
    pub embedder_model: Option<String>,
}

impl AiConfig {
    /// Locate and load the TOML file, apply overrides, validate
    pub fn load(config_path: Option<&Path>, overrides: CliOverrides) -> Result<Self> {
        let path = resolve_config_path(config_path, CONFIG_ENV_VAR, MODULE_NAME);
        let mut config: AiConfig = load_toml_config(path.as_deref())?;
        config.apply_overrides(overrides);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, overrides: CliOverrides) {
        if let Some(host) = overrides.host {
            self.server.host = host;
        }
        if let Some(port) = overrides.port {
            self.server.port = port;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        if let Some(url) = overrides.wikipedia_url {
            self.wikipedia.api_url = url;
        }
        if let Some(backend) = overrides.embedder {
            self.embedder.backend = backend;
        }
        if let Some(url) = overrides.embedder_url {
            self.embedder.url = Some(url);
        }
        if let Some(model) = overrides.embedder_model {
            self.embedder.model = Some(model);
        }
    }

    /// Fail fast on settings that cannot work
    pub fn validate(&self) -> Result<()> {
        let wiki = &self.wikipedia;
        if !(1..=MAX_SUMMARY_SENTENCES).contains(&wiki.sentences) {
            return Err(Error::Config(format!(
                "wikipedia.sentences must be 1-{}, got {}",
                MAX_SUMMARY_SENTENCES, wiki.sentences
            )));
        }
        if !(1..=MAX_SEARCH_LIMIT).contains(&wiki.search_limit) {
            return Err(Error::Config(format!(
                "wikipedia.search_limit must be 1-{}, got {}",
                MAX_SEARCH_LIMIT, wiki.search_limit
            )));
        }
        if wiki.api_url.trim().is_empty() {
            return Err(Error::Config("wikipedia.api_url is empty".to_string()));
        }

        match self.embedder.backend {
            EmbedderBackend::Hashing if self.embedder.dimensions == 0 => {
                return Err(Error::Config("embedder.dimensions must be positive".to_string()));
            }
            EmbedderBackend::Http if self.embedder.url.is_none() || self.embedder.model.is_none() => {
                return Err(Error::Config(
                    "embedder.backend = \"http\" requires embedder.url and embedder.model".to_string(),
                ));
            }
            _ => {}
        }

        if self.analysis.placeholder_summary.trim().is_empty() {
            return Err(Error::Config("analysis.placeholder_summary is empty".to_string()));
        }

        Ok(())
    }

    /// `host:port` to bind the listener to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
