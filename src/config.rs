//! Configuration types for kenning.
//!
//! Every section defaults all of its fields, so a config file only needs
//! to mention what it changes. The completion API key is normally taken from
//! an environment variable rather than written into the file.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use kenning_fetch::FetchConfig;
use serde::{Deserialize, Serialize};

use crate::error::{KenningError, Result};

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct KenningConfig {
    pub gateway: GatewayConfig,
    pub fetch: FetchConfig,
    pub encyclopedia: EncyclopediaConfig,
    pub disambiguation: DisambiguationConfig,
    pub resources: ResourcesConfig,
}

/// Chat-completions summarisation service.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// Base URL; `/chat/completions` is appended.
    pub api_url: String,
    pub model: String,
    pub temperature: f32,
    pub timeout_secs: u64,
    /// Inline API key. Prefer `api_key_env`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Environment variable holding the API key.
    pub api_key_env: String,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            api_url: "https://api.perplexity.ai".to_owned(),
            model: "llama-3.1-sonar-small-128k-chat".to_owned(),
            temperature: 0.2,
            timeout_secs: 20,
            api_key: None,
            api_key_env: "PERPLEXITY_API_KEY".to_owned(),
        }
    }
}

impl GatewayConfig {
    /// Resolve the API key: the inline value wins, then the environment.
    ///
    /// Blank values count as missing.
    pub fn resolve_api_key(&self) -> Option<String> {
        let inline = self
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_owned);
        inline.or_else(|| {
            std::env::var(&self.api_key_env)
                .ok()
                .map(|key| key.trim().to_owned())
                .filter(|key| !key.is_empty())
        })
    }
}

/// Encyclopedia (MediaWiki) endpoints and limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EncyclopediaConfig {
    /// Action API endpoint; `{lang}` is substituted per call.
    pub api_url_template: String,
    /// Public article URL; `{lang}` and `{title}` are substituted.
    pub article_url_template: String,
    pub default_lang: String,
    /// Sentences requested for a keyword summary.
    pub summary_sentences: u32,
    /// Sentences requested for a secondary-tier resource entry.
    pub resource_sentences: u32,
    /// Search hits scanned when a keyword has no page.
    pub search_limit: usize,
    pub timeout_secs: u64,
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            api_url_template: "https://{lang}.wikipedia.org/w/api.php".to_owned(),
            article_url_template: "https://{lang}.wikipedia.org/wiki/{title}".to_owned(),
            default_lang: "ko".to_owned(),
            summary_sentences: 8,
            resource_sentences: 2,
            search_limit: 5,
            timeout_secs: 10,
        }
    }
}

/// Candidate ranking and drill-down bounds.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisambiguationConfig {
    /// Maximum nested-ambiguity depth below the first candidate list
    /// (at most [`MAX_DISAMBIGUATION_DEPTH`]).
    pub max_depth: usize,
    /// Candidates considered per ambiguous page.
    pub max_candidates: usize,
    /// Title suffixes that mark a disambiguation page.
    pub markers: Vec<String>,
    /// Keyword → ordered hint terms; earlier hints rank higher.
    pub hints: BTreeMap<String, Vec<String>>,
}

impl Default for DisambiguationConfig {
    fn default() -> Self {
        let mut hints = BTreeMap::new();
        hints.insert(
            "배".to_owned(),
            ["과일", "fruit", "나무", "식물", "선박", "동음이의어"]
                .into_iter()
                .map(str::to_owned)
                .collect(),
        );
        Self {
            max_depth: 3,
            max_candidates: 5,
            markers: vec!["(동음이의어)".to_owned(), "(disambiguation)".to_owned()],
            hints,
        }
    }
}

/// Keyword-resources request defaults.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourcesConfig {
    /// Result limit when the caller does not give one.
    pub default_limit: usize,
}

impl Default for ResourcesConfig {
    fn default() -> Self {
        Self { default_limit: 5 }
    }
}

/// Upper bound for any requested resource limit.
pub const MAX_RESOURCE_LIMIT: usize = 10;

/// Upper bound for nested disambiguation below the first candidate list.
pub const MAX_DISAMBIGUATION_DEPTH: usize = 3;

impl KenningConfig {
    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| KenningError::Config(e.to_string()))
    }

    /// Returns the default config file path: `~/.config/kenning/config.toml`.
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("kenning")
            .join("config.toml")
    }

    /// Load the file at `path`, or the default path if it exists, else defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given or existing file is invalid.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default = Self::default_path();
                if default.is_file() {
                    Self::from_file(&default)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`KenningError::Config`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        self.fetch
            .validate()
            .map_err(|e| KenningError::Config(e.to_string()))?;
        if self.gateway.timeout_secs == 0 || self.encyclopedia.timeout_secs == 0 {
            return Err(KenningError::Config(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if !self.encyclopedia.api_url_template.contains("{lang}") {
            return Err(KenningError::Config(
                "encyclopedia.api_url_template must contain {lang}".into(),
            ));
        }
        if !self.encyclopedia.article_url_template.contains("{title}") {
            return Err(KenningError::Config(
                "encyclopedia.article_url_template must contain {title}".into(),
            ));
        }
        if self.disambiguation.max_depth > MAX_DISAMBIGUATION_DEPTH {
            return Err(KenningError::Config(format!(
                "disambiguation.max_depth must be at most {MAX_DISAMBIGUATION_DEPTH}"
            )));
        }
        if self.disambiguation.max_candidates == 0 {
            return Err(KenningError::Config(
                "disambiguation.max_candidates must be greater than 0".into(),
            ));
        }
        if !(1..=MAX_RESOURCE_LIMIT).contains(&self.resources.default_limit) {
            return Err(KenningError::Config(format!(
                "resources.default_limit must be between 1 and {MAX_RESOURCE_LIMIT}"
            )));
        }
        Ok(())
    }
}
