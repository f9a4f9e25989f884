use std::path::{Path, PathBuf};

use anyhow::Context;
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::scoring::{RiskThresholds, Weights};
use crate::types::Personality;

pub const CONFIG_FILE_NAME: &str = "scandalscope.toml";

pub const OPENAI_API_KEY_ENV: &str = "OPENAI_API_KEY";
pub const PERSPECTIVE_API_KEY_ENV: &str = "PERSPECTIVE_API_KEY";

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ClassifierKind {
    #[default]
    Heuristic,
    Perspective,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub min_length: usize,
    pub max_length: usize,
    pub classifier: ClassifierKind,
    pub personality: Personality,
    /// Relative spread of the random jitter applied to heuristic scores.
    /// `0.0` keeps scoring deterministic.
    pub jitter: f64,
    pub simulated_latency_ms: u64,
    pub weights: Weights,
    pub thresholds: RiskThresholds,
    pub rate_limit: RateLimitConfig,
    pub cache: CacheConfig,
    pub llm: LlmConfig,
    pub perspective: PerspectiveConfig,
    pub history: HistoryConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            min_length: 10,
            max_length: 2000,
            classifier: ClassifierKind::default(),
            personality: Personality::default(),
            jitter: 0.0,
            simulated_latency_ms: 0,
            weights: Weights::default(),
            thresholds: RiskThresholds::default(),
            rate_limit: RateLimitConfig::default(),
            cache: CacheConfig::default(),
            llm: LlmConfig::default(),
            perspective: PerspectiveConfig::default(),
            history: HistoryConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RateLimitConfig {
    pub max_requests: usize,
    pub window_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 10,
            window_secs: 60,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub capacity: usize,
    pub ttl_secs: Option<u64>,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 100,
            ttl_secs: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// LLM generation is used only when enabled and an API key is present.
    pub enabled: bool,
    pub base_url: String,
    pub model: String,
    pub timeout_secs: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            base_url: "https://api.openai.com".to_string(),
            model: "gpt-3.5-turbo".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PerspectiveConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for PerspectiveConfig {
    fn default() -> Self {
        Self {
            base_url: "https://commentanalyzer.googleapis.com".to_string(),
            timeout_secs: 15,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HistoryConfig {
    pub path: Option<PathBuf>,
    pub max_entries: usize,
}

impl Default for HistoryConfig {
    fn default() -> Self {
        Self {
            path: None,
            max_entries: 50,
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let contents =
            std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        let config: Config =
            toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
        config
            .validate()
            .with_context(|| format!("invalid config {}", path.display()))?;
        Ok(config)
    }

    pub fn discover() -> Option<Self> {
        let path = Path::new(CONFIG_FILE_NAME);
        if path.exists() {
            Config::load(path).ok()
        } else {
            None
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.min_length == 0 {
            anyhow::bail!("min_length must be at least 1");
        }
        if self.max_length < self.min_length {
            anyhow::bail!(
                "max_length {} is below min_length {}",
                self.max_length,
                self.min_length
            );
        }
        if !(0.0..1.0).contains(&self.jitter) {
            anyhow::bail!("jitter must be in [0, 1), got {}", self.jitter);
        }
        if self.rate_limit.max_requests == 0 || self.rate_limit.window_secs == 0 {
            anyhow::bail!("rate_limit.max_requests and rate_limit.window_secs must be positive");
        }
        if self.cache.capacity == 0 {
            anyhow::bail!("cache.capacity must be positive");
        }
        if self.llm.timeout_secs == 0 || self.perspective.timeout_secs == 0 {
            anyhow::bail!("timeouts must be positive");
        }
        self.weights.validate()?;
        self.thresholds.validate()?;
        Ok(())
    }
}

/// API keys, read from the environment only.
#[derive(Debug, Default)]
pub struct Secrets {
    pub openai_api_key: Option<SecretString>,
    pub perspective_api_key: Option<SecretString>,
}

impl Secrets {
    /// Loads `.env` if present, then reads the key variables.
    pub fn from_env() -> Self {
        let _ = dotenvy::dotenv();
        Self {
            openai_api_key: non_empty_env(OPENAI_API_KEY_ENV),
            perspective_api_key: non_empty_env(PERSPECTIVE_API_KEY_ENV),
        }
    }
}

fn non_empty_env(name: &str) -> Option<SecretString> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .map(SecretString::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default().validate().unwrap();
    }

    #[test]
    fn rejects_inverted_lengths() {
        let cfg = Config {
            min_length: 50,
            max_length: 20,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_jitter_out_of_range() {
        let cfg = Config {
            jitter: 1.5,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }
}
