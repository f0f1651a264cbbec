//! Engine configuration loaded from `.env`, plus the user configuration
//! manager (`user_config.toml`) for generator credentials.
//!
//! | Env | Default | Description |
//! |-----|---------|-------------|
//! | DRISHTI_CACHE_CAPACITY | 1000 | Max guidance cache entries (FIFO eviction). |
//! | DRISHTI_GENERATION_TIMEOUT_SECS | 45 | Timeout for one outbound generator call. |
//! | DRISHTI_PATTERNS_PATH | (builtin) | Path to a patterns JSON file. |

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::cache::DEFAULT_CACHE_CAPACITY;

const DEFAULT_GENERATION_TIMEOUT_SECS: u64 = 45;

/// Engine toggles loaded from environment. Unset or invalid => defaults.
#[derive(Debug, Clone)]
pub struct GuidanceConfig {
    /// DRISHTI_CACHE_CAPACITY: maximum cache entry count.
    pub cache_capacity: usize,
    /// DRISHTI_GENERATION_TIMEOUT_SECS: outbound call timeout.
    pub generation_timeout: Duration,
    /// DRISHTI_PATTERNS_PATH: catalog file; `None` uses the compiled-in data.
    pub patterns_path: Option<PathBuf>,
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            cache_capacity: DEFAULT_CACHE_CAPACITY,
            generation_timeout: Duration::from_secs(DEFAULT_GENERATION_TIMEOUT_SECS),
            patterns_path: None,
        }
    }
}

impl GuidanceConfig {
    /// Load from environment. Unset or unparsable values fall back to defaults.
    pub fn from_env() -> Self {
        Self {
            cache_capacity: env_usize("DRISHTI_CACHE_CAPACITY", DEFAULT_CACHE_CAPACITY),
            generation_timeout: Duration::from_secs(env_u64(
                "DRISHTI_GENERATION_TIMEOUT_SECS",
                DEFAULT_GENERATION_TIMEOUT_SECS,
            )),
            patterns_path: env_opt_string("DRISHTI_PATTERNS_PATH").map(PathBuf::from),
        }
    }
}

fn env_usize(name: &str, default: usize) -> usize {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    match std::env::var(name) {
        Ok(v) => v.trim().parse().unwrap_or(default),
        Err(_) => default,
    }
}

fn env_opt_string(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

// ---------------------------------------------------------------------------
// User configuration manager
// ---------------------------------------------------------------------------
// Generator credentials and model overrides live in user_config.toml so users
// can supply their own API keys without editing environment files.

/// User-specific configuration stored in `user_config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserConfig {
    /// Personal API key for the generation service.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Preferred generation model.
    #[serde(default)]
    pub model: Option<String>,

    /// Generation service base URL override.
    #[serde(default)]
    pub api_base: Option<String>,
}

impl UserConfig {
    pub fn default_path() -> PathBuf {
        PathBuf::from("user_config.toml")
    }

    /// Load from the default path; a missing file yields defaults.
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        Self::load_from_path(&Self::default_path())
    }

    pub fn load_from_path(path: &Path) -> Result<Self, Box<dyn std::error::Error>> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let config: UserConfig = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(UserConfig::default())
        }
    }

    pub fn save_to_path(&self, path: &Path) -> Result<(), Box<dyn std::error::Error>> {
        let content = toml::to_string_pretty(self)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)?;
        Ok(())
    }

    /// API key with env fallback. Priority: user_config.toml > DRISHTI_API_KEY
    /// > OPENROUTER_API_KEY.
    pub fn resolved_api_key(&self) -> Option<String> {
        self.api_key
            .clone()
            .or_else(|| std::env::var("DRISHTI_API_KEY").ok())
            .or_else(|| std::env::var("OPENROUTER_API_KEY").ok())
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    /// Model with env fallback (DRISHTI_MODEL).
    pub fn resolved_model(&self) -> Option<String> {
        self.model
            .clone()
            .or_else(|| std::env::var("DRISHTI_MODEL").ok())
            .filter(|s| !s.trim().is_empty())
    }

    /// API base URL with env fallback (DRISHTI_API_BASE).
    pub fn resolved_api_base(&self) -> Option<String> {
        self.api_base
            .clone()
            .or_else(|| std::env::var("DRISHTI_API_BASE").ok())
            .filter(|s| !s.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn user_config_round_trips_through_toml() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("user_config.toml");
        let config = UserConfig {
            api_key: Some("sk-test".to_string()),
            model: Some("meta-llama/llama-3.3-70b-instruct".to_string()),
            api_base: None,
        };
        config.save_to_path(&path).expect("save");
        let loaded = UserConfig::load_from_path(&path).expect("load");
        assert_eq!(loaded.api_key.as_deref(), Some("sk-test"));
        assert_eq!(loaded.api_base, None);
    }

    #[test]
    fn missing_user_config_defaults() {
        let dir = tempfile::tempdir().expect("tempdir");
        let loaded = UserConfig::load_from_path(&dir.path().join("absent.toml")).expect("load");
        assert!(loaded.api_key.is_none());
    }
}
