//! Configuration management for Muster
//!
//! Supports environment variables, config files, and runtime overrides.
//!
//! Config file location: ~/.config/muster/config.toml

use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::core::error::{MusterError, Result};

/// Main configuration for Muster
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Worker pool configuration
    pub pool: PoolConfig,
    /// Browser session configuration
    pub browser: BrowserConfig,
    /// LLM endpoint configuration
    pub llm: LlmConfig,
    /// Telemetry sampling configuration
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Worker pool configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Number of workers created at startup (the pool never grows)
    pub workers: usize,
    /// Lower bound of the randomized post-task cooldown, in seconds
    pub cooldown_min_secs: u64,
    /// Upper bound of the randomized post-task cooldown, in seconds
    pub cooldown_max_secs: u64,
}

/// Browser session configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrowserConfig {
    /// Prefix for per-worker session names
    pub session_prefix: String,
    /// Whether to run sessions in headed mode (visible browser)
    pub headed: bool,
    /// Timeout for a navigation's network-idle wait, in ms
    pub nav_timeout_ms: u64,
    /// Lower bound of a scroll action's pixel delta
    pub scroll_min_px: u32,
    /// Upper bound of a scroll action's pixel delta
    pub scroll_max_px: u32,
    /// Directory holding per-worker cookie vault files
    pub vault_dir: PathBuf,
}

/// LLM endpoint configuration (Ollama-compatible)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Host address (default: localhost)
    pub host: String,
    /// Port number (default: 11434)
    pub port: u16,
    /// Model used for command interpretation
    pub model: String,
    /// Request timeout in seconds
    pub timeout_secs: u64,
    /// Maximum actions accepted from one interpreted command
    pub max_actions: usize,
}

/// Telemetry sampling configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TelemetryConfig {
    /// Seconds between samples
    pub interval_secs: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pool: PoolConfig::default(),
            browser: BrowserConfig::default(),
            llm: LlmConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            workers: env::var("MUSTER_WORKERS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5),
            cooldown_min_secs: 10,
            cooldown_max_secs: 30,
        }
    }
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            session_prefix: env::var("MUSTER_SESSION_PREFIX")
                .unwrap_or_else(|_| "muster".to_string()),
            headed: env::var("MUSTER_HEADED")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(false),
            nav_timeout_ms: 60_000,
            scroll_min_px: 300,
            scroll_max_px: 800,
            vault_dir: env::var("MUSTER_VAULT_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from("vault")),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            host: env::var("OLLAMA_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: env::var("OLLAMA_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(11434),
            model: env::var("MUSTER_MODEL").unwrap_or_else(|_| "qwen3:8b".to_string()),
            timeout_secs: 120,
            max_actions: 25,
        }
    }
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self { interval_secs: 2 }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("muster")
    }

    /// Get the config file path
    pub fn config_file() -> PathBuf {
        Self::config_dir().join("config.toml")
    }

    /// Load configuration from file, environment, and defaults
    /// Priority: CLI args > env vars > config file > defaults
    pub fn load() -> Self {
        // Try to load .env file if it exists
        let _ = dotenvy::dotenv();

        // Try to load from config file
        if let Ok(config) = Self::load_from_file() {
            return config;
        }

        // Fall back to defaults (which respect env vars)
        Self::default()
    }

    /// Load configuration from file only
    pub fn load_from_file() -> Result<Self> {
        let config_path = Self::config_file();

        if !config_path.exists() {
            return Err(MusterError::config("Config file not found"));
        }

        let content = fs::read_to_string(&config_path)
            .map_err(|e| MusterError::config(format!("Failed to read config: {}", e)))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| MusterError::config(format!("Failed to parse config: {}", e)))?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self) -> Result<()> {
        let config_dir = Self::config_dir();
        let config_path = Self::config_file();

        if !config_dir.exists() {
            fs::create_dir_all(&config_dir)
                .map_err(|e| MusterError::config(format!("Failed to create config dir: {}", e)))?;
        }

        let content = toml::to_string_pretty(self)
            .map_err(|e| MusterError::config(format!("Failed to serialize config: {}", e)))?;

        fs::write(&config_path, content)
            .map_err(|e| MusterError::config(format!("Failed to write config: {}", e)))?;

        Ok(())
    }

    /// Get the full LLM endpoint URL
    pub fn llm_url(&self) -> String {
        format!("http://{}:{}", self.llm.host, self.llm.port)
    }

    /// Path of one worker's cookie vault file
    pub fn vault_path(&self, worker_id: usize) -> PathBuf {
        self.browser
            .vault_dir
            .join(format!("session_{}.json", worker_id))
    }

    /// Session name for one worker, unique within the pool
    pub fn session_name(&self, worker_id: usize) -> String {
        format!("{}-{}", self.browser.session_prefix, worker_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.llm.port, 11434);
        assert_eq!(config.browser.nav_timeout_ms, 60_000);
        assert_eq!(config.telemetry.interval_secs, 2);
        assert!(config.pool.cooldown_min_secs <= config.pool.cooldown_max_secs);
    }

    #[test]
    fn test_llm_url() {
        let config = Config::default();
        assert!(config.llm_url().starts_with("http://"));
    }

    #[test]
    fn test_vault_path_scheme() {
        let config = Config::default();
        let path = config.vault_path(3);
        assert!(path.to_string_lossy().ends_with("session_3.json"));
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("workers"));
        assert!(toml_str.contains("nav_timeout_ms"));
    }
}
