//! dgramsh configuration management
//!
//! Configuration loads from an explicit `--config` path, else from
//! `dgramsh/dgramsh.toml` under the user configuration directory when it
//! exists, else from built-in defaults. Command-line flags override the
//! file.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Configuration for the interactive console
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Prompt printed before each command line
    pub prompt: String,

    /// Enable verbose logging without passing --verbose
    pub verbose: bool,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            prompt: "> ".to_string(),
            verbose: false,
        }
    }
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&text)?)
    }

    /// Default configuration file location under the user config directory
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("dgramsh").join("dgramsh.toml"))
    }

    /// Load from an explicit path, the default location, or defaults
    pub fn load(explicit: Option<&str>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from_file(path);
        }
        match Self::default_path() {
            Some(path) if path.exists() => Self::load_from_file(path),
            _ => Ok(Self::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.prompt, "> ");
        assert!(!config.verbose);
    }

    #[test]
    fn test_parse_partial_config() {
        let config: AppConfig = toml::from_str("prompt = \"udp> \"").unwrap();
        assert_eq!(config.prompt, "udp> ");
        assert!(!config.verbose);
    }

    #[test]
    fn test_parse_full_config() {
        let config: AppConfig = toml::from_str("prompt = \"# \"\nverbose = true").unwrap();
        assert_eq!(config.prompt, "# ");
        assert!(config.verbose);
    }
}
