//! Configuration for the external tools shep drives.
//!
//! Settings come from three layers, later ones winning:
//! - built-in defaults (`git`, `herd`, `composer`, `php`, `npm` looked up on `PATH`)
//! - a `.shep.toml` file at the main repository root
//! - `SHEP_*` environment variables
//!
//! # Configuration Example
//!
//! ```toml
//! [tools]
//! herd = "/Users/me/Library/Application Support/Herd/bin/herd"
//! php = "php8.3"
//! # git, composer and npm keep their defaults
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::styling::{WARNING, eprintln};

/// Name of the per-repository configuration file
pub const CONFIG_FILE: &str = ".shep.toml";

#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShepConfig {
    #[serde(default)]
    pub tools: Tools,
}

/// Executables invoked during provisioning.
///
/// Each value is either a bare name resolved on `PATH` or a path to the executable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tools {
    pub git: String,
    pub herd: String,
    pub composer: String,
    pub php: String,
    pub npm: String,
}

impl Default for Tools {
    fn default() -> Self {
        Self {
            git: "git".to_string(),
            herd: "herd".to_string(),
            composer: "composer".to_string(),
            php: "php".to_string(),
            npm: "npm".to_string(),
        }
    }
}

impl ShepConfig {
    /// Loads configuration for a repository, applying environment overrides.
    ///
    /// A missing, blank or malformed `.shep.toml` falls back to defaults; the
    /// malformed case prints a warning.
    ///
    /// # Errors
    ///
    /// Only returns an error if the file exists but cannot be read.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use std::path::Path;
    /// use shep::config::ShepConfig;
    ///
    /// let config = ShepConfig::load_from_repo(Path::new("/path/to/repo"))?;
    /// assert!(!config.tools.git.is_empty());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load_from_repo(repo_path: &Path) -> Result<Self> {
        let config = Self::load_file(repo_path)?;
        Ok(config.with_env_overrides())
    }

    fn load_file(repo_path: &Path) -> Result<Self> {
        let config_path = repo_path.join(CONFIG_FILE);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(&config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        if content.trim().is_empty() {
            return Ok(Self::default());
        }

        match toml::from_str::<ShepConfig>(&content) {
            Ok(config) => Ok(config),
            Err(e) => {
                eprintln!(
                    "{WARNING}⚠ Warning: Invalid TOML syntax in {}:{WARNING:#}",
                    CONFIG_FILE
                );
                eprintln!("  {}", e);
                eprintln!("  Using default configuration.");
                Ok(Self::default())
            }
        }
    }

    /// Applies `SHEP_GIT`, `SHEP_HERD`, `SHEP_COMPOSER`, `SHEP_PHP` and `SHEP_NPM`
    #[must_use]
    pub fn with_env_overrides(mut self) -> Self {
        let overrides = [
            ("SHEP_GIT", &mut self.tools.git),
            ("SHEP_HERD", &mut self.tools.herd),
            ("SHEP_COMPOSER", &mut self.tools.composer),
            ("SHEP_PHP", &mut self.tools.php),
            ("SHEP_NPM", &mut self.tools.npm),
        ];

        for (var, slot) in overrides {
            if let Ok(value) = std::env::var(var) {
                if !value.trim().is_empty() {
                    *slot = value;
                }
            }
        }

        self
    }
}
