use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::domain::Version;

/// Represents the complete configuration for git-release.
///
/// Everything has a sensible default; a config file only needs to name the
/// values it wants to change.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    /// Prefix of release tags, e.g. "v" for v1.2.3
    #[serde(default = "default_tag_prefix")]
    pub tag_prefix: String,

    /// Changelog file name, relative to the working copy root
    #[serde(default = "default_changelog")]
    pub changelog: String,

    #[serde(default)]
    pub commit: CommitConfig,
}

/// Configuration for the release commit.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CommitConfig {
    /// Commit message template; `{version}` is replaced by the released
    /// version.
    #[serde(default = "default_commit_message")]
    pub message: String,
}

fn default_tag_prefix() -> String {
    "v".to_string()
}

fn default_changelog() -> String {
    "CHANGELOG.md".to_string()
}

fn default_commit_message() -> String {
    "chore(release): {version}".to_string()
}

impl CommitConfig {
    /// Render the commit message for a version
    pub fn format(&self, version: Version) -> String {
        self.message.replace("{version}", &version.to_string())
    }
}

impl Default for CommitConfig {
    fn default() -> Self {
        CommitConfig {
            message: default_commit_message(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            tag_prefix: default_tag_prefix(),
            changelog: default_changelog(),
            commit: CommitConfig::default(),
        }
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `gitrelease.toml` in current directory
/// 3. `.gitrelease.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Arguments
/// * `config_path` - Optional path to custom configuration file
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config, Box<dyn std::error::Error>> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path)?
    } else if Path::new("./gitrelease.toml").exists() {
        fs::read_to_string("./gitrelease.toml")?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(".gitrelease.toml");
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}
