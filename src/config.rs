use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::domain::{CommitOrder, Service};
use crate::error::{ReleaseError, Result};

/// File name looked up in the current directory
pub const LOCAL_CONFIG_FILE: &str = "releasevr.toml";

/// File name looked up in the user config directory
pub const USER_CONFIG_FILE: &str = ".releasevr.toml";

/// Represents the complete configuration for release-vr.
///
/// Contains the wizard defaults and cherry-pick behavior options.
#[derive(Debug, Deserialize, Serialize, Clone, Default, PartialEq)]
pub struct Config {
    #[serde(default)]
    pub defaults: DefaultsConfig,

    #[serde(default)]
    pub cherry_pick: CherryPickConfig,
}

fn default_base_branch() -> String {
    "dev".to_string()
}

fn default_target_branch() -> String {
    "preprod".to_string()
}

fn default_release_branch() -> String {
    "preprod-TEST1".to_string()
}

fn default_tags() -> String {
    "TICKET-123 TICKET-234".to_string()
}

/// Answers offered by the wizard when the user just presses Enter.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct DefaultsConfig {
    #[serde(default = "default_base_branch")]
    pub base_branch: String,

    #[serde(default = "default_target_branch")]
    pub target_branch: String,

    #[serde(default = "default_release_branch")]
    pub release_branch: String,

    #[serde(default = "default_tags")]
    pub tags: String,

    #[serde(default)]
    pub service: Service,

    #[serde(default)]
    pub commit_order: CommitOrder,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        DefaultsConfig {
            base_branch: default_base_branch(),
            target_branch: default_target_branch(),
            release_branch: default_release_branch(),
            tags: default_tags(),
            service: Service::default(),
            commit_order: CommitOrder::default(),
        }
    }
}

fn default_merge_parent() -> u32 {
    1
}

/// Configuration for the replay itself.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct CherryPickConfig {
    /// Parent number for `git cherry-pick -m`
    #[serde(default = "default_merge_parent")]
    pub merge_parent: u32,

    /// Pick a commit once even when several tags reference it
    #[serde(default)]
    pub dedupe_commits: bool,
}

impl Default for CherryPickConfig {
    fn default() -> Self {
        CherryPickConfig {
            merge_parent: default_merge_parent(),
            dedupe_commits: false,
        }
    }
}

impl Config {
    /// Parse configuration from TOML text
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.cherry_pick.merge_parent == 0 {
            return Err(ReleaseError::config(
                "cherry_pick.merge_parent must be 1 or greater",
            ));
        }
        Ok(())
    }
}

/// Loads configuration from file or returns defaults.
///
/// Attempts to load configuration in the following order:
/// 1. Custom path provided as parameter
/// 2. `releasevr.toml` in current directory
/// 3. `.releasevr.toml` in user config directory
/// 4. Default configuration if no file found
///
/// # Returns
/// * `Ok(Config)` - Loaded or default configuration
/// * `Err` - If file exists but cannot be read or parsed
pub fn load_config(config_path: Option<&str>) -> Result<Config> {
    let config_str = if let Some(path) = config_path {
        fs::read_to_string(path).map_err(|e| {
            ReleaseError::config(format!("Cannot read config file '{}': {}", path, e))
        })?
    } else if Path::new(LOCAL_CONFIG_FILE).exists() {
        fs::read_to_string(LOCAL_CONFIG_FILE)?
    } else if let Some(config_dir) = dirs::config_dir() {
        let config_path = config_dir.join(USER_CONFIG_FILE);
        if config_path.exists() {
            fs::read_to_string(config_path)?
        } else {
            return Ok(Config::default());
        }
    } else {
        return Ok(Config::default());
    };

    Config::from_toml(&config_str)
}
