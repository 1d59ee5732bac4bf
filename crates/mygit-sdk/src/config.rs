use std::path::Path;

use mygit_store::StoreConfig;
use serde::{Deserialize, Serialize};

use crate::error::{SdkError, SdkResult};

/// Name of the optional configuration file inside the git directory.
pub const CONFIG_FILE: &str = "mygit.toml";

/// Repository-level configuration.
///
/// ```toml
/// default_branch = "main"
///
/// [store]
/// compression_level = 6
/// skip_existing = true
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RepoConfig {
    /// Branch that `HEAD` points at after `init`.
    pub default_branch: String,
    /// Loose object store settings.
    pub store: StoreConfig,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self {
            default_branch: "main".into(),
            store: StoreConfig::default(),
        }
    }
}

impl RepoConfig {
    /// Load `<git_dir>/mygit.toml`, falling back to defaults when absent.
    pub fn load(git_dir: &Path) -> SdkResult<Self> {
        let path = git_dir.join(CONFIG_FILE);
        if !path.is_file() {
            return Ok(Self::default());
        }
        let text = std::fs::read_to_string(&path)?;
        Self::from_toml(&text)
    }

    pub fn from_toml(text: &str) -> SdkResult<Self> {
        let config: Self = toml::from_str(text).map_err(|e| SdkError::Config(e.to_string()))?;
        if config.default_branch.is_empty() {
            return Err(SdkError::Config("default_branch must not be empty".into()));
        }
        Ok(config)
    }
}
