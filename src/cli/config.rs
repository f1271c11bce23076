//! Declaration loading and defaults
//!
//! Declarations come from a JSON file holding an array of auth blocks, from
//! the command line, or both. Fields a declaration leaves out entirely are
//! filled from the environment; a field given as an empty string stays empty.

use crate::common::FileSystem;
use crate::error::{AuthError, Result};
use crate::registry::AuthBlock;
use std::path::Path;

/// Credentials file consulted when nothing else is configured
pub const DEFAULT_CONFIG_FILE: &str = "~/.docker/config.json";

pub const ENV_REGISTRY_USER: &str = "DOCKER_REGISTRY_USER";
pub const ENV_REGISTRY_PASS: &str = "DOCKER_REGISTRY_PASS";
pub const ENV_DOCKER_CONFIG: &str = "DOCKER_CONFIG";

/// Values used for fields a declaration omits
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockDefaults {
    pub username: Option<String>,
    pub password: Option<String>,
    pub config_file: Option<String>,
}

impl BlockDefaults {
    /// No defaults at all: omitted fields stay unset
    pub fn none() -> Self {
        Self::default()
    }

    /// Defaults from the process environment
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults from an arbitrary variable lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            username: lookup(ENV_REGISTRY_USER),
            password: lookup(ENV_REGISTRY_PASS),
            config_file: Some(
                lookup(ENV_DOCKER_CONFIG).unwrap_or_else(|| DEFAULT_CONFIG_FILE.to_string()),
            ),
        }
    }

    pub fn apply(&self, mut block: AuthBlock) -> AuthBlock {
        if block.username.is_none() {
            block.username = self.username.clone();
        }
        if block.password.is_none() {
            block.password = self.password.clone();
        }
        if block.config_file.is_none() {
            block.config_file = self.config_file.clone();
        }
        block
    }
}

/// Load auth blocks from a JSON declarations file
pub fn load_declarations(fs: &impl FileSystem, path: &Path) -> Result<Vec<AuthBlock>> {
    let content = fs.read(path).map_err(|source| AuthError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let blocks: Vec<AuthBlock> =
        serde_json::from_slice(&content).map_err(|e| AuthError::from(e).at_path(path))?;
    Ok(blocks)
}

/// Check declarations before resolving them
///
/// Returns warnings for declarations that are accepted but probably not
/// what the user meant.
pub fn validate_blocks(blocks: &[AuthBlock]) -> Result<Vec<String>> {
    let mut warnings = Vec::new();

    for (index, block) in blocks.iter().enumerate() {
        if block.address.trim().is_empty() {
            return Err(AuthError::Validation(format!(
                "registry auth declaration #{} has an empty address",
                index + 1
            )));
        }

        let has_username = block.username.as_deref().is_some_and(|u| !u.is_empty());
        let has_config_file = block.config_file.as_deref().is_some_and(|c| !c.is_empty());
        if has_username && has_config_file {
            warnings.push(format!(
                "'{}' sets both a username and a config file; the config file is ignored",
                block.address
            ));
        }
    }

    Ok(warnings)
}
