//! Docker credentials file parser
//!
//! Two layouts are understood. The current one wraps registries in `auths`:
//!
//! ```json
//! { "auths": { "ghcr.io": { "auth": "dXNlcjpwYXNz", "email": "me@example.com" } } }
//! ```
//!
//! The legacy `.dockercfg` layout has the registries at the top level. The
//! wrapped layout is tried first and only accepted if it yields at least one
//! registry; otherwise the content is read as the flat layout.

use crate::common::FileSystem;
use crate::error::{AuthError, Result};
use crate::registry::auth_entry::AuthEntryDecoder;
use crate::registry::auth_set::ResolvedCredential;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    auth: Option<String>,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Deserialize)]
struct WrappedConfig {
    #[serde(default)]
    auths: BTreeMap<String, RawEntry>,
}

type FlatConfig = BTreeMap<String, RawEntry>;

/// Registry entries of a credentials file, keyed by the address exactly as written in the file
pub type FileEntries = BTreeMap<String, ResolvedCredential>;

pub struct CredentialFileParser;

impl CredentialFileParser {
    /// Parse credentials file content
    ///
    /// Entries with an empty `auth` are left out. Keys are not normalized.
    pub fn parse(content: &[u8]) -> Result<FileEntries> {
        let raw = Self::parse_raw(content)?;

        let mut entries = FileEntries::new();
        for (registry, entry) in raw {
            let auth = match entry.auth {
                Some(auth) if !auth.is_empty() => auth,
                _ => {
                    tracing::trace!(registry = %registry, "skipping entry without auth");
                    continue;
                }
            };

            let creds = AuthEntryDecoder::decode(&auth).map_err(|e| e.for_registry(&registry))?;
            let credential = ResolvedCredential {
                server_address: registry.clone(),
                username: creds.username,
                password: creds.password,
                email: entry.email.filter(|email| !email.is_empty()),
                raw_auth: Some(auth),
            };
            entries.insert(registry, credential);
        }

        Ok(entries)
    }

    /// Read a credentials file through `fs` and parse it
    pub fn parse_file(fs: &impl FileSystem, path: &Path) -> Result<FileEntries> {
        let content = fs.read(path).map_err(|source| AuthError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content).map_err(|e| e.at_path(path))
    }

    fn parse_raw(content: &[u8]) -> Result<FlatConfig> {
        if let Ok(wrapped) = serde_json::from_slice::<WrappedConfig>(content) {
            if !wrapped.auths.is_empty() {
                return Ok(wrapped.auths);
            }
        }

        let flat: FlatConfig = serde_json::from_slice(content)?;
        Ok(flat)
    }
}
