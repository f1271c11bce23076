//! Registry credential resolution
//!
//! Turns a list of user declarations into one [`ResolvedAuthSet`]. Each
//! declaration either carries a username/password inline, points at a Docker
//! credentials file, or carries nothing at all. Declarations are processed in
//! order and the first failure aborts the whole pass.

use crate::common::{FileSystem, OsFileSystem, PathUtils};
use crate::error::{AuthError, Result};
use crate::registry::address;
use crate::registry::auth_set::{ResolvedAuthSet, ResolvedCredential};
use crate::registry::config_file::{CredentialFileParser, FileEntries};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// One user-declared credential source for a registry
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthBlock {
    pub address: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(default, alias = "configFilePath", skip_serializing_if = "Option::is_none")]
    pub config_file: Option<String>,
}

impl std::fmt::Debug for AuthBlock {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBlock")
            .field("address", &self.address)
            .field("username", &self.username)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("config_file", &self.config_file)
            .finish()
    }
}

/// How a block's credentials are obtained
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMode<'a> {
    Inline { username: &'a str, password: &'a str },
    ConfigFile(&'a str),
    Anonymous,
}

impl AuthBlock {
    pub fn new(address: impl Into<String>) -> Self {
        Self {
            address: address.into(),
            ..Default::default()
        }
    }

    pub fn with_credentials(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.username = Some(username.into());
        self.password = Some(password.into());
        self
    }

    pub fn with_config_file(mut self, path: impl Into<String>) -> Self {
        self.config_file = Some(path.into());
        self
    }

    /// The effective source of this block's credentials
    ///
    /// A non-empty username wins even when a config file is also set; the
    /// config file is consulted only when the username is empty or absent.
    pub fn mode(&self) -> AuthMode<'_> {
        match (self.username.as_deref(), self.config_file.as_deref()) {
            (Some(username), _) if !username.is_empty() => AuthMode::Inline {
                username,
                password: self.password.as_deref().unwrap_or_default(),
            },
            (_, Some(path)) if !path.is_empty() => AuthMode::ConfigFile(path),
            _ => AuthMode::Anonymous,
        }
    }
}

/// Resolves [`AuthBlock`]s against inline values and credentials files
#[derive(Debug, Clone, Default)]
pub struct AuthResolver<F = OsFileSystem> {
    fs: F,
}

impl AuthResolver<OsFileSystem> {
    pub fn new() -> Self {
        Self { fs: OsFileSystem }
    }
}

impl<F: FileSystem> AuthResolver<F> {
    pub fn with_fs(fs: F) -> Self {
        Self { fs }
    }

    /// Resolve every block into a single set keyed by normalized address
    ///
    /// When several blocks normalize to the same address the later block's
    /// credential replaces the earlier one wholesale; fields are never merged.
    pub fn resolve(&self, blocks: &[AuthBlock]) -> Result<ResolvedAuthSet> {
        let mut set = ResolvedAuthSet::new();
        let mut parsed: HashMap<PathBuf, FileEntries> = HashMap::new();

        for block in blocks {
            let credential = self.resolve_block(block, &mut parsed)?;
            if let Some(previous) = set.insert(credential) {
                debug!(address = %previous.server_address, "later declaration replaces earlier one");
            }
        }

        debug!(registries = set.len(), "registry auth resolved");
        Ok(set)
    }

    /// Resolve a single block on its own
    pub fn resolve_one(&self, block: &AuthBlock) -> Result<ResolvedCredential> {
        self.resolve_block(block, &mut HashMap::new())
    }

    fn resolve_block(
        &self,
        block: &AuthBlock,
        parsed: &mut HashMap<PathBuf, FileEntries>,
    ) -> Result<ResolvedCredential> {
        let server_address = address::normalize(&block.address);

        match block.mode() {
            AuthMode::Inline { username, password } => {
                debug!(address = %server_address, "using inline credentials");
                Ok(ResolvedCredential::basic(server_address, username, password))
            }
            AuthMode::ConfigFile(file) => {
                let path = PathUtils::expand_home(file, &self.fs)?;
                debug!(address = %server_address, path = %path.display(), "looking up credentials file");

                if parsed.contains_key(&path) {
                    tracing::trace!(path = %path.display(), "credentials file already parsed");
                } else {
                    let entries = CredentialFileParser::parse_file(&self.fs, &path)?;
                    parsed.insert(path.clone(), entries);
                }

                let found = parsed[&path]
                    .iter()
                    .find(|(registry, _)| address::normalize(registry) == server_address)
                    .map(|(_, entry)| entry);

                match found {
                    Some(entry) => Ok(ResolvedCredential {
                        server_address,
                        username: entry.username.clone(),
                        password: entry.password.clone(),
                        email: entry.email.clone(),
                        raw_auth: entry.raw_auth.clone(),
                    }),
                    None => Err(AuthError::RegistryNotFoundInFile {
                        address: server_address,
                        path,
                    }),
                }
            }
            AuthMode::Anonymous => {
                debug!(address = %server_address, "no credentials declared");
                Ok(ResolvedCredential::anonymous(server_address))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::MemoryFileSystem;
    use std::cell::Cell;
    use std::io;
    use std::path::Path;

    const WRAPPED: &str = r#"{"auths": {"registry.example.com": {"auth": "dXNlcjpwYXNz", "email": "ops@example.com"}}}"#;

    fn resolver(files: &[(&str, &str)]) -> AuthResolver<MemoryFileSystem> {
        let mut fs = MemoryFileSystem::new().with_home("/home/ci");
        for (path, content) in files {
            fs.insert(*path, content.as_bytes());
        }
        AuthResolver::with_fs(fs)
    }

    #[test]
    fn test_inline_credentials_normalize_address() {
        let blocks = vec![AuthBlock::new("reg.example.com/").with_credentials("u", "p")];
        let set = resolver(&[]).resolve(&blocks).unwrap();

        assert_eq!(set.len(), 1);
        let cred = set.get("reg.example.com").unwrap();
        assert_eq!(cred.server_address, "reg.example.com");
        assert_eq!(cred.username, "u");
        assert_eq!(cred.password, "p");
    }

    #[test]
    fn test_inline_password_may_be_empty() {
        let block = AuthBlock {
            address: "ghcr.io".to_string(),
            username: Some("robot".to_string()),
            ..Default::default()
        };
        let cred = resolver(&[]).resolve_one(&block).unwrap();
        assert_eq!(cred.username, "robot");
        assert_eq!(cred.password, "");
    }

    #[test]
    fn test_config_file_lookup() {
        let blocks = vec![AuthBlock::new("registry.example.com/").with_config_file("/etc/docker.json")];
        let set = resolver(&[("/etc/docker.json", WRAPPED)]).resolve(&blocks).unwrap();

        let cred = set.get("registry.example.com").unwrap();
        assert_eq!(cred.server_address, "registry.example.com");
        assert_eq!(cred.username, "user");
        assert_eq!(cred.password, "pass");
        assert_eq!(cred.email.as_deref(), Some("ops@example.com"));
    }

    #[test]
    fn test_file_key_with_trailing_slash_matches() {
        let content = r#"{"auths": {"registry.example.com/": {"auth": "dXNlcjpwYXNz"}}}"#;
        let blocks = vec![AuthBlock::new("registry.example.com").with_config_file("/c.json")];
        let set = resolver(&[("/c.json", content)]).resolve(&blocks).unwrap();
        assert_eq!(set.get("registry.example.com").unwrap().username, "user");
    }

    #[test]
    fn test_home_expansion() {
        let blocks = vec![AuthBlock::new("registry.example.com").with_config_file("~/.docker/config.json")];
        let set = resolver(&[("/home/ci/.docker/config.json", WRAPPED)])
            .resolve(&blocks)
            .unwrap();
        assert_eq!(set.get("registry.example.com").unwrap().password, "pass");
    }

    #[test]
    fn test_home_expansion_failure() {
        let resolver = AuthResolver::with_fs(MemoryFileSystem::new());
        let blocks = vec![AuthBlock::new("ghcr.io").with_config_file("~/.docker/config.json")];
        let err = resolver.resolve(&blocks).unwrap_err();
        assert!(matches!(err, AuthError::PathExpansion { .. }));
    }

    #[test]
    fn test_registry_missing_from_file() {
        let blocks = vec![AuthBlock::new("other.example.com/").with_config_file("/etc/docker.json")];
        let err = resolver(&[("/etc/docker.json", WRAPPED)])
            .resolve(&blocks)
            .unwrap_err();

        match &err {
            AuthError::RegistryNotFoundInFile { address, path } => {
                assert_eq!(address, "other.example.com");
                assert_eq!(path, Path::new("/etc/docker.json"));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(err.to_string().contains("'other.example.com'"));
        assert!(err.to_string().contains("/etc/docker.json"));
    }

    #[test]
    fn test_missing_file() {
        let blocks = vec![AuthBlock::new("ghcr.io").with_config_file("/nope.json")];
        let err = resolver(&[]).resolve(&blocks).unwrap_err();
        assert!(matches!(err, AuthError::FileRead { .. }));
        assert!(err.to_string().contains("/nope.json"));
    }

    #[test]
    fn test_parse_errors_name_the_file() {
        let blocks = vec![AuthBlock::new("ghcr.io").with_config_file("/bad.json")];
        let err = resolver(&[("/bad.json", "{")]).resolve(&blocks).unwrap_err();
        assert!(matches!(err, AuthError::JsonSyntax { .. }));
        assert!(err.to_string().contains("/bad.json"));
    }

    #[test]
    fn test_anonymous_block() {
        let blocks = vec![AuthBlock::new("localhost:5000/")];
        let set = resolver(&[]).resolve(&blocks).unwrap();
        let cred = set.get("localhost:5000").unwrap();
        assert!(cred.is_anonymous());
        assert_eq!(cred.server_address, "localhost:5000");
    }

    #[test]
    fn test_empty_strings_count_as_unset() {
        let block = AuthBlock {
            address: "ghcr.io".to_string(),
            username: Some(String::new()),
            password: Some("ignored".to_string()),
            config_file: Some(String::new()),
        };
        assert_eq!(block.mode(), AuthMode::Anonymous);
    }

    #[test]
    fn test_username_takes_precedence_over_config_file() {
        let block = AuthBlock::new("ghcr.io")
            .with_credentials("u", "p")
            .with_config_file("/does/not/exist.json");
        let cred = resolver(&[]).resolve_one(&block).unwrap();
        assert_eq!(cred.username, "u");
        assert_eq!(cred.raw_auth, None);
    }

    #[test]
    fn test_later_block_replaces_earlier() {
        let blocks = vec![
            AuthBlock::new("registry.example.com").with_config_file("/etc/docker.json"),
            AuthBlock::new("registry.example.com/").with_credentials("second", ""),
        ];
        let set = resolver(&[("/etc/docker.json", WRAPPED)]).resolve(&blocks).unwrap();

        assert_eq!(set.len(), 1);
        let cred = set.get("registry.example.com").unwrap();
        assert_eq!(cred.username, "second");
        assert_eq!(cred.password, "");
        // Nothing carried over from the file-based block.
        assert_eq!(cred.email, None);
        assert_eq!(cred.raw_auth, None);
    }

    #[test]
    fn test_first_failure_aborts() {
        let blocks = vec![
            AuthBlock::new("ghcr.io").with_credentials("u", "p"),
            AuthBlock::new("quay.io").with_config_file("/missing.json"),
            AuthBlock::new("docker.io").with_credentials("u", "p"),
        ];
        assert!(resolver(&[]).resolve(&blocks).is_err());
    }

    #[test]
    fn test_no_blocks() {
        let set = resolver(&[]).resolve(&[]).unwrap();
        assert!(set.is_empty());
    }

    struct CountingFs {
        inner: MemoryFileSystem,
        reads: Cell<usize>,
    }

    impl FileSystem for CountingFs {
        fn home_dir(&self) -> Option<PathBuf> {
            self.inner.home_dir()
        }

        fn read(&self, path: &Path) -> io::Result<Vec<u8>> {
            self.reads.set(self.reads.get() + 1);
            self.inner.read(path)
        }
    }

    #[test]
    fn test_each_file_parsed_once_per_pass() {
        let content = r#"{"auths": {"a.example.com": {"auth": "dXNlcjpwYXNz"}, "b.example.com": {"auth": "Ym9iOmh1bnRlcjI="}}}"#;
        let fs = CountingFs {
            inner: MemoryFileSystem::new()
                .with_home("/root")
                .with_file("/root/.docker/config.json", content),
            reads: Cell::new(0),
        };
        let resolver = AuthResolver::with_fs(&fs);
        let blocks = vec![
            AuthBlock::new("a.example.com").with_config_file("~/.docker/config.json"),
            AuthBlock::new("b.example.com").with_config_file("/root/.docker/config.json"),
        ];

        let first = resolver.resolve(&blocks).unwrap();
        assert_eq!(fs.reads.get(), 1);
        assert_eq!(first.get("b.example.com").unwrap().username, "bob");
        assert_eq!(first.get("b.example.com").unwrap().password, "hunter2");

        let second = resolver.resolve(&blocks).unwrap();
        assert_eq!(fs.reads.get(), 2);
        assert_eq!(first, second);
    }

    #[test]
    fn test_auth_block_deserializes_both_spellings() {
        let block: AuthBlock =
            serde_json::from_str(r#"{"address": "ghcr.io", "configFilePath": "/c.json"}"#).unwrap();
        assert_eq!(block.mode(), AuthMode::ConfigFile("/c.json"));

        let block: AuthBlock =
            serde_json::from_str(r#"{"address": "ghcr.io", "config_file": "/c.json"}"#).unwrap();
        assert_eq!(block.config_file.as_deref(), Some("/c.json"));
    }
}
