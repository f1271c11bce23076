//! Error types for registry credential resolution

use std::path::{Path, PathBuf};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// A `~/` path was given but no home directory is known
    #[error("cannot expand '{path}': unable to determine home directory")]
    PathExpansion { path: String },

    /// Credentials file could not be opened or read
    #[error("error opening docker registry config file {}: {source}", .path.display())]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Content matched neither the wrapped nor the flat config shape
    #[error("error parsing registry auth json{}: {source}", in_file(.path))]
    JsonSyntax {
        path: Option<PathBuf>,
        #[source]
        source: serde_json::Error,
    },

    /// Packed auth string is not valid base64
    #[error("could not parse registry auth{}{}: invalid base64: {source}", registry_label(.registry), in_file(.path))]
    InvalidEncoding {
        registry: Option<String>,
        path: Option<PathBuf>,
        #[source]
        source: base64::DecodeError,
    },

    /// Packed auth string does not decode to `user:pass`
    #[error("could not parse registry auth{}{}: {reason}", registry_label(.registry), in_file(.path))]
    MalformedCredential {
        registry: Option<String>,
        path: Option<PathBuf>,
        reason: String,
    },

    #[error("couldn't find registry config for '{address}' in file: {}", .path.display())]
    RegistryNotFoundInFile { address: String, path: PathBuf },

    /// Declarations rejected before resolution
    #[error("Validation error: {0}")]
    Validation(String),
}

fn in_file(path: &Option<PathBuf>) -> String {
    match path {
        Some(path) => format!(" in {}", path.display()),
        None => String::new(),
    }
}

fn registry_label(registry: &Option<String>) -> String {
    match registry {
        Some(registry) => format!(" for '{}'", registry),
        None => String::new(),
    }
}

impl AuthError {
    /// True for every failure to turn a packed auth string into credentials,
    /// whether the base64 itself is bad or the decoded value has no separator.
    pub fn is_malformed_credential(&self) -> bool {
        matches!(
            self,
            AuthError::InvalidEncoding { .. } | AuthError::MalformedCredential { .. }
        )
    }

    /// Attach the registry key an auth entry was read from.
    pub fn for_registry(mut self, name: &str) -> Self {
        match &mut self {
            AuthError::InvalidEncoding { registry, .. }
            | AuthError::MalformedCredential { registry, .. } => {
                registry.get_or_insert_with(|| name.to_string());
            }
            _ => {}
        }
        self
    }

    /// Attach the credentials file path to errors produced while parsing it.
    pub fn at_path(mut self, file: &Path) -> Self {
        match &mut self {
            AuthError::JsonSyntax { path, .. }
            | AuthError::InvalidEncoding { path, .. }
            | AuthError::MalformedCredential { path, .. } => {
                path.get_or_insert_with(|| file.to_path_buf());
            }
            _ => {}
        }
        self
    }
}

impl From<serde_json::Error> for AuthError {
    fn from(err: serde_json::Error) -> Self {
        AuthError::JsonSyntax {
            path: None,
            source: err,
        }
    }
}

impl From<base64::DecodeError> for AuthError {
    fn from(err: base64::DecodeError) -> Self {
        AuthError::InvalidEncoding {
            registry: None,
            path: None,
            source: err,
        }
    }
}

impl From<std::string::FromUtf8Error> for AuthError {
    fn from(err: std::string::FromUtf8Error) -> Self {
        AuthError::MalformedCredential {
            registry: None,
            path: None,
            reason: format!("UTF-8 conversion error: {}", err),
        }
    }
}
