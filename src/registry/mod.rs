//! Registry module for container registry credentials
//!
//! This module turns user declarations into the credential table a registry
//! client presents on push and pull. It normalizes registry addresses, reads
//! Docker credentials files in both the current and legacy layouts, and
//! decodes packed `user:pass` auth strings.

pub mod address;
pub mod auth_entry;
pub mod auth_set;
pub mod config_file;
pub mod resolver;

pub use address::normalize;
pub use auth_entry::{AuthEntryDecoder, Credentials};
pub use auth_set::{ResolvedAuthSet, ResolvedCredential};
pub use config_file::{CredentialFileParser, FileEntries};
pub use resolver::{AuthBlock, AuthMode, AuthResolver};
