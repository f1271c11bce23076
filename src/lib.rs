//! Registry Auth Library
//!
//! Resolves container registry credentials from user declarations. Each
//! declaration names a registry and either carries a username and password
//! or points at a Docker credentials file; the result is one table from
//! normalized registry address to credentials, ready for a registry client.

pub mod cli;
pub mod common;
pub mod error;
pub mod logging;
pub mod registry;

pub use common::{FileSystem, MemoryFileSystem, OsFileSystem};
pub use error::{AuthError, Result};
pub use logging::Logger;
pub use registry::{
    AuthBlock, AuthEntryDecoder, AuthResolver, CredentialFileParser, ResolvedAuthSet,
    ResolvedCredential,
};
