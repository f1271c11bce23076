//! Resolved credentials and the set handed to registry clients
//!
//! The JSON shapes follow the Docker Engine API: a single credential is what
//! goes into `X-Registry-Auth`, the whole set keyed by address is what goes
//! into `X-Registry-Config`. Both headers are URL-safe base64 of that JSON.

use crate::error::Result;
use crate::registry::address;
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Credentials for one registry
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCredential {
    #[serde(rename = "serveraddress")]
    pub server_address: String,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// The packed auth string this credential was decoded from, if any
    #[serde(rename = "auth", default, skip_serializing_if = "Option::is_none")]
    pub raw_auth: Option<String>,
}

impl ResolvedCredential {
    /// A registry declared without any credentials
    pub fn anonymous(server_address: impl Into<String>) -> Self {
        Self {
            server_address: server_address.into(),
            ..Default::default()
        }
    }

    pub fn basic(
        server_address: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            server_address: server_address.into(),
            username: username.into(),
            password: password.into(),
            email: None,
            raw_auth: None,
        }
    }

    pub fn is_anonymous(&self) -> bool {
        self.username.is_empty() && self.password.is_empty() && self.raw_auth.is_none()
    }

    /// Value for the `X-Registry-Auth` header
    pub fn registry_auth_header(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE.encode(json))
    }
}

impl std::fmt::Debug for ResolvedCredential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedCredential")
            .field("server_address", &self.server_address)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("email", &self.email)
            .field("raw_auth", &self.raw_auth.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

/// Credentials keyed by normalized registry address
///
/// Produced once by a resolution pass and not mutated afterwards.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ResolvedAuthSet {
    configs: BTreeMap<String, ResolvedCredential>,
}

impl ResolvedAuthSet {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Insert under the credential's own (already normalized) address,
    /// replacing whatever an earlier declaration put there.
    pub(crate) fn insert(&mut self, credential: ResolvedCredential) -> Option<ResolvedCredential> {
        self.configs
            .insert(credential.server_address.clone(), credential)
    }

    /// Look up credentials for an address in any of its equivalent forms
    pub fn get(&self, address: &str) -> Option<&ResolvedCredential> {
        self.configs.get(&address::normalize(address))
    }

    pub fn contains(&self, address: &str) -> bool {
        self.get(address).is_some()
    }

    pub fn len(&self) -> usize {
        self.configs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.configs.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ResolvedCredential)> {
        self.configs.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn addresses(&self) -> impl Iterator<Item = &str> {
        self.configs.keys().map(String::as_str)
    }

    pub fn into_inner(self) -> BTreeMap<String, ResolvedCredential> {
        self.configs
    }

    /// Value for the `X-Registry-Config` header
    pub fn registry_config_header(&self) -> Result<String> {
        let json = serde_json::to_vec(self)?;
        Ok(URL_SAFE.encode(json))
    }
}

impl IntoIterator for ResolvedAuthSet {
    type Item = (String, ResolvedCredential);
    type IntoIter = std::collections::btree_map::IntoIter<String, ResolvedCredential>;

    fn into_iter(self) -> Self::IntoIter {
        self.configs.into_iter()
    }
}
