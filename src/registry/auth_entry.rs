//! Packed auth string codec
//!
//! Docker config files store credentials as `base64("username:password")`
//! using the standard, padded alphabet.

use crate::error::{AuthError, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Username and password unpacked from an auth string
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .finish()
    }
}

pub struct AuthEntryDecoder;

impl AuthEntryDecoder {
    /// Decode a packed auth string into its username and password
    ///
    /// Only the first `:` separates the two; any later colons belong to the password.
    pub fn decode(packed: &str) -> Result<Credentials> {
        let data = STANDARD.decode(packed)?;
        let decoded = String::from_utf8(data)?;

        match decoded.split_once(':') {
            Some((username, password)) => Ok(Credentials {
                username: username.to_string(),
                password: password.to_string(),
            }),
            None => Err(AuthError::MalformedCredential {
                registry: None,
                path: None,
                reason: "decoded auth has no ':' separator between username and password"
                    .to_string(),
            }),
        }
    }

    /// Pack a username and password the way `docker login` stores them
    pub fn encode(username: &str, password: &str) -> String {
        STANDARD.encode(format!("{}:{}", username, password))
    }
}
