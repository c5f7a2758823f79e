//! Secret used for basic authentication against a device

use serde::Deserialize;
use std::fmt;
use zeroize::{Zeroize, Zeroizing};

/// Device password
///
/// The secret is zeroed when the credential is cleared or dropped and is
/// never printed by `Debug`.
#[derive(Clone, Deserialize)]
#[serde(from = "String")]
pub struct Credential {
    secret: Zeroizing<String>,
}

impl Credential {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
        }
    }

    /// Expose the secret for encoding the authorization header
    pub fn expose(&self) -> &str {
        self.secret.as_str()
    }

    pub fn is_empty(&self) -> bool {
        self.secret.is_empty()
    }

    /// Zero the secret in place
    pub fn clear(&mut self) {
        self.secret.zeroize();
    }
}

impl Default for Credential {
    fn default() -> Self {
        Self::new(String::new())
    }
}

impl From<String> for Credential {
    fn from(secret: String) -> Self {
        Self::new(secret)
    }
}

impl From<&str> for Credential {
    fn from(secret: &str) -> Self {
        Self::new(secret)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(<redacted>)")
    }
}
