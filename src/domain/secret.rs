//! TLS credential domain type

use super::id::ResourceKey;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A named certificate/key pair, keyed by `(tenant, name)`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TlsCredential {
    pub name: String,
    pub tenant: String,
    /// PEM-encoded certificate chain
    pub certificate: String,
    /// PEM-encoded private key
    pub private_key: String,
}

impl TlsCredential {
    pub fn key(&self) -> ResourceKey {
        ResourceKey::new(&self.tenant, &self.name)
    }
}

impl fmt::Debug for TlsCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TlsCredential")
            .field("name", &self.name)
            .field("tenant", &self.tenant)
            .field("certificate_len", &self.certificate.len())
            .field("private_key", &"[REDACTED]")
            .finish()
    }
}
