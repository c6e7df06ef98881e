//! Resource identity
//!
//! Every cached entity is identified by its tenant plus a name that is unique
//! within that tenant for the entity's kind.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity key of a cached entity: `(tenant, name)`.
///
/// Orders by tenant first, then name, which keeps delete emission deterministic.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ResourceKey {
    tenant: String,
    name: String,
}

impl ResourceKey {
    pub fn new(tenant: impl Into<String>, name: impl Into<String>) -> Self {
        Self { tenant: tenant.into(), name: name.into() }
    }

    pub fn tenant(&self) -> &str {
        &self.tenant
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ResourceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.tenant, self.name)
    }
}
