//! Credential material

use crate::domain::principal::Principal;

/// Opaque secret material for a principal, e.g. an Argon2 PHC string
///
/// Deliberately not `Serialize`; `Debug` never prints the material.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    pub fn new(material: impl Into<String>) -> Self {
        Self(material.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Credential {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Credential([hidden])")
    }
}

/// A principal together with its stored credential
#[derive(Debug, Clone)]
pub struct StoredCredential {
    principal: Principal,
    credential: Credential,
}

impl StoredCredential {
    pub fn new(principal: Principal, credential: Credential) -> Self {
        Self {
            principal,
            credential,
        }
    }

    pub fn principal(&self) -> &Principal {
        &self.principal
    }

    pub fn credential(&self) -> &Credential {
        &self.credential
    }

    pub fn into_principal(self) -> Principal {
        self.principal
    }
}
