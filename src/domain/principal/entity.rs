//! Principal entity and related types

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::validation::{validate_principal_id, validate_role, PrincipalValidationError};

/// Principal identifier - unique within a credential store
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PrincipalId(String);

impl PrincipalId {
    /// Create a new PrincipalId after validation
    pub fn new(id: impl Into<String>) -> Result<Self, PrincipalValidationError> {
        let id = id.into();
        validate_principal_id(&id)?;
        Ok(Self(id))
    }

    /// Get the inner string value
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for PrincipalId {
    type Error = PrincipalValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<PrincipalId> for String {
    fn from(id: PrincipalId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PrincipalId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An authenticated identity plus its roles and attributes
///
/// Roles and attributes are kept in ordered collections so that a principal
/// always serializes to the same bytes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    id: PrincipalId,
    #[serde(default)]
    roles: BTreeSet<String>,
    #[serde(default)]
    attributes: BTreeMap<String, String>,
}

impl Principal {
    /// Create a principal with no roles or attributes
    pub fn new(id: PrincipalId) -> Self {
        Self {
            id,
            roles: BTreeSet::new(),
            attributes: BTreeMap::new(),
        }
    }

    /// Add roles, rejecting empty or whitespace-containing names
    pub fn with_roles<I, S>(mut self, roles: I) -> Result<Self, PrincipalValidationError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for role in roles {
            let role = role.into();
            validate_role(&role)?;
            self.roles.insert(role);
        }

        Ok(self)
    }

    /// Set a single attribute
    pub fn with_attribute(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(key.into(), value.into());
        self
    }

    pub(crate) fn from_parts(
        id: PrincipalId,
        roles: BTreeSet<String>,
        attributes: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id,
            roles,
            attributes,
        }
    }

    // Getters

    pub fn id(&self) -> &PrincipalId {
        &self.id
    }

    pub fn roles(&self) -> &BTreeSet<String> {
        &self.roles
    }

    pub fn attributes(&self) -> &BTreeMap<String, String> {
        &self.attributes
    }

    pub fn has_role(&self, role: &str) -> bool {
        self.roles.contains(role)
    }
}
