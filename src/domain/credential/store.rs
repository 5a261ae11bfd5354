//! Credential store trait

use async_trait::async_trait;
use thiserror::Error;

use super::entity::StoredCredential;
use crate::domain::AuthError;

#[cfg(test)]
use mockall::automock;

/// Failure of the backing store itself, as opposed to a missing entry
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialStoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

impl From<CredentialStoreError> for AuthError {
    fn from(error: CredentialStoreError) -> Self {
        match error {
            CredentialStoreError::Unavailable(message) => AuthError::store_unavailable(message),
        }
    }
}

/// Lookup of stored credential material by principal identifier
///
/// Implementations are responsible for their own concurrency safety and retry
/// policy. A lookup failure is reported once and never retried by the gate.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Find the credential for `identifier`, `Ok(None)` when it does not exist
    async fn lookup(&self, identifier: &str)
        -> Result<Option<StoredCredential>, CredentialStoreError>;
}
