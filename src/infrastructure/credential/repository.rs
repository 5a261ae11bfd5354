//! In-memory credential store implementation

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::credential::{CredentialStore, CredentialStoreError, StoredCredential};

/// In-memory implementation of CredentialStore, keyed by principal ID
#[derive(Debug, Default, Clone)]
pub struct InMemoryCredentialStore {
    entries: Arc<RwLock<HashMap<String, StoredCredential>>>,
}

impl InMemoryCredentialStore {
    /// Create a new empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial entries
    pub fn with_credentials(credentials: Vec<StoredCredential>) -> Self {
        let entries = credentials
            .into_iter()
            .map(|c| (c.principal().id().as_str().to_string(), c))
            .collect();

        Self {
            entries: Arc::new(RwLock::new(entries)),
        }
    }

    /// Insert or replace the credential for a principal
    pub async fn upsert(&self, credential: StoredCredential) {
        let mut entries = self.entries.write().await;
        entries.insert(credential.principal().id().as_str().to_string(), credential);
    }

    /// Remove a principal, returning whether it existed
    pub async fn remove(&self, identifier: &str) -> bool {
        self.entries.write().await.remove(identifier).is_some()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn lookup(
        &self,
        identifier: &str,
    ) -> Result<Option<StoredCredential>, CredentialStoreError> {
        let entries = self.entries.read().await;
        Ok(entries.get(identifier).cloned())
    }
}
