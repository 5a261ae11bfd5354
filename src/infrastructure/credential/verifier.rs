//! Credential verification against the credential store

use std::fmt::Debug;
use std::sync::Arc;

use tracing::{debug, warn};

use super::password::PasswordHasher;
use crate::domain::credential::CredentialStore;
use crate::domain::{AuditEvent, AuditSink, AuthError, Principal};

const DUMMY_SECRET: &str = "authgate-unknown-principal";

/// Checks a presented secret against the stored credential of a principal
pub struct CredentialVerifier {
    store: Arc<dyn CredentialStore>,
    hasher: Arc<dyn PasswordHasher>,
    audit: Option<Arc<dyn AuditSink>>,
    /// Verified against when the principal does not exist, so an unknown
    /// identifier costs as much as a wrong secret
    dummy_hash: Option<String>,
}

impl Debug for CredentialVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialVerifier")
            .field("hasher", &self.hasher)
            .field("audit", &self.audit)
            .finish_non_exhaustive()
    }
}

impl CredentialVerifier {
    pub fn new(store: Arc<dyn CredentialStore>, hasher: Arc<dyn PasswordHasher>) -> Self {
        let dummy_hash = hasher.hash(DUMMY_SECRET).ok();

        Self {
            store,
            hasher,
            audit: None,
            dummy_hash,
        }
    }

    /// Report login outcomes to an audit sink
    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = Some(audit);
        self
    }

    /// Verify `presented_secret` for `identifier`
    pub async fn verify(
        &self,
        identifier: &str,
        presented_secret: &str,
    ) -> Result<Principal, AuthError> {
        let result = self.check(identifier, presented_secret).await;

        match &result {
            Ok(principal) => self.audit(AuditEvent::LoginSucceeded {
                principal_id: principal.id().to_string(),
            }),
            Err(e) => self.audit(AuditEvent::LoginFailed {
                identifier: identifier.to_string(),
                reason: e.kind(),
            }),
        }

        result
    }

    async fn check(&self, identifier: &str, presented_secret: &str) -> Result<Principal, AuthError> {
        let stored = self.store.lookup(identifier).await.map_err(|e| {
            warn!(identifier = %identifier, error = %e, "Credential store lookup failed");
            AuthError::from(e)
        })?;

        let Some(stored) = stored else {
            if let Some(dummy_hash) = &self.dummy_hash {
                self.verify_secret(presented_secret, dummy_hash).await?;
            }
            debug!(identifier = %identifier, "Unknown principal");
            return Err(AuthError::unknown_principal(identifier));
        };

        if !self
            .verify_secret(presented_secret, stored.credential().expose())
            .await?
        {
            debug!(identifier = %identifier, "Credential mismatch");
            return Err(AuthError::bad_credential(identifier));
        }

        Ok(stored.into_principal())
    }

    /// Hash verification is CPU-bound and runs on the blocking pool
    async fn verify_secret(&self, secret: &str, hash: &str) -> Result<bool, AuthError> {
        let hasher = self.hasher.clone();
        let secret = secret.to_string();
        let hash = hash.to_string();

        tokio::task::spawn_blocking(move || hasher.verify(&secret, &hash))
            .await
            .map_err(|e| AuthError::internal(format!("Password verification task failed: {}", e)))
    }

    fn audit(&self, event: AuditEvent) {
        if let Some(audit) = &self.audit {
            audit.record(event);
        }
    }
}
