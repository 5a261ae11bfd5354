//! Shared state handed to every handler

use std::sync::Arc;

use crate::domain::{CredentialStore, RevocationList};
use crate::infrastructure::gate::AuthenticationGate;

#[derive(Clone)]
pub struct AppState {
    pub gate: Arc<AuthenticationGate>,
    /// Probed by the readiness endpoint
    pub credential_store: Arc<dyn CredentialStore>,
    pub revocations: Option<Arc<dyn RevocationList>>,
}

impl AppState {
    pub fn new(gate: Arc<AuthenticationGate>, credential_store: Arc<dyn CredentialStore>) -> Self {
        Self {
            gate,
            credential_store,
            revocations: None,
        }
    }

    pub fn with_revocations(mut self, revocations: Arc<dyn RevocationList>) -> Self {
        self.revocations = Some(revocations);
        self
    }
}
