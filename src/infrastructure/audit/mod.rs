//! Audit sink writing structured tracing events

use tracing::{info, warn};

use crate::domain::{AuditEvent, AuditSink};

/// Emits audit events under the `audit` tracing target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingAuditSink;

impl AuditSink for TracingAuditSink {
    fn record(&self, event: AuditEvent) {
        let name = event.name();

        match event {
            AuditEvent::LoginSucceeded { principal_id } => {
                info!(target: "audit", event = name, principal_id = %principal_id, "Login succeeded");
            }
            AuditEvent::LoginFailed { identifier, reason } => {
                warn!(target: "audit", event = name, identifier = %identifier, reason, "Login failed");
            }
            AuditEvent::TokenRejected { reason } => {
                info!(target: "audit", event = name, reason, "Token rejected");
            }
            AuditEvent::TokenRevoked {
                principal_id,
                fingerprint,
            } => {
                info!(
                    target: "audit",
                    event = name,
                    principal_id = %principal_id,
                    fingerprint = %fingerprint,
                    "Token revoked"
                );
            }
        }
    }
}
