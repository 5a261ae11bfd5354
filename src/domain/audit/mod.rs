//! Authentication audit events

use std::fmt::Debug;

use crate::domain::token::TokenFingerprint;

/// Something worth an audit record
///
/// Never carries secrets or encoded tokens; tokens are referred to by
/// fingerprint only.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuditEvent {
    LoginSucceeded {
        principal_id: String,
    },
    LoginFailed {
        identifier: String,
        reason: &'static str,
    },
    TokenRejected {
        reason: &'static str,
    },
    TokenRevoked {
        principal_id: String,
        fingerprint: TokenFingerprint,
    },
}

impl AuditEvent {
    pub fn name(&self) -> &'static str {
        match self {
            Self::LoginSucceeded { .. } => "login_succeeded",
            Self::LoginFailed { .. } => "login_failed",
            Self::TokenRejected { .. } => "token_rejected",
            Self::TokenRevoked { .. } => "token_revoked",
        }
    }
}

/// Receiver of audit events
pub trait AuditSink: Send + Sync + Debug {
    fn record(&self, event: AuditEvent);
}
