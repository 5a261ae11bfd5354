//! Per-request authentication state machine

use crate::domain::principal::Principal;
use crate::domain::token::VerificationResult;
use crate::domain::AuthError;

/// Where a single request stands in the authentication flow
///
/// Every request starts `Anonymous`. `Authenticated` and `Rejected` are
/// terminal; a rejected login must be resubmitted as a new request.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GateState {
    #[default]
    Anonymous,
    Authenticating,
    Authenticated(Principal),
    Rejected(AuthError),
}

/// Input driving a [`GateState`] transition
#[derive(Debug, Clone)]
pub enum GateEvent {
    LoginSubmitted,
    CredentialsAccepted(Principal),
    CredentialsRejected(AuthError),
    TokenPresented(VerificationResult),
}

impl GateState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Authenticated(_) | Self::Rejected(_))
    }

    /// Apply an event. Events that are not valid for the current state leave
    /// it unchanged.
    pub fn apply(self, event: GateEvent) -> Self {
        match (self, event) {
            (Self::Anonymous, GateEvent::LoginSubmitted) => Self::Authenticating,
            (Self::Authenticating, GateEvent::CredentialsAccepted(principal)) => {
                Self::Authenticated(principal)
            }
            (Self::Authenticating, GateEvent::CredentialsRejected(error)) => Self::Rejected(error),
            (state, GateEvent::TokenPresented(result)) if !state.is_terminal() => {
                match result.into_result() {
                    Ok(principal) => Self::Authenticated(principal),
                    Err(error) => Self::Rejected(error),
                }
            }
            (state, _) => state,
        }
    }

    pub fn principal(&self) -> Option<&Principal> {
        match self {
            Self::Authenticated(principal) => Some(principal),
            _ => None,
        }
    }

    /// Collapse a terminal state into a result. A state that never reached a
    /// terminal point counts as an internal error.
    pub fn into_result(self) -> Result<Principal, AuthError> {
        match self {
            Self::Authenticated(principal) => Ok(principal),
            Self::Rejected(error) => Err(error),
            Self::Anonymous | Self::Authenticating => Err(AuthError::internal(
                "authentication did not reach a terminal state",
            )),
        }
    }
}

impl std::fmt::Display for GateState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Anonymous => write!(f, "anonymous"),
            Self::Authenticating => write!(f, "authenticating"),
            Self::Authenticated(principal) => write!(f, "authenticated({})", principal.id()),
            Self::Rejected(error) => write!(f, "rejected({})", error.kind()),
        }
    }
}
