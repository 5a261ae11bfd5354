//! Outcome of presenting a token

use crate::domain::principal::Principal;
use crate::domain::AuthError;

/// Result of parsing and checking a presented token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VerificationResult {
    Valid(Principal),
    Expired,
    Malformed,
    SignatureMismatch,
    Revoked,
}

impl VerificationResult {
    /// Classify a token-check failure
    pub fn from_error(error: &AuthError) -> Self {
        match error {
            AuthError::Expired => Self::Expired,
            AuthError::SignatureMismatch => Self::SignatureMismatch,
            AuthError::Revoked => Self::Revoked,
            _ => Self::Malformed,
        }
    }

    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    pub fn into_result(self) -> Result<Principal, AuthError> {
        match self {
            Self::Valid(principal) => Ok(principal),
            Self::Expired => Err(AuthError::Expired),
            Self::Malformed => Err(AuthError::malformed("token could not be decoded")),
            Self::SignatureMismatch => Err(AuthError::SignatureMismatch),
            Self::Revoked => Err(AuthError::Revoked),
        }
    }
}
