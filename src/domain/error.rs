use serde::Serialize;
use thiserror::Error;

/// Authentication failures
///
/// The variants are kept distinct for logging and audit. Callers outside the
/// process should only ever see [`PublicAuthError`], see [`AuthError::public`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Unknown principal: {identifier}")]
    UnknownPrincipal { identifier: String },

    #[error("Bad credential for principal: {identifier}")]
    BadCredential { identifier: String },

    #[error("Credential store unavailable: {message}")]
    StoreUnavailable { message: String },

    #[error("Malformed token: {message}")]
    Malformed { message: String },

    #[error("Token signature mismatch")]
    SignatureMismatch,

    #[error("Token expired")]
    Expired,

    #[error("Token revoked")]
    Revoked,

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl AuthError {
    pub fn unknown_principal(identifier: impl Into<String>) -> Self {
        Self::UnknownPrincipal {
            identifier: identifier.into(),
        }
    }

    pub fn bad_credential(identifier: impl Into<String>) -> Self {
        Self::BadCredential {
            identifier: identifier.into(),
        }
    }

    pub fn store_unavailable(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
        }
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::Malformed {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// The error as it may be shown to an external caller.
    ///
    /// `UnknownPrincipal` and `BadCredential` collapse into the same value so
    /// a caller cannot probe which identifiers exist.
    pub fn public(&self) -> PublicAuthError {
        match self {
            Self::UnknownPrincipal { .. } | Self::BadCredential { .. } => {
                PublicAuthError::InvalidCredentials
            }
            Self::StoreUnavailable { .. } => PublicAuthError::ServiceUnavailable,
            Self::Malformed { .. } | Self::SignatureMismatch => PublicAuthError::InvalidToken,
            Self::Expired => PublicAuthError::TokenExpired,
            Self::Revoked => PublicAuthError::TokenRevoked,
            Self::Internal { .. } => PublicAuthError::Internal,
        }
    }

    /// Short label used for metrics and audit records
    pub fn kind(&self) -> &'static str {
        match self {
            Self::UnknownPrincipal { .. } => "unknown_principal",
            Self::BadCredential { .. } => "bad_credential",
            Self::StoreUnavailable { .. } => "store_unavailable",
            Self::Malformed { .. } => "malformed",
            Self::SignatureMismatch => "signature_mismatch",
            Self::Expired => "expired",
            Self::Revoked => "revoked",
            Self::Internal { .. } => "internal",
        }
    }
}

/// Externally visible authentication failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum PublicAuthError {
    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("Authentication service temporarily unavailable")]
    ServiceUnavailable,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Token expired")]
    TokenExpired,

    #[error("Token revoked")]
    TokenRevoked,

    #[error("Internal authentication error")]
    Internal,
}

impl PublicAuthError {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidCredentials => "invalid_credentials",
            Self::ServiceUnavailable => "service_unavailable",
            Self::InvalidToken => "invalid_token",
            Self::TokenExpired => "token_expired",
            Self::TokenRevoked => "token_revoked",
            Self::Internal => "internal_error",
        }
    }
}
