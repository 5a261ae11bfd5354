//! Domain layer - Core authentication types and contracts

pub mod audit;
pub mod clock;
pub mod credential;
pub mod error;
pub mod gate;
pub mod principal;
pub mod revocation;
pub mod token;

pub use audit::{AuditEvent, AuditSink};
pub use clock::{Clock, SystemClock};
#[cfg(test)]
pub(crate) use clock::testing::ManualClock;
pub use credential::{Credential, CredentialStore, CredentialStoreError, StoredCredential};
pub use error::{AuthError, PublicAuthError};
pub use gate::{GateEvent, GateState};
pub use principal::{Principal, PrincipalId, PrincipalValidationError};
pub use revocation::RevocationList;
pub use token::{
    IssuedToken, TokenClaims, TokenCodec, TokenFingerprint, VerificationResult, MAX_TOKEN_TTL_SECS,
};
