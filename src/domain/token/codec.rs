//! Token codec trait

use std::fmt::Debug;

use chrono::Duration;

use super::claims::{IssuedToken, TokenClaims};
use super::verification::VerificationResult;
use crate::domain::principal::Principal;
use crate::domain::AuthError;

/// Creates and checks signed, time-bounded tokens
pub trait TokenCodec: Send + Sync + Debug {
    /// Sign a token for `principal`, valid from now for `ttl`
    fn issue(&self, principal: &Principal, ttl: Duration) -> Result<IssuedToken, AuthError>;

    /// Decode a token, check its signature and expiry, and return its claims
    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError>;

    fn parse(&self, token: &str) -> VerificationResult {
        match self.verify(token) {
            Ok(claims) => VerificationResult::Valid(claims.principal()),
            Err(e) => VerificationResult::from_error(&e),
        }
    }
}
