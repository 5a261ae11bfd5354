//! Token domain
//!
//! Signed token payloads, the codec contract and verification outcomes.

mod claims;
mod codec;
mod verification;

pub use claims::{IssuedToken, TokenClaims, TokenFingerprint, MAX_TOKEN_TTL_SECS};
pub use codec::TokenCodec;
pub use verification::VerificationResult;
