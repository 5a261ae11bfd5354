//! Token revocation
//!
//! A revocation list records tokens invalidated before their natural expiry.
//!
//! Ordering guarantee: a revoke call that has completed before an
//! `is_revoked` call starts is observed by that call. Nothing stronger is
//! promised. Implementations backed by a distributed store may be eventually
//! consistent across nodes, in which case a revoked token can still be
//! accepted elsewhere until the revocation has propagated.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::token::TokenFingerprint;
use crate::domain::AuthError;

/// Shared list of revoked tokens
#[async_trait]
pub trait RevocationList: Send + Sync {
    /// Record a token as revoked until `expires_at`, after which the entry
    /// may be dropped since the token is dead anyway
    async fn revoke(
        &self,
        fingerprint: TokenFingerprint,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError>;

    async fn is_revoked(&self, fingerprint: &TokenFingerprint) -> Result<bool, AuthError>;

    /// Drop entries whose token has expired at `now`, returning how many
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AuthError>;

    async fn len(&self) -> Result<usize, AuthError>;
}
