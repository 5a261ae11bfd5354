//! Token payload and issued token types

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::domain::error::AuthError;
use crate::domain::principal::{Principal, PrincipalId};

/// Longest lifetime a token may be issued with, in seconds (366 days)
pub const MAX_TOKEN_TTL_SECS: i64 = 366 * 24 * 60 * 60;

/// Signed token payload
///
/// Timestamps are whole seconds since the Unix epoch. Field order and the
/// ordered collections make the serialized form canonical.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject (principal ID)
    pub sub: PrincipalId,
    /// Issued at timestamp
    pub iat: i64,
    /// Expiration timestamp
    pub exp: i64,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub roles: BTreeSet<String>,
    /// Flat string attributes of the principal
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub claims: BTreeMap<String, String>,
}

impl TokenClaims {
    /// Create claims for a principal issued at `issued_at`, valid for `ttl`
    ///
    /// `ttl` must lie between one second and [`MAX_TOKEN_TTL_SECS`].
    pub fn new(
        principal: &Principal,
        issued_at: DateTime<Utc>,
        ttl: Duration,
    ) -> Result<Self, AuthError> {
        let ttl_secs = ttl.num_seconds();
        if ttl_secs < 1 {
            return Err(AuthError::internal("Token TTL must be at least one second"));
        }
        if ttl_secs > MAX_TOKEN_TTL_SECS {
            return Err(AuthError::internal(format!(
                "Token TTL must not exceed {} seconds",
                MAX_TOKEN_TTL_SECS
            )));
        }

        let expires_at = issued_at
            .checked_add_signed(Duration::seconds(ttl_secs))
            .ok_or_else(|| AuthError::internal("Token expiry is out of range"))?;

        Ok(Self {
            sub: principal.id().clone(),
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            roles: principal.roles().clone(),
            claims: principal.attributes().clone(),
        })
    }

    /// Expiry is inclusive: at `exp` itself the token is already expired
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now.timestamp() >= self.exp
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        saturating_timestamp(self.iat)
    }

    /// Saturates at the representable bounds, so an out-of-range `exp` never
    /// reads as already past
    pub fn expires_at(&self) -> DateTime<Utc> {
        saturating_timestamp(self.exp)
    }

    pub fn principal(&self) -> Principal {
        Principal::from_parts(self.sub.clone(), self.roles.clone(), self.claims.clone())
    }
}

fn saturating_timestamp(secs: i64) -> DateTime<Utc> {
    DateTime::from_timestamp(secs, 0).unwrap_or(if secs > 0 {
        DateTime::<Utc>::MAX_UTC
    } else {
        DateTime::<Utc>::MIN_UTC
    })
}

/// Stable digest of an encoded token, used as the revocation key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TokenFingerprint(String);

impl TokenFingerprint {
    pub fn of(token: &str) -> Self {
        let digest = Sha256::digest(token.as_bytes());
        Self(hex::encode(digest))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TokenFingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A freshly signed token together with the claims it carries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuedToken {
    token: String,
    claims: TokenClaims,
}

impl IssuedToken {
    pub fn new(token: String, claims: TokenClaims) -> Self {
        Self { token, claims }
    }

    pub fn as_str(&self) -> &str {
        &self.token
    }

    pub fn into_string(self) -> String {
        self.token
    }

    pub fn claims(&self) -> &TokenClaims {
        &self.claims
    }

    pub fn principal(&self) -> Principal {
        self.claims.principal()
    }

    pub fn issued_at(&self) -> DateTime<Utc> {
        self.claims.issued_at()
    }

    pub fn expires_at(&self) -> DateTime<Utc> {
        self.claims.expires_at()
    }

    pub fn fingerprint(&self) -> TokenFingerprint {
        TokenFingerprint::of(&self.token)
    }
}
