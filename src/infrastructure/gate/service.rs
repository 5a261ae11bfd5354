//! Authentication gate: login, token authentication and revocation

use std::fmt::Debug;
use std::sync::Arc;

use chrono::Duration;
use tracing::{debug, instrument};

use crate::domain::{
    AuditEvent, AuditSink, AuthError, GateEvent, GateState, IssuedToken, Principal,
    RevocationList, TokenCodec, TokenFingerprint, VerificationResult,
};
use crate::infrastructure::audit::TracingAuditSink;
use crate::infrastructure::credential::CredentialVerifier;
use crate::infrastructure::observability::{record_login, record_revocation, record_token_check};

/// Orchestrates credential verification, token issuance and token checks
///
/// Holds no per-request state; every call walks its own [`GateState`] from
/// `Anonymous` to a terminal state. Safe to share across tasks behind an
/// `Arc`.
pub struct AuthenticationGate {
    verifier: CredentialVerifier,
    codec: Arc<dyn TokenCodec>,
    revocations: Option<Arc<dyn RevocationList>>,
    audit: Arc<dyn AuditSink>,
    token_ttl: Duration,
}

impl Debug for AuthenticationGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthenticationGate")
            .field("verifier", &self.verifier)
            .field("codec", &self.codec)
            .field("revocation_enabled", &self.revocations.is_some())
            .field("token_ttl", &self.token_ttl)
            .finish()
    }
}

impl AuthenticationGate {
    pub fn new(verifier: CredentialVerifier, codec: Arc<dyn TokenCodec>, token_ttl: Duration) -> Self {
        Self {
            verifier,
            codec,
            revocations: None,
            audit: Arc::new(TracingAuditSink),
            token_ttl,
        }
    }

    pub fn with_revocation_list(mut self, revocations: Arc<dyn RevocationList>) -> Self {
        self.revocations = Some(revocations);
        self
    }

    pub fn with_audit(mut self, audit: Arc<dyn AuditSink>) -> Self {
        self.audit = audit;
        self
    }

    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    pub fn revocation_enabled(&self) -> bool {
        self.revocations.is_some()
    }

    /// Verify credentials and issue a token
    ///
    /// A failed login is final for this call; the caller resubmits to retry.
    #[instrument(skip(self, secret))]
    pub async fn login(&self, identifier: &str, secret: &str) -> Result<IssuedToken, AuthError> {
        let state = GateState::Anonymous.apply(GateEvent::LoginSubmitted);
        debug!(state = %state, "Login submitted");

        let outcome = match self.verifier.verify(identifier, secret).await {
            Ok(principal) => self.codec.issue(&principal, self.token_ttl),
            Err(e) => Err(e),
        };

        let state = match &outcome {
            Ok(token) => state.apply(GateEvent::CredentialsAccepted(token.principal())),
            Err(e) => state.apply(GateEvent::CredentialsRejected(e.clone())),
        };
        debug!(state = %state, "Login evaluated");

        record_login(match &outcome {
            Ok(_) => "success",
            Err(e) => e.kind(),
        });

        outcome
    }

    /// Check a presented token and return the principal it stands for
    #[instrument(skip_all)]
    pub async fn authenticate(&self, token: &str) -> Result<Principal, AuthError> {
        let state = match self.check(token).await {
            Ok(result) => GateState::Anonymous.apply(GateEvent::TokenPresented(result)),
            Err(e) => GateState::Rejected(e),
        };
        debug!(state = %state, "Token evaluated");

        match &state {
            GateState::Rejected(e) => {
                record_token_check(e.kind());
                self.audit.record(AuditEvent::TokenRejected { reason: e.kind() });
            }
            _ => record_token_check("valid"),
        }

        state.into_result()
    }

    /// Signature, expiry and revocation check of a presented token
    ///
    /// `Err` only when the revocation list itself cannot be consulted.
    pub async fn check(&self, token: &str) -> Result<VerificationResult, AuthError> {
        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(e) => {
                debug!(error = %e, "Token rejected by codec");
                return Ok(VerificationResult::from_error(&e));
            }
        };

        if let Some(revocations) = &self.revocations {
            if revocations.is_revoked(&TokenFingerprint::of(token)).await? {
                return Ok(VerificationResult::Revoked);
            }
        }

        Ok(VerificationResult::Valid(claims.principal()))
    }

    /// Revoke a token before its natural expiry
    ///
    /// Revoking an already expired or already revoked token succeeds without
    /// effect. Tokens that do not verify are refused.
    #[instrument(skip_all)]
    pub async fn revoke(&self, token: &str) -> Result<(), AuthError> {
        let Some(revocations) = &self.revocations else {
            return Err(AuthError::internal("Token revocation is not enabled"));
        };

        let claims = match self.codec.verify(token) {
            Ok(claims) => claims,
            Err(AuthError::Expired) => return Ok(()),
            Err(e) => return Err(e),
        };

        let fingerprint = TokenFingerprint::of(token);
        revocations
            .revoke(fingerprint.clone(), claims.expires_at())
            .await?;

        record_revocation();
        self.audit.record(AuditEvent::TokenRevoked {
            principal_id: claims.sub.to_string(),
            fingerprint,
        });

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use chrono::{DateTime, Utc};
    use jsonwebtoken::Algorithm;

    use crate::domain::credential::{CredentialStoreError, MockCredentialStore};
    use crate::domain::{
        Clock, Credential, ManualClock, PrincipalId, StoredCredential, MAX_TOKEN_TTL_SECS,
    };
    use crate::infrastructure::auth::{JwtTokenCodec, TokenKeys};
    use crate::infrastructure::credential::{InMemoryCredentialStore, PlainHasher};
    use crate::infrastructure::revocation::InMemoryRevocationList;

    const T: i64 = 1_700_000_000;

    fn alice_credential() -> StoredCredential {
        StoredCredential::new(
            Principal::new(PrincipalId::new("alice").unwrap())
                .with_roles(["user"])
                .unwrap(),
            Credential::new("plain:s3cret"),
        )
    }

    fn codec(clock: Arc<ManualClock>) -> Arc<JwtTokenCodec> {
        let keys = TokenKeys::from_secret(b"gate-test-secret-gate-test-secret", Algorithm::HS256)
            .unwrap();
        Arc::new(JwtTokenCodec::new(keys, clock))
    }

    fn create_gate() -> (AuthenticationGate, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::at_timestamp(T));
        let store = Arc::new(InMemoryCredentialStore::with_credentials(vec![alice_credential()]));
        let verifier = CredentialVerifier::new(store, Arc::new(PlainHasher::default()));

        let gate = AuthenticationGate::new(verifier, codec(clock.clone()), Duration::seconds(3600))
            .with_revocation_list(Arc::new(InMemoryRevocationList::new()));

        (gate, clock)
    }

    #[tokio::test]
    async fn test_login_then_authenticate() {
        let (gate, _) = create_gate();

        let token = gate.login("alice", "s3cret").await.unwrap();
        let principal = gate.authenticate(token.as_str()).await.unwrap();

        assert_eq!(principal.id().as_str(), "alice");
        assert!(principal.has_role("user"));
    }

    #[tokio::test]
    async fn test_alice_scenario() {
        let (gate, clock) = create_gate();

        let token = gate.login("alice", "s3cret").await.unwrap();
        assert_eq!(token.issued_at().timestamp(), T);
        assert_eq!(token.expires_at().timestamp(), T + 3600);

        clock.advance(Duration::seconds(10));
        let principal = gate.authenticate(token.as_str()).await.unwrap();
        assert_eq!(principal.id().as_str(), "alice");

        clock.set(DateTime::from_timestamp(T + 3601, 0).unwrap());
        assert_eq!(
            gate.authenticate(token.as_str()).await,
            Err(AuthError::Expired)
        );
    }

    #[tokio::test]
    async fn test_login_failures_share_public_error() {
        let (gate, _) = create_gate();

        let bad = gate.login("alice", "wrong").await.unwrap_err();
        let unknown = gate.login("mallory", "s3cret").await.unwrap_err();

        assert_eq!(bad, AuthError::bad_credential("alice"));
        assert_eq!(unknown, AuthError::unknown_principal("mallory"));
        assert_eq!(bad.public(), unknown.public());
    }

    #[tokio::test]
    async fn test_store_unavailable_is_surfaced_once() {
        let mut store = MockCredentialStore::new();
        store
            .expect_lookup()
            .times(1)
            .returning(|_| Err(CredentialStoreError::Unavailable("down".into())));

        let clock = Arc::new(ManualClock::at_timestamp(T));
        let verifier = CredentialVerifier::new(Arc::new(store), Arc::new(PlainHasher::default()));
        let gate = AuthenticationGate::new(verifier, codec(clock), Duration::seconds(60));

        assert_eq!(
            gate.login("alice", "s3cret").await,
            Err(AuthError::store_unavailable("down"))
        );
    }

    #[tokio::test]
    async fn test_tampered_token() {
        let (gate, _) = create_gate();
        let token = gate.login("alice", "s3cret").await.unwrap().into_string();

        let payload_index = token.find('.').unwrap() + 3;
        let mut bytes = token.into_bytes();
        bytes[payload_index] = if bytes[payload_index] == b'x' { b'y' } else { b'x' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert_eq!(
            gate.authenticate(&tampered).await,
            Err(AuthError::SignatureMismatch)
        );
    }

    #[tokio::test]
    async fn test_garbage_token() {
        let (gate, _) = create_gate();

        let result = gate.authenticate("not-a-token").await;
        assert!(matches!(result, Err(AuthError::Malformed { .. })));
    }

    #[tokio::test]
    async fn test_revoke_then_authenticate() {
        let (gate, _) = create_gate();
        let token = gate.login("alice", "s3cret").await.unwrap();

        gate.revoke(token.as_str()).await.unwrap();

        assert_eq!(
            gate.authenticate(token.as_str()).await,
            Err(AuthError::Revoked)
        );
        assert_eq!(
            gate.check(token.as_str()).await.unwrap(),
            VerificationResult::Revoked
        );

        // Idempotent
        gate.revoke(token.as_str()).await.unwrap();
    }

    #[tokio::test]
    async fn test_long_lived_revocation_survives_purge() {
        let clock = Arc::new(ManualClock::at_timestamp(T));
        let store = Arc::new(InMemoryCredentialStore::with_credentials(vec![alice_credential()]));
        let verifier = CredentialVerifier::new(store, Arc::new(PlainHasher::default()));
        let revocations = Arc::new(InMemoryRevocationList::new());
        let gate = AuthenticationGate::new(
            verifier,
            codec(clock.clone()),
            Duration::seconds(MAX_TOKEN_TTL_SECS),
        )
        .with_revocation_list(revocations.clone());

        let token = gate.login("alice", "s3cret").await.unwrap();
        gate.revoke(token.as_str()).await.unwrap();

        clock.advance(Duration::seconds(86_400));
        assert_eq!(revocations.purge_expired(clock.now()).await.unwrap(), 0);
        assert_eq!(
            gate.authenticate(token.as_str()).await,
            Err(AuthError::Revoked)
        );
    }

    #[tokio::test]
    async fn test_revoke_leaves_other_tokens_alone() {
        let (gate, clock) = create_gate();
        let first = gate.login("alice", "s3cret").await.unwrap();
        clock.advance(Duration::seconds(1));
        let second = gate.login("alice", "s3cret").await.unwrap();

        gate.revoke(first.as_str()).await.unwrap();

        assert!(gate.authenticate(second.as_str()).await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_expired_token_is_noop() {
        let (gate, clock) = create_gate();
        let token = gate.login("alice", "s3cret").await.unwrap();

        clock.advance(Duration::seconds(7200));
        assert!(gate.revoke(token.as_str()).await.is_ok());
    }

    #[tokio::test]
    async fn test_revoke_rejects_invalid_token() {
        let (gate, _) = create_gate();

        assert!(matches!(
            gate.revoke("garbage").await,
            Err(AuthError::Malformed { .. })
        ));
    }

    #[tokio::test]
    async fn test_revoke_without_list() {
        let clock = Arc::new(ManualClock::at_timestamp(T));
        let store = Arc::new(InMemoryCredentialStore::with_credentials(vec![alice_credential()]));
        let verifier = CredentialVerifier::new(store, Arc::new(PlainHasher::default()));
        let gate = AuthenticationGate::new(verifier, codec(clock), Duration::seconds(60));

        let token = gate.login("alice", "s3cret").await.unwrap();

        assert!(!gate.revocation_enabled());
        assert!(gate.revoke(token.as_str()).await.is_err());
        assert!(gate.authenticate(token.as_str()).await.is_ok());
    }

    #[derive(Debug)]
    struct UnreachableRevocationList;

    #[async_trait]
    impl RevocationList for UnreachableRevocationList {
        async fn revoke(&self, _: TokenFingerprint, _: DateTime<Utc>) -> Result<(), AuthError> {
            Err(AuthError::store_unavailable("revocation store down"))
        }

        async fn is_revoked(&self, _: &TokenFingerprint) -> Result<bool, AuthError> {
            Err(AuthError::store_unavailable("revocation store down"))
        }

        async fn purge_expired(&self, _: DateTime<Utc>) -> Result<usize, AuthError> {
            Ok(0)
        }

        async fn len(&self) -> Result<usize, AuthError> {
            Ok(0)
        }
    }

    #[tokio::test]
    async fn test_revocation_store_failure_is_surfaced() {
        let clock = Arc::new(ManualClock::at_timestamp(T));
        let store = Arc::new(InMemoryCredentialStore::with_credentials(vec![alice_credential()]));
        let verifier = CredentialVerifier::new(store, Arc::new(PlainHasher::default()));
        let gate = AuthenticationGate::new(verifier, codec(clock), Duration::seconds(60))
            .with_revocation_list(Arc::new(UnreachableRevocationList));

        let token = gate.login("alice", "s3cret").await.unwrap();

        assert_eq!(
            gate.authenticate(token.as_str()).await,
            Err(AuthError::store_unavailable("revocation store down"))
        );
    }

    #[tokio::test]
    async fn test_concurrent_requests() {
        let (gate, _) = create_gate();
        let gate = Arc::new(gate);

        let handles: Vec<_> = (0..8)
            .map(|i| {
                let gate = gate.clone();
                tokio::spawn(async move {
                    let secret = if i % 2 == 0 { "s3cret" } else { "wrong" };
                    match gate.login("alice", secret).await {
                        Ok(token) => gate.authenticate(token.as_str()).await.is_ok(),
                        Err(_) => false,
                    }
                })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            if handle.await.unwrap() {
                successes += 1;
            }
        }

        assert_eq!(successes, 4);
    }
}
