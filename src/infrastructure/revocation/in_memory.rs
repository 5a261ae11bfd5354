//! In-memory revocation list

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::{AuthError, RevocationList, TokenFingerprint};

/// Process-local revocation list
///
/// Reads share the lock, so concurrent token checks do not serialize; a
/// revoke holds the write lock only for the insert. Once `revoke` returns,
/// every later `is_revoked` in this process sees the entry.
#[derive(Debug, Default, Clone)]
pub struct InMemoryRevocationList {
    entries: Arc<RwLock<HashMap<TokenFingerprint, DateTime<Utc>>>>,
}

impl InMemoryRevocationList {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RevocationList for InMemoryRevocationList {
    async fn revoke(
        &self,
        fingerprint: TokenFingerprint,
        expires_at: DateTime<Utc>,
    ) -> Result<(), AuthError> {
        self.entries.write().await.insert(fingerprint, expires_at);
        Ok(())
    }

    async fn is_revoked(&self, fingerprint: &TokenFingerprint) -> Result<bool, AuthError> {
        Ok(self.entries.read().await.contains_key(fingerprint))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, AuthError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at > now);
        Ok(before - entries.len())
    }

    async fn len(&self) -> Result<usize, AuthError> {
        Ok(self.entries.read().await.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[tokio::test]
    async fn test_revoke_and_check() {
        let list = InMemoryRevocationList::new();
        let fingerprint = TokenFingerprint::of("a.b.c");

        assert!(!list.is_revoked(&fingerprint).await.unwrap());

        list.revoke(fingerprint.clone(), at(100)).await.unwrap();
        assert!(list.is_revoked(&fingerprint).await.unwrap());
        assert!(!list.is_revoked(&TokenFingerprint::of("x.y.z")).await.unwrap());
    }

    #[tokio::test]
    async fn test_revoke_is_idempotent() {
        let list = InMemoryRevocationList::new();

        list.revoke(TokenFingerprint::of("a.b.c"), at(100)).await.unwrap();
        list.revoke(TokenFingerprint::of("a.b.c"), at(100)).await.unwrap();

        assert_eq!(list.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let list = InMemoryRevocationList::new();
        list.revoke(TokenFingerprint::of("old"), at(100)).await.unwrap();
        list.revoke(TokenFingerprint::of("boundary"), at(200)).await.unwrap();
        list.revoke(TokenFingerprint::of("fresh"), at(300)).await.unwrap();

        let purged = list.purge_expired(at(200)).await.unwrap();

        assert_eq!(purged, 2);
        assert_eq!(list.len().await.unwrap(), 1);
        assert!(list.is_revoked(&TokenFingerprint::of("fresh")).await.unwrap());
    }

    #[tokio::test]
    async fn test_concurrent_revocations_are_visible() {
        let list = InMemoryRevocationList::new();

        let handles: Vec<_> = (0..16)
            .map(|i| {
                let list = list.clone();
                tokio::spawn(async move {
                    list.revoke(TokenFingerprint::of(&format!("token-{}", i)), at(1_000))
                        .await
                        .unwrap();
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        assert_eq!(list.len().await.unwrap(), 16);
        for i in 0..16 {
            assert!(list
                .is_revoked(&TokenFingerprint::of(&format!("token-{}", i)))
                .await
                .unwrap());
        }
    }
}
