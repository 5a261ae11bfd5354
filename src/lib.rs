//! authgate
//!
//! A token-based authentication gate:
//! - Credential verification against a pluggable credential store
//! - Signed, expiring tokens (HMAC secret or JWKS keys)
//! - Token validation with an optional revocation list
//! - HTTP endpoints and operator CLI around the gate

pub mod api;
pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use crate::config::AppConfig;

use std::sync::Arc;

use anyhow::{bail, Context};
use rand::Rng;
use tracing::{info, warn};

use crate::api::state::AppState;
use crate::config::{AuthConfig, PrincipalSeed};
use crate::domain::{
    Clock, Credential, Principal, PrincipalId, RevocationList, StoredCredential, MAX_TOKEN_TTL_SECS,
};
use crate::infrastructure::audit::TracingAuditSink;
use crate::infrastructure::auth::{JwtTokenCodec, TokenKeys};
use crate::infrastructure::credential::{
    Argon2Hasher, CredentialVerifier, InMemoryCredentialStore, PasswordHasher,
};
use crate::infrastructure::gate::AuthenticationGate;
use crate::infrastructure::revocation::InMemoryRevocationList;

/// Environment variable holding a JWKS document
pub const JWKS_ENV: &str = "AUTH_JWKS";
/// Environment variable holding an HMAC signing secret
pub const SECRET_ENV: &str = "JWT_SECRET";

/// Create the application state with all services initialized
pub async fn create_app_state_with_config(
    config: &AppConfig,
    clock: Arc<dyn Clock>,
) -> anyhow::Result<AppState> {
    let hasher: Arc<dyn PasswordHasher> = Arc::new(Argon2Hasher::new());
    let store = Arc::new(seed_credential_store(&config.auth, hasher.as_ref()).await?);

    let keys = create_token_keys(&config.auth, true)?;
    let codec = Arc::new(JwtTokenCodec::new(keys, clock));
    let verifier =
        CredentialVerifier::new(store.clone(), hasher).with_audit(Arc::new(TracingAuditSink));

    let token_ttl = token_ttl(&config.auth)?;
    let mut gate = AuthenticationGate::new(verifier, codec, token_ttl);

    let revocations: Option<Arc<dyn RevocationList>> = if config.auth.revocation_enabled {
        Some(Arc::new(InMemoryRevocationList::new()))
    } else {
        info!("Token revocation disabled");
        None
    };

    if let Some(revocations) = &revocations {
        gate = gate.with_revocation_list(revocations.clone());
    }

    let mut state = AppState::new(Arc::new(gate), store);
    if let Some(revocations) = revocations {
        state = state.with_revocations(revocations);
    }

    info!(
        principals = config.auth.principals.len(),
        token_ttl_secs = token_ttl.num_seconds(),
        "Authentication gate initialized"
    );

    Ok(state)
}

/// Resolve signing keys: `AUTH_JWKS`, then `auth.jwks`, then `JWT_SECRET`,
/// then `auth.secret`. With nothing configured a random secret is generated
/// when `allow_random` is set.
pub fn create_token_keys(config: &AuthConfig, allow_random: bool) -> anyhow::Result<TokenKeys> {
    let jwks = std::env::var(JWKS_ENV).ok().or_else(|| config.jwks.clone());
    if let Some(jwks_json) = jwks {
        info!("Using JWKS for token signing and validation");
        return TokenKeys::from_jwks_json(&jwks_json).context("Failed to load JWKS");
    }

    let algorithm = TokenKeys::parse_algorithm(&config.algorithm)?;
    let secret = std::env::var(SECRET_ENV).ok().or_else(|| config.secret.clone());

    let secret = match secret {
        Some(secret) => secret,
        None if allow_random => {
            warn!(
                "No {} or {} configured. Generating random secret. \
                Tokens will NOT survive a restart.",
                JWKS_ENV, SECRET_ENV
            );
            generate_random_secret()
        }
        None => bail!("No signing key configured. Set {} or {}", JWKS_ENV, SECRET_ENV),
    };

    Ok(TokenKeys::from_secret(secret.as_bytes(), algorithm)?)
}

/// Build the credential store from configured principals, hashing any
/// plaintext passwords
pub async fn seed_credential_store(
    config: &AuthConfig,
    hasher: &dyn PasswordHasher,
) -> anyhow::Result<InMemoryCredentialStore> {
    let store = InMemoryCredentialStore::new();

    if config.principals.is_empty() {
        warn!("No principals configured; every login will be refused");
    }

    for seed in &config.principals {
        let credential = seed_credential(seed, hasher)
            .with_context(|| format!("Invalid principal '{}'", seed.id))?;
        store.upsert(credential).await;
    }

    Ok(store)
}

fn seed_credential(seed: &PrincipalSeed, hasher: &dyn PasswordHasher) -> anyhow::Result<StoredCredential> {
    let id = PrincipalId::new(seed.id.as_str())?;

    let mut principal = Principal::new(id).with_roles(seed.roles.iter().map(String::as_str))?;
    for (key, value) in &seed.attributes {
        principal = principal.with_attribute(key.as_str(), value.as_str());
    }

    let hash = match (&seed.password_hash, &seed.password) {
        (Some(hash), password) => {
            if password.is_some() {
                warn!(principal = %seed.id, "Both password and password_hash set; using password_hash");
            }
            hash.clone()
        }
        (None, Some(password)) => hasher.hash(password)?,
        (None, None) => bail!("neither password nor password_hash is set"),
    };

    Ok(StoredCredential::new(principal, Credential::new(hash)))
}

/// Token lifetime from configuration, between one second and
/// [`MAX_TOKEN_TTL_SECS`]
pub fn token_ttl(config: &AuthConfig) -> anyhow::Result<chrono::Duration> {
    let secs = i64::try_from(config.token_ttl_secs).context("token_ttl_secs out of range")?;
    if secs < 1 {
        bail!("token_ttl_secs must be at least 1");
    }
    if secs > MAX_TOKEN_TTL_SECS {
        bail!("token_ttl_secs must not exceed {}", MAX_TOKEN_TTL_SECS);
    }

    chrono::Duration::try_seconds(secs).context("token_ttl_secs out of range")
}

fn generate_random_secret() -> String {
    use rand::distributions::Alphanumeric;

    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(64)
        .map(char::from)
        .collect()
}
