//! JWT token codec with secret and JWKS key material

use std::fmt::Debug;
use std::str::FromStr;
use std::sync::Arc;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{crypto, encode, Algorithm, DecodingKey, EncodingKey, Header};
use rsa::pkcs1::{EncodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::{BigUint, RsaPrivateKey};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::warn;

use crate::domain::{AuthError, Clock, IssuedToken, Principal, TokenClaims, TokenCodec};

const MIN_RECOMMENDED_SECRET_BYTES: usize = 32;

/// Server-held signing and verification keys
#[derive(Clone)]
pub struct TokenKeys {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    algorithm: Algorithm,
    key_id: Option<String>,
}

impl Debug for TokenKeys {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenKeys")
            .field("algorithm", &self.algorithm)
            .field("key_id", &self.key_id)
            .field("encoding_key", &"[hidden]")
            .field("decoding_key", &"[hidden]")
            .finish()
    }
}

impl TokenKeys {
    /// Symmetric keys from a shared secret. `algorithm` must be HS256/384/512.
    pub fn from_secret(secret: &[u8], algorithm: Algorithm) -> Result<Self, AuthError> {
        if !matches!(
            algorithm,
            Algorithm::HS256 | Algorithm::HS384 | Algorithm::HS512
        ) {
            return Err(AuthError::internal(format!(
                "Algorithm {:?} needs asymmetric keys, not a shared secret",
                algorithm
            )));
        }

        if secret.is_empty() {
            return Err(AuthError::internal("Token secret cannot be empty"));
        }

        if secret.len() < MIN_RECOMMENDED_SECRET_BYTES {
            warn!(
                "Token secret is shorter than {} bytes; use a longer secret in production",
                MIN_RECOMMENDED_SECRET_BYTES
            );
        }

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            algorithm,
            key_id: None,
        })
    }

    /// Parse an algorithm name such as `HS256`
    pub fn parse_algorithm(name: &str) -> Result<Algorithm, AuthError> {
        Algorithm::from_str(name)
            .map_err(|_| AuthError::internal(format!("Unsupported token algorithm: {}", name)))
    }

    /// Load the first usable key of a JWKS document
    ///
    /// Supports `oct` keys (HMAC) and `RSA` keys that include the private
    /// exponent, since the same process both signs and verifies.
    pub fn from_jwks_json(jwks_json: &str) -> Result<Self, AuthError> {
        let jwks: Jwks = serde_json::from_str(jwks_json)
            .map_err(|e| AuthError::internal(format!("Failed to parse JWKS: {}", e)))?;

        let key = jwks
            .keys
            .iter()
            .find(|k| k.kid.is_some())
            .or_else(|| jwks.keys.first())
            .ok_or_else(|| AuthError::internal("JWKS contains no keys"))?;

        let mut keys = match key.kty.as_str() {
            "oct" => Self::from_symmetric_jwk(key)?,
            "RSA" => Self::from_rsa_jwk(key)?,
            other => {
                return Err(AuthError::internal(format!(
                    "Unsupported key type: {}. Use RSA or oct.",
                    other
                )))
            }
        };

        keys.key_id = key.kid.clone();
        Ok(keys)
    }

    fn from_symmetric_jwk(key: &JwkKey) -> Result<Self, AuthError> {
        let k = key
            .k
            .as_deref()
            .ok_or_else(|| AuthError::internal("Symmetric key missing 'k' value"))?;

        let algorithm = match key.alg.as_deref() {
            Some("HS256") | None => Algorithm::HS256,
            Some("HS384") => Algorithm::HS384,
            Some("HS512") => Algorithm::HS512,
            Some(alg) => {
                return Err(AuthError::internal(format!(
                    "Unsupported symmetric algorithm: {}",
                    alg
                )))
            }
        };

        Self::from_secret(&decode_base64url(k, "k")?, algorithm)
    }

    fn from_rsa_jwk(key: &JwkKey) -> Result<Self, AuthError> {
        let algorithm = match key.alg.as_deref() {
            Some("RS256") | None => Algorithm::RS256,
            Some("RS384") => Algorithm::RS384,
            Some("RS512") => Algorithm::RS512,
            Some(alg) => {
                return Err(AuthError::internal(format!(
                    "Unsupported RSA algorithm: {}",
                    alg
                )))
            }
        };

        let component = |value: &Option<String>, name: &str| -> Result<BigUint, AuthError> {
            let value = value
                .as_deref()
                .ok_or_else(|| AuthError::internal(format!("RSA key missing '{}'", name)))?;
            Ok(BigUint::from_bytes_be(&decode_base64url(value, name)?))
        };

        let n = component(&key.n, "n")?;
        let e = component(&key.e, "e")?;
        let d = component(&key.d, "d")?;
        let primes = match (&key.p, &key.q) {
            (Some(_), Some(_)) => vec![component(&key.p, "p")?, component(&key.q, "q")?],
            _ => vec![],
        };

        let private_key = RsaPrivateKey::from_components(n, e, d, primes)
            .map_err(|e| AuthError::internal(format!("Invalid RSA key components: {}", e)))?;

        let private_pem = private_key
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .map_err(|e| AuthError::internal(format!("Failed to encode RSA private key: {}", e)))?;
        let public_pem = private_key
            .to_public_key()
            .to_pkcs1_pem(rsa::pkcs1::LineEnding::LF)
            .map_err(|e| AuthError::internal(format!("Failed to encode RSA public key: {}", e)))?;

        let encoding_key = EncodingKey::from_rsa_pem(private_pem.as_bytes())
            .map_err(|e| AuthError::internal(format!("Failed to create encoding key: {}", e)))?;
        let decoding_key = DecodingKey::from_rsa_pem(public_pem.as_bytes())
            .map_err(|e| AuthError::internal(format!("Failed to create decoding key: {}", e)))?;

        Ok(Self {
            encoding_key,
            decoding_key,
            algorithm,
            key_id: None,
        })
    }

    pub fn algorithm(&self) -> Algorithm {
        self.algorithm
    }

    pub fn key_id(&self) -> Option<&str> {
        self.key_id.as_deref()
    }
}

/// JWK key structure for manual parsing (includes private key components)
#[derive(Debug, Clone, Deserialize)]
struct JwkKey {
    kty: String,
    kid: Option<String>,
    alg: Option<String>,
    n: Option<String>,
    e: Option<String>,
    d: Option<String>,
    p: Option<String>,
    q: Option<String>,
    /// Symmetric key value (base64url) for oct keys
    k: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct Jwks {
    keys: Vec<JwkKey>,
}

fn decode_base64url(s: &str, field: &str) -> Result<Vec<u8>, AuthError> {
    URL_SAFE_NO_PAD
        .decode(s)
        .map_err(|e| AuthError::internal(format!("Invalid base64url in '{}': {}", field, e)))
}

/// Decode one base64url JSON segment of a presented token
fn decode_segment<T: DeserializeOwned>(segment: &str, what: &str) -> Result<T, AuthError> {
    let bytes = URL_SAFE_NO_PAD
        .decode(segment)
        .map_err(|e| AuthError::malformed(format!("Invalid base64url in {}: {}", what, e)))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| AuthError::malformed(format!("Invalid {} JSON: {}", what, e)))
}

/// JWT codec signing with [`TokenKeys`] and reading time from a [`Clock`]
///
/// Issuance is deterministic for a fixed clock and key: claims carry no
/// random nonce and serialize canonically.
#[derive(Clone)]
pub struct JwtTokenCodec {
    keys: TokenKeys,
    clock: Arc<dyn Clock>,
}

impl Debug for JwtTokenCodec {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtTokenCodec")
            .field("keys", &self.keys)
            .field("clock", &self.clock)
            .finish()
    }
}

impl JwtTokenCodec {
    pub fn new(keys: TokenKeys, clock: Arc<dyn Clock>) -> Self {
        Self { keys, clock }
    }

    pub fn keys(&self) -> &TokenKeys {
        &self.keys
    }
}

impl TokenCodec for JwtTokenCodec {
    fn issue(&self, principal: &Principal, ttl: Duration) -> Result<IssuedToken, AuthError> {
        let claims = TokenClaims::new(principal, self.clock.now(), ttl)?;

        let mut header = Header::new(self.keys.algorithm);
        header.kid = self.keys.key_id.clone();

        let token = encode(&header, &claims, &self.keys.encoding_key)
            .map_err(|e| AuthError::internal(format!("Failed to sign token: {}", e)))?;

        Ok(IssuedToken::new(token, claims))
    }

    fn verify(&self, token: &str) -> Result<TokenClaims, AuthError> {
        let (signing_input, signature) = token
            .rsplit_once('.')
            .ok_or_else(|| AuthError::malformed("Expected three dot-separated segments"))?;
        let (header_segment, payload_segment) = signing_input
            .split_once('.')
            .ok_or_else(|| AuthError::malformed("Expected three dot-separated segments"))?;

        let header: Header = decode_segment(header_segment, "header")?;

        if header.alg != self.keys.algorithm {
            return Err(AuthError::malformed(format!(
                "Unexpected algorithm {:?}",
                header.alg
            )));
        }

        // Signature first, over the raw bytes, so that any change to the
        // payload is reported as a mismatch rather than a decode failure
        let signature_valid = crypto::verify(
            signature,
            signing_input.as_bytes(),
            &self.keys.decoding_key,
            header.alg,
        )
        .map_err(|e| AuthError::malformed(format!("Invalid signature encoding: {}", e)))?;

        if !signature_valid {
            return Err(AuthError::SignatureMismatch);
        }

        let claims: TokenClaims = decode_segment(payload_segment, "payload")?;

        if claims.exp <= claims.iat {
            return Err(AuthError::malformed("Token expires before it was issued"));
        }

        if DateTime::<Utc>::from_timestamp(claims.exp, 0).is_none() {
            return Err(AuthError::malformed("Token expiry is out of range"));
        }

        if claims.is_expired_at(self.clock.now()) {
            return Err(AuthError::Expired);
        }

        Ok(claims)
    }
}
