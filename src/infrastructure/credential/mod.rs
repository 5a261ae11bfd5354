//! Credential infrastructure
//!
//! Password hashing, the in-memory credential store and the verifier.

mod password;
mod repository;
mod verifier;

pub use password::{Argon2Hasher, PasswordHasher};
pub use repository::InMemoryCredentialStore;
pub use verifier::CredentialVerifier;

#[cfg(test)]
pub(crate) use password::testing::PlainHasher;
