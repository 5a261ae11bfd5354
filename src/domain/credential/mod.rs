//! Credential domain
//!
//! Stored credential material and the store it is looked up from.

mod entity;
mod store;

pub use entity::{Credential, StoredCredential};
pub use store::{CredentialStore, CredentialStoreError};

#[cfg(test)]
pub use store::MockCredentialStore;
