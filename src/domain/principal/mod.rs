//! Principal domain
//!
//! Authenticated identities, their identifiers and validation rules.

mod entity;
mod validation;

pub use entity::{Principal, PrincipalId};
pub use validation::{validate_principal_id, validate_role, PrincipalValidationError};
