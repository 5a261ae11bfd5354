//! Principal validation utilities

use thiserror::Error;

/// Errors that can occur during principal validation
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PrincipalValidationError {
    #[error("Principal ID cannot be empty")]
    EmptyId,

    #[error("Principal ID exceeds maximum length of {0} characters")]
    IdTooLong(usize),

    #[error("Principal ID contains invalid character: '{0}'. Only alphanumeric characters and '-', '_', '.', '@' are allowed")]
    InvalidIdCharacter(char),

    #[error("Role cannot be empty")]
    EmptyRole,

    #[error("Role contains whitespace: '{0}'")]
    WhitespaceInRole(String),
}

const MAX_PRINCIPAL_ID_LENGTH: usize = 64;

/// Validate a principal ID
///
/// Rules:
/// - Cannot be empty
/// - Maximum 64 characters
/// - Only ASCII alphanumerics and `-`, `_`, `.`, `@`
pub fn validate_principal_id(id: &str) -> Result<(), PrincipalValidationError> {
    if id.is_empty() {
        return Err(PrincipalValidationError::EmptyId);
    }

    if id.len() > MAX_PRINCIPAL_ID_LENGTH {
        return Err(PrincipalValidationError::IdTooLong(MAX_PRINCIPAL_ID_LENGTH));
    }

    for c in id.chars() {
        if !c.is_ascii_alphanumeric() && !matches!(c, '-' | '_' | '.' | '@') {
            return Err(PrincipalValidationError::InvalidIdCharacter(c));
        }
    }

    Ok(())
}

/// Validate a role name
pub fn validate_role(role: &str) -> Result<(), PrincipalValidationError> {
    if role.is_empty() {
        return Err(PrincipalValidationError::EmptyRole);
    }

    if role.chars().any(char::is_whitespace) {
        return Err(PrincipalValidationError::WhitespaceInRole(role.to_string()));
    }

    Ok(())
}
