//! Authentication infrastructure module
//!
//! This module provides the JWT token codec and its key material.

mod jwt;

pub use jwt::{JwtTokenCodec, TokenKeys};
