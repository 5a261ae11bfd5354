//! Infrastructure layer - implementations of the domain seams

pub mod audit;
pub mod auth;
pub mod credential;
pub mod gate;
pub mod logging;
pub mod observability;
pub mod revocation;
