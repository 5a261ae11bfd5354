//! API middleware components

pub mod logging;
pub mod metrics;
pub mod principal_auth;
pub mod security;

pub use logging::logging_middleware;
pub use metrics::metrics_middleware;
pub use principal_auth::{extract_bearer_token, RequirePrincipal};
pub use security::security_headers_middleware;
