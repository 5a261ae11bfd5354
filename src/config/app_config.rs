use std::collections::BTreeMap;

use serde::Deserialize;

use crate::infrastructure::observability::MetricsConfig;

/// Application configuration
#[derive(Debug, Clone, Deserialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub auth: AuthConfig,
    #[serde(default)]
    pub metrics: MetricsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    #[serde(default)]
    pub format: LogFormat,
}

#[derive(Debug, Clone, Copy, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Token and credential settings
#[derive(Clone, Deserialize)]
pub struct AuthConfig {
    /// HMAC signing secret, overridden by `JWT_SECRET`
    #[serde(default)]
    pub secret: Option<String>,
    #[serde(default = "default_algorithm")]
    pub algorithm: String,
    /// JWKS document, overridden by `AUTH_JWKS`
    #[serde(default)]
    pub jwks: Option<String>,
    #[serde(default = "default_token_ttl_secs")]
    pub token_ttl_secs: u64,
    #[serde(default = "default_true")]
    pub revocation_enabled: bool,
    #[serde(default = "default_purge_interval_secs")]
    pub purge_interval_secs: u64,
    #[serde(default)]
    pub principals: Vec<PrincipalSeed>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("secret", &self.secret.as_ref().map(|_| "[REDACTED]"))
            .field("algorithm", &self.algorithm)
            .field("jwks", &self.jwks.as_ref().map(|_| "[REDACTED]"))
            .field("token_ttl_secs", &self.token_ttl_secs)
            .field("revocation_enabled", &self.revocation_enabled)
            .field("purge_interval_secs", &self.purge_interval_secs)
            .field("principals", &self.principals)
            .finish()
    }
}

/// A principal created at startup
#[derive(Clone, Deserialize)]
pub struct PrincipalSeed {
    pub id: String,
    /// Plaintext password, hashed at startup
    #[serde(default)]
    pub password: Option<String>,
    /// Precomputed Argon2 PHC string
    #[serde(default)]
    pub password_hash: Option<String>,
    #[serde(default)]
    pub roles: Vec<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, String>,
}

impl std::fmt::Debug for PrincipalSeed {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrincipalSeed")
            .field("id", &self.id)
            .field("roles", &self.roles)
            .field("attributes", &self.attributes)
            .finish_non_exhaustive()
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            secret: None,
            algorithm: default_algorithm(),
            jwks: None,
            token_ttl_secs: default_token_ttl_secs(),
            revocation_enabled: true,
            purge_interval_secs: default_purge_interval_secs(),
            principals: Vec::new(),
        }
    }
}

fn default_algorithm() -> String {
    "HS256".to_string()
}

fn default_token_ttl_secs() -> u64 {
    3600
}

fn default_purge_interval_secs() -> u64 {
    300
}

fn default_true() -> bool {
    true
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(
                config::Environment::with_prefix("APP")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
