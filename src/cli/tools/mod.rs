//! Operator commands that run without the HTTP server

use std::io::BufRead;
use std::sync::Arc;

use anyhow::{bail, Context};
use clap::Args;

use crate::config::AppConfig;
use crate::domain::{CredentialStore, SystemClock, TokenCodec};
use crate::infrastructure::auth::JwtTokenCodec;
use crate::infrastructure::credential::{Argon2Hasher, PasswordHasher};

#[derive(Args, Debug)]
pub struct HashPasswordArgs {
    /// Password to hash; read from stdin when omitted
    pub password: Option<String>,
}

#[derive(Args, Debug)]
pub struct IssueTokenArgs {
    /// Principal identifier from configuration
    pub principal: String,

    /// Token lifetime, defaults to `auth.token_ttl_secs`
    #[arg(long)]
    pub ttl_secs: Option<u64>,
}

pub async fn hash_password(args: HashPasswordArgs) -> anyhow::Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => read_password_from_stdin()?,
    };

    if password.is_empty() {
        bail!("Password must not be empty");
    }

    println!("{}", Argon2Hasher::new().hash(&password)?);

    Ok(())
}

fn read_password_from_stdin() -> anyhow::Result<String> {
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;

    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// Sign a token for a configured principal
///
/// Requires a persistent signing key; a random one would make the token
/// useless to any running server.
pub async fn issue_token(args: IssueTokenArgs) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().unwrap_or_default();
    let hasher = Argon2Hasher::new();
    let store = crate::seed_credential_store(&config.auth, &hasher).await?;

    let principal = store
        .lookup(&args.principal)
        .await?
        .with_context(|| format!("Principal '{}' is not configured", args.principal))?
        .into_principal();

    let mut auth = config.auth.clone();
    if let Some(ttl_secs) = args.ttl_secs {
        auth.token_ttl_secs = ttl_secs;
    }
    let ttl = crate::token_ttl(&auth)?;

    let keys = crate::create_token_keys(&config.auth, false)?;
    let codec = JwtTokenCodec::new(keys, Arc::new(SystemClock));
    let issued = codec.issue(&principal, ttl)?;

    eprintln!("Expires at {}", issued.expires_at().to_rfc3339());
    println!("{}", issued.as_str());

    Ok(())
}
