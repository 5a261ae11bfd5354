//! CLI module for authgate
//!
//! - `serve`: run the HTTP server
//! - `hash-password`: print an Argon2 hash for a principal seed
//! - `issue-token`: sign a token for a configured principal

pub mod serve;
pub mod tools;

use clap::{Parser, Subcommand};

/// authgate - token-based authentication gate
#[derive(Parser)]
#[command(name = "authgate")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the HTTP server
    Serve,

    /// Hash a password for use as `password_hash` in configuration
    HashPassword(tools::HashPasswordArgs),

    /// Issue a token for a configured principal without checking a password
    IssueToken(tools::IssueTokenArgs),
}
