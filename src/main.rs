use authgate::cli::{self, Cli, Command};
use clap::Parser;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Command::Serve => cli::serve::run().await,
        Command::HashPassword(args) => cli::tools::hash_password(args).await,
        Command::IssueToken(args) => cli::tools::issue_token(args).await,
    }
}
