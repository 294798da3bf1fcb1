//! # jscorp-hr
//!
//! Terminal front end for the JSCORP HR backend. Resolves the API base URL,
//! keeps the session token in a local JSON store, and prints what the
//! backend returns. A failed call prints a notice and exits non-zero.

mod cli;
mod commands;

use std::process::ExitCode;

use clap::Parser;

use crate::cli::Cli;
use crate::commands::Console;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = jscorp_common::config::load()?;

    // Logs go to stderr; stdout is for command output
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jscorp=info".into()),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let mut console = Console::open(config)?;
    console.run(cli.command).await?;

    let Some(notice) = console.notice() else {
        return Ok(ExitCode::SUCCESS);
    };
    eprintln!("error: {}", notice.message);
    if let Some(hint) = &notice.hint {
        eprintln!("  {hint}");
    }
    if notice.retry {
        eprintln!("  Run the command again to retry.");
    }
    tracing::debug!(code = notice.kind.code(), "Command failed");
    Ok(ExitCode::FAILURE)
}
