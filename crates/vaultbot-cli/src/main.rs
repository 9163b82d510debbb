//! vaultbot command-line entry point.
//!
//! Binary name: `vaultbot`
//!
//! Parses CLI arguments, initializes tracing and the vault, then dispatches
//! to the matching command handler.

mod cli;
mod state;

use clap::Parser;
use clap_complete::generate;

use cli::{Cli, Commands};
use state::AppState;
use vaultbot_observe::tracing_setup::{LogFormat, init_tracing, shutdown_tracing};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up tracing based on verbosity
    let filter = match cli.verbose {
        0 if cli.quiet => "error",
        0 => "warn",
        1 => "info,vaultbot=debug",
        _ => "trace",
    };
    let format = if cli.json { LogFormat::Json } else { LogFormat::Pretty };
    init_tracing(filter, format, cli.otel).map_err(|e| anyhow::anyhow!(e))?;

    // Shell completions don't need app state
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "vaultbot", &mut std::io::stdout());
        return Ok(());
    }

    let state = AppState::init().await?;
    let result = run(&state, cli).await;

    state.shutdown().await;
    shutdown_tracing();

    result
}

async fn run(state: &AppState, cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Save {
            chat_id,
            service,
            login,
            password,
        } => {
            cli::credential::save_credential(
                state,
                chat_id,
                &service,
                &login,
                password.as_deref(),
                cli.json,
            )
            .await
        }

        Commands::Get {
            chat_id,
            service,
            reveal,
        } => cli::credential::get_credential(state, chat_id, &service, reveal, cli.json).await,

        Commands::Delete { chat_id, service } => {
            cli::credential::delete_credential(state, chat_id, &service, cli.json).await
        }

        Commands::Lang { chat_id, lang } => {
            cli::lang::lang(state, chat_id, lang.as_deref(), cli.json).await
        }

        Commands::Completions { .. } => Ok(()),
    }
}
