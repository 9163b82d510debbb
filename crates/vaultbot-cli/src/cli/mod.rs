//! CLI command definitions for the `vaultbot` binary.
//!
//! Uses clap derive macros for argument parsing. Every command is keyed by
//! the numeric chat id, the same partition key the chat front end uses.

pub mod credential;
pub mod lang;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use vaultbot_types::credential::ChatId;

/// Store and retrieve encrypted per-user service credentials.
#[derive(Parser)]
#[command(name = "vaultbot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans through OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "VAULTBOT_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Encrypt and store a login/password pair for a service.
    #[command(alias = "set")]
    Save {
        /// Owner of the credential.
        chat_id: ChatId,

        /// Service name (stored only as a hash).
        service: String,

        /// Login for the service.
        login: String,

        /// Password (prompted with hidden input if omitted).
        #[arg(long)]
        password: Option<String>,
    },

    /// Show the credential stored for a service.
    Get {
        chat_id: ChatId,
        service: String,

        /// Print the password in clear instead of masked.
        #[arg(long)]
        reveal: bool,
    },

    /// Remove the credential stored for a service.
    #[command(alias = "rm")]
    Delete { chat_id: ChatId, service: String },

    /// Show a user's language, or set it when a code is given.
    Lang {
        chat_id: ChatId,

        /// New language code (e.g. "en", "ru").
        lang: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Target shell.
        shell: Shell,
    },
}
