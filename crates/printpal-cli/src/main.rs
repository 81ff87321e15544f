//! Printpal CLI — entry point.
//!
//! # Commands
//!
//! - `printpal chat [-m MESSAGE]` — talk to the assistant (single-shot or REPL)
//! - `printpal status` — show configuration and model status

mod helpers;
mod repl;
mod status;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::info;

use printpal_core::config::load_config;
use printpal_core::session::ChatSession;
use printpal_engine::EngineLoader;

// ─────────────────────────────────────────────
// CLI definition
// ─────────────────────────────────────────────

/// 🖨️ Printpal — local 3D-printing assistant
#[derive(Parser)]
#[command(name = "printpal", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat with the assistant (single-shot or interactive REPL)
    Chat {
        /// Single message (non-interactive). Omit for REPL mode.
        #[arg(short, long)]
        message: Option<String>,

        /// Enable debug logging
        #[arg(long, default_value_t = false)]
        logs: bool,
    },

    /// Show configuration and model status
    Status,
}

// ─────────────────────────────────────────────
// Entrypoint
// ─────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Chat { message, logs } => {
            init_logging(logs);
            run_chat(message).await
        }
        Commands::Status => {
            init_logging(false);
            status::run()
        }
    }
}

// ─────────────────────────────────────────────
// Chat command
// ─────────────────────────────────────────────

async fn run_chat(message: Option<String>) -> Result<()> {
    let config = load_config(None);

    // Load the model up front: a failure here is fatal and must stop the
    // program before any chat interaction becomes reachable.
    let loader = EngineLoader::new(config.model.clone());
    helpers::print_loading();
    let engine = loader
        .acquire()
        .await
        .context("could not load the language model")?;
    helpers::clear_status_line();

    let mut session = ChatSession::new(engine, config.persona_text())
        .with_params(config.generation.clone());

    match message {
        Some(msg) => {
            // Single-shot mode
            info!("processing single message");
            helpers::print_thinking();
            let reply = session.submit(&msg).await;
            helpers::clear_status_line();
            match reply.context("the assistant could not answer")? {
                Some(text) => helpers::print_reply(&text),
                None => helpers::print_reply(""),
            }
            Ok(())
        }
        None => repl::run(session).await,
    }
}

/// Initialize tracing/logging.
fn init_logging(verbose: bool) {
    use tracing_subscriber::EnvFilter;

    let filter = if verbose {
        EnvFilter::new("printpal=debug,info")
    } else {
        EnvFilter::new("warn")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .compact()
        .init();
}
