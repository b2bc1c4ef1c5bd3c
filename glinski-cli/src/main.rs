//! Glinski CLI - Command-line interface
//!
//! Commands:
//! - serve: Start the HTTP API, optionally linked to a relay
//! - show: Print a board
//! - moves: Print legal destinations for one cell

mod inspect;
mod server;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "glinski")]
#[command(about = "Glinski hexagonal chess engine")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the board server
    Serve(server::ServerArgs),
    /// Print a board as text
    Show(inspect::ShowArgs),
    /// Print legal destinations for the piece on a cell
    Moves(inspect::MovesArgs),
}

fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve(args) => server::run(args),
        Commands::Show(args) => inspect::run_show(args),
        Commands::Moves(args) => inspect::run_moves(args),
    }
}
