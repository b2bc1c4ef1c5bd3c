//! Server command - start the board server
//!
//! ## Architecture (4-layer granularity)
//!
//! - Level 1: run() - orchestration
//! - Level 2: configure_server(), start_server()
//! - Level 3: validate_static_dir(), peer_config(), move_config()
//! - Level 4: command arguments

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Args;

use glinski_core::{JoinTarget, MoveConfig};
use glinski_server::{run_server, PeerConfig, ServerConfig};

// ============================================================================
// COMMAND ARGUMENTS (Level 4 - Configuration)
// ============================================================================

#[derive(Args)]
pub struct ServerArgs {
    /// Port number to listen on
    #[arg(long, default_value = "8003")]
    pub port: u16,

    /// Directory containing static files for the visualizer
    #[arg(long, default_value = "glinski/visualizer")]
    pub static_dir: PathBuf,

    /// Relay server to play through (host:port)
    #[arg(long, value_name = "ADDR")]
    pub peer: Option<String>,

    /// Game to join on the relay: "auto" or a game id
    #[arg(long, default_value = "auto")]
    pub game: String,

    /// Skip move rules (debugging)
    #[arg(long)]
    pub unrestricted: bool,
}

// ============================================================================
// LEVEL 1 - ORCHESTRATION
// ============================================================================

/// Run server command
///
/// 1. Configure server
/// 2. Start server (blocking)
pub fn run(args: ServerArgs) -> Result<()> {
    let config = configure_server(&args)?;

    tracing::info!("Starting Glinski board server on port {}", config.port);
    if let Some(peer) = &config.peer {
        tracing::info!("Joining game {} at {}", peer.game, peer.addr);
    }

    start_server(config)
}

// ============================================================================
// LEVEL 2 - PHASES
// ============================================================================

/// Configure server from command arguments
fn configure_server(args: &ServerArgs) -> Result<ServerConfig> {
    validate_static_dir(&args.static_dir)?;

    Ok(ServerConfig {
        port: args.port,
        static_dir: args.static_dir.to_string_lossy().to_string(),
        peer: peer_config(args)?,
        moves: move_config(args.unrestricted),
    })
}

/// Start the server (blocking)
fn start_server(config: ServerConfig) -> Result<()> {
    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async { run_server(config).await })
}

// ============================================================================
// LEVEL 3 - STEPS
// ============================================================================

/// Validate that static directory exists
fn validate_static_dir(path: &Path) -> Result<()> {
    if !path.exists() {
        tracing::warn!(
            "Static directory does not exist: {}. Server will start but may not serve files.",
            path.display()
        );
    } else if !path.is_dir() {
        anyhow::bail!(
            "Static path exists but is not a directory: {}",
            path.display()
        );
    }

    Ok(())
}

fn peer_config(args: &ServerArgs) -> Result<Option<PeerConfig>> {
    let game: JoinTarget = args
        .game
        .parse()
        .with_context(|| format!("--game must be 'auto' or a number, got '{}'", args.game))?;

    match &args.peer {
        Some(addr) => Ok(Some(PeerConfig {
            addr: addr.clone(),
            game,
        })),
        None => {
            if game != JoinTarget::Auto {
                tracing::warn!("--game ignored without --peer");
            }
            Ok(None)
        }
    }
}

/// The flag wins; otherwise the environment decides
pub(crate) fn move_config(unrestricted: bool) -> MoveConfig {
    if unrestricted {
        MoveConfig::UNRESTRICTED
    } else {
        MoveConfig::from_env()
    }
}

// ============================================================================
// TESTS
// ============================================================================
