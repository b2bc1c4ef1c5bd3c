//! Example to run the Glinski server standalone
//!
//! Run with: cargo run -p glinski-server --example run_server

use glinski_core::MoveConfig;
use glinski_server::{run_server, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    tracing_subscriber::fmt::init();

    let config = ServerConfig {
        port: 8003,
        static_dir: "glinski/visualizer".to_string(),
        peer: None,
        moves: MoveConfig::from_env(),
    };

    println!("Starting Glinski server on port {}", config.port);
    println!("Static files from: {}", config.static_dir);
    println!("Board state at http://localhost:{}/api/board", config.port);

    run_server(config).await
}
