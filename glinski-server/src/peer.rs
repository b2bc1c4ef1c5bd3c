//! TCP link to the relay server
//!
//! The relay writes one token per send, so one read is treated as one token.
//! Tokens the relay sends back to back can still arrive in one read; a color
//! assignment merged with `Game started` is taken as the start alone.
//! Outbound tokens from the session arrive over an unbounded channel.

use crate::PeerConfig;
use glinski_core::{GameSession, Outbound, TokenSink};
use std::sync::Arc;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpStream;
use tokio::sync::{mpsc, Notify};

const READ_BUFFER: usize = 4096;

/// Sink that hands tokens to the peer task
#[derive(Clone, Debug)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Outbound>,
}

impl TokenSink for ChannelSink {
    fn send(&self, token: Outbound) {
        if self.tx.send(token).is_err() {
            tracing::warn!(%token, "peer link closed, token dropped");
        }
    }
}

/// A sink for the session and the receiving end for [`run_peer`]
pub fn channel_sink() -> (ChannelSink, mpsc::UnboundedReceiver<Outbound>) {
    let (tx, rx) = mpsc::unbounded_channel();
    (ChannelSink { tx }, rx)
}

/// Connect, join a game, then shuttle tokens until the relay hangs up or
/// `shutdown` fires. There is no reconnection.
pub async fn run_peer(
    config: PeerConfig,
    session: Arc<GameSession>,
    mut outbound: mpsc::UnboundedReceiver<Outbound>,
    shutdown: Arc<Notify>,
) -> anyhow::Result<()> {
    let mut stream = TcpStream::connect(&config.addr).await?;
    tracing::info!("Connected to relay at {}", config.addr);

    send_token(&mut stream, Outbound::Join(config.game)).await?;

    let mut buf = vec![0u8; READ_BUFFER];
    loop {
        tokio::select! {
            read = stream.read(&mut buf) => {
                let n = read?;
                if n == 0 {
                    tracing::info!("Relay closed the connection");
                    break;
                }
                let token = String::from_utf8_lossy(&buf[..n]);
                match session.handle_inbound(&token) {
                    Ok(effect) => tracing::debug!(?effect, "handled token"),
                    Err(e) => tracing::warn!("Token '{}' not applied: {}", token, e),
                }
            }
            Some(token) = outbound.recv() => {
                send_token(&mut stream, token).await?;
            }
            _ = shutdown.notified() => {
                send_token(&mut stream, Outbound::Leave).await?;
                break;
            }
        }
    }

    Ok(())
}

async fn send_token(stream: &mut TcpStream, token: Outbound) -> anyhow::Result<()> {
    tracing::debug!(%token, "sending");
    stream.write_all(token.to_string().as_bytes()).await?;
    Ok(())
}
