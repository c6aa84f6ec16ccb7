// Server loop module
// Accepts connections until a shutdown is requested

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use super::signal::SignalHandler;
use crate::config::AppState;
use crate::logger;

/// Run the application server accept loop.
///
/// Must run inside a `LocalSet`: connections are served on local tasks.
/// Returns once the signal handler requests shutdown; connections still in
/// flight are not awaited.
#[allow(clippy::ignored_unit_patterns)]
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    signals: Arc<SignalHandler>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    while !signals.shutdown_requested.load(Ordering::SeqCst) {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        if !accept_connection(stream, peer_addr, &state, &active_connections) {
                            logger::log_debug(&format!("Dropped connection from {peer_addr}"));
                        }
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = signals.shutdown.notified() => {
                break;
            }
        }
    }

    logger::log_shutdown(active_connections.load(Ordering::SeqCst));
    Ok(())
}
