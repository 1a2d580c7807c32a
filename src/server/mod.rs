// Server module entry point
// Accept loop, per-connection serving and the demo multiplexer

pub mod connection;
pub mod listener;
pub mod mux;

use std::future::Future;
use std::sync::Arc;

use tokio::net::TcpListener;

use crate::logger::Logger;
pub use listener::create_listener;
pub use mux::{Endpoint, Mux};

/// Accept connections until `shutdown` resolves
///
/// Each connection is served on its own task; in-flight connections are not
/// awaited on shutdown.
pub async fn run(
    listener: TcpListener,
    mux: Mux,
    logger: Logger,
    shutdown: impl Future<Output = ()>,
) {
    let mux = Arc::new(mux);
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, _peer_addr)) => {
                        connection::serve_connection(stream, Arc::clone(&mux), logger.clone());
                    }
                    Err(e) => logger.log_error(&format!("Failed to accept connection: {e}")),
                }
            }
            () = &mut shutdown => {
                logger.println("Shutting down");
                break;
            }
        }
    }
}
