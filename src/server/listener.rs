use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tracing::info;

use crate::config::Config;
use crate::http::connection::Connection;
use crate::http::files::FileResponder;
use crate::server::admission::ConnectionAdmitter;

/// Pause after a failed accept, so a persistent error such as running out
/// of file descriptors does not spin the loop.
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

pub async fn run(cfg: &Config) -> anyhow::Result<()> {
    let addr = cfg.server.listen_addr();
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    let admitter = ConnectionAdmitter::new(cfg.server.max_connections);
    let files = Arc::new(cfg.static_files.responder());
    info!(
        root = %files.root().display(),
        max_connections = admitter.max_connections(),
        "Serving files"
    );

    serve(listener, admitter, files, cfg.server.read_timeout()).await
}

/// Accepts connections forever, one task per admitted connection.
///
/// Connections arriving while every slot is taken are closed straight away
/// without a response.
pub async fn serve(
    listener: TcpListener,
    admitter: ConnectionAdmitter,
    files: Arc<FileResponder>,
    read_timeout: Option<Duration>,
) -> anyhow::Result<()> {
    loop {
        let (socket, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to accept connection");
                tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
                continue;
            }
        };

        let Some(slot) = admitter.try_admit() else {
            tracing::warn!(
                peer = %peer,
                max_connections = admitter.max_connections(),
                "Connection limit reached, dropping connection"
            );
            drop(socket);
            continue;
        };

        info!(slot = slot.id(), "Accepted connection from {}", peer);
        info!(
            "Active connections: {}/{}",
            admitter.active_count(),
            admitter.max_connections()
        );

        let files = Arc::clone(&files);
        tokio::spawn(async move {
            Connection::new(socket, slot, files)
                .with_read_timeout(read_timeout)
                .serve()
                .await;
        });
    }
}
