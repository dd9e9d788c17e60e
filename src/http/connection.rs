use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

use crate::http::files::FileResponder;
use crate::http::parser::HeadReader;
use crate::http::request::{ParsedRequest, Request};
use crate::http::response::ResponseOutcome;
use crate::http::writer::ResponseWriter;
use crate::server::admission::ConnectionSlot;

/// One admitted connection, from request line to close.
///
/// Owns the connection's [`ConnectionSlot`]; the slot goes back to the
/// admitter when the connection is dropped, on every exit path.
pub struct Connection<S> {
    stream: S,
    reader: HeadReader,
    files: Arc<FileResponder>,
    slot: ConnectionSlot,
    state: ConnectionState,
}

#[derive(Debug)]
pub enum ConnectionState {
    ReadRequestLine,
    Dispatch(Request),
    WriteResponse(ResponseWriter),
    DrainHeaders,
    Close,
    Terminated,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    pub fn new(stream: S, slot: ConnectionSlot, files: Arc<FileResponder>) -> Self {
        Self {
            stream,
            reader: HeadReader::new(),
            files,
            slot,
            state: ConnectionState::ReadRequestLine,
        }
    }

    /// Bounds each read from the client. `None` waits indefinitely.
    pub fn with_read_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.reader = self.reader.with_read_timeout(timeout);
        self
    }

    pub fn state(&self) -> &ConnectionState {
        &self.state
    }

    /// Runs the connection to completion and frees its slot.
    ///
    /// I/O failures end the exchange early and are only logged; nothing
    /// escapes to the accepting loop.
    pub async fn serve(mut self) {
        if let Err(e) = self.run().await {
            tracing::warn!(slot = self.slot.id(), error = %e, "Connection aborted");
        }

        // Dropping `self` closes the socket and releases the slot.
    }

    pub async fn run(&mut self) -> anyhow::Result<()> {
        let slot = self.slot.id();

        loop {
            match std::mem::replace(&mut self.state, ConnectionState::Terminated) {
                ConnectionState::ReadRequestLine => {
                    self.state = match self.reader.read_request_line(&mut self.stream).await? {
                        Some(ParsedRequest::Valid(req)) => {
                            tracing::info!(
                                slot,
                                method = %req.method,
                                path = %req.path,
                                version = %req.version,
                                "Request received"
                            );
                            ConnectionState::Dispatch(req)
                        }
                        Some(ParsedRequest::Invalid(reason)) => {
                            tracing::info!(slot, reason = %reason, "Invalid request");
                            ConnectionState::WriteResponse(ResponseWriter::new(ResponseOutcome::BadRequest))
                        }
                        None => {
                            tracing::debug!(slot, "Client closed before sending a request");
                            ConnectionState::Close
                        }
                    };
                }

                ConnectionState::Dispatch(req) => {
                    let outcome = self.files.resolve(&req.path).await;
                    self.state = ConnectionState::WriteResponse(ResponseWriter::new(outcome));
                }

                ConnectionState::WriteResponse(mut writer) => {
                    let sent = writer.write_to_stream(&mut self.stream).await?;

                    tracing::info!(
                        slot,
                        status = writer.status().as_u16(),
                        body_bytes = sent,
                        "Response sent"
                    );
                    self.state = ConnectionState::DrainHeaders;
                }

                ConnectionState::DrainHeaders => {
                    let discarded = self.reader.drain_headers(&mut self.stream).await?;

                    tracing::trace!(slot, discarded, lines = self.reader.lines_read(), "Request head drained");
                    self.state = ConnectionState::Close;
                }

                ConnectionState::Close => {
                    if let Err(e) = self.stream.shutdown().await {
                        tracing::debug!(slot, error = %e, "Shutdown after response failed");
                    }
                    self.state = ConnectionState::Terminated;
                }

                ConnectionState::Terminated => {
                    break;
                }
            }
        }

        Ok(())
    }
}
