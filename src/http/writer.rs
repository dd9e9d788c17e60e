use std::fmt;

use tokio::fs::File;
use tokio::io::{AsyncReadExt, AsyncWrite, AsyncWriteExt};

use crate::http::response::{ResponseOutcome, StatusCode};

const HTTP_VERSION: &str = "HTTP/1.0";

/// Size of the intermediate buffer used to stream file bodies.
pub const COPY_BUFFER_SIZE: usize = 2048;

fn serialize_head(outcome: &ResponseOutcome) -> Vec<u8> {
    let mut buf = Vec::new();
    let status = outcome.status();

    // Status line
    let status_line = format!(
        "{} {} {}\r\n",
        HTTP_VERSION,
        status.as_u16(),
        status.reason_phrase()
    );
    buf.extend_from_slice(status_line.as_bytes());

    // Headers
    match outcome {
        ResponseOutcome::Ok {
            content_type,
            content_length,
            ..
        } => {
            buf.extend_from_slice(format!("Content-type: {}\r\n", content_type).as_bytes());
            buf.extend_from_slice(format!("Content-length: {}\r\n", content_length).as_bytes());
        }
        ResponseOutcome::Redirect {
            location: Some(location),
        } => {
            buf.extend_from_slice(format!("Location: {}\r\n", location).as_bytes());
        }
        _ => {}
    }

    // Header/body separator
    buf.extend_from_slice(b"\r\n");

    buf
}

/// Writes one response: status line, headers, then the file body if any.
pub struct ResponseWriter {
    status: StatusCode,
    head: Vec<u8>,
    written: usize,
    body: Option<(File, u64)>,
}

impl ResponseWriter {
    pub fn new(outcome: ResponseOutcome) -> Self {
        let status = outcome.status();
        let head = serialize_head(&outcome);

        let body = match outcome {
            ResponseOutcome::Ok {
                body,
                content_length,
                ..
            } => Some((body, content_length)),
            _ => None,
        };

        Self {
            status,
            head,
            written: 0,
            body,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Serialized status line and headers.
    pub fn head(&self) -> &[u8] {
        &self.head
    }

    /// Sends the response and returns the number of body bytes written.
    ///
    /// The body is copied through a [`COPY_BUFFER_SIZE`] buffer and capped at
    /// the advertised Content-length, so a file growing mid-copy cannot make
    /// the response overrun its header. A file that shrinks is an error.
    pub async fn write_to_stream<W>(&mut self, stream: &mut W) -> anyhow::Result<u64>
    where
        W: AsyncWrite + Unpin,
    {
        while self.written < self.head.len() {
            let n = stream.write(&self.head[self.written..]).await?;

            if n == 0 {
                return Err(anyhow::anyhow!("connection closed while writing"));
            }

            self.written += n;
        }

        let mut sent = 0u64;

        if let Some((mut file, length)) = self.body.take() {
            let mut buf = [0u8; COPY_BUFFER_SIZE];

            while sent < length {
                let want = (length - sent).min(COPY_BUFFER_SIZE as u64) as usize;
                let n = file.read(&mut buf[..want]).await?;

                if n == 0 {
                    anyhow::bail!("file ended after {} of {} bytes", sent, length);
                }

                stream.write_all(&buf[..n]).await?;
                sent += n as u64;
            }
        }

        stream.flush().await?;
        Ok(sent)
    }
}

impl fmt::Debug for ResponseWriter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResponseWriter")
            .field("status", &self.status)
            .field("written", &self.written)
            .finish_non_exhaustive()
    }
}
