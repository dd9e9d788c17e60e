//! Shared utilities for integration tests.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream};

use turnstile::http::files::FileResponder;
use turnstile::server::admission::ConnectionAdmitter;
use turnstile::server::listener;

static NEXT_DIR: AtomicUsize = AtomicUsize::new(0);

/// Scratch directory under the system temp dir, removed on drop.
pub struct TestDir {
    path: PathBuf,
}

impl TestDir {
    pub fn new() -> Self {
        let path = std::env::temp_dir().join(format!(
            "turnstile-test-{}-{}",
            std::process::id(),
            NEXT_DIR.fetch_add(1, Ordering::SeqCst)
        ));
        std::fs::create_dir_all(&path).unwrap();
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Writes `contents` to `name` (relative, may contain directories).
    pub fn write(&self, name: &str, contents: &[u8]) -> PathBuf {
        let file = self.path.join(name);
        if let Some(parent) = file.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(&file, contents).unwrap();
        file
    }
}

impl Drop for TestDir {
    fn drop(&mut self) {
        let _ = std::fs::remove_dir_all(&self.path);
    }
}

/// Patterned bytes, so misplaced chunks show up in comparisons.
pub fn payload(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 251) as u8).collect()
}

/// Start the accepting loop on an ephemeral port.
pub async fn start_server(root: &Path, max_connections: usize) -> (SocketAddr, ConnectionAdmitter) {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    let admitter = ConnectionAdmitter::new(max_connections);
    let files = Arc::new(FileResponder::new(root));

    tokio::spawn(listener::serve(listener, admitter.clone(), files, None));

    (addr, admitter)
}

/// Read until the peer closes. A reset counts as the end of the stream.
pub async fn read_until_closed(stream: &mut TcpStream) -> Vec<u8> {
    let mut out = Vec::new();
    let mut buf = [0u8; 4096];

    loop {
        match stream.read(&mut buf).await {
            Ok(0) | Err(_) => break,
            Ok(n) => out.extend_from_slice(&buf[..n]),
        }
    }

    out
}

/// Send `request` on a fresh connection and collect everything sent back.
pub async fn send_raw(addr: SocketAddr, request: &[u8]) -> Vec<u8> {
    let mut stream = TcpStream::connect(addr).await.unwrap();
    stream.write_all(request).await.unwrap();
    read_until_closed(&mut stream).await
}

/// Split a raw response into its head (without the blank line) and body.
pub fn split_response(raw: &[u8]) -> (String, Vec<u8>) {
    let end = raw
        .windows(4)
        .position(|w| w == b"\r\n\r\n")
        .expect("response has no end of head");

    (
        String::from_utf8_lossy(&raw[..end]).into_owned(),
        raw[end + 4..].to_vec(),
    )
}

/// Poll until the admitter reports `expected` active slots.
pub async fn wait_for_active(admitter: &ConnectionAdmitter, expected: usize) -> bool {
    for _ in 0..200 {
        if admitter.active_count() == expected {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    false
}
