//! Static file resolution
//!
//! Maps a request target to a file under the document root. Only the two
//! index routes and the fixed redirect route are special; every other
//! target is a path relative to the root.

use std::path::{Component, Path, PathBuf};

use tokio::fs::File;

use crate::http::mime::{self, TEXT_HTML};
use crate::http::response::ResponseOutcome;

/// Route answered with 301.
pub const REDIRECT_PATH: &str = "/301";

/// File served for `/` and `/index.html`.
pub const INDEX_FILE: &str = "index.html";

#[derive(Debug, Clone)]
pub struct FileResponder {
    root: PathBuf,
    redirect_location: Option<String>,
}

impl FileResponder {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            redirect_location: None,
        }
    }

    /// Sets the `Location` sent with the 301 route. `None` sends none.
    pub fn with_redirect_location(mut self, location: Option<String>) -> Self {
        self.redirect_location = location;
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Decides the response for a validated request target.
    ///
    /// Targets that would leave the document root (`..`, absolute paths) are
    /// answered as not found, the same as missing files.
    pub async fn resolve(&self, path: &str) -> ResponseOutcome {
        match path {
            "/" | "/index.html" => self.open(Path::new(INDEX_FILE), TEXT_HTML).await,
            REDIRECT_PATH => ResponseOutcome::Redirect {
                location: self.redirect_location.clone(),
            },
            _ => {
                let relative = path.strip_prefix('/').unwrap_or(path);

                match confine(relative) {
                    Some(relative) => {
                        let content_type = mime::content_type_for(&relative);
                        self.open(&relative, content_type).await
                    }
                    None => {
                        tracing::warn!(path = %path, "Rejected target outside document root");
                        ResponseOutcome::NotFound
                    }
                }
            }
        }
    }

    async fn open(&self, relative: &Path, content_type: &'static str) -> ResponseOutcome {
        let full = self.root.join(relative);

        let file = match File::open(&full).await {
            Ok(file) => file,
            Err(e) => {
                tracing::debug!(file = %full.display(), error = %e, "File not available");
                return ResponseOutcome::NotFound;
            }
        };

        // No directory listings; directories and other non-files are 404.
        match file.metadata().await {
            Ok(meta) if meta.is_file() => ResponseOutcome::Ok {
                content_type,
                content_length: meta.len(),
                body: file,
            },
            Ok(_) => ResponseOutcome::NotFound,
            Err(e) => {
                tracing::debug!(file = %full.display(), error = %e, "Could not stat file");
                ResponseOutcome::NotFound
            }
        }
    }
}

/// Normalises a root-relative path, refusing anything that could escape it.
fn confine(relative: &str) -> Option<PathBuf> {
    let mut clean = PathBuf::new();

    for component in Path::new(relative).components() {
        match component {
            Component::Normal(part) => clean.push(part),
            Component::CurDir => {}
            Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
        }
    }

    if clean.as_os_str().is_empty() {
        return None;
    }
    Some(clean)
}
