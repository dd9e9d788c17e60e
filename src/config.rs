//! Server configuration
//!
//! Everything has a default, so the server runs with no configuration at
//! all. A YAML file named by `TURNSTILE_CONFIG` replaces the defaults, and
//! individual `TURNSTILE_*` variables override single fields on top:
//!
//! ```yaml
//! server:
//!   host: 0.0.0.0
//!   port: 6789
//!   max_connections: 256
//!   read_timeout_secs: 30
//! static_files:
//!   root: ./public
//!   redirect_location: /index.html
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, bail};
use serde::Deserialize;

use crate::http::files::FileResponder;

pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 6789;
pub const DEFAULT_MAX_CONNECTIONS: usize = 256;

const CONFIG_VAR: &str = "TURNSTILE_CONFIG";
const HOST_VAR: &str = "TURNSTILE_HOST";
const PORT_VAR: &str = "TURNSTILE_PORT";
const MAX_CONNECTIONS_VAR: &str = "TURNSTILE_MAX_CONNECTIONS";
const ROOT_VAR: &str = "TURNSTILE_ROOT";

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub server: ServerConfig,
    pub static_files: StaticFilesConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ServerConfig {
    /// Address to bind
    pub host: String,
    /// Port to listen on
    pub port: u16,
    /// Connections processed at once; extra connections are closed on accept
    pub max_connections: usize,
    /// Per-read limit while receiving the request head. Unset means a
    /// silent client can hold its slot indefinitely.
    pub read_timeout_secs: Option<u64>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.to_string(),
            port: DEFAULT_PORT,
            max_connections: DEFAULT_MAX_CONNECTIONS,
            read_timeout_secs: None,
        }
    }
}

impl ServerConfig {
    /// `host:port` string suitable for binding.
    pub fn listen_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn read_timeout(&self) -> Option<Duration> {
        self.read_timeout_secs.map(Duration::from_secs)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StaticFilesConfig {
    /// Document root; `index.html` is looked up here
    pub root: PathBuf,
    /// `Location` header for the `/301` route, omitted when unset
    pub redirect_location: Option<String>,
}

impl Default for StaticFilesConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("."),
            redirect_location: None,
        }
    }
}

impl StaticFilesConfig {
    pub fn responder(&self) -> FileResponder {
        FileResponder::new(self.root.clone()).with_redirect_location(self.redirect_location.clone())
    }
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn load() -> anyhow::Result<Self> {
        Self::load_with(|key| std::env::var(key).ok())
    }

    /// Loads configuration using `lookup` in place of the environment.
    pub fn load_with<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = match lookup(CONFIG_VAR) {
            Some(path) => Self::from_file(&path)?,
            None => Self::default(),
        };

        if let Some(host) = lookup(HOST_VAR) {
            cfg.server.host = host;
        }
        if let Some(port) = lookup(PORT_VAR) {
            cfg.server.port = port
                .parse()
                .with_context(|| format!("{} is not a valid port: {:?}", PORT_VAR, port))?;
        }
        if let Some(max) = lookup(MAX_CONNECTIONS_VAR) {
            cfg.server.max_connections = max
                .parse()
                .with_context(|| format!("{} is not a number: {:?}", MAX_CONNECTIONS_VAR, max))?;
        }
        if let Some(root) = lookup(ROOT_VAR) {
            cfg.static_files.root = PathBuf::from(root);
        }

        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_file(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;

        Self::from_yaml(&text).with_context(|| format!("invalid config file {}", path.display()))
    }

    pub fn from_yaml(text: &str) -> anyhow::Result<Self> {
        // An empty document means "all defaults".
        if text.trim().is_empty() {
            return Ok(Self::default());
        }

        Ok(serde_yaml::from_str(text)?)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.server.host.is_empty() {
            bail!("server.host must not be empty");
        }
        if self.server.max_connections == 0 {
            bail!("server.max_connections must be at least 1");
        }
        if self.server.read_timeout_secs == Some(0) {
            bail!("server.read_timeout_secs must be greater than 0");
        }
        Ok(())
    }
}
