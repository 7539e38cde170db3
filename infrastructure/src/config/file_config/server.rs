//! Server configuration from TOML (`[server]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// HTTP listener settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    /// Interface to bind (default: "0.0.0.0")
    pub host: String,
    /// TCP port (default: 8080)
    pub port: u16,
    /// Directory with a built frontend to serve next to the API
    pub static_dir: Option<PathBuf>,
    /// Largest accepted request body; images are sent inline as data URLs
    pub max_body_bytes: usize,
}

/// 25 MiB
pub const DEFAULT_MAX_BODY_BYTES: usize = 25 * 1024 * 1024;

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            static_dir: None,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl FileServerConfig {
    /// `host:port` string suitable for `TcpListener::bind`
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
