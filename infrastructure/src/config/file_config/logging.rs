//! Log output configuration from TOML (`[logging]` section)

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL transcript of chat events
    pub conversation_log: Option<PathBuf>,
    /// Daily-rolling operation log in addition to stderr
    pub log_file: Option<PathBuf>,
}
