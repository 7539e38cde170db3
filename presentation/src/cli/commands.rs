//! CLI command definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for chat-relay
#[derive(Parser, Debug)]
#[command(name = "chat-relay")]
#[command(author, version, about = "Chat relay between a browser frontend and an OpenAI-compatible LLM")]
#[command(long_about = r#"
chat-relay keeps per-session conversation history in memory and forwards each
turn (text or text + image) to an OpenAI-compatible chat completions API.

Endpoints:
  POST /api/session   {"action":"create"} | {"action":"get","id":"..."}
  POST /api/chat      {"sessionId","query","context":[...],"messageContent":[...]}
  GET  /api/health

Configuration is loaded from (in priority order):
1. Environment        RELAY_* (e.g. RELAY_LLM__MODEL), LLM_API_KEY, LLM_MODEL,
                      LLM_BASE_URL, PORT (a .env file is read first)
2. --config <path>    Explicit config file
3. ./relay.toml       Project-level config
4. ~/.config/chat-relay/config.toml   Global config

Example:
  LLM_API_KEY=sk-... chat-relay --port 3000 --static-dir frontend/build
"#)]
pub struct Cli {
    /// Interface to bind (overrides server.host)
    #[arg(long, value_name = "HOST")]
    pub host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(short, long, value_name = "PORT")]
    pub port: Option<u16>,

    /// Serve a built frontend from this directory (overrides server.static_dir)
    #[arg(long, value_name = "DIR")]
    pub static_dir: Option<PathBuf>,

    /// Verbosity level (-v = debug, -vv = trace); RUST_LOG takes precedence
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files (environment is still read)
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,

    /// Print the effective configuration as TOML (API key redacted) and exit
    #[arg(long)]
    pub print_config: bool,
}

impl Cli {
    /// Default log filter directive for the chosen verbosity
    pub fn log_level(&self) -> &'static str {
        if self.quiet {
            return "warn";
        }
        match self.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    }
}
