//! Configuration file loader with multi-source merging

use super::file_config::FileConfig;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use std::path::{Path, PathBuf};

const PROJECT_FILES: [&str; 2] = ["relay.toml", ".relay.toml"];

/// Plain environment variables honoured next to the `RELAY_` prefix.
const PLAIN_ENV: [(&str, &str); 4] = [
    ("LLM_BASE_URL", "llm.base_url"),
    ("LLM_API_KEY", "llm.api_key"),
    ("LLM_MODEL", "llm.model"),
    ("PORT", "server.port"),
];

/// Configuration loader that handles file discovery and merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration from all sources with proper priority
    ///
    /// Priority (highest to lowest):
    /// 1. Environment: `RELAY_*` (`__` separates sections), then
    ///    `LLM_BASE_URL`, `LLM_API_KEY`, `LLM_MODEL`, `PORT`
    /// 2. Explicit config path (if provided)
    /// 3. Project root: `./relay.toml` or `./.relay.toml`
    /// 4. Global: `$XDG_CONFIG_HOME/chat-relay/config.toml`
    /// 5. Default values
    pub fn load(config_path: Option<&PathBuf>) -> Result<FileConfig, Box<figment::Error>> {
        let mut figment = Figment::new().merge(Serialized::defaults(FileConfig::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(&global_path));
        }

        if let Some(path) = Self::project_config_path() {
            figment = figment.merge(Toml::file(&path));
        }

        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        Self::with_env(figment).extract().map_err(Box::new)
    }

    /// Load defaults plus environment, skipping every config file (for --no-config)
    pub fn load_defaults() -> Result<FileConfig, Box<figment::Error>> {
        Self::with_env(Figment::new().merge(Serialized::defaults(FileConfig::default())))
            .extract()
            .map_err(Box::new)
    }

    fn with_env(figment: Figment) -> Figment {
        let plain = Env::raw()
            .only(&PLAIN_ENV.map(|(var, _)| var))
            .map(|key| {
                PLAIN_ENV
                    .iter()
                    .find(|(var, _)| key == *var)
                    .map(|(_, path)| (*path).into())
                    .unwrap_or_else(|| key.as_str().into())
            });

        figment
            .merge(Env::prefixed("RELAY_").split("__"))
            .merge(plain)
    }

    /// Get the global config file path
    ///
    /// Returns XDG_CONFIG_HOME/chat-relay/config.toml if set,
    /// otherwise falls back to ~/.config/chat-relay/config.toml
    pub fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join("chat-relay").join("config.toml"))
    }

    /// Get the project-level config file path (if it exists)
    pub fn project_config_path() -> Option<PathBuf> {
        PROJECT_FILES
            .iter()
            .map(PathBuf::from)
            .find(|path| path.exists())
    }

    /// Print the config file locations being used (for debugging)
    pub fn print_config_sources(explicit: Option<&Path>) {
        println!("Configuration sources (in priority order):");
        println!("  [ENV  ] RELAY_*, LLM_BASE_URL, LLM_API_KEY, LLM_MODEL, PORT");

        if let Some(path) = explicit {
            let mark = if path.exists() { "FOUND" } else { "MISSING" };
            println!("  [{:<5}] Explicit: {}", mark, path.display());
        }

        if let Some(path) = Self::project_config_path() {
            println!("  [FOUND] Project: {}", path.display());
        } else {
            println!("  [     ] Project: ./relay.toml or ./.relay.toml");
        }

        if let Some(path) = Self::global_config_path() {
            if path.exists() {
                println!("  [FOUND] Global:  {}", path.display());
            } else {
                println!("  [     ] Global:  {}", path.display());
            }
        }

        println!("  [     ] Default: built-in defaults");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;
    use relay_application::config::FailedTurnPolicy;

    #[test]
    fn test_global_config_path_returns_some() {
        let path = ConfigLoader::global_config_path();
        assert!(path.is_some());
        assert!(path.unwrap().to_string_lossy().contains("chat-relay"));
    }

    #[test]
    fn test_project_file_overrides_defaults() {
        Jail::expect_with(|jail| {
            jail.create_file(
                "relay.toml",
                r#"
[server]
port = 9000

[chat]
failed_turn_policy = "rollback"
"#,
            )?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.server.port, 9000);
            assert_eq!(config.server.host, "0.0.0.0");
            assert_eq!(config.chat.failed_turn_policy, FailedTurnPolicy::Rollback);
            Ok(())
        });
    }

    #[test]
    fn test_explicit_file_overrides_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file(".relay.toml", "[llm]\nmodel = \"from-project\"\n")?;
            jail.create_file("custom.toml", "[llm]\nmodel = \"from-explicit\"\n")?;

            let explicit = PathBuf::from("custom.toml");
            let config = ConfigLoader::load(Some(&explicit)).map_err(|e| *e)?;
            assert_eq!(config.llm.model, "from-explicit");
            Ok(())
        });
    }

    #[test]
    fn test_global_file_is_lowest_file_priority() {
        Jail::expect_with(|jail| {
            let xdg = jail.directory().join("xdg");
            std::fs::create_dir_all(xdg.join("chat-relay")).map_err(|e| e.to_string())?;
            std::fs::write(
                xdg.join("chat-relay").join("config.toml"),
                "[llm]\nmodel = \"from-global\"\nmax_tokens = 42\n",
            )
            .map_err(|e| e.to_string())?;
            jail.set_env("XDG_CONFIG_HOME", xdg.display());
            jail.create_file("relay.toml", "[llm]\nmodel = \"from-project\"\n")?;

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.llm.model, "from-project");
            assert_eq!(config.llm.max_tokens, 42);
            Ok(())
        });
    }

    #[test]
    fn test_plain_environment_variables() {
        Jail::expect_with(|jail| {
            jail.create_file("relay.toml", "[llm]\nmodel = \"from-file\"\n")?;
            jail.set_env("LLM_API_KEY", "sk-env");
            jail.set_env("LLM_MODEL", "gpt-4o-mini");
            jail.set_env("LLM_BASE_URL", "http://localhost:8000/v1");
            jail.set_env("PORT", "3000");

            let config = ConfigLoader::load(None).map_err(|e| *e)?;
            assert_eq!(config.llm.api_key(), Some("sk-env"));
            assert_eq!(config.llm.model, "gpt-4o-mini");
            assert_eq!(config.llm.base_url, "http://localhost:8000/v1");
            assert_eq!(config.server.port, 3000);
            assert!(config.validate().is_ok());
            Ok(())
        });
    }

    #[test]
    fn test_prefixed_environment_variables() {
        Jail::expect_with(|jail| {
            jail.set_env("RELAY_SERVER__HOST", "127.0.0.1");
            jail.set_env("RELAY_LLM__TIMEOUT_SECONDS", "15");
            jail.set_env("RELAY_CHAT__FAILED_TURN_POLICY", "mark_unanswered");

            let config = ConfigLoader::load_defaults().map_err(|e| *e)?;
            assert_eq!(config.server.host, "127.0.0.1");
            assert_eq!(config.llm.timeout_seconds, 15);
            assert_eq!(
                config.chat.failed_turn_policy,
                FailedTurnPolicy::MarkUnanswered
            );
            Ok(())
        });
    }

    #[test]
    fn test_load_defaults_ignores_project_file() {
        Jail::expect_with(|jail| {
            jail.create_file("relay.toml", "[server]\nport = 9999\n")?;
            let config = ConfigLoader::load_defaults().map_err(|e| *e)?;
            assert_eq!(config.server.port, 8080);
            Ok(())
        });
    }
}
