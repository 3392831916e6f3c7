//! Process configuration from command-line flags and environment variables.

use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use todo_core::{default_log_level, StoreKind, TitlePolicy};

const DEFAULT_FILE_STORE_PATH: &str = "todos.json";
const DEFAULT_SQLITE_STORE_PATH: &str = "data.db";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreArg {
    /// Volatile, lost on restart
    Memory,
    /// Single JSON document rewritten on every change
    File,
    /// SQLite database
    Sqlite,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "todo_server")]
#[command(version, about = "HTTP API for a todo list")]
pub struct Config {
    /// Interface to bind
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Backing store for todos
    #[arg(long, env = "TODO_STORE", value_enum, default_value_t = StoreArg::Memory)]
    pub store: StoreArg,

    /// Store location (defaults to todos.json for file, data.db for sqlite)
    #[arg(long, env = "TODO_DATA_PATH")]
    pub data_path: Option<PathBuf>,

    /// Prefix for every route, e.g. /api
    #[arg(long, env = "TODO_BASE_PATH", default_value = "")]
    pub base_path: String,

    /// Reject empty titles with 400 instead of storing them
    #[arg(long, env = "TODO_REQUIRE_TITLE")]
    pub require_title: bool,

    /// Insert demo todos when the store is empty
    #[arg(long, env = "TODO_SEED")]
    pub seed: bool,

    /// trace|debug|info|warn|error (build-dependent default)
    #[arg(long, env = "TODO_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rotating log files; stderr when unset
    #[arg(long, env = "TODO_LOG_DIR")]
    pub log_dir: Option<String>,
}

impl Config {
    pub fn store_kind(&self) -> StoreKind {
        let path_or = |default: &str| {
            self.data_path
                .clone()
                .unwrap_or_else(|| PathBuf::from(default))
        };

        match self.store {
            StoreArg::Memory => StoreKind::Memory,
            StoreArg::File => StoreKind::File(path_or(DEFAULT_FILE_STORE_PATH)),
            StoreArg::Sqlite => StoreKind::Sqlite(path_or(DEFAULT_SQLITE_STORE_PATH)),
        }
    }

    pub fn title_policy(&self) -> TitlePolicy {
        if self.require_title {
            TitlePolicy::RequireNonEmpty
        } else {
            TitlePolicy::Permissive
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn log_level(&self) -> &str {
        self.log_level.as_deref().unwrap_or_else(|| default_log_level())
    }
}

#[cfg(test)]
mod tests {
    use super::{Config, StoreArg};
    use clap::Parser;
    use std::path::PathBuf;
    use todo_core::{StoreKind, TitlePolicy};

    fn parse(args: &[&str]) -> Config {
        Config::try_parse_from(std::iter::once("todo_server").chain(args.iter().copied()))
            .unwrap()
    }

    #[test]
    fn sqlite_store_defaults_to_data_db() {
        let config = parse(&["--store", "sqlite"]);
        assert_eq!(config.store, StoreArg::Sqlite);
        assert_eq!(config.store_kind(), StoreKind::Sqlite(PathBuf::from("data.db")));
    }

    #[test]
    fn data_path_overrides_default_location() {
        let config = parse(&["--store", "file", "--data-path", "/tmp/list.json"]);
        assert_eq!(
            config.store_kind(),
            StoreKind::File(PathBuf::from("/tmp/list.json"))
        );
    }

    #[test]
    fn require_title_switches_policy() {
        let config = parse(&["--require-title", "--port", "8080", "--host", "0.0.0.0"]);
        assert_eq!(config.title_policy(), TitlePolicy::RequireNonEmpty);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn rejects_unknown_store() {
        let result = Config::try_parse_from(["todo_server", "--store", "postgres"]);
        assert!(result.is_err());
    }
}
