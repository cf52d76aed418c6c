//! Command-line and environment configuration.

use clap::Parser;
use std::path::PathBuf;
use taskcomments_core::{default_log_level, LoggingOptions};

const DEFAULT_DB_FILE_NAME: &str = "taskcomments.sqlite3";
const DEFAULT_LOG_DIR_NAME: &str = "taskcomments-logs";

/// Flags override environment variables; blank values use the defaults.
#[derive(Debug, Parser)]
#[command(name = "taskcomments", version, about = "Task comments HTTP API")]
pub struct Args {
    /// SQLite database file [default: <temp dir>/taskcomments.sqlite3]
    #[arg(long, env = "TASKCOMMENTS_DB_PATH")]
    pub db_path: Option<String>,

    /// Socket address to listen on.
    #[arg(long, env = "TASKCOMMENTS_BIND", default_value = "127.0.0.1:3000")]
    pub bind: String,

    /// trace|debug|info|warn|error [default: debug in debug builds, info otherwise]
    #[arg(long, env = "TASKCOMMENTS_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Absolute directory for rolling log files [default: <temp dir>/taskcomments-logs]
    #[arg(long, env = "TASKCOMMENTS_LOG_DIR")]
    pub log_dir: Option<String>,

    /// Mirror log records to stderr.
    #[arg(long)]
    pub log_stderr: bool,
}

/// Fully resolved runtime settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub db_path: PathBuf,
    pub bind: String,
    pub logging: LoggingOptions,
}

impl Args {
    pub fn resolve(self) -> ServerConfig {
        let db_path = non_blank(self.db_path)
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::temp_dir().join(DEFAULT_DB_FILE_NAME));
        let log_dir = non_blank(self.log_dir).unwrap_or_else(|| {
            std::env::temp_dir()
                .join(DEFAULT_LOG_DIR_NAME)
                .to_string_lossy()
                .into_owned()
        });
        let level =
            non_blank(self.log_level).unwrap_or_else(|| default_log_level().to_string());

        ServerConfig {
            db_path,
            bind: self.bind.trim().to_string(),
            logging: LoggingOptions {
                level,
                log_dir,
                echo_stderr: self.log_stderr,
            },
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|raw| raw.trim().to_string())
        .filter(|trimmed| !trimmed.is_empty())
}
