//! Command-line and environment configuration shared by both binaries.

use anyhow::Result;
use clap::{Args, Parser};
use std::time::Duration;

use crate::db::SqliteStore;

/// Where the expense database lives and how to open it
#[derive(Debug, Clone, Args)]
pub struct DatabaseArgs {
    /// SQLite database file (`:memory:` for a throwaway store)
    #[arg(long, env = "EXPENSES_DB", default_value = "expenses.db")]
    pub database: String,

    /// How long to wait on a locked database before failing
    #[arg(long, env = "EXPENSES_BUSY_TIMEOUT_MS", default_value_t = 5000)]
    pub busy_timeout_ms: u64,
}

impl DatabaseArgs {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }

    pub fn open_store(&self) -> Result<SqliteStore> {
        SqliteStore::open(&self.database, self.busy_timeout())
    }
}

/// HTTP server settings
#[derive(Debug, Clone, Parser)]
#[command(name = "expense-server", version, about = "Expense tracker REST API")]
pub struct ServerConfig {
    #[command(flatten)]
    pub db: DatabaseArgs,

    /// Address to listen on
    #[arg(long, env = "EXPENSES_BIND", default_value = "0.0.0.0:3000")]
    pub bind: String,

    /// Per-request limit on a single store call
    #[arg(long, env = "EXPENSES_REQUEST_TIMEOUT_MS", default_value_t = 10_000)]
    pub request_timeout_ms: u64,
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }
}
