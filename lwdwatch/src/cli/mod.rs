//! CLI module for lwdwatch
//!
//! Provides command-line interface for the directory service and registry maintenance.

pub mod check;
pub mod registry;
pub mod serve;

use clap::{Parser, Subcommand};

use crate::config::DirectoryConfig;

/// lwdwatch - Liveness directory for lightwalletd servers
#[derive(Parser, Debug)]
#[command(name = "lwdwatch")]
#[command(version, about, long_about = None)]
#[command(after_help = r#"ENVIRONMENT VARIABLES:
    LWDWATCH_HOST             Bind address (default: 0.0.0.0)
    LWDWATCH_PORT             Listen port (default: 8080)
    LWDWATCH_CHECK_INTERVAL   Poll interval in minutes (default: 30)
    LWDWATCH_DEBUG            Verbose logging (1/true/yes/on)
    LWDWATCH_DATABASE_URL     Database URL (default: sqlite:db.sqlite)
    RUST_LOG                  Log filter (overrides LWDWATCH_DEBUG)
"#)]
pub struct Cli {
    /// Database URL (overrides LWDWATCH_DATABASE_URL)
    #[arg(long, global = true)]
    pub database_url: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true, default_value_t = false)]
    pub debug: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the directory server and health checker (default)
    Serve(serve::ServeArgs),
    /// Run a single health check cycle and exit
    Check(check::CheckArgs),
    /// Register a server address
    Add(registry::AddArgs),
    /// Remove a server by identity or address
    Remove(registry::RemoveArgs),
    /// List registered servers
    List(registry::ListArgs),
}

impl Cli {
    /// Apply global flags on top of the environment configuration.
    pub fn apply(&self, config: &mut DirectoryConfig) {
        if let Some(url) = &self.database_url {
            config.database_url = url.clone();
        }
    }

    /// Verbose logging requested by `--debug` or `LWDWATCH_DEBUG`.
    pub fn debug_enabled(&self) -> bool {
        self.debug || crate::config::debug_from_env()
    }
}
