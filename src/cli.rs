//! Command-line interface parsing for restocache
//!
//! This module handles parsing of CLI arguments using clap and turns them into
//! a `StartupConfig` describing where to fetch from and where to cache.

use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, Subcommand};
use thiserror::Error;

use crate::data::filter::ALL;
use crate::data::source::{SourceConfig, DEFAULT_HOST, DEFAULT_PORT};

/// Error types for CLI argument parsing
#[derive(Debug, Error)]
pub enum CliError {
    /// The port cannot be used to reach a server
    #[error("Invalid port: {0}. The port must be between 1 and 65535")]
    InvalidPort(u16),
}

/// restocache - Browse restaurant listings with a local cache
#[derive(Parser, Debug)]
#[command(name = "restocache")]
#[command(about = "Restaurant listings with a local cache and network fallback")]
#[command(version)]
pub struct Cli {
    /// Host of the listing server
    #[arg(long, default_value = DEFAULT_HOST, global = true)]
    pub host: String,

    /// Port of the listing server
    #[arg(long, default_value_t = DEFAULT_PORT, global = true)]
    pub port: u16,

    /// Directory for the local store (defaults to the XDG cache directory)
    #[arg(long, value_name = "DIR", global = true, conflicts_with = "no_store")]
    pub cache_dir: Option<PathBuf>,

    /// Do not use a local store; always fetch from the network
    #[arg(long, global = true)]
    pub no_store: bool,

    /// Print results as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Give up on the network request after this many seconds
    #[arg(long, value_name = "SECS", global = true)]
    pub timeout: Option<u64>,

    #[command(subcommand)]
    pub command: Command,
}

/// What to show
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// List restaurants, optionally filtered by cuisine and neighborhood
    List {
        /// Cuisine type to keep ("all" keeps every cuisine)
        #[arg(long, default_value = ALL)]
        cuisine: String,
        /// Neighborhood to keep ("all" keeps every neighborhood)
        #[arg(long, default_value = ALL)]
        neighborhood: String,
    },
    /// Show a single restaurant with its page and image paths
    Show {
        /// Restaurant id
        id: String,
    },
    /// List every cuisine type
    Cuisines,
    /// List every neighborhood
    Neighborhoods,
    /// Print map marker descriptors for the listed restaurants
    Markers {
        /// Cuisine type to keep ("all" keeps every cuisine)
        #[arg(long, default_value = ALL)]
        cuisine: String,
        /// Neighborhood to keep ("all" keeps every neighborhood)
        #[arg(long, default_value = ALL)]
        neighborhood: String,
    },
    /// Remove every restaurant from the local store
    ClearCache,
}

/// Where the local store lives, if anywhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreLocation {
    /// Use the XDG cache directory
    Default,
    /// Use this directory
    Dir(PathBuf),
    /// Network-only
    Disabled,
}

/// Configuration derived from CLI arguments for application startup
#[derive(Debug, Clone)]
pub struct StartupConfig {
    /// Listing endpoint
    pub source: SourceConfig,
    /// Local store location
    pub store: StoreLocation,
    /// Whether to print JSON
    pub json: bool,
    /// Command to run
    pub command: Command,
}

impl StartupConfig {
    /// Creates a StartupConfig from parsed CLI arguments.
    ///
    /// # Returns
    /// * `Ok(StartupConfig)` with appropriate settings
    /// * `Err(CliError)` if an argument is out of range
    pub fn from_cli(cli: &Cli) -> Result<Self, CliError> {
        if cli.port == 0 {
            return Err(CliError::InvalidPort(cli.port));
        }

        let store = match (&cli.cache_dir, cli.no_store) {
            (_, true) => StoreLocation::Disabled,
            (Some(dir), false) => StoreLocation::Dir(dir.clone()),
            (None, false) => StoreLocation::Default,
        };

        Ok(StartupConfig {
            source: SourceConfig {
                host: cli.host.clone(),
                port: cli.port,
                timeout: cli.timeout.map(Duration::from_secs),
            },
            store,
            json: cli.json,
            command: cli.command.clone(),
        })
    }
}
