//! Command-line interface definitions using clap

use clap::{Parser, Subcommand};

/// Quillpress - a small blog backend
#[derive(Parser, Debug)]
#[command(name = "quillpress")]
#[command(version)]
#[command(about = "A small blog backend with server-side rendered views", long_about = None)]
pub struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, short = 'c', global = true, default_value = crate::config::DEFAULT_CONFIG_PATH)]
    pub config: String,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available commands
#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve,

    /// Print a sample configuration file
    GenerateConfig {
        /// Write to this file instead of stdout
        #[arg(long, short = 'o')]
        output: Option<String>,
    },
}
