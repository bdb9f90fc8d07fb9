//! CLI module for voxrag.

pub mod commands;
mod output;

pub use output::Output;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// voxrag - knowledge base retrieval for a voice assistant
///
/// Indexes uploaded text documents in memory and answers questions with the most
/// relevant passages.
#[derive(Parser, Debug)]
#[command(name = "voxrag")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to configuration file
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP API server
    Serve {
        /// Host to bind to (defaults to server.host from config)
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to (defaults to server.port from config)
        #[arg(short, long, env = "PORT")]
        port: Option<u16>,
    },

    /// Index local text files and search them
    Search {
        /// Search query
        query: String,

        /// Text files to index before searching
        #[arg(short, long = "doc", required = true)]
        docs: Vec<PathBuf>,

        /// Number of results (defaults to retrieval.top_k from config)
        #[arg(short = 'k', long)]
        top_k: Option<usize>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write the current configuration to the config file path
    Init,
}
