//! CLI command definitions for the `fassist` binary.
//!
//! Uses clap derive macros for argument parsing. Each invocation runs in its
//! own backend session.

pub mod ask;
pub mod chat;
pub mod forms;
pub mod output;
pub mod upload;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Ask questions about immigration forms, upload documents, and download
/// filled forms.
#[derive(Parser)]
#[command(name = "fassist", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export spans to stdout through OpenTelemetry.
    #[arg(long, global = true)]
    pub otel: bool,

    /// Backend base URL (overrides config.toml).
    #[arg(long, global = true, env = "FORMASSIST_BACKEND_URL")]
    pub backend_url: Option<String>,

    /// Directory filled forms are saved to.
    #[arg(long, global = true)]
    pub download_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List the forms the backend can fill.
    #[command(alias = "ls")]
    Forms,

    /// Ask a single question.
    Ask {
        /// The question to send.
        #[arg(required = true, num_args = 1..)]
        message: Vec<String>,
    },

    /// Upload documents, then optionally fill a form from them.
    Upload {
        /// Files to upload.
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Form id to fill after the uploads finish.
        #[arg(long)]
        fill: Option<String>,
    },

    /// Start an interactive session.
    Chat {
        /// Form id to select once the catalog loads.
        #[arg(long)]
        form: Option<String>,
    },

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}
