//! Command-line interface definitions.

use clap::{ColorChoice, Parser, Subcommand};
use std::net::IpAddr;
use std::path::PathBuf;

/// Blog post authoring form
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// Control colored output (auto, always, never)
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Config file path (default: postform.toml)
    #[arg(short = 'C', long, global = true, default_value = "postform.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    /// Enable verbose output for debugging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// subcommands
    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Write a default postform.toml
    #[command(visible_alias = "i")]
    Init {
        /// Print the config template instead of writing it
        #[arg(long)]
        dry: bool,

        /// Overwrite an existing config file
        #[arg(short, long)]
        force: bool,
    },

    /// Edit an article interactively
    #[command(visible_alias = "e")]
    Edit {
        /// Start from a markdown file (imported) or a script (replayed)
        #[arg(value_hint = clap::ValueHint::FilePath)]
        source: Option<PathBuf>,

        /// Replay this script instead of prompting
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        script: Option<PathBuf>,
    },

    /// Print the article markdown
    #[command(visible_alias = "r")]
    Render {
        #[command(flatten)]
        source: SourceArgs,

        /// Write to a file instead of stdout
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,
    },

    /// Write or serve the HTML preview
    #[command(visible_alias = "p")]
    Preview {
        #[command(flatten)]
        source: SourceArgs,

        /// Preview file path (relative to the config directory)
        #[arg(short, long, value_hint = clap::ValueHint::FilePath)]
        output: Option<PathBuf>,

        /// Serve the preview over HTTP instead of writing a file
        #[arg(short, long)]
        serve: bool,

        /// Network interface to bind (e.g., 127.0.0.1, 0.0.0.0)
        #[arg(short, long)]
        interface: Option<IpAddr>,

        /// Port number to listen on
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Submit the article to the configured endpoint
    #[command(visible_alias = "s")]
    Submit {
        #[command(flatten)]
        source: SourceArgs,

        /// Override `upload.endpoint`
        #[arg(short, long, value_hint = clap::ValueHint::Url)]
        endpoint: Option<String>,

        /// Render and report without sending
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

/// Where the article comes from.
#[derive(clap::Args, Debug, Clone)]
pub struct SourceArgs {
    /// Markdown file (imported) or session script (replayed)
    #[arg(value_hint = clap::ValueHint::FilePath)]
    pub source: PathBuf,
}

impl Cli {
    pub const fn is_init(&self) -> bool {
        matches!(self.command, Commands::Init { .. })
    }
}
