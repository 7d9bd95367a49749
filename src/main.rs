//! postform - A blog post authoring form for the terminal.

mod cli;
mod config;
mod document;
mod embed;
mod logger;
mod markdown;
mod preview;
mod session;
mod upload;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::FormConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = FormConfig::load(&cli)?;

    match &cli.command {
        Commands::Init { dry, force } => cli::init::write_config(&config, *dry, *force),
        Commands::Edit { source, script } => {
            cli::edit::run(&config, source.as_deref(), script.as_deref())
        }
        Commands::Render { source, output } => {
            cli::render::run(&config, source, output.as_deref())
        }
        Commands::Preview { source, serve, .. } => cli::preview::run(&config, source, *serve),
        Commands::Submit {
            source, dry_run, ..
        } => cli::submit::run(&config, source, *dry_run),
    }
}
