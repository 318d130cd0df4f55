//! Sitepack - an asset build pipeline for static sites.

mod asset;
mod cli;
mod config;
mod core;
mod html;
mod logger;
mod pipeline;
mod utils;

use anyhow::Result;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands};
use config::SiteConfig;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    let config = SiteConfig::load(&cli)?;

    match &cli.command {
        Commands::Build { args } => {
            logger::set_verbose(args.verbose);
            pipeline::run_build(&config)
        }
        Commands::Clean => pipeline::clean_output(&config),
    }
}
