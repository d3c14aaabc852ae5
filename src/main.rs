//! Quire - incremental static site generator for markdown blogs.

#![allow(dead_code)]

mod build;
mod cli;
mod config;
mod core;
mod embed;
mod freshness;
mod logger;
mod page;
mod reload;
mod render;
mod utils;
mod watch;

use std::process::ExitCode;

use anyhow::Result;
use build::BuildError;
use clap::{ColorChoice, Parser};
use cli::{Cli, Commands, serve::ServeError};
use config::{ConfigError, SiteConfig};

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Set global color override based on CLI option
    match cli.color {
        ColorChoice::Always => owo_colors::set_override(true),
        ColorChoice::Never => owo_colors::set_override(false),
        ColorChoice::Auto => {} // owo-colors auto-detects TTY
    }

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log!("error"; "{:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    // Setup global Ctrl+C handler (before any blocking operations)
    core::setup_shutdown_handler()?;

    let config = SiteConfig::load(cli)?;

    match &cli.command {
        Commands::Build { .. } => {
            cli::build::run_build(&config)?;
            Ok(())
        }
        Commands::Serve { .. } => cli::serve::serve_site(config),
    }
}

/// Process exit status for the first typed error in the chain.
///
/// | code | cause                                      |
/// |------|--------------------------------------------|
/// | 1    | anything else                              |
/// | 2    | configuration                              |
/// | 3    | content listing, file I/O, cache, per-file |
/// | 4    | missing template                           |
/// | 5    | template render                            |
/// | 6    | server bind                                |
fn exit_code(err: &anyhow::Error) -> u8 {
    for cause in err.chain() {
        if cause.is::<ConfigError>() {
            return 2;
        }
        if let Some(e) = cause.downcast_ref::<BuildError>() {
            return match e {
                BuildError::TemplateMissing { .. } => 4,
                BuildError::Render { .. } => 5,
                _ => 3,
            };
        }
        if cause.is::<ServeError>() {
            return 6;
        }
    }
    1
}
