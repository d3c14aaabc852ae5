//! `quire` command line.

use clap::{ColorChoice, Parser, Subcommand};
use std::path::PathBuf;

/// Incremental markdown-to-HTML builds with a live-reloading preview server.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None, arg_required_else_help = true)]
pub struct Cli {
    /// When to color terminal output
    #[arg(long, global = true, default_value = "auto")]
    pub color: ColorChoice,

    /// Where HTML is written, overriding `build.output`
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub output: Option<PathBuf>,

    /// Where markdown is read from, overriding `build.content`
    #[arg(short, long, value_hint = clap::ValueHint::DirPath)]
    pub content: Option<PathBuf>,

    /// Config file, looked up from the working directory upward
    #[arg(short = 'C', long, default_value = "quire.toml", value_hint = clap::ValueHint::FilePath)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Build changed pages once
    #[command(visible_alias = "b")]
    Build {
        #[command(flatten)]
        build_args: BuildArgs,
    },

    /// Build, then serve the output with live reload
    #[command(visible_alias = "s")]
    Serve {
        #[command(flatten)]
        build_args: BuildArgs,

        /// Address to listen on; 0.0.0.0 exposes the preview on the LAN
        #[arg(short, long)]
        interface: Option<std::net::IpAddr>,

        /// First port to try
        #[arg(short, long)]
        port: Option<u16>,

        /// Rebuild on content changes (`-w false` to disable)
        #[arg(short, long, action = clap::ArgAction::Set, num_args = 0..=1, default_missing_value = "true", require_equals = false)]
        watch: Option<bool>,

        /// Poll the content directory instead of using native notifications
        #[arg(long)]
        poll: bool,
    },
}

/// Flags common to `build` and `serve`.
#[derive(clap::Args, Debug, Clone, Default)]
pub struct BuildArgs {
    /// Rebuild every page, ignoring the change cache.
    ///
    /// Needed after editing templates: only content files are fingerprinted.
    #[arg(short, long)]
    pub force: bool,

    /// Remove the output directory before building
    #[arg(long)]
    pub clean: bool,

    /// Print debug messages
    #[arg(short = 'V', long)]
    pub verbose: bool,
}
