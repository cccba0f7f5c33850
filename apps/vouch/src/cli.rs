//! Command-line interface definition

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use vouch_types::PackageSource;

#[derive(Parser)]
#[command(name = "vouch")]
#[command(about = "Verified-publisher lookup for Flatpak and Snap packages")]
#[command(version)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalFlags,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Args)]
pub struct GlobalFlags {
    /// Path to a TOML config file (defaults are used when omitted)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Check whether packages come from verified publishers
    Check {
        /// Distribution source the packages are offered through
        #[arg(value_enum)]
        source: PackageSource,

        /// Package identifiers (snap qualifiers like `--classic` are stripped)
        #[arg(required = true)]
        packages: Vec<String>,
    },

    /// List all verified Flatpak app ids
    Verified,
}
