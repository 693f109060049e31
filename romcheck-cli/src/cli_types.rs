//! CLI type definitions: command enums and argument structs.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use romcheck_dat::SourceKind;
use romcheck_lib::Platform;

#[derive(Parser)]
#[command(name = "romcheck")]
#[command(about = "Verify ROM files against No-Intro and Redump catalogs", long_about = None)]
pub(crate) struct Cli {
    /// Settings file (defaults to ~/.config/romcheck/settings.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory for cached catalogs (overrides settings)
    #[arg(long, global = true)]
    pub cache_dir: Option<PathBuf>,

    /// Keep downloaded catalogs in memory only
    #[arg(long, global = true)]
    pub no_cache: bool,

    /// Only show warnings and errors (suppress normal output)
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Enable verbose/debug logging (timestamps + debug-level messages)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Which catalogs to check files against. Defaults to automatic detection
/// from each file's extension, name, and size.
#[derive(Args, Clone, Default)]
pub(crate) struct CatalogArgs {
    /// Try this platform's catalog first (e.g., snes, gba, ps2)
    #[arg(short, long, conflicts_with_all = ["custom", "all_dats"])]
    pub platform: Option<Platform>,

    /// Only use a previously imported custom catalog (e.g., "Custom - My Hacks")
    #[arg(long, conflicts_with = "all_dats")]
    pub custom: Option<String>,

    /// Check every file against every known catalog
    #[arg(long)]
    pub all_dats: bool,
}

#[derive(Subcommand)]
pub(crate) enum Commands {
    /// Validate ROM files against reference catalogs
    Validate {
        /// Files or directories (directories are not searched recursively)
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        #[command(flatten)]
        catalogs: CatalogArgs,

        /// Write a full text report to this file
        #[arg(long)]
        report: Option<PathBuf>,

        /// Write digests of unknown files to this file
        #[arg(long)]
        unknown: Option<PathBuf>,
    },

    /// Show the platform guess and catalog candidates for files
    Classify {
        /// File names or paths (files need not exist)
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },

    /// List supported platforms
    List,

    /// Manage cached catalogs
    Cache {
        #[command(subcommand)]
        action: CacheAction,
    },

    /// Show settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
pub(crate) enum CacheAction {
    /// List cached catalogs
    List {
        /// Only catalogs of this kind (bundled, remote, custom)
        #[arg(long)]
        kind: Option<SourceKind>,
    },

    /// Remove every cached catalog
    Clear,

    /// Download catalogs into the cache
    Fetch {
        /// Platform names, or "all"
        #[arg(required = true, value_delimiter = ',')]
        platforms: Vec<String>,
    },

    /// Import a custom DAT file
    Import {
        /// DAT file (ClrMamePro or XML)
        file: PathBuf,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigAction {
    /// Show effective settings
    Show,
    /// Print the settings file path
    Path,
}
