//! romcheck CLI
//!
//! Command-line interface for verifying ROM files against reference catalogs.

mod cli_types;
mod commands;
mod error;

use std::io::Write;

use clap::Parser;
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use cli_types::{CacheAction, Cli, Commands, ConfigAction};
use commands::Session;
pub(crate) use error::CliError;

fn main() {
    let cli = Cli::parse();
    init_logger(cli.quiet, cli.verbose);

    if let Err(e) = run(cli) {
        log::error!("{} {}", "\u{2718}".if_supports_color(Stdout, |t| t.red()), e);
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let session = Session::from_cli(&cli);

    match cli.command {
        Commands::Validate {
            paths,
            catalogs,
            report,
            unknown,
        } => commands::validate::run_validate(&session, paths, catalogs, report, unknown),
        Commands::Classify { files } => {
            commands::classify::run_classify(&session, files);
            Ok(())
        }
        Commands::List => {
            commands::list::run_list();
            Ok(())
        }
        Commands::Cache { action } => match action {
            CacheAction::List { kind } => commands::cache::run_cache_list(&session, kind),
            CacheAction::Clear => commands::cache::run_cache_clear(&session),
            CacheAction::Fetch { platforms } => commands::cache::run_cache_fetch(&session, platforms),
            CacheAction::Import { file } => commands::cache::run_cache_import(&session, &file),
        },
        Commands::Config { action } => match action {
            ConfigAction::Show => commands::config::run_config_show(&session),
            ConfigAction::Path => {
                commands::config::run_config_path(&session);
                Ok(())
            }
        },
    }
}

/// Route `log` output to stdout.
///
/// `--quiet` keeps warnings and errors, `--verbose` adds debug messages from
/// romcheck's own crates with timestamps. Otherwise messages are printed
/// bare, since normal command output goes through `log::info!`. `RUST_LOG`
/// overrides the level when set.
fn init_logger(quiet: bool, verbose: bool) {
    let mut builder = env_logger::Builder::new();
    builder.target(env_logger::Target::Stdout);

    if verbose {
        builder
            .filter_level(log::LevelFilter::Info)
            .filter_module("romcheck", log::LevelFilter::Debug)
            .format_timestamp_millis();
    } else {
        let level = if quiet {
            log::LevelFilter::Warn
        } else {
            log::LevelFilter::Info
        };
        builder
            .filter_level(level)
            .format(|buf, record| writeln!(buf, "{}", record.args()));
    }

    builder.parse_default_env();
    builder.init();
}

/// Print an empty line through the logger.
pub(crate) fn log_blank() {
    log::info!("");
}
