use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use super::Session;
use crate::CliError;

/// Show the effective settings and where they came from.
pub(crate) fn run_config_show(session: &Session) -> Result<(), CliError> {
    let path = &session.settings_path;
    log::info!(
        "{}",
        "romcheck settings".if_supports_color(Stdout, |t| t.bold()),
    );
    if path.exists() {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(exists)".if_supports_color(Stdout, |t| t.green()),
        );
    } else {
        log::info!(
            "  Settings file: {} {}",
            path.display().if_supports_color(Stdout, |t| t.cyan()),
            "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("  Cache directory: {}", session.cache_dir()?.display());
    log::info!("  Bundled catalogs: {}", session.settings.bundled_dir()?.display());
    log::info!("");

    for line in session.settings.to_toml_string()?.lines() {
        log::info!("  {line}");
    }
    Ok(())
}

/// Print the settings file path.
pub(crate) fn run_config_path(session: &Session) {
    log::info!("{}", session.settings_path.display());
}
