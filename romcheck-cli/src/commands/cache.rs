use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_dat::SourceKind;

use super::{Session, parse_platforms, runtime};
use crate::CliError;

/// List cached catalogs.
pub(crate) fn run_cache_list(session: &Session, kind: Option<SourceKind>) -> Result<(), CliError> {
    let mut loader = session.loader()?;
    let entries = loader.cache().list(kind)?;

    if entries.is_empty() {
        log::info!(
            "{}",
            "No cached catalogs.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::info!("Run 'romcheck cache fetch <platform>' to download catalogs.");
        return Ok(());
    }

    log::info!(
        "{} ({})",
        "Cached catalogs:".if_supports_color(Stdout, |t| t.bold()),
        session.cache_dir()?.display(),
    );
    log::info!("");

    let mut total_entries = 0usize;
    for cached in &entries {
        total_entries += cached.entry_count;
        let stored = cached
            .stored_at
            .map(|t| t.format("%Y-%m-%d %H:%M UTC").to_string())
            .unwrap_or_else(|| "unknown".to_string());
        log::info!(
            "  {} [{}]",
            cached.key.id.if_supports_color(Stdout, |t| t.bold()),
            cached.key.kind.if_supports_color(Stdout, |t| t.cyan()),
        );
        log::info!("    Entries: {}, Stored: {}", cached.entry_count, stored);
    }
    log::info!("");
    log::info!("Total: {} catalogs, {} entries", entries.len(), total_entries);
    Ok(())
}

/// Remove every cached catalog.
pub(crate) fn run_cache_clear(session: &Session) -> Result<(), CliError> {
    let mut loader = session.loader()?;
    let removed = loader.cache().clear()?;
    log::info!(
        "{} Cache cleared ({} catalogs removed)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        removed,
    );
    Ok(())
}

/// Download catalogs for the given platforms into the cache.
pub(crate) fn run_cache_fetch(session: &Session, platforms: Vec<String>) -> Result<(), CliError> {
    let platforms = parse_platforms(&platforms)?;
    let mut loader = session.loader()?;
    let rt = runtime()?;

    let mut failures = 0usize;
    for platform in platforms {
        match rt.block_on(loader.try_load(platform)) {
            Ok(entries) => {
                log::info!(
                    "  {} {} ({} entries)",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    platform.short_name().if_supports_color(Stdout, |t| t.bold()),
                    entries.len(),
                );
            }
            Err(e) => {
                failures += 1;
                log::warn!(
                    "  {} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    platform.short_name().if_supports_color(Stdout, |t| t.bold()),
                    e,
                );
            }
        }
    }

    if failures > 0 {
        return Err(CliError::other(format!("{failures} catalog(s) could not be fetched")));
    }
    Ok(())
}

/// Import a user-supplied catalog under a `Custom - <name>` label.
pub(crate) fn run_cache_import(session: &Session, file: &Path) -> Result<(), CliError> {
    let text = std::fs::read_to_string(file)?;
    let filename = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| file.display().to_string());

    let mut loader = session.loader()?;
    let custom = loader.import_custom(&filename, &text)?;

    log::info!(
        "{} Imported {} ({} entries)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        custom.label.if_supports_color(Stdout, |t| t.bold()),
        custom.entries.len(),
    );
    if let Some(name) = &custom.header.name {
        log::info!("    Catalog: {name}");
    }
    if let Some(version) = &custom.header.version {
        log::info!("    Version: {version}");
    }
    log::info!("Validate with: romcheck validate --custom \"{}\" <files>", custom.label);
    Ok(())
}
