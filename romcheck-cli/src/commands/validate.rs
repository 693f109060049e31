use std::path::PathBuf;

use indicatif::{ProgressBar, ProgressStyle};
use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_dat::classify;
use romcheck_lib::{
    BatchSummary, DiskFile, FileError, FileHandle, ForcedCatalog, ValidateOptions, ValidationOutcome,
    ValidationProgress, ValidationStatus, Validator, expand_paths, summary_report,
    unknown_files_export,
};

use super::{Session, runtime};
use crate::CliError;
use crate::cli_types::CatalogArgs;

/// Run the validate command.
pub(crate) fn run_validate(
    session: &Session,
    paths: Vec<PathBuf>,
    catalogs: CatalogArgs,
    report: Option<PathBuf>,
    unknown: Option<PathBuf>,
) -> Result<(), CliError> {
    let files: Vec<DiskFile> = expand_paths(&paths)?
        .into_iter()
        .filter_map(|path| match DiskFile::open(&path) {
            Ok(f) => Some(f),
            Err(e) => {
                log::warn!(
                    "{} {}: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    path.display(),
                    e,
                );
                None
            }
        })
        .collect();

    let countable = files
        .iter()
        .filter(|f| !classify::is_excluded(f.name()))
        .count();
    if countable == 0 {
        log::warn!("No files to validate.");
        return Ok(());
    }

    let forced = if let Some(p) = catalogs.platform {
        Some(ForcedCatalog::Platform(p))
    } else if let Some(label) = catalogs.custom {
        Some(ForcedCatalog::Custom(label))
    } else if catalogs.all_dats {
        Some(ForcedCatalog::All)
    } else {
        None
    };
    let options = ValidateOptions {
        forced,
        ..Default::default()
    };

    log::info!(
        "Validating {} file{}",
        countable,
        if countable == 1 { "" } else { "s" }
    );
    crate::log_blank();

    let pb = progress_bar(countable as u64);
    let on_progress = |update: ValidationProgress| match update {
        ValidationProgress::Stage {
            stage, filename, ..
        } => pb.set_message(format!("{stage}: {filename}")),
        ValidationProgress::FileDone { .. } => pb.inc(1),
        ValidationProgress::Finished { .. } => pb.finish_and_clear(),
    };

    let rt = runtime()?;
    let mut validator = Validator::new(session.loader()?, session.classifier());
    let cancel = options.cancel.clone();
    rt.spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel.cancel();
        }
    });
    let results = rt.block_on(validator.validate_batch(&files, &options, Some(&on_progress)));

    for result in &results {
        match result {
            Ok(outcome) => print_outcome(outcome),
            Err(e) => print_error(e),
        }
    }

    let summary = BatchSummary::from_results(&results);
    crate::log_blank();
    log::info!(
        "{}: {} valid, {} renamed, {} unknown{}",
        "Summary".if_supports_color(Stdout, |t| t.bold()),
        summary.valid,
        summary.renamed,
        summary.unknown,
        if summary.errors > 0 {
            format!(", {} errors", summary.errors)
        } else {
            String::new()
        },
    );
    if options.cancel.is_cancelled() {
        log::warn!("Cancelled: {} of {} files processed", results.len(), countable);
    }

    if let Some(path) = report {
        std::fs::write(&path, summary_report(&results))?;
        log::info!("Report written to {}", path.display());
    }
    if let Some(path) = unknown {
        std::fs::write(&path, unknown_files_export(&results))?;
        log::info!("Unknown files written to {}", path.display());
    }
    Ok(())
}

fn progress_bar(len: u64) -> ProgressBar {
    if !log::log_enabled!(log::Level::Info) {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new(len);
    let style = ProgressStyle::with_template("  {bar:30.cyan/dim} {pos}/{len} {wide_msg}")
        .unwrap_or_else(|_| ProgressStyle::default_bar());
    pb.set_style(style);
    pb
}

fn print_outcome(o: &ValidationOutcome) {
    let platform = o
        .platform
        .map(|p| format!(" [{}]", p.short_name()))
        .unwrap_or_default();
    match o.status {
        ValidationStatus::Valid => {
            log::info!(
                "  {} {}{} {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                o.original_filename.if_supports_color(Stdout, |t| t.bold()),
                platform.if_supports_color(Stdout, |t| t.cyan()),
                source_note(o).if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        ValidationStatus::Renamed => {
            log::info!(
                "  {} {} \u{2192} {}{} {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.yellow()),
                o.original_filename,
                o.filename.if_supports_color(Stdout, |t| t.bold()),
                platform.if_supports_color(Stdout, |t| t.cyan()),
                source_note(o).if_supports_color(Stdout, |t| t.dimmed()),
            );
        }
        ValidationStatus::Unknown | ValidationStatus::Invalid => {
            log::info!(
                "  {} {}{}",
                "?".if_supports_color(Stdout, |t| t.magenta()),
                o.original_filename.if_supports_color(Stdout, |t| t.bold()),
                platform.if_supports_color(Stdout, |t| t.cyan()),
            );
            for issue in &o.issues {
                log::info!("      {}", issue.if_supports_color(Stdout, |t| t.dimmed()));
            }
        }
    }
}

fn source_note(o: &ValidationOutcome) -> String {
    match (&o.catalog_source, o.match_method) {
        (Some(source), Some(method)) if o.is_match() => format!("({source}, {method})"),
        (Some(source), _) => format!("({source})"),
        _ => String::new(),
    }
}

fn print_error(e: &FileError) {
    log::warn!(
        "  {} {}: {}",
        "\u{2718}".if_supports_color(Stdout, |t| t.red()),
        e.filename,
        e.source,
    );
}
