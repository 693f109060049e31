use std::path::PathBuf;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use romcheck_core::util::{file_extension, format_bytes_approx};
use romcheck_dat::{classify, systems};
use romcheck_lib::{Region, candidate_platforms};

use super::Session;

/// Show the classifier's guess and the catalogs that would be tried.
pub(crate) fn run_classify(session: &Session, files: Vec<PathBuf>) {
    let classifier = session.classifier();

    for path in files {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        // Files need not exist; a missing file classifies as empty
        let size = std::fs::metadata(&path).map(|m| m.len()).unwrap_or(0);

        log::info!(
            "{} ({})",
            name.if_supports_color(Stdout, |t| t.bold()),
            format_bytes_approx(size),
        );

        if classify::is_excluded(&name) {
            log::info!(
                "    {}",
                "Metadata sidecar: never validated".if_supports_color(Stdout, |t| t.dimmed()),
            );
            continue;
        }

        match classifier.classify(&name, size) {
            Some(p) => log::info!(
                "    Guess: {} [{}]",
                p.display_name(),
                p.short_name().if_supports_color(Stdout, |t| t.cyan()),
            ),
            None => log::info!(
                "    Guess: {}",
                "unknown".if_supports_color(Stdout, |t| t.dimmed())
            ),
        }
        if let Some(region) = Region::from_name(&name) {
            log::info!("    Region: {}", region);
        }

        let candidates = candidate_platforms(&classifier, &name, size, None);
        log::info!("    Candidates: {}", join_short_names(&candidates));

        if let Some(ext) = file_extension(&name) {
            let fallbacks: Vec<_> = systems::fallback_platforms(&ext)
                .iter()
                .copied()
                .filter(|p| !candidates.contains(p))
                .collect();
            if !fallbacks.is_empty() {
                log::info!("    Fallbacks: {}", join_short_names(&fallbacks));
            }
            if systems::is_encryption_prone(&ext) {
                log::info!(
                    "    {}",
                    "Encrypted dumps are checked against the bundled catalog first"
                        .if_supports_color(Stdout, |t| t.yellow()),
                );
            }
        }
    }
}

fn join_short_names(platforms: &[romcheck_lib::Platform]) -> String {
    if platforms.is_empty() {
        return "none".to_string();
    }
    platforms
        .iter()
        .map(|p| p.short_name())
        .collect::<Vec<_>>()
        .join(", ")
}
