//! Plain-text reports over a batch of validation results.
//!
//! Both reports are pure formatting: no colors, no I/O. Frontends decide
//! where the text goes.

use std::fmt::Write;

use chrono::{DateTime, Utc};
use romcheck_core::util::format_bytes_approx;

use crate::error::FileError;
use crate::validate::{ValidationOutcome, ValidationStatus};

type BatchResult = Result<ValidationOutcome, FileError>;

// ---------------------------------------------------------------------------
// Counts
// ---------------------------------------------------------------------------

/// Number of results per status, plus per-file errors.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub valid: usize,
    pub renamed: usize,
    pub invalid: usize,
    pub unknown: usize,
    pub errors: usize,
}

impl BatchSummary {
    pub fn from_results(results: &[BatchResult]) -> Self {
        let mut summary = Self::default();
        for result in results {
            match result {
                Ok(o) => match o.status {
                    ValidationStatus::Valid => summary.valid += 1,
                    ValidationStatus::Renamed => summary.renamed += 1,
                    ValidationStatus::Invalid => summary.invalid += 1,
                    ValidationStatus::Unknown => summary.unknown += 1,
                },
                Err(_) => summary.errors += 1,
            }
        }
        summary
    }

    pub fn total(&self) -> usize {
        self.valid + self.renamed + self.invalid + self.unknown + self.errors
    }

    /// Files whose digests matched a catalog entry.
    pub fn matched(&self) -> usize {
        self.valid + self.renamed
    }
}

// ---------------------------------------------------------------------------
// Summary report
// ---------------------------------------------------------------------------

/// Human-readable summary with per-file details.
pub fn summary_report(results: &[BatchResult]) -> String {
    summary_report_at(results, Utc::now())
}

/// [`summary_report`] with a fixed generation time.
pub fn summary_report_at(results: &[BatchResult], generated: DateTime<Utc>) -> String {
    let summary = BatchSummary::from_results(results);
    let mut out = String::new();

    // Writing to a String cannot fail
    let _ = writeln!(out, "romcheck validation report");
    let _ = writeln!(out, "Generated: {}", generated.format("%Y-%m-%d %H:%M:%S UTC"));
    let _ = writeln!(out);
    let _ = writeln!(out, "Files:   {}", summary.total());
    let _ = writeln!(out, "Valid:   {}", summary.valid);
    let _ = writeln!(out, "Renamed: {}", summary.renamed);
    let _ = writeln!(out, "Invalid: {}", summary.invalid);
    let _ = writeln!(out, "Unknown: {}", summary.unknown);
    if summary.errors > 0 {
        let _ = writeln!(out, "Errors:  {}", summary.errors);
    }

    for result in results {
        let _ = writeln!(out);
        match result {
            Ok(outcome) => write_outcome(&mut out, outcome),
            Err(e) => {
                let _ = writeln!(out, "[ERROR] {}", e.filename);
                let _ = writeln!(out, "  Error: {}", e.source);
            }
        }
    }
    out
}

fn write_outcome(out: &mut String, o: &ValidationOutcome) {
    let _ = writeln!(out, "[{}] {}", o.status.as_str().to_uppercase(), o.original_filename);
    if let Some(platform) = o.platform {
        let _ = writeln!(out, "  Platform: {}", platform.display_name());
    }
    if let Some(region) = &o.region {
        let _ = writeln!(out, "  Region: {region}");
    }
    let _ = writeln!(out, "  Size: {} ({} bytes)", format_bytes_approx(o.size), o.size);
    write_digests(out, o);
    if let Some(entry) = &o.matched_entry {
        let method = o.match_method.map(|m| format!(" by {m}")).unwrap_or_default();
        let _ = writeln!(out, "  Matched: {}{method}", entry.name);
    }
    if let Some(name) = &o.suggested_name {
        let _ = writeln!(out, "  Suggested name: {name}");
    }
    if let Some(source) = &o.catalog_source {
        let _ = writeln!(out, "  Catalog: {source}");
    }
    for issue in &o.issues {
        let _ = writeln!(out, "  Issue: {issue}");
    }
}

fn write_digests(out: &mut String, o: &ValidationOutcome) {
    let _ = writeln!(out, "  CRC32: {}", o.digests.crc32);
    let _ = writeln!(out, "  MD5: {}", o.digests.md5);
    let _ = writeln!(out, "  SHA-1: {}", o.digests.sha1);
}

// ---------------------------------------------------------------------------
// Unknown files export
// ---------------------------------------------------------------------------

/// One block per unknown file with its size and digests, suitable for
/// submitting to catalog maintainers. Empty when nothing is unknown.
pub fn unknown_files_export(results: &[BatchResult]) -> String {
    let mut out = String::new();
    let unknown = results
        .iter()
        .filter_map(|r| r.as_ref().ok())
        .filter(|o| o.status == ValidationStatus::Unknown);

    for o in unknown {
        if !out.is_empty() {
            let _ = writeln!(out);
        }
        let _ = writeln!(out, "File: {}", o.original_filename);
        if let Some(platform) = o.platform {
            let _ = writeln!(out, "Platform guess: {}", platform.display_name());
        }
        let _ = writeln!(out, "Size: {}", o.size);
        let _ = writeln!(out, "CRC32: {}", o.digests.crc32);
        let _ = writeln!(out, "MD5: {}", o.digests.md5);
        let _ = writeln!(out, "SHA-1: {}", o.digests.sha1);
    }
    out
}

#[cfg(test)]
#[path = "tests/report_tests.rs"]
mod tests;
