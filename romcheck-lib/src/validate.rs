//! Batch validation: hash each file, pick candidate platforms, and walk
//! their catalogs until one matches.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use romcheck_core::util::file_extension;
use romcheck_core::{Platform, Region};
use romcheck_dat::classify::{self, Classifier};
use romcheck_dat::hasher::{self, DigestProvider, FileDigestSet, NativeDigests};
use romcheck_dat::matcher::{self, CatalogMatch, MatchMethod, NO_MATCH_ISSUE};
use romcheck_dat::{CatalogFetcher, CatalogLoader, ReferenceEntry, systems};

use crate::error::{FileError, ValidateError};
use crate::file::FileHandle;
use crate::progress::{ValidationProgress, ValidationStage};

/// Catalog label for matches found with [`ForcedCatalog::All`].
pub const MIXED_LABEL: &str = "Mixed";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    Valid,
    /// Reserved; no matching rule produces it.
    Invalid,
    Unknown,
    Renamed,
}

impl ValidationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Valid => "valid",
            Self::Invalid => "invalid",
            Self::Unknown => "unknown",
            Self::Renamed => "renamed",
        }
    }
}

impl std::fmt::Display for ValidationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of validating one file.
#[derive(Debug, Clone)]
pub struct ValidationOutcome {
    /// Canonical name when renamed, otherwise the input name
    pub filename: String,
    pub original_filename: String,
    pub status: ValidationStatus,
    pub platform: Option<Platform>,
    pub region: Option<String>,
    /// Observed byte length
    pub size: u64,
    pub digests: FileDigestSet,
    pub matched_entry: Option<Arc<ReferenceEntry>>,
    pub match_method: Option<MatchMethod>,
    pub suggested_name: Option<String>,
    /// Diagnostics for non-matching outcomes
    pub issues: Vec<String>,
    /// Catalog family or custom label that matched
    pub catalog_source: Option<String>,
}

impl ValidationOutcome {
    pub fn is_match(&self) -> bool {
        self.matched_entry.is_some()
    }
}

/// Restricts which catalogs a batch is checked against.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForcedCatalog {
    /// Try this platform first, then the usual candidates.
    Platform(Platform),
    /// Only a previously imported custom catalog.
    Custom(String),
    /// Every known catalog at once.
    All,
}

/// Cooperative cancellation flag, checked between files and between
/// candidate platforms.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

#[derive(Debug, Clone, Default)]
pub struct ValidateOptions {
    pub forced: Option<ForcedCatalog>,
    pub cancel: CancelToken,
}

/// A hashed input file.
struct HashedFile<'a> {
    filename: &'a str,
    size: u64,
    digests: FileDigestSet,
}

impl HashedFile<'_> {
    fn outcome(self, found: CatalogMatch, platform: Option<Platform>, label: String) -> ValidationOutcome {
        let (entry, method, suggested_name) = match found {
            CatalogMatch::Found {
                entry,
                method,
                suggested_name,
            } => (entry, method, suggested_name),
            miss => return self.unknown(miss.issue().unwrap_or(NO_MATCH_ISSUE), platform),
        };

        let status = if suggested_name.is_some() {
            ValidationStatus::Renamed
        } else {
            ValidationStatus::Valid
        };
        let region = entry
            .region
            .clone()
            .or_else(|| Region::from_name(&entry.name).map(|r| r.name().to_string()));

        ValidationOutcome {
            filename: suggested_name.clone().unwrap_or_else(|| self.filename.to_string()),
            original_filename: self.filename.to_string(),
            status,
            platform: entry.platform.or(platform),
            region,
            size: self.size,
            digests: self.digests,
            matched_entry: Some(entry),
            match_method: Some(method),
            suggested_name,
            issues: Vec::new(),
            catalog_source: Some(label),
        }
    }

    fn unknown(self, issue: &str, platform: Option<Platform>) -> ValidationOutcome {
        ValidationOutcome {
            filename: self.filename.to_string(),
            original_filename: self.filename.to_string(),
            status: ValidationStatus::Unknown,
            platform,
            region: Region::from_name(self.filename).map(|r| r.name().to_string()),
            size: self.size,
            digests: self.digests,
            matched_entry: None,
            match_method: None,
            suggested_name: None,
            issues: vec![issue.to_string()],
            catalog_source: None,
        }
    }
}

/// Ordered platforms to try for a file, before the cross-format
/// fallbacks.
///
/// The registry's extension candidates are used, with the classifier's
/// guess moved to the front when there are several. An extension without
/// candidates falls back to the classifier alone. A forced platform always
/// comes first.
pub fn candidate_platforms(
    classifier: &Classifier,
    filename: &str,
    size: u64,
    forced: Option<Platform>,
) -> Vec<Platform> {
    let listed = file_extension(filename)
        .map(|ext| systems::candidates_for_extension(&ext))
        .unwrap_or(&[]);
    let guess = classifier.classify(filename, size);

    let mut order: Vec<Platform> = match guess {
        Some(g) if listed.is_empty() => vec![g],
        Some(g) if listed.len() > 1 && listed.contains(&g) => std::iter::once(g)
            .chain(listed.iter().copied().filter(|&p| p != g))
            .collect(),
        _ => listed.to_vec(),
    };

    if let Some(p) = forced {
        order.retain(|&c| c != p);
        order.insert(0, p);
    }
    order
}

/// Runs batches of files against the catalogs of their candidate platforms.
pub struct Validator<F> {
    loader: CatalogLoader<F>,
    classifier: Classifier,
    digests: Box<dyn DigestProvider>,
}

impl<F: CatalogFetcher> Validator<F> {
    pub fn new(loader: CatalogLoader<F>, classifier: Classifier) -> Self {
        Self {
            loader,
            classifier,
            digests: Box::new(NativeDigests),
        }
    }

    /// Replace the MD5/SHA-1 provider.
    pub fn with_digest_provider(mut self, digests: Box<dyn DigestProvider>) -> Self {
        self.digests = digests;
        self
    }

    pub fn loader_mut(&mut self) -> &mut CatalogLoader<F> {
        &mut self.loader
    }

    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Ordered platforms to try for a file. See [`candidate_platforms`].
    pub fn candidate_platforms(&self, filename: &str, size: u64, forced: Option<Platform>) -> Vec<Platform> {
        candidate_platforms(&self.classifier, filename, size, forced)
    }

    /// Validate a batch of files in order.
    ///
    /// Sidecar files (`.cue`) are dropped before anything else and produce no
    /// result. A file that cannot be read yields an `Err` in its slot while
    /// the rest of the batch continues. On cancellation the results computed
    /// so far are returned.
    pub async fn validate_batch<H: FileHandle>(
        &mut self,
        files: &[H],
        options: &ValidateOptions,
        progress: Option<&dyn Fn(ValidationProgress)>,
    ) -> Vec<Result<ValidationOutcome, FileError>> {
        let emit = |update: ValidationProgress| {
            if let Some(cb) = progress {
                cb(update);
            }
        };

        let files: Vec<&H> = files
            .iter()
            .filter(|f| {
                let excluded = classify::is_excluded(f.name());
                if excluded {
                    log::debug!("Skipping sidecar {}", f.name());
                }
                !excluded
            })
            .collect();
        let total = files.len();

        let mut results = Vec::with_capacity(total);
        let mut cancelled = false;
        for (index, file) in files.into_iter().enumerate() {
            if options.cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            let step = Step {
                filename: file.name(),
                index,
                total,
                emit: &emit,
            };
            match self.validate_file(file, options, &step).await {
                Ok(Some(outcome)) => results.push(Ok(outcome)),
                Ok(None) => {
                    cancelled = true;
                    break;
                }
                Err(e) => {
                    log::warn!("Failed to validate {}: {e}", file.name());
                    results.push(Err(FileError::new(file.name(), e)));
                }
            }
            emit(ValidationProgress::file_done(file.name(), index, total));
        }

        if cancelled {
            log::info!("Validation cancelled after {} of {total} files", results.len());
        }
        emit(ValidationProgress::finished(results.len(), total, cancelled));
        results
    }

    /// `Ok(None)` means cancellation was observed.
    async fn validate_file<H: FileHandle>(
        &mut self,
        file: &H,
        options: &ValidateOptions,
        step: &Step<'_>,
    ) -> Result<Option<ValidationOutcome>, ValidateError> {
        step.report(ValidationStage::Hashing);
        let data = file.read_bytes().await?;
        let hashed = HashedFile {
            filename: file.name(),
            size: data.len() as u64,
            digests: hasher::digest(&data, self.digests.as_ref()),
        };
        drop(data);

        match &options.forced {
            Some(ForcedCatalog::All) => {
                step.report(ValidationStage::LoadingDats);
                let entries = self.loader.load_all().await;
                step.report(ValidationStage::Validating);
                let found = matcher::match_file(hashed.filename, hashed.size, &hashed.digests, &entries);
                let guess = self.classifier.classify(hashed.filename, hashed.size);
                Ok(Some(hashed.outcome(found, guess, MIXED_LABEL.to_string())))
            }
            Some(ForcedCatalog::Custom(label)) => {
                step.report(ValidationStage::LoadingDats);
                let entries = self.loader.load_custom(label).ok_or_else(|| {
                    ValidateError::other(format!("custom catalog '{label}' is not loaded"))
                })?;
                step.report(ValidationStage::Validating);
                let found = matcher::match_file(hashed.filename, hashed.size, &hashed.digests, &entries);
                let guess = self.classifier.classify(hashed.filename, hashed.size);
                Ok(Some(hashed.outcome(found, guess, label.clone())))
            }
            Some(ForcedCatalog::Platform(p)) => self.walk_candidates(hashed, Some(*p), options, step).await,
            None => self.walk_candidates(hashed, None, options, step).await,
        }
    }

    async fn walk_candidates(
        &mut self,
        hashed: HashedFile<'_>,
        forced: Option<Platform>,
        options: &ValidateOptions,
        step: &Step<'_>,
    ) -> Result<Option<ValidationOutcome>, ValidateError> {
        let candidates = self.candidate_platforms(hashed.filename, hashed.size, forced);
        let fallbacks: Vec<Platform> = file_extension(hashed.filename)
            .map(|ext| systems::fallback_platforms(&ext))
            .unwrap_or(&[])
            .iter()
            .copied()
            .filter(|p| !candidates.contains(p))
            .collect();
        log::debug!(
            "{}: candidates {:?}, fallbacks {:?}",
            hashed.filename,
            candidates,
            fallbacks
        );

        let mut first_miss: Option<(Platform, CatalogMatch)> = None;
        for platform in candidates.iter().chain(fallbacks.iter()).copied() {
            if options.cancel.is_cancelled() {
                return Ok(None);
            }
            step.report(ValidationStage::LoadingDats);
            let entries = self.loader.load(platform).await;
            step.report(ValidationStage::Validating);

            let found = matcher::match_file(hashed.filename, hashed.size, &hashed.digests, &entries);
            if found.is_found() {
                let label = systems::source_for(platform)
                    .map(|s| s.family.display_name().to_string())
                    .unwrap_or_default();
                return Ok(Some(hashed.outcome(found, Some(platform), label)));
            }
            if first_miss.is_none() {
                first_miss = Some((platform, found));
            }
        }

        Ok(Some(match first_miss {
            Some((platform, miss)) => hashed.unknown(miss.issue().unwrap_or(NO_MATCH_ISSUE), Some(platform)),
            None => hashed.unknown(NO_MATCH_ISSUE, None),
        }))
    }
}

/// Position of the current file in the batch, for progress updates.
struct Step<'a> {
    filename: &'a str,
    index: usize,
    total: usize,
    emit: &'a dyn Fn(ValidationProgress),
}

impl Step<'_> {
    fn report(&self, stage: ValidationStage) {
        (self.emit)(ValidationProgress::stage(stage, self.filename, self.index, self.total));
    }
}

#[cfg(test)]
#[path = "tests/validate_tests.rs"]
mod tests;
