//! Heuristic platform classifier.
//!
//! Maps a filename and byte length to a single best-guess platform. Rules are
//! applied in order and the first decisive one wins:
//!
//! 1. Unambiguous extension (one registry candidate).
//! 2. `.nds` family: `dsi` / `download` / `demo` substrings.
//! 3. `.iso`: filename hints, then configurable size bands.
//! 4. `.bin`: filename hints, then a single size threshold.
//! 5. `.cue` sidecars are never classified.
//! 6. Keyword search over platform names in the filename.
//! 7. Otherwise unknown.

use romcheck_core::Platform;
use romcheck_core::util::file_extension;
use serde::{Deserialize, Serialize};

use crate::systems::{self, CD_IMAGE_EXTENSION, DISC_IMAGE_EXTENSION};

const MIB: u64 = 1024 * 1024;

/// Size of a full single-layer GameCube disc.
const GAMECUBE_DISC_BYTES: u64 = 1_459_978_240;

/// Shortest platform keyword used by the name search. Shorter aliases
/// (`nes`, `md`, `gb`) occur inside unrelated words.
const MIN_KEYWORD_LEN: usize = 4;

/// One `.iso` size band: files of at least `min_bytes` map to `platform`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeBand {
    pub min_bytes: u64,
    pub platform: Platform,
}

/// Tunable thresholds for the size-based rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// `.iso` bands; order does not matter, the largest matching minimum wins.
    pub iso_bands: Vec<SizeBand>,
    /// `.bin` files at or above this size are CD images, smaller ones are
    /// cartridge dumps.
    pub bin_disc_threshold: u64,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            iso_bands: vec![
                SizeBand {
                    min_bytes: 2048 * MIB,
                    platform: Platform::Ps2,
                },
                SizeBand {
                    min_bytes: GAMECUBE_DISC_BYTES,
                    platform: Platform::GameCube,
                },
                SizeBand {
                    min_bytes: 800 * MIB,
                    platform: Platform::Psp,
                },
                SizeBand {
                    min_bytes: 0,
                    platform: Platform::Ps1,
                },
            ],
            bin_disc_threshold: 32 * MIB,
        }
    }
}

/// Filename hints for `.iso` images, checked in order.
static ISO_HINTS: &[(&[&str], Platform)] = &[
    (&["ps2", "playstation 2", "playstation2"], Platform::Ps2),
    (&["psp", "playstation portable"], Platform::Psp),
    (&["gamecube", "ngc", "gcn"], Platform::GameCube),
    (&["wii"], Platform::Wii),
    (&["xbox"], Platform::Xbox),
    (&["ps1", "psx", "playstation"], Platform::Ps1),
];

/// Filename hints for `.bin` images, checked in order.
static BIN_HINTS: &[(&[&str], Platform)] = &[
    (&["saturn"], Platform::Saturn),
    (&["segacd", "sega cd", "megacd", "mega cd"], Platform::SegaCd),
    (&["pce", "pc engine", "turbografx"], Platform::PcEngineCd),
    (&["ps1", "psx", "playstation"], Platform::Ps1),
    (&["genesis", "mega drive", "megadrive"], Platform::Genesis),
];

#[derive(Debug, Clone)]
pub struct Classifier {
    /// Sorted by `min_bytes`, largest first.
    iso_bands: Vec<SizeBand>,
    bin_disc_threshold: u64,
    /// Lowercase keywords, longest first.
    keywords: Vec<(String, Platform)>,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(ClassifierConfig::default())
    }
}

impl Classifier {
    pub fn new(config: ClassifierConfig) -> Self {
        let mut iso_bands = config.iso_bands;
        iso_bands.sort_by(|a, b| b.min_bytes.cmp(&a.min_bytes));
        iso_bands.dedup_by_key(|b| b.min_bytes);

        let mut keywords: Vec<(String, Platform)> = Vec::new();
        for &platform in Platform::all() {
            let names = std::iter::once(platform.display_name()).chain(
                platform
                    .aliases()
                    .iter()
                    .copied()
                    .filter(|a| a.len() >= MIN_KEYWORD_LEN),
            );
            for name in names {
                let lower = name.to_lowercase();
                if !keywords.iter().any(|(k, _)| *k == lower) {
                    keywords.push((lower, platform));
                }
            }
        }
        // Stable sort keeps declaration order among equal lengths
        keywords.sort_by(|a, b| b.0.len().cmp(&a.0.len()));

        Self {
            iso_bands,
            bin_disc_threshold: config.bin_disc_threshold,
            keywords,
        }
    }

    /// Best-guess platform for a file, or `None` when unknown.
    pub fn classify(&self, filename: &str, size: u64) -> Option<Platform> {
        let lower = filename.to_lowercase();
        let ext = file_extension(filename);

        if let Some(ext) = ext.as_deref() {
            if systems::is_excluded_extension(ext) {
                return None;
            }

            let candidates = systems::candidates_for_extension(ext);
            if candidates.len() == 1 {
                return Some(candidates[0]);
            }

            match ext {
                "nds" => return Some(classify_nds(&lower)),
                DISC_IMAGE_EXTENSION => {
                    if let Some(p) = match_hints(ISO_HINTS, &lower) {
                        return Some(p);
                    }
                    if let Some(p) = self.iso_band(size) {
                        return Some(p);
                    }
                }
                CD_IMAGE_EXTENSION => {
                    return Some(
                        match_hints(BIN_HINTS, &lower).unwrap_or_else(|| self.bin_guess(size)),
                    );
                }
                _ => {}
            }
        }

        self.keyword_match(&lower)
    }

    /// The `.iso` band a size falls into.
    pub fn iso_band(&self, size: u64) -> Option<Platform> {
        self.iso_bands
            .iter()
            .find(|band| size >= band.min_bytes)
            .map(|band| band.platform)
    }

    fn bin_guess(&self, size: u64) -> Platform {
        if size >= self.bin_disc_threshold {
            Platform::Ps1
        } else {
            Platform::Genesis
        }
    }

    fn keyword_match(&self, lower: &str) -> Option<Platform> {
        self.keywords
            .iter()
            .find(|(keyword, _)| lower.contains(keyword.as_str()))
            .map(|&(_, platform)| platform)
    }
}

/// Whether a file is a metadata-only sidecar excluded from validation.
pub fn is_excluded(filename: &str) -> bool {
    file_extension(filename).is_some_and(|ext| systems::is_excluded_extension(&ext))
}

fn classify_nds(lower: &str) -> Platform {
    if lower.contains("dsi") {
        Platform::Dsi
    } else if lower.contains("download") || lower.contains("demo") {
        Platform::DsDownloadPlay
    } else {
        Platform::Ds
    }
}

fn match_hints(hints: &[(&[&str], Platform)], lower: &str) -> Option<Platform> {
    hints
        .iter()
        .find(|(words, _)| words.iter().any(|w| lower.contains(w)))
        .map(|&(_, platform)| platform)
}

#[cfg(test)]
#[path = "tests/classify_tests.rs"]
mod tests;
