//! Match one file's digests against one catalog's entries.

use std::sync::Arc;

use romcheck_core::util::file_extension;

use crate::dat::ReferenceEntry;
use crate::hasher::FileDigestSet;
use crate::systems;

/// Issue text when a same-sized entry exists but no digest matched.
pub const SIZE_MATCH_ISSUE: &str =
    "size matches a known entry but digests differ — possible hack/translation/different revision";

/// Issue text when neither digests nor size matched anything.
pub const NO_MATCH_ISSUE: &str = "no matching entries found — possible homebrew/unknown dump";

/// Which digest produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMethod {
    Sha1,
    Md5,
    Crc32,
}

impl std::fmt::Display for MatchMethod {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            MatchMethod::Sha1 => "SHA-1",
            MatchMethod::Md5 => "MD5",
            MatchMethod::Crc32 => "CRC32",
        })
    }
}

/// Result of matching a file against one entry collection.
#[derive(Debug, Clone)]
pub enum CatalogMatch {
    /// A digest matched. `suggested_name` is set when the file name differs
    /// from the entry's after normalization.
    Found {
        entry: Arc<ReferenceEntry>,
        method: MatchMethod,
        suggested_name: Option<String>,
    },
    /// Some entry has the file's size, but no digest matched.
    SizeOnly,
    NotFound,
}

impl CatalogMatch {
    pub fn is_found(&self) -> bool {
        matches!(self, CatalogMatch::Found { .. })
    }

    /// Diagnostic text for a miss.
    pub fn issue(&self) -> Option<&'static str> {
        match self {
            CatalogMatch::Found { .. } => None,
            CatalogMatch::SizeOnly => Some(SIZE_MATCH_ISSUE),
            CatalogMatch::NotFound => Some(NO_MATCH_ISSUE),
        }
    }
}

/// Which digest of `digests` matches `entry`, if any.
///
/// Placeholder and unavailable digests never match.
pub fn digest_match(entry: &ReferenceEntry, digests: &FileDigestSet) -> Option<MatchMethod> {
    if digests.sha1.matches(entry.sha1.as_deref()) {
        Some(MatchMethod::Sha1)
    } else if digests.md5.matches(entry.md5.as_deref()) {
        Some(MatchMethod::Md5)
    } else if digests.crc32.matches(entry.crc32.as_deref()) {
        Some(MatchMethod::Crc32)
    } else {
        None
    }
}

/// Match a file against a collection. The first entry with any matching
/// digest wins.
pub fn match_file(
    filename: &str,
    size: u64,
    digests: &FileDigestSet,
    entries: &[Arc<ReferenceEntry>],
) -> CatalogMatch {
    let found = entries
        .iter()
        .find_map(|entry| digest_match(entry, digests).map(|method| (entry, method)));

    if let Some((entry, method)) = found {
        let suggested_name = (normalize_name(filename) != normalize_name(&entry.name))
            .then(|| suggested_name(&entry.name, filename));
        return CatalogMatch::Found {
            entry: Arc::clone(entry),
            method,
            suggested_name,
        };
    }

    if entries.iter().any(|e| e.size == size) {
        CatalogMatch::SizeOnly
    } else {
        CatalogMatch::NotFound
    }
}

/// Normalize a file or entry name for comparison: lowercase, drop
/// characters outside `[A-Za-z0-9_ .\-()[\]]`, collapse whitespace, and
/// strip trailing file extensions. Only extensions of known platforms and
/// common containers count, so `game.v2.gba` keeps its `.v2`. Idempotent.
pub fn normalize_name(name: &str) -> String {
    let filtered: String = name
        .to_lowercase()
        .chars()
        .filter(|&c| is_name_char(c) || c.is_whitespace())
        .collect();

    let mut normalized = filtered.split_whitespace().collect::<Vec<_>>().join(" ");
    while let Some(stem) = strip_extension(&normalized) {
        normalized = stem.trim_end().to_string();
    }
    normalized
}

fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.' | '(' | ')' | '[' | ']')
}

/// Archive and raw-image extensions that are stripped besides the
/// registry's platform extensions.
const CONTAINER_EXTENSIONS: &[&str] = &["zip", "7z", "rar", "gz", "tar", "chd", "img", "rom"];

/// Strip a trailing `.ext` if it names a file type.
fn strip_extension(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    let is_ext = !systems::candidates_for_extension(ext).is_empty()
        || systems::is_excluded_extension(ext)
        || CONTAINER_EXTENSIONS.contains(&ext);
    is_ext.then_some(stem)
}

/// The entry's name carrying the original file's extension.
pub fn suggested_name(entry_name: &str, original: &str) -> String {
    let Some(orig_ext) = file_extension(original) else {
        return entry_name.to_string();
    };
    // Keep the original's spelling of its extension
    let orig_ext_text = original
        .rsplit_once('.')
        .map_or(orig_ext.as_str(), |(_, ext)| ext);

    match file_extension(entry_name) {
        Some(entry_ext) if entry_ext == orig_ext => entry_name.to_string(),
        Some(entry_ext) => {
            let stem = &entry_name[..entry_name.len() - entry_ext.len() - 1];
            format!("{stem}.{orig_ext_text}")
        }
        None => format!("{entry_name}.{orig_ext_text}"),
    }
}

#[cfg(test)]
#[path = "tests/matcher_tests.rs"]
mod tests;
