//! Checksum engine: CRC32, MD5, and SHA-1 digests of an in-memory buffer.
//!
//! CRC32 is always computed locally. MD5 and SHA-1 go through a
//! [`DigestProvider`] so a runtime without one of the algorithms degrades to
//! a placeholder or the `unavailable` sentinel instead of failing the file.

use sha1::Digest;

/// Sentinel text for a digest that could not be computed.
pub const UNAVAILABLE: &str = "unavailable";

/// Number of leading bytes fed into the placeholder MD5.
const PLACEHOLDER_WINDOW: usize = 1024;

/// One computed digest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DigestValue {
    /// A real digest in hex.
    Hex(String),
    /// Deterministic stand-in for an unsupported MD5. Not a real MD5 and
    /// never matched against a catalog.
    Placeholder(String),
    /// The algorithm failed; excluded from every comparison.
    Unavailable,
}

impl DigestValue {
    /// The hex digest, if this is a real digest.
    pub fn hex(&self) -> Option<&str> {
        match self {
            Self::Hex(h) => Some(h),
            Self::Placeholder(_) | Self::Unavailable => None,
        }
    }

    /// Case-insensitive comparison against a catalog value.
    ///
    /// Only real digests participate. A catalog value that is itself the
    /// `unavailable` sentinel never matches.
    pub fn matches(&self, catalog: Option<&str>) -> bool {
        match (self.hex(), catalog) {
            (Some(ours), Some(theirs)) => {
                !theirs.eq_ignore_ascii_case(UNAVAILABLE)
                    && !ours.is_empty()
                    && ours.eq_ignore_ascii_case(theirs)
            }
            _ => false,
        }
    }
}

impl std::fmt::Display for DigestValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Hex(h) => f.write_str(h),
            Self::Placeholder(p) => write!(f, "{p} (placeholder)"),
            Self::Unavailable => f.write_str(UNAVAILABLE),
        }
    }
}

/// Digests of one input file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDigestSet {
    /// CRC32, 8 uppercase hex digits
    pub crc32: DigestValue,
    /// MD5, lowercase hex
    pub md5: DigestValue,
    /// SHA-1, lowercase hex
    pub sha1: DigestValue,
}

/// Why a digest provider could not produce a value.
#[derive(Debug, Clone, thiserror::Error)]
pub enum DigestFailure {
    #[error("algorithm not supported")]
    Unsupported,

    #[error("{0}")]
    Failed(String),
}

/// Source of MD5 and SHA-1 digests.
pub trait DigestProvider {
    fn sha1(&self, data: &[u8]) -> Result<String, DigestFailure>;

    fn md5(&self, data: &[u8]) -> Result<String, DigestFailure>;
}

/// Digest provider backed by the `sha1` and `md5` crates. Never fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDigests;

impl DigestProvider for NativeDigests {
    fn sha1(&self, data: &[u8]) -> Result<String, DigestFailure> {
        let mut sha = sha1::Sha1::new();
        sha.update(data);
        Ok(format!("{:x}", sha.finalize()))
    }

    fn md5(&self, data: &[u8]) -> Result<String, DigestFailure> {
        Ok(format!("{:x}", md5::compute(data)))
    }
}

/// CRC-32 (reflected, polynomial 0xEDB88320) as 8 uppercase hex digits.
pub fn crc32_hex(data: &[u8]) -> String {
    format!("{:08X}", crc32fast::hash(data))
}

/// Rolling multiplicative hash over the first 1024 bytes, widened to 32
/// hex characters by repetition.
pub fn placeholder_md5(data: &[u8]) -> String {
    let h = data
        .iter()
        .take(PLACEHOLDER_WINDOW)
        .fold(0u32, |h, &b| h.wrapping_mul(31).wrapping_add(b as u32));
    format!("{h:08x}").repeat(4)
}

/// Compute all three digests of `data`.
pub fn digest(data: &[u8], provider: &dyn DigestProvider) -> FileDigestSet {
    let md5 = match provider.md5(data) {
        Ok(h) => DigestValue::Hex(h.to_lowercase()),
        Err(DigestFailure::Unsupported) => {
            log::debug!("MD5 not supported by digest provider, using placeholder");
            DigestValue::Placeholder(placeholder_md5(data))
        }
        Err(DigestFailure::Failed(e)) => {
            log::warn!("MD5 failed: {e}");
            DigestValue::Unavailable
        }
    };

    let sha1 = match provider.sha1(data) {
        Ok(h) => DigestValue::Hex(h.to_lowercase()),
        Err(e) => {
            log::warn!("SHA-1 unavailable: {e}");
            DigestValue::Unavailable
        }
    };

    FileDigestSet {
        crc32: DigestValue::Hex(crc32_hex(data)),
        md5,
        sha1,
    }
}

/// Compute all three digests with the native provider.
pub fn digest_native(data: &[u8]) -> FileDigestSet {
    digest(data, &NativeDigests)
}

#[cfg(test)]
#[path = "tests/hasher_tests.rs"]
mod tests;
