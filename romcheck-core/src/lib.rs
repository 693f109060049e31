//! Shared vocabulary for romcheck: platform identifiers, regions, and
//! catalog families.

use serde::{Deserialize, Serialize};

pub mod platform;
pub mod region;
pub mod util;

pub use platform::{Platform, PlatformParseError};
pub use region::Region;

/// The family a reference catalog belongs to.
///
/// Both families are mirrored by the LibRetro database on GitHub:
/// - No-Intro DATs for cartridge and handheld systems (`metadat/no-intro/`)
/// - Redump DATs for optical-disc systems (`metadat/redump/`)
///
/// The family only labels a match for the user; it never changes how
/// matching works.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CatalogFamily {
    /// No-Intro DATs (cartridge-based and handheld systems)
    NoIntro,
    /// Redump DATs (disc-based systems)
    Redump,
}

impl CatalogFamily {
    /// Returns a human-readable name for this family.
    pub fn display_name(&self) -> &'static str {
        match self {
            CatalogFamily::NoIntro => "No-Intro",
            CatalogFamily::Redump => "Redump",
        }
    }
}

impl std::fmt::Display for CatalogFamily {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}
