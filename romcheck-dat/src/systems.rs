//! Catalog source registry: where each platform's DAT lives and which
//! platforms a file extension may belong to.

use romcheck_core::{CatalogFamily, Platform};

use crate::cache::SourceKind;

/// Where a catalog document is fetched from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogLocation {
    /// Path relative to the remote catalog base, e.g. `no-intro/Nintendo - Game Boy.dat`.
    Remote(&'static str),
    /// File name inside the bundled asset directory.
    Bundled(&'static str),
}

impl CatalogLocation {
    /// The cache tier tag for documents from this location.
    pub fn source_kind(&self) -> SourceKind {
        match self {
            CatalogLocation::Remote(_) => SourceKind::Remote,
            CatalogLocation::Bundled(_) => SourceKind::Bundled,
        }
    }

    pub fn path(&self) -> &'static str {
        match self {
            CatalogLocation::Remote(p) | CatalogLocation::Bundled(p) => p,
        }
    }
}

/// Mapping from a platform to its reference catalog.
#[derive(Debug, Clone)]
pub struct CatalogSource {
    pub platform: Platform,
    /// Catalog family, used to label matches
    pub family: CatalogFamily,
    /// Tried first
    pub location: CatalogLocation,
    /// Tried only when `location` yields no entries
    pub fallback: Option<CatalogLocation>,
}

const fn remote(platform: Platform, family: CatalogFamily, path: &'static str) -> CatalogSource {
    CatalogSource {
        platform,
        family,
        location: CatalogLocation::Remote(path),
        fallback: None,
    }
}

use CatalogFamily::{NoIntro, Redump};

/// All platforms with a known catalog.
pub static SOURCES: &[CatalogSource] = &[
    remote(Platform::Nes, NoIntro, "no-intro/Nintendo - Nintendo Entertainment System.dat"),
    remote(Platform::Snes, NoIntro, "no-intro/Nintendo - Super Nintendo Entertainment System.dat"),
    remote(Platform::N64, NoIntro, "no-intro/Nintendo - Nintendo 64.dat"),
    remote(Platform::GameBoy, NoIntro, "no-intro/Nintendo - Game Boy.dat"),
    remote(Platform::GameBoyColor, NoIntro, "no-intro/Nintendo - Game Boy Color.dat"),
    remote(Platform::Gba, NoIntro, "no-intro/Nintendo - Game Boy Advance.dat"),
    remote(Platform::Ds, NoIntro, "no-intro/Nintendo - Nintendo DS Decrypted.dat"),
    remote(Platform::Dsi, NoIntro, "no-intro/Nintendo - Nintendo DSi Decrypted.dat"),
    remote(Platform::DsDownloadPlay, NoIntro, "no-intro/Nintendo - Nintendo DS (Download Play).dat"),
    // Encrypted dumps are only covered by the bundled catalog; the public
    // decrypted catalog is the fallback.
    CatalogSource {
        platform: Platform::N3ds,
        family: NoIntro,
        location: CatalogLocation::Bundled("Nintendo - Nintendo 3DS (Encrypted).dat"),
        fallback: Some(CatalogLocation::Remote("no-intro/Nintendo - Nintendo 3DS.dat")),
    },
    remote(Platform::VirtualBoy, NoIntro, "no-intro/Nintendo - Virtual Boy.dat"),
    remote(Platform::GameCube, Redump, "redump/Nintendo - GameCube.dat"),
    remote(Platform::Wii, Redump, "redump/Nintendo - Wii.dat"),
    remote(Platform::Sg1000, NoIntro, "no-intro/Sega - SG-1000.dat"),
    remote(Platform::MasterSystem, NoIntro, "no-intro/Sega - Master System - Mark III.dat"),
    remote(Platform::Genesis, NoIntro, "no-intro/Sega - Mega Drive - Genesis.dat"),
    remote(Platform::GameGear, NoIntro, "no-intro/Sega - Game Gear.dat"),
    remote(Platform::Sega32x, NoIntro, "no-intro/Sega - 32X.dat"),
    remote(Platform::SegaCd, Redump, "redump/Sega - Mega-CD - Sega CD.dat"),
    remote(Platform::Saturn, Redump, "redump/Sega - Saturn.dat"),
    remote(Platform::Dreamcast, Redump, "redump/Sega - Dreamcast.dat"),
    remote(Platform::Ps1, Redump, "redump/Sony - PlayStation.dat"),
    remote(Platform::Ps2, Redump, "redump/Sony - PlayStation 2.dat"),
    remote(Platform::Psp, Redump, "redump/Sony - PlayStation Portable.dat"),
    remote(Platform::PcEngine, NoIntro, "no-intro/NEC - PC Engine - TurboGrafx 16.dat"),
    remote(Platform::PcEngineCd, Redump, "redump/NEC - PC Engine CD - TurboGrafx-CD.dat"),
    remote(Platform::Atari2600, NoIntro, "no-intro/Atari - 2600.dat"),
    remote(Platform::Atari7800, NoIntro, "no-intro/Atari - 7800.dat"),
    remote(Platform::Lynx, NoIntro, "no-intro/Atari - Lynx.dat"),
    remote(Platform::NeoGeoPocket, NoIntro, "no-intro/SNK - Neo Geo Pocket.dat"),
    remote(Platform::NeoGeoPocketColor, NoIntro, "no-intro/SNK - Neo Geo Pocket Color.dat"),
    remote(Platform::WonderSwan, NoIntro, "no-intro/Bandai - WonderSwan.dat"),
    remote(Platform::WonderSwanColor, NoIntro, "no-intro/Bandai - WonderSwan Color.dat"),
    remote(Platform::Xbox, Redump, "redump/Microsoft - Xbox.dat"),
];

/// Size-variable disc image extension (DVD/UMD/GameCube-class media).
pub const DISC_IMAGE_EXTENSION: &str = "iso";

/// CD image extension, shared with raw cartridge dumps.
pub const CD_IMAGE_EXTENSION: &str = "bin";

/// Extension → ordered candidate platforms. The order is a priority hint.
static EXTENSIONS: &[(&str, &[Platform])] = &[
    ("nes", &[Platform::Nes]),
    ("unf", &[Platform::Nes]),
    ("sfc", &[Platform::Snes]),
    ("smc", &[Platform::Snes]),
    ("z64", &[Platform::N64]),
    ("n64", &[Platform::N64]),
    ("v64", &[Platform::N64]),
    ("gb", &[Platform::GameBoy]),
    ("gbc", &[Platform::GameBoyColor]),
    ("gba", &[Platform::Gba]),
    ("nds", &[Platform::Ds, Platform::Dsi, Platform::DsDownloadPlay]),
    ("dsi", &[Platform::Dsi]),
    ("3ds", &[Platform::N3ds]),
    ("cia", &[Platform::N3ds]),
    ("vb", &[Platform::VirtualBoy]),
    ("gcm", &[Platform::GameCube]),
    ("wbfs", &[Platform::Wii]),
    ("sg", &[Platform::Sg1000]),
    ("sms", &[Platform::MasterSystem]),
    ("md", &[Platform::Genesis]),
    ("gen", &[Platform::Genesis]),
    ("smd", &[Platform::Genesis]),
    ("gg", &[Platform::GameGear]),
    ("32x", &[Platform::Sega32x]),
    ("gdi", &[Platform::Dreamcast]),
    ("cdi", &[Platform::Dreamcast]),
    ("pce", &[Platform::PcEngine]),
    ("a26", &[Platform::Atari2600]),
    ("a78", &[Platform::Atari7800]),
    ("lnx", &[Platform::Lynx]),
    ("ngp", &[Platform::NeoGeoPocket]),
    ("ngc", &[Platform::NeoGeoPocketColor]),
    ("ws", &[Platform::WonderSwan]),
    ("wsc", &[Platform::WonderSwanColor]),
    (
        DISC_IMAGE_EXTENSION,
        &[
            Platform::Ps2,
            Platform::GameCube,
            Platform::Wii,
            Platform::Psp,
            Platform::Ps1,
            Platform::Xbox,
        ],
    ),
    (
        CD_IMAGE_EXTENSION,
        &[
            Platform::Ps1,
            Platform::Genesis,
            Platform::Saturn,
            Platform::SegaCd,
            Platform::PcEngineCd,
        ],
    ),
];

/// Extra platforms tried for disc images after every candidate missed.
static DISC_IMAGE_FALLBACK: &[Platform] = &[
    Platform::Saturn,
    Platform::SegaCd,
    Platform::PcEngineCd,
    Platform::Dreamcast,
];

/// Extra platforms tried for CD images after every candidate missed.
static CD_IMAGE_FALLBACK: &[Platform] = &[
    Platform::Dreamcast,
    Platform::Atari2600,
    Platform::Atari7800,
    Platform::Sega32x,
];

/// Extensions whose canonical catalogs may need the encrypted variant.
pub static ENCRYPTION_PRONE_EXTENSIONS: &[&str] = &["3ds", "cia"];

/// Metadata-only sidecars: never hashed, matched, or reported.
pub static EXCLUDED_EXTENSIONS: &[&str] = &["cue"];

/// Look up the catalog source for a platform.
pub fn source_for(platform: Platform) -> Option<&'static CatalogSource> {
    SOURCES.iter().find(|s| s.platform == platform)
}

/// Ordered candidate platforms for a (lowercase, dot-less) extension.
/// Unknown extensions yield an empty list.
pub fn candidates_for_extension(ext: &str) -> &'static [Platform] {
    EXTENSIONS
        .iter()
        .find(|(e, _)| e.eq_ignore_ascii_case(ext))
        .map(|&(_, platforms)| platforms)
        .unwrap_or(&[])
}

/// Cross-format fallback platforms for an extension (empty for most).
pub fn fallback_platforms(ext: &str) -> &'static [Platform] {
    if ext.eq_ignore_ascii_case(DISC_IMAGE_EXTENSION) {
        DISC_IMAGE_FALLBACK
    } else if ext.eq_ignore_ascii_case(CD_IMAGE_EXTENSION) {
        CD_IMAGE_FALLBACK
    } else {
        &[]
    }
}

/// All extensions that list `platform` as a candidate.
pub fn extensions_for(platform: Platform) -> Vec<&'static str> {
    EXTENSIONS
        .iter()
        .filter(|(_, platforms)| platforms.contains(&platform))
        .map(|&(ext, _)| ext)
        .collect()
}

pub fn is_encryption_prone(ext: &str) -> bool {
    ENCRYPTION_PRONE_EXTENSIONS
        .iter()
        .any(|e| e.eq_ignore_ascii_case(ext))
}

pub fn is_excluded_extension(ext: &str) -> bool {
    EXCLUDED_EXTENSIONS.iter().any(|e| e.eq_ignore_ascii_case(ext))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_platform_has_a_source() {
        for &platform in Platform::all() {
            assert!(source_for(platform).is_some(), "no source for {platform:?}");
        }
    }

    #[test]
    fn test_candidates_always_a_list() {
        assert_eq!(candidates_for_extension("gba"), &[Platform::Gba]);
        assert_eq!(candidates_for_extension("GBA"), &[Platform::Gba]);
        assert_eq!(candidates_for_extension("nds").len(), 3);
        assert_eq!(candidates_for_extension("nds")[0], Platform::Ds);
        assert!(candidates_for_extension("txt").is_empty());
    }

    #[test]
    fn test_fallbacks_do_not_repeat_candidates() {
        for ext in [DISC_IMAGE_EXTENSION, CD_IMAGE_EXTENSION] {
            let candidates = candidates_for_extension(ext);
            for p in fallback_platforms(ext) {
                assert!(!candidates.contains(p), "{p:?} is both candidate and fallback for .{ext}");
            }
        }
        assert!(fallback_platforms("gba").is_empty());
    }

    #[test]
    fn test_3ds_prefers_bundled_catalog() {
        let src = source_for(Platform::N3ds).unwrap();
        assert_eq!(src.location.source_kind(), SourceKind::Bundled);
        assert_eq!(src.fallback.map(|l| l.source_kind()), Some(SourceKind::Remote));
        assert!(is_encryption_prone("CIA"));
        assert!(!is_encryption_prone("nds"));
    }

    #[test]
    fn test_excluded_extensions() {
        assert!(is_excluded_extension("cue"));
        assert!(is_excluded_extension("CUE"));
        assert!(!is_excluded_extension("bin"));
        assert!(candidates_for_extension("cue").is_empty());
    }

    #[test]
    fn test_extensions_for_platform() {
        assert_eq!(extensions_for(Platform::Snes), vec!["sfc", "smc"]);
        assert!(extensions_for(Platform::Ps2).contains(&"iso"));
    }
}
