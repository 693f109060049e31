/// Platform identifiers for every system that has a reference catalog.
///
/// This enum holds platform identity (short names, display names,
/// manufacturer, and aliases) in one place. Catalog entries, cache keys,
/// and classifier results all carry a `Platform` rather than a string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[derive(serde::Serialize, serde::Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Platform {
    // Nintendo
    Nes,
    Snes,
    N64,
    GameBoy,
    GameBoyColor,
    Gba,
    Ds,
    Dsi,
    DsDownloadPlay,
    N3ds,
    VirtualBoy,
    GameCube,
    Wii,

    // Sega
    Sg1000,
    MasterSystem,
    Genesis,
    GameGear,
    Sega32x,
    SegaCd,
    Saturn,
    Dreamcast,

    // Sony
    Ps1,
    Ps2,
    Psp,

    // NEC
    PcEngine,
    PcEngineCd,

    // Atari
    Atari2600,
    Atari7800,
    Lynx,

    // SNK
    NeoGeoPocket,
    NeoGeoPocketColor,

    // Bandai
    WonderSwan,
    WonderSwanColor,

    // Microsoft
    Xbox,
}

/// All platform variants in registration order.
const ALL_PLATFORMS: &[Platform] = &[
    Platform::Nes,
    Platform::Snes,
    Platform::N64,
    Platform::GameBoy,
    Platform::GameBoyColor,
    Platform::Gba,
    Platform::Ds,
    Platform::Dsi,
    Platform::DsDownloadPlay,
    Platform::N3ds,
    Platform::VirtualBoy,
    Platform::GameCube,
    Platform::Wii,
    Platform::Sg1000,
    Platform::MasterSystem,
    Platform::Genesis,
    Platform::GameGear,
    Platform::Sega32x,
    Platform::SegaCd,
    Platform::Saturn,
    Platform::Dreamcast,
    Platform::Ps1,
    Platform::Ps2,
    Platform::Psp,
    Platform::PcEngine,
    Platform::PcEngineCd,
    Platform::Atari2600,
    Platform::Atari7800,
    Platform::Lynx,
    Platform::NeoGeoPocket,
    Platform::NeoGeoPocketColor,
    Platform::WonderSwan,
    Platform::WonderSwanColor,
    Platform::Xbox,
];

impl Platform {
    /// Canonical short name used for CLI arguments, cache keys, and settings.
    pub fn short_name(&self) -> &'static str {
        match self {
            Self::Nes => "nes",
            Self::Snes => "snes",
            Self::N64 => "n64",
            Self::GameBoy => "gb",
            Self::GameBoyColor => "gbc",
            Self::Gba => "gba",
            Self::Ds => "nds",
            Self::Dsi => "dsi",
            Self::DsDownloadPlay => "nds-download",
            Self::N3ds => "3ds",
            Self::VirtualBoy => "vb",
            Self::GameCube => "gamecube",
            Self::Wii => "wii",
            Self::Sg1000 => "sg1000",
            Self::MasterSystem => "sms",
            Self::Genesis => "genesis",
            Self::GameGear => "gamegear",
            Self::Sega32x => "32x",
            Self::SegaCd => "segacd",
            Self::Saturn => "saturn",
            Self::Dreamcast => "dreamcast",
            Self::Ps1 => "ps1",
            Self::Ps2 => "ps2",
            Self::Psp => "psp",
            Self::PcEngine => "pce",
            Self::PcEngineCd => "pcecd",
            Self::Atari2600 => "a2600",
            Self::Atari7800 => "a7800",
            Self::Lynx => "lynx",
            Self::NeoGeoPocket => "ngp",
            Self::NeoGeoPocketColor => "ngpc",
            Self::WonderSwan => "ws",
            Self::WonderSwanColor => "wsc",
            Self::Xbox => "xbox",
        }
    }

    /// Full display name for the platform.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Nes => "Nintendo Entertainment System",
            Self::Snes => "Super Nintendo Entertainment System",
            Self::N64 => "Nintendo 64",
            Self::GameBoy => "Game Boy",
            Self::GameBoyColor => "Game Boy Color",
            Self::Gba => "Game Boy Advance",
            Self::Ds => "Nintendo DS",
            Self::Dsi => "Nintendo DSi",
            Self::DsDownloadPlay => "Nintendo DS (Download Play)",
            Self::N3ds => "Nintendo 3DS",
            Self::VirtualBoy => "Virtual Boy",
            Self::GameCube => "Nintendo GameCube",
            Self::Wii => "Nintendo Wii",
            Self::Sg1000 => "Sega SG-1000",
            Self::MasterSystem => "Sega Master System",
            Self::Genesis => "Sega Genesis / Mega Drive",
            Self::GameGear => "Sega Game Gear",
            Self::Sega32x => "Sega 32X",
            Self::SegaCd => "Sega CD / Mega CD",
            Self::Saturn => "Sega Saturn",
            Self::Dreamcast => "Sega Dreamcast",
            Self::Ps1 => "Sony PlayStation",
            Self::Ps2 => "Sony PlayStation 2",
            Self::Psp => "Sony PlayStation Portable",
            Self::PcEngine => "PC Engine / TurboGrafx-16",
            Self::PcEngineCd => "PC Engine CD / TurboGrafx-CD",
            Self::Atari2600 => "Atari 2600",
            Self::Atari7800 => "Atari 7800",
            Self::Lynx => "Atari Lynx",
            Self::NeoGeoPocket => "Neo Geo Pocket",
            Self::NeoGeoPocketColor => "Neo Geo Pocket Color",
            Self::WonderSwan => "WonderSwan",
            Self::WonderSwanColor => "WonderSwan Color",
            Self::Xbox => "Microsoft Xbox",
        }
    }

    /// Console manufacturer.
    pub fn manufacturer(&self) -> &'static str {
        match self {
            Self::Nes
            | Self::Snes
            | Self::N64
            | Self::GameBoy
            | Self::GameBoyColor
            | Self::Gba
            | Self::Ds
            | Self::Dsi
            | Self::DsDownloadPlay
            | Self::N3ds
            | Self::VirtualBoy
            | Self::GameCube
            | Self::Wii => "Nintendo",

            Self::Sg1000
            | Self::MasterSystem
            | Self::Genesis
            | Self::GameGear
            | Self::Sega32x
            | Self::SegaCd
            | Self::Saturn
            | Self::Dreamcast => "Sega",

            Self::Ps1 | Self::Ps2 | Self::Psp => "Sony",

            Self::PcEngine | Self::PcEngineCd => "NEC",

            Self::Atari2600 | Self::Atari7800 | Self::Lynx => "Atari",

            Self::NeoGeoPocket | Self::NeoGeoPocketColor => "SNK",

            Self::WonderSwan | Self::WonderSwanColor => "Bandai",

            Self::Xbox => "Microsoft",
        }
    }

    /// All accepted names for this platform (case-insensitive matching).
    ///
    /// Includes the canonical short name plus common alternatives accepted
    /// on the command line and in settings files.
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            Self::Nes => &["nes", "famicom", "fc"],
            Self::Snes => &["snes", "sfc", "super famicom", "super nintendo"],
            Self::N64 => &["n64", "nintendo 64", "nintendo64"],
            Self::GameBoy => &["gb", "gameboy", "game boy"],
            Self::GameBoyColor => &["gbc", "gameboy color", "game boy color"],
            Self::Gba => &["gba", "game boy advance", "gameboy advance"],
            Self::Ds => &["nds", "ds", "nintendo ds"],
            Self::Dsi => &["dsi", "nintendo dsi"],
            Self::DsDownloadPlay => &["nds-download", "ds download play", "download play"],
            Self::N3ds => &["3ds", "nintendo 3ds", "n3ds"],
            Self::VirtualBoy => &["vb", "virtual boy", "virtualboy"],
            Self::GameCube => &["gamecube", "gcn", "gc", "ngc"],
            Self::Wii => &["wii"],
            Self::Sg1000 => &["sg1000", "sg-1000"],
            Self::MasterSystem => &["sms", "master system", "mastersystem", "mark iii"],
            Self::Genesis => &["genesis", "megadrive", "mega drive", "md", "gen"],
            Self::GameGear => &["gamegear", "game gear", "gg"],
            Self::Sega32x => &["32x", "sega32x", "sega 32x"],
            Self::SegaCd => &["segacd", "sega cd", "megacd", "mega cd"],
            Self::Saturn => &["saturn", "sega saturn"],
            Self::Dreamcast => &["dreamcast", "dc"],
            Self::Ps1 => &["ps1", "psx", "playstation", "playstation1"],
            Self::Ps2 => &["ps2", "playstation2", "playstation 2"],
            Self::Psp => &["psp", "playstation portable"],
            Self::PcEngine => &["pce", "pc engine", "pcengine", "turbografx", "tg16"],
            Self::PcEngineCd => &["pcecd", "pc engine cd", "turbografx-cd", "tgcd"],
            Self::Atari2600 => &["a2600", "atari 2600", "2600"],
            Self::Atari7800 => &["a7800", "atari 7800", "7800"],
            Self::Lynx => &["lynx", "atari lynx"],
            Self::NeoGeoPocket => &["ngp", "neo geo pocket"],
            Self::NeoGeoPocketColor => &["ngpc", "neo geo pocket color"],
            Self::WonderSwan => &["ws", "wonderswan"],
            Self::WonderSwanColor => &["wsc", "wonderswan color"],
            Self::Xbox => &["xbox", "xbox1", "ogxbox"],
        }
    }

    /// All platform variants.
    pub fn all() -> &'static [Platform] {
        ALL_PLATFORMS
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Error returned when a string cannot be parsed into a `Platform`.
#[derive(Debug, Clone)]
pub struct PlatformParseError(pub String);

impl std::fmt::Display for PlatformParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown platform: '{}'", self.0)
    }
}

impl std::error::Error for PlatformParseError {}

impl std::str::FromStr for Platform {
    type Err = PlatformParseError;

    /// Parse a platform from any recognized name (case-insensitive).
    ///
    /// Matches against `short_name()` and all entries in `aliases()`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lower = s.trim().to_lowercase();
        ALL_PLATFORMS
            .iter()
            .copied()
            .find(|p| p.short_name() == lower || p.aliases().contains(&lower.as_str()))
            .ok_or_else(|| PlatformParseError(s.to_string()))
    }
}

impl TryFrom<String> for Platform {
    type Error = PlatformParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Platform> for String {
    fn from(platform: Platform) -> Self {
        platform.short_name().to_string()
    }
}

#[cfg(test)]
#[path = "tests/platform_tests.rs"]
mod tests;
