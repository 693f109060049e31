use super::*;

#[test]
fn canonical_names_round_trip() {
    for &platform in Platform::all() {
        let parsed: Platform = platform.short_name().parse().unwrap();
        assert_eq!(parsed, platform, "round-trip failed for {:?}", platform);
    }
}

#[test]
fn aliases_resolve_correctly() {
    let cases = [
        ("gc", Platform::GameCube),
        ("ds", Platform::Ds),
        ("gg", Platform::GameGear),
        ("psx", Platform::Ps1),
        ("sfc", Platform::Snes),
        ("mega drive", Platform::Genesis),
        ("gbc", Platform::GameBoyColor),
        ("download play", Platform::DsDownloadPlay),
        ("dc", Platform::Dreamcast),
        ("n3ds", Platform::N3ds),
        ("tg16", Platform::PcEngine),
        ("ogxbox", Platform::Xbox),
        ("mark iii", Platform::MasterSystem),
    ];
    for (input, expected) in cases {
        let parsed: Platform = input.parse().unwrap();
        assert_eq!(parsed, expected, "alias '{}' should parse to {:?}", input, expected);
    }
}

#[test]
fn case_insensitive_parsing() {
    let parsed: Platform = "SNES".parse().unwrap();
    assert_eq!(parsed, Platform::Snes);
    let parsed: Platform = " GameCube ".parse().unwrap();
    assert_eq!(parsed, Platform::GameCube);
}

#[test]
fn unknown_string_returns_err() {
    let result: Result<Platform, _> = "commodore64".parse();
    assert!(result.is_err());
}

#[test]
fn short_name_is_first_alias() {
    for &platform in Platform::all() {
        assert_eq!(
            platform.short_name(),
            platform.aliases()[0],
            "short_name should be first alias for {:?}",
            platform,
        );
    }
}

#[test]
fn aliases_are_unique_across_platforms() {
    let mut seen = std::collections::HashSet::new();
    for &platform in Platform::all() {
        for alias in platform.aliases() {
            assert!(seen.insert(*alias), "alias '{}' is used twice", alias);
        }
    }
}

#[test]
fn serializes_as_short_name() {
    let json = serde_json::to_string(&Platform::Gba).unwrap();
    assert_eq!(json, "\"gba\"");
    let back: Platform = serde_json::from_str("\"psx\"").unwrap();
    assert_eq!(back, Platform::Ps1);
    assert!(serde_json::from_str::<Platform>("\"amiga\"").is_err());
}

#[test]
fn display_returns_display_name() {
    assert_eq!(Platform::Snes.to_string(), "Super Nintendo Entertainment System");
    assert_eq!(Platform::DsDownloadPlay.to_string(), "Nintendo DS (Download Play)");
}
