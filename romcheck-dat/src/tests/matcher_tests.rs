use super::*;
use crate::hasher::{DigestValue, digest_native};

fn entry(name: &str, size: u64, crc32: Option<&str>) -> Arc<ReferenceEntry> {
    Arc::new(ReferenceEntry {
        name: name.to_string(),
        size,
        md5: None,
        sha1: None,
        crc32: crc32.map(String::from),
        platform: None,
        region: None,
        description: None,
    })
}

fn digests_with_crc(crc: &str) -> FileDigestSet {
    FileDigestSet {
        crc32: DigestValue::Hex(crc.to_string()),
        md5: DigestValue::Unavailable,
        sha1: DigestValue::Unavailable,
    }
}

#[test]
fn test_renamed_when_names_differ() {
    let entries = vec![entry("Foo (USA).gba", 4, Some("ABCD1234"))];
    let result = match_file("foo.gba", 4, &digests_with_crc("abcd1234"), &entries);

    let CatalogMatch::Found { entry, method, suggested_name } = result else {
        panic!("expected a match");
    };
    assert_eq!(entry.name, "Foo (USA).gba");
    assert_eq!(method, MatchMethod::Crc32);
    assert_eq!(suggested_name.as_deref(), Some("Foo (USA).gba"));
}

#[test]
fn test_valid_when_names_normalize_equal() {
    let entries = vec![entry("Foo (USA).gba", 4, Some("ABCD1234"))];
    let result = match_file("FOO  (usa).GBA", 4, &digests_with_crc("ABCD1234"), &entries);
    let CatalogMatch::Found { suggested_name, .. } = result else {
        panic!("expected a match");
    };
    assert_eq!(suggested_name, None);
}

#[test]
fn test_version_suffix_is_not_an_extension() {
    let entries = vec![entry("game.gba", 4, Some("ABCD1234"))];
    let result = match_file("game.v2.gba", 4, &digests_with_crc("ABCD1234"), &entries);
    let CatalogMatch::Found { suggested_name, .. } = result else {
        panic!("expected a match");
    };
    assert_eq!(suggested_name.as_deref(), Some("game.gba"));
}

#[test]
fn test_first_matching_entry_wins() {
    let entries = vec![
        entry("Other.gba", 4, Some("00000000")),
        entry("First.gba", 4, Some("ABCD1234")),
        entry("Second.gba", 4, Some("ABCD1234")),
    ];
    let result = match_file("First.gba", 4, &digests_with_crc("ABCD1234"), &entries);
    let CatalogMatch::Found { entry, .. } = result else {
        panic!("expected a match");
    };
    assert_eq!(entry.name, "First.gba");
}

#[test]
fn test_sha1_preferred_over_crc_for_method() {
    let data = b"abc";
    let digests = digest_native(data);
    let e = ReferenceEntry {
        name: "abc.bin".into(),
        size: 3,
        md5: None,
        sha1: Some("A9993E364706816ABA3E25717850C26C9CD0D89D".into()),
        crc32: Some("352441c2".into()),
        platform: None,
        region: None,
        description: None,
    };
    assert_eq!(digest_match(&e, &digests), Some(MatchMethod::Sha1));
}

#[test]
fn test_size_only_and_not_found() {
    let entries = vec![entry("Foo.gba", 4, Some("11111111"))];
    let digests = digests_with_crc("22222222");

    let size_only = match_file("foo.gba", 4, &digests, &entries);
    assert!(matches!(size_only, CatalogMatch::SizeOnly));
    assert_eq!(size_only.issue(), Some(SIZE_MATCH_ISSUE));

    let none = match_file("foo.gba", 5, &digests, &entries);
    assert!(matches!(none, CatalogMatch::NotFound));
    assert_eq!(none.issue(), Some(NO_MATCH_ISSUE));
}

#[test]
fn test_empty_collection_is_not_found() {
    let result = match_file("foo.gba", 0, &digests_with_crc("00000000"), &[]);
    assert!(matches!(result, CatalogMatch::NotFound));
}

#[test]
fn test_unavailable_never_matches_catalog_sentinel() {
    let entries = vec![Arc::new(ReferenceEntry {
        name: "x.gba".into(),
        size: 1,
        md5: Some("unavailable".into()),
        sha1: Some("unavailable".into()),
        crc32: None,
        platform: None,
        region: None,
        description: None,
    })];
    let digests = FileDigestSet {
        crc32: DigestValue::Hex("00000000".into()),
        md5: DigestValue::Unavailable,
        sha1: DigestValue::Unavailable,
    };
    assert!(!match_file("x.gba", 1, &digests, &entries).is_found());
}

#[test]
fn test_normalize_name() {
    assert_eq!(normalize_name("Foo (USA).gba"), "foo (usa)");
    assert_eq!(normalize_name("foo.gba"), "foo");
    assert_eq!(normalize_name("  Foo\t Bar  [!].zip "), "foo bar []");
    assert_eq!(normalize_name("Pokémon: Red!"), "pokmon red");
    assert_eq!(normalize_name("Super Mario Bros. 3"), "super mario bros. 3");
    assert_eq!(normalize_name("Game v1.1"), "game v1.1");
    assert_eq!(normalize_name("game.tar.gz"), "game");
    assert_eq!(normalize_name("game.v2.gba"), "game.v2");
    assert_eq!(normalize_name("Disc.1.iso"), "disc.1");
}

#[test]
fn test_normalize_is_idempotent() {
    for name in [
        "Foo (USA).gba",
        "  Foo\t Bar  [!].zip ",
        "a .gb",
        "Game.Name.With.Dots.n64",
        "game.v2.gba",
        "hack.nes.gba",
        "Pokémon: Red! .GBA",
        "weird . . sfc",
        "",
    ] {
        let once = normalize_name(name);
        assert_eq!(normalize_name(&once), once, "not idempotent for {name:?}");
    }
}

#[test]
fn test_suggested_name() {
    assert_eq!(suggested_name("Foo (USA).gba", "foo.gba"), "Foo (USA).gba");
    assert_eq!(suggested_name("Foo (USA).gba", "foo.GBA"), "Foo (USA).gba");
    assert_eq!(suggested_name("Foo (USA).bin", "foo.iso"), "Foo (USA).iso");
    assert_eq!(suggested_name("Foo (USA)", "foo.md"), "Foo (USA).md");
    assert_eq!(suggested_name("Foo (USA).z64", "foo"), "Foo (USA).z64");
}
