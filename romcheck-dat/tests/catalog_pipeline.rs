//! End-to-end: parse a catalog, classify a file, and match its digests.

use std::sync::Arc;

use romcheck_core::{Platform, Region};
use romcheck_dat::hasher::digest_native;
use romcheck_dat::matcher::{self, CatalogMatch};
use romcheck_dat::{Classifier, parse_catalog};

/// An XML catalog listing `data` under its canonical name.
fn catalog_for(data: &[u8]) -> String {
    let digests = digest_native(data);
    format!(
        r#"<?xml version="1.0"?>
<datafile>
    <header><name>Nintendo - Super Nintendo Entertainment System</name></header>
    <game name="Super Mario (USA)">
        <description>Super Mario (USA)</description>
        <rom name="Super Mario (USA).smc" size="{}" crc="{}"/>
    </game>
</datafile>"#,
        data.len(),
        digests.crc32.hex().unwrap().to_lowercase(),
    )
}

#[test]
fn classify_parse_and_match() {
    let data = b"ROM!";
    let filename = "Super Mario (USA).smc";

    let platform = Classifier::default().classify(filename, data.len() as u64);
    assert_eq!(platform, Some(Platform::Snes));
    assert_eq!(Region::from_name(filename), Some(Region::Usa));

    let entries: Vec<_> = parse_catalog(&catalog_for(data), platform)
        .unwrap()
        .into_iter()
        .map(Arc::new)
        .collect();
    assert_eq!(entries[0].crc32.as_deref().map(|c| c.len()), Some(8));

    let digests = digest_native(data);
    match matcher::match_file(filename, data.len() as u64, &digests, &entries) {
        CatalogMatch::Found { entry, suggested_name, .. } => {
            assert_eq!(entry.name, filename);
            assert_eq!(suggested_name, None);
        }
        other => panic!("expected a match, got {other:?}"),
    }

    match matcher::match_file("mario.smc", data.len() as u64, &digests, &entries) {
        CatalogMatch::Found { suggested_name, .. } => {
            assert_eq!(suggested_name.as_deref(), Some(filename));
        }
        other => panic!("expected a rename, got {other:?}"),
    }

    let other = digest_native(b"HACK");
    let miss = matcher::match_file("hack.smc", 4, &other, &entries);
    assert_eq!(miss.issue(), Some(matcher::SIZE_MATCH_ISSUE));
}
