use std::cell::RefCell;
use std::collections::HashMap;

use super::*;

const GBA_DAT: &str = r#"clrmamepro (
	name "Nintendo - Game Boy Advance"
)

game (
	name "Foo (USA)"
	rom ( name "Foo (USA).gba" size 4 crc ABCD1234 )
)
"#;

const N3DS_ENCRYPTED_DAT: &str = r#"game (
	name "Bar (Europe)"
	rom ( name "Bar (Europe).3ds" size 8 crc 00000003 )
)
"#;

/// Serves canned documents and records every request.
#[derive(Default)]
struct FakeFetcher {
    remote: HashMap<String, String>,
    bundled: HashMap<String, String>,
    requests: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn with_remote(mut self, url: &str, body: &str) -> Self {
        self.remote.insert(url.to_string(), body.to_string());
        self
    }

    fn with_bundled(mut self, asset: &str, body: &str) -> Self {
        self.bundled.insert(asset.to_string(), body.to_string());
        self
    }

    fn request_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

impl CatalogFetcher for FakeFetcher {
    async fn fetch_remote(&self, url: &Url) -> Result<String, DatError> {
        self.requests.borrow_mut().push(url.to_string());
        self.remote
            .get(url.as_str())
            .cloned()
            .ok_or_else(|| DatError::HttpStatus {
                status: 404,
                url: url.to_string(),
            })
    }

    async fn fetch_bundled(&self, asset: &str) -> Result<String, DatError> {
        self.requests.borrow_mut().push(format!("bundled:{asset}"));
        self.bundled.get(asset).cloned().ok_or_else(|| {
            DatError::Io(std::io::Error::new(std::io::ErrorKind::NotFound, asset.to_string()))
        })
    }
}

const GBA_URL: &str = "https://example.test/metadat/no-intro/Nintendo%20-%20Game%20Boy%20Advance.dat";
const N3DS_URL: &str = "https://example.test/metadat/no-intro/Nintendo%20-%20Nintendo%203DS.dat";

fn loader(fetcher: FakeFetcher) -> CatalogLoader<FakeFetcher> {
    CatalogLoader::new(fetcher, CacheStore::in_memory(), "https://example.test/metadat").unwrap()
}

#[test]
fn test_remote_url_encodes_segments() {
    let l = loader(FakeFetcher::default());
    let url = l.remote_url("no-intro/Nintendo - Game Boy Advance.dat").unwrap();
    assert_eq!(url.as_str(), GBA_URL);

    let url = l.remote_url("redump/Sony - PlayStation 2.dat").unwrap();
    assert_eq!(
        url.as_str(),
        "https://example.test/metadat/redump/Sony%20-%20PlayStation%202.dat"
    );
}

#[test]
fn test_invalid_remote_base() {
    assert!(CatalogLoader::new(FakeFetcher::default(), CacheStore::in_memory(), "not a url").is_err());
}

#[tokio::test]
async fn test_load_fetches_parses_and_caches() {
    let mut l = loader(FakeFetcher::default().with_remote(GBA_URL, GBA_DAT));

    let entries = l.try_load(Platform::Gba).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Foo (USA).gba");
    assert_eq!(entries[0].platform, Some(Platform::Gba));

    // Second load is served from the cache
    let again = l.load(Platform::Gba).await;
    assert_eq!(again, entries);
    assert_eq!(l.fetcher().request_count(), 1);

    let cached = l.cache().list(Some(SourceKind::Remote)).unwrap();
    assert_eq!(cached.len(), 1);
    assert_eq!(cached[0].key.id, "gba");
}

#[tokio::test]
async fn test_fetch_failure_is_an_error_internally_but_empty_externally() {
    let mut l = loader(FakeFetcher::default());
    let err = l.try_load(Platform::Snes).await.unwrap_err();
    assert!(matches!(err, DatError::HttpStatus { status: 404, .. }));
    assert!(l.load(Platform::Snes).await.is_empty());
}

#[tokio::test]
async fn test_failed_source_is_not_fetched_again() {
    let mut l = loader(FakeFetcher::default());
    assert!(l.load(Platform::Gba).await.is_empty());
    assert!(l.load(Platform::Gba).await.is_empty());

    let err = l.try_load(Platform::Gba).await.unwrap_err();
    assert!(matches!(err, DatError::Unavailable { .. }));
    assert!(err.to_string().contains("HTTP 404"));
    assert_eq!(l.fetcher().request_count(), 1);

    // Nothing about the failure reaches the cache
    assert!(l.cache().list(None).unwrap().is_empty());
}

#[tokio::test]
async fn test_3ds_failed_bundled_is_skipped_on_later_loads() {
    let mut l = loader(FakeFetcher::default());
    assert!(l.load(Platform::N3ds).await.is_empty());
    assert!(l.load(Platform::N3ds).await.is_empty());
    assert_eq!(l.fetcher().request_count(), 2);
}

#[tokio::test]
async fn test_3ds_prefers_bundled_catalog() {
    let fetcher = FakeFetcher::default()
        .with_bundled("Nintendo - Nintendo 3DS (Encrypted).dat", N3DS_ENCRYPTED_DAT)
        .with_remote(N3DS_URL, GBA_DAT);
    let mut l = loader(fetcher);

    let entries = l.load(Platform::N3ds).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Bar (Europe).3ds");
    assert_eq!(
        *l.fetcher().requests.borrow(),
        vec!["bundled:Nintendo - Nintendo 3DS (Encrypted).dat".to_string()]
    );
}

#[tokio::test]
async fn test_3ds_falls_back_to_remote_when_bundled_missing() {
    let remote_3ds = "game (\n\tname \"Baz (USA)\"\n\trom ( name \"Baz (USA).3ds\" size 2 )\n)\n";
    let mut l = loader(FakeFetcher::default().with_remote(N3DS_URL, remote_3ds));

    let entries = l.load(Platform::N3ds).await;
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].name, "Baz (USA).3ds");
    assert_eq!(entries[0].platform, Some(Platform::N3ds));
    assert_eq!(l.fetcher().request_count(), 2);
}

#[tokio::test]
async fn test_3ds_falls_back_when_bundled_is_empty() {
    let fetcher = FakeFetcher::default()
        .with_bundled("Nintendo - Nintendo 3DS (Encrypted).dat", "")
        .with_remote(N3DS_URL, N3DS_ENCRYPTED_DAT);
    let mut l = loader(fetcher);
    assert_eq!(l.load(Platform::N3ds).await.len(), 1);
}

#[tokio::test]
async fn test_load_many_concatenates_in_order() {
    let snes_url = "https://example.test/metadat/no-intro/Nintendo%20-%20Super%20Nintendo%20Entertainment%20System.dat";
    let snes_dat = "game (\n\tname \"S\"\n\trom ( name \"s.sfc\" size 1 )\n)\n";
    let fetcher = FakeFetcher::default()
        .with_remote(GBA_URL, GBA_DAT)
        .with_remote(snes_url, snes_dat);
    let mut l = loader(fetcher);

    let entries = l.load_many(&[Platform::Snes, Platform::Nes, Platform::Gba]).await;
    let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["s.sfc", "Foo (USA).gba"]);
}

#[tokio::test]
async fn test_load_all_tolerates_missing_catalogs() {
    let mut l = loader(FakeFetcher::default().with_remote(GBA_URL, GBA_DAT));
    let entries = l.load_all().await;
    assert_eq!(entries.len(), 1);
    assert!(l.fetcher().request_count() >= SOURCES.len());
}

#[test]
fn test_custom_label() {
    assert_eq!(custom_label("My Hacks.dat"), "Custom - My Hacks");
    assert_eq!(custom_label("/tmp/dats/Translations.XML"), "Custom - Translations");
    assert_eq!(custom_label("notes.txt"), "Custom - notes.txt");
}

#[test]
fn test_import_custom() {
    let mut l = loader(FakeFetcher::default());
    let custom = l.import_custom("My Hacks.dat", GBA_DAT).unwrap();
    assert_eq!(custom.label, "Custom - My Hacks");
    assert_eq!(custom.entries.len(), 1);
    assert_eq!(custom.entries[0].platform, Some(Platform::Gba));
    assert_eq!(custom.header.name.as_deref(), Some("Nintendo - Game Boy Advance"));

    assert_eq!(l.load_custom("Custom - My Hacks").unwrap().len(), 1);
    assert_eq!(l.custom_labels().unwrap(), vec!["Custom - My Hacks".to_string()]);
    assert!(l.load_custom("Custom - Other").is_none());
}

#[test]
fn test_import_custom_rejects_empty_catalog() {
    let mut l = loader(FakeFetcher::default());
    let err = l.import_custom("empty.dat", "clrmamepro (\n)\n").unwrap_err();
    assert!(matches!(err, DatError::EmptyCustomCatalog(ref label) if label == "Custom - empty"));
    assert!(l.custom_labels().unwrap().is_empty());
}
