//! Catalog loader: resolve a platform's catalog location, fetch, parse, and
//! cache it.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use romcheck_core::Platform;

use crate::cache::{CacheKey, CacheStore, SourceKind};
use crate::classify::Classifier;
use crate::dat::{self, CatalogHeader, ReferenceEntry};
use crate::error::DatError;
use crate::systems::{self, CatalogLocation, SOURCES};

/// LibRetro mirror of the No-Intro and Redump catalogs.
pub const DEFAULT_REMOTE_BASE: &str =
    "https://raw.githubusercontent.com/libretro/libretro-database/master/metadat/";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(60);

/// Prefix of labels given to user-supplied catalogs.
pub const CUSTOM_LABEL_PREFIX: &str = "Custom - ";

/// Source of raw catalog documents.
#[allow(async_fn_in_trait)]
pub trait CatalogFetcher {
    /// GET a remote catalog document.
    async fn fetch_remote(&self, url: &Url) -> Result<String, DatError>;

    /// Read a bundled catalog asset by file name.
    async fn fetch_bundled(&self, asset: &str) -> Result<String, DatError>;
}

/// Production fetcher: remote catalogs over HTTPS, bundled assets from a
/// local directory.
pub struct HttpFetcher {
    http: reqwest::Client,
    bundled_dir: PathBuf,
}

impl HttpFetcher {
    pub fn new(bundled_dir: impl Into<PathBuf>) -> Result<Self, DatError> {
        let http = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("romcheck/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            http,
            bundled_dir: bundled_dir.into(),
        })
    }

    pub fn bundled_dir(&self) -> &Path {
        &self.bundled_dir
    }
}

impl CatalogFetcher for HttpFetcher {
    async fn fetch_remote(&self, url: &Url) -> Result<String, DatError> {
        log::debug!("GET {url}");
        let resp = self.http.get(url.clone()).send().await?;
        let status = resp.status();
        if !status.is_success() {
            return Err(DatError::HttpStatus {
                status: status.as_u16(),
                url: url.to_string(),
            });
        }
        Ok(resp.text().await?)
    }

    async fn fetch_bundled(&self, asset: &str) -> Result<String, DatError> {
        let path = self.bundled_dir.join(asset);
        log::debug!("Reading bundled catalog {}", path.display());
        Ok(tokio::fs::read_to_string(&path).await?)
    }
}

/// Default directory for bundled catalog assets.
pub fn default_bundled_dir() -> Result<PathBuf, DatError> {
    let base =
        dirs::data_dir().ok_or_else(|| DatError::cache("Could not determine data directory"))?;
    Ok(base.join("romcheck").join("dats"))
}

/// A user-supplied catalog after import.
#[derive(Debug, Clone)]
pub struct CustomCatalog {
    pub label: String,
    pub entries: Vec<Arc<ReferenceEntry>>,
    pub header: CatalogHeader,
}

/// Label for a custom catalog: `Custom - {file stem}`, dropping a `.dat` or
/// `.xml` extension.
pub fn custom_label(filename: &str) -> String {
    let base = Path::new(filename)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(filename);
    let stem = [".dat", ".xml"]
        .iter()
        .find_map(|ext| {
            let cut = base.len().checked_sub(ext.len())?;
            (base.is_char_boundary(cut) && base[cut..].eq_ignore_ascii_case(ext)).then(|| &base[..cut])
        })
        .unwrap_or(base);
    format!("{CUSTOM_LABEL_PREFIX}{stem}")
}

/// Loads reference entries per platform through the cache.
pub struct CatalogLoader<F> {
    fetcher: F,
    cache: CacheStore,
    remote_base: Url,
    classifier: Classifier,
    /// Sources whose fetch or parse failed in this session. Never persisted.
    failed: HashMap<CacheKey, String>,
}

impl<F: CatalogFetcher> CatalogLoader<F> {
    pub fn new(fetcher: F, cache: CacheStore, remote_base: &str) -> Result<Self, DatError> {
        let mut remote_base = Url::parse(remote_base)
            .map_err(|e| DatError::download(format!("invalid remote base '{remote_base}': {e}")))?;
        if !remote_base.path().ends_with('/') {
            let path = format!("{}/", remote_base.path());
            remote_base.set_path(&path);
        }
        Ok(Self {
            fetcher,
            cache,
            remote_base,
            classifier: Classifier::default(),
            failed: HashMap::new(),
        })
    }

    /// Use `classifier` to infer platforms for custom catalogs.
    pub fn with_classifier(mut self, classifier: Classifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn cache(&mut self) -> &mut CacheStore {
        &mut self.cache
    }

    pub fn fetcher(&self) -> &F {
        &self.fetcher
    }

    /// Full URL for a remote catalog path. Each path segment is
    /// percent-encoded independently.
    pub fn remote_url(&self, path: &str) -> Result<Url, DatError> {
        let mut url = self.remote_base.clone();
        url.path_segments_mut()
            .map_err(|_| DatError::download(format!("'{}' cannot be a base URL", self.remote_base)))?
            .pop_if_empty()
            .extend(path.split('/').filter(|s| !s.is_empty()));
        Ok(url)
    }

    /// Load a platform's catalog, reporting fetch and parse failures.
    ///
    /// A platform with a fallback location tries its primary first and only
    /// moves on when the primary yields no entries.
    pub async fn try_load(&mut self, platform: Platform) -> Result<Vec<Arc<ReferenceEntry>>, DatError> {
        let source = systems::source_for(platform)
            .ok_or_else(|| DatError::NoSource(platform.short_name().to_string()))?;

        let Some(fallback) = source.fallback else {
            return self.load_location(platform, source.location).await;
        };

        match self.load_location(platform, source.location).await {
            Ok(entries) if !entries.is_empty() => return Ok(entries),
            Ok(_) => log::debug!("{} catalog for {platform} is empty", source.location.source_kind()),
            Err(e) => log::debug!("{} catalog for {platform} unavailable: {e}", source.location.source_kind()),
        }
        self.load_location(platform, fallback).await
    }

    /// Load a platform's catalog. Failures are logged and yield no entries.
    pub async fn load(&mut self, platform: Platform) -> Vec<Arc<ReferenceEntry>> {
        match self.try_load(platform).await {
            Ok(entries) => entries,
            Err(e) => {
                log::warn!("Failed to load catalog for {platform}: {e}");
                Vec::new()
            }
        }
    }

    /// Concatenated entries of several platforms, in order.
    pub async fn load_many(&mut self, platforms: &[Platform]) -> Vec<Arc<ReferenceEntry>> {
        let mut all = Vec::new();
        for &platform in platforms {
            all.extend(self.load(platform).await);
        }
        all
    }

    /// Concatenated entries of every known platform.
    pub async fn load_all(&mut self) -> Vec<Arc<ReferenceEntry>> {
        let platforms: Vec<Platform> = SOURCES.iter().map(|s| s.platform).collect();
        self.load_many(&platforms).await
    }

    /// Parse a user-supplied catalog and store it under its custom label.
    pub fn import_custom(&mut self, filename: &str, text: &str) -> Result<CustomCatalog, DatError> {
        let label = custom_label(filename);
        let entries: Vec<Arc<ReferenceEntry>> = dat::parse_catalog_with(text, None, &self.classifier)?
            .into_iter()
            .map(Arc::new)
            .collect();
        if entries.is_empty() {
            return Err(DatError::EmptyCustomCatalog(label));
        }
        let header = dat::parse_catalog_header(text).unwrap_or_default();

        let key = CacheKey::new(SourceKind::Custom, label.as_str());
        if let Err(e) = self.cache.put(&key, entries.clone()) {
            log::warn!("Failed to persist custom catalog '{label}': {e}");
        }
        log::debug!("Imported '{label}' with {} entries", entries.len());

        Ok(CustomCatalog {
            label,
            entries,
            header,
        })
    }

    /// Entries of a previously imported custom catalog.
    pub fn load_custom(&mut self, label: &str) -> Option<Vec<Arc<ReferenceEntry>>> {
        self.cache.get(&CacheKey::new(SourceKind::Custom, label))
    }

    /// Labels of all cached custom catalogs.
    pub fn custom_labels(&mut self) -> Result<Vec<String>, DatError> {
        Ok(self
            .cache
            .list(Some(SourceKind::Custom))?
            .into_iter()
            .map(|c| c.key.id)
            .collect())
    }

    async fn load_location(
        &mut self,
        platform: Platform,
        location: CatalogLocation,
    ) -> Result<Vec<Arc<ReferenceEntry>>, DatError> {
        let key = CacheKey::new(location.source_kind(), platform.short_name());
        if let Some(entries) = self.cache.get(&key) {
            return Ok(entries);
        }
        if let Some(reason) = self.failed.get(&key) {
            return Err(DatError::unavailable(key.to_string(), reason.as_str()));
        }
        log::debug!("Cache miss for {key}");

        let entries = match self.fetch_location(platform, location).await {
            Ok(entries) => entries,
            Err(e) => {
                self.failed.insert(key, e.to_string());
                return Err(e);
            }
        };
        log::debug!("Parsed {} entries for {key}", entries.len());

        if let Err(e) = self.cache.put(&key, entries.clone()) {
            log::warn!("Failed to cache catalog {key}: {e}");
        }
        Ok(entries)
    }

    async fn fetch_location(
        &self,
        platform: Platform,
        location: CatalogLocation,
    ) -> Result<Vec<Arc<ReferenceEntry>>, DatError> {
        let text = match location {
            CatalogLocation::Remote(path) => {
                let url = self.remote_url(path)?;
                self.fetcher.fetch_remote(&url).await?
            }
            CatalogLocation::Bundled(asset) => self.fetcher.fetch_bundled(asset).await?,
        };

        Ok(dat::parse_catalog_with(&text, Some(platform), &self.classifier)?
            .into_iter()
            .map(Arc::new)
            .collect())
    }
}

#[cfg(test)]
#[path = "tests/loader_tests.rs"]
mod tests;
