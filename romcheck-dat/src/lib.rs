//! Catalog (DAT) handling for romcheck: digests, parsing, platform
//! classification, source registry, caching, loading, and matching.

pub mod cache;
pub mod classify;
pub mod dat;
pub mod error;
pub mod hasher;
pub mod loader;
pub mod matcher;
pub mod systems;
mod util;

pub use cache::{CacheKey, CacheStore, CachedCatalog, DirStore, DurableStore, MemoryStore, SourceKind};
pub use classify::{Classifier, ClassifierConfig, SizeBand};
pub use dat::{CatalogHeader, ReferenceEntry, parse_catalog, parse_catalog_header};
pub use error::DatError;
pub use hasher::{DigestProvider, DigestValue, FileDigestSet, NativeDigests};
pub use loader::{CatalogFetcher, CatalogLoader, CustomCatalog, HttpFetcher};
pub use matcher::{CatalogMatch, MatchMethod};
pub use systems::{CatalogLocation, CatalogSource};

pub use reqwest::Url;
