pub(crate) mod cache;
pub(crate) mod classify;
pub(crate) mod config;
pub(crate) mod list;
pub(crate) mod validate;

use std::path::PathBuf;

use romcheck_dat::{CacheStore, CatalogLoader, Classifier, DirStore, HttpFetcher};
use romcheck_lib::{Settings, settings_path};

use crate::CliError;
use crate::cli_types::Cli;

/// Settings plus the global flags that override them.
pub(crate) struct Session {
    pub settings: Settings,
    pub settings_path: PathBuf,
    cache_dir: Option<PathBuf>,
    no_cache: bool,
}

impl Session {
    pub(crate) fn from_cli(cli: &Cli) -> Self {
        let settings_path = cli.config.clone().unwrap_or_else(settings_path);
        let settings = Settings::load_or_default(Some(&settings_path));
        Self {
            settings,
            settings_path,
            cache_dir: cli.cache_dir.clone(),
            no_cache: cli.no_cache,
        }
    }

    pub(crate) fn classifier(&self) -> Classifier {
        Classifier::new(self.settings.classifier.clone())
    }

    pub(crate) fn cache_dir(&self) -> Result<PathBuf, CliError> {
        match &self.cache_dir {
            Some(dir) => Ok(dir.clone()),
            None => Ok(self.settings.cache_dir()?),
        }
    }

    fn cache_store(&self) -> Result<CacheStore, CliError> {
        if self.no_cache {
            return Ok(CacheStore::in_memory());
        }
        let dir = self.cache_dir()?;
        log::debug!("Catalog cache: {}", dir.display());
        Ok(CacheStore::new(Box::new(DirStore::new(dir)), self.settings.ttl()))
    }

    pub(crate) fn loader(&self) -> Result<CatalogLoader<HttpFetcher>, CliError> {
        let fetcher = HttpFetcher::new(self.settings.bundled_dir()?)?;
        let loader = CatalogLoader::new(fetcher, self.cache_store()?, &self.settings.sources.remote_base)?;
        Ok(loader.with_classifier(self.classifier()))
    }
}

/// Single-threaded runtime for catalog downloads and file reads.
pub(crate) fn runtime() -> Result<tokio::runtime::Runtime, CliError> {
    tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|e| CliError::runtime(e.to_string()))
}

/// Parse platform names, accepting "all" for every platform.
pub(crate) fn parse_platforms(names: &[String]) -> Result<Vec<romcheck_lib::Platform>, CliError> {
    if names.iter().any(|n| n.eq_ignore_ascii_case("all")) {
        return Ok(romcheck_lib::Platform::all().to_vec());
    }
    names
        .iter()
        .map(|n| n.parse::<romcheck_lib::Platform>().map_err(|e| CliError::other(format!("{e}"))))
        .collect()
}
