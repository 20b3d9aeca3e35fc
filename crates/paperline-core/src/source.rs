//! Résumé data source with a local cache.
//!
//! The document comes from a URL or a file. A successful load is cached as
//! `{ "data": ..., "timestamp": <unix ms> }` in the cache directory so later
//! runs can skip the network. When every source fails, the configured
//! fallback file and then [`ResumeDocument::fallback`] are used.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::DataConfig;
use crate::document::ResumeDocument;

/// Order in which the cache and the source are consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CacheStrategy {
    /// Fresh cache, then source, then fallbacks.
    #[default]
    CacheFirst,
    /// Source, then cache, then fallbacks.
    NetworkFirst,
    /// Cache or error.
    CacheOnly,
    /// Source or error.
    NetworkOnly,
}

impl fmt::Display for CacheStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CacheStrategy::CacheFirst => "cache-first",
            CacheStrategy::NetworkFirst => "network-first",
            CacheStrategy::CacheOnly => "cache-only",
            CacheStrategy::NetworkOnly => "network-only",
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    data: ResumeDocument,
    timestamp: i64,
}

/// Loads the résumé document according to a [`DataConfig`].
#[derive(Debug, Clone)]
pub struct DataFetcher {
    config: DataConfig,
    cache_dir: PathBuf,
    http: reqwest::Client,
}

impl DataFetcher {
    pub fn new(config: DataConfig, cache_dir: impl Into<PathBuf>) -> Self {
        Self {
            config,
            cache_dir: cache_dir.into(),
            http: reqwest::Client::new(),
        }
    }

    /// Path of the cache entry for the configured key.
    pub fn cache_path(&self) -> PathBuf {
        self.cache_dir.join(format!("{}.json", self.config.cache_key))
    }

    /// Loads the document using the configured strategy.
    ///
    /// `force_refresh` skips the initial cache read for `cache-first` and
    /// the cache fallback for `network-first`. Only the `*-only`
    /// strategies can fail; the others end at the built-in document.
    pub async fn load(&self, force_refresh: bool) -> Result<ResumeDocument> {
        let strategy = self.config.strategy;
        debug!(%strategy, force_refresh, source = %self.config.source, "Loading résumé data");

        match strategy {
            CacheStrategy::CacheOnly => self
                .load_from_cache()
                .with_context(|| format!("No usable cache entry at {}", self.cache_path().display())),
            CacheStrategy::NetworkOnly => {
                let doc = self.load_from_network().await?;
                self.store(&doc);
                Ok(doc)
            }
            CacheStrategy::CacheFirst => {
                if !force_refresh && let Some(doc) = self.load_from_cache() {
                    return Ok(doc);
                }
                match self.load_from_network().await {
                    Ok(doc) => {
                        self.store(&doc);
                        Ok(doc)
                    }
                    Err(e) => {
                        warn!("Failed to load résumé data: {e:#}");
                        Ok(self.last_resort())
                    }
                }
            }
            CacheStrategy::NetworkFirst => match self.load_from_network().await {
                Ok(doc) => {
                    self.store(&doc);
                    Ok(doc)
                }
                Err(e) => {
                    warn!("Failed to load résumé data: {e:#}");
                    if !force_refresh && let Some(doc) = self.load_from_cache() {
                        return Ok(doc);
                    }
                    Ok(self.last_resort())
                }
            },
        }
    }

    /// Fetches the document from the configured source.
    ///
    /// `http://` and `https://` sources are requested; anything else is
    /// read as a file path.
    pub async fn load_from_network(&self) -> Result<ResumeDocument> {
        let source = self.config.source.as_str();
        let body = if is_url(source) {
            self.fetch(source).await?
        } else {
            fs::read_to_string(source).with_context(|| format!("Failed to read {source}"))?
        };

        ResumeDocument::from_json(&body).with_context(|| format!("Invalid résumé data from {source}"))
    }

    async fn fetch(&self, url: &str) -> Result<String> {
        let response = self
            .http
            .get(url)
            .header("accept", "application/json")
            .send()
            .await
            .with_context(|| format!("Request to {url} failed"))?;

        let status = response.status();
        if !status.is_success() {
            bail!("HTTP {} from {url}", status.as_u16());
        }

        response
            .text()
            .await
            .with_context(|| format!("Failed to read response from {url}"))
    }

    /// Returns the cached document if present, valid and not expired.
    ///
    /// Expired or unreadable entries are removed.
    pub fn load_from_cache(&self) -> Option<ResumeDocument> {
        let path = self.cache_path();
        let contents = fs::read_to_string(&path).ok()?;

        let entry = match serde_json::from_str::<CacheEntry>(&contents) {
            Ok(entry) => entry,
            Err(e) => {
                warn!(path = %path.display(), "Discarding unreadable cache entry: {e}");
                remove_quietly(&path);
                return None;
            }
        };

        let age_ms = chrono::Utc::now().timestamp_millis() - entry.timestamp;
        let ttl_ms = i64::try_from(self.config.cache_ttl().as_millis()).unwrap_or(i64::MAX);
        if age_ms > ttl_ms {
            debug!(age_ms, ttl_ms, "Cache entry expired");
            remove_quietly(&path);
            return None;
        }

        if let Err(e) = entry.data.validate() {
            warn!("Discarding invalid cache entry: {e}");
            remove_quietly(&path);
            return None;
        }

        debug!(path = %path.display(), "Using cached résumé data");
        Some(entry.data)
    }

    /// Writes `doc` to the cache with the current timestamp.
    pub fn save_to_cache(&self, doc: &ResumeDocument) -> Result<()> {
        fs::create_dir_all(&self.cache_dir).with_context(|| {
            format!("Failed to create directory {}", self.cache_dir.display())
        })?;

        let entry = CacheEntry {
            data: doc.clone(),
            timestamp: chrono::Utc::now().timestamp_millis(),
        };
        let json = serde_json::to_string(&entry).context("Failed to serialize cache entry")?;

        let path = self.cache_path();
        fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))
    }

    /// Reads the configured fallback file, if any.
    pub fn load_local_fallback(&self) -> Option<ResumeDocument> {
        let path = self.config.fallback.as_deref()?;
        match read_document(path) {
            Ok(doc) => {
                info!(path = %path.display(), "Using local fallback data");
                Some(doc)
            }
            Err(e) => {
                warn!("Failed to load local fallback: {e:#}");
                None
            }
        }
    }

    /// Removes the cache entry. Returns whether one existed.
    pub fn clear_cache(&self) -> Result<bool> {
        let path = self.cache_path();
        match fs::remove_file(&path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e).with_context(|| format!("Failed to remove {}", path.display())),
        }
    }

    fn store(&self, doc: &ResumeDocument) {
        if let Err(e) = self.save_to_cache(doc) {
            warn!("Failed to cache résumé data: {e:#}");
        }
    }

    fn last_resort(&self) -> ResumeDocument {
        self.load_local_fallback().unwrap_or_else(|| {
            info!("Using built-in résumé data");
            ResumeDocument::fallback()
        })
    }
}

fn is_url(source: &str) -> bool {
    source.starts_with("http://") || source.starts_with("https://")
}

fn read_document(path: &Path) -> Result<ResumeDocument> {
    let body =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    ResumeDocument::from_json(&body).with_context(|| format!("Invalid résumé data in {}", path.display()))
}

fn remove_quietly(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        debug!(path = %path.display(), "Failed to remove cache entry: {e}");
    }
}
