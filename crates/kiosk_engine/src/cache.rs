use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use engine_logging::{engine_debug, engine_info, engine_warn};

use crate::decode::decode_image;
use crate::fetch::Fetcher;
use crate::{FailureKind, FetchError, ImageHandle};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CacheError {
    #[error("invalid image url {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("download failed for {url}")]
    DownloadFailed {
        url: String,
        #[source]
        source: FetchError,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryState {
    /// A fetch is in flight. Not visible to [`ImageCache::resolve_many`].
    Pending,
    Ready,
}

#[derive(Debug, Clone)]
enum CacheEntry {
    Pending,
    Ready(ImageHandle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PrefetchSummary {
    pub ready: usize,
    pub failed: usize,
}

/// Append-only URL -> image map for the lifetime of the process.
///
/// Failed downloads leave no entry, so a later request retries from scratch.
/// Two concurrent fetches of the same URL are not coalesced; callers go
/// through [`ImageCache::prefetch_all`], which only ever runs one at a time
/// under the orchestrator's single-flight session.
pub struct ImageCache {
    fetcher: Arc<dyn Fetcher>,
    entries: Mutex<HashMap<String, CacheEntry>>,
}

impl ImageCache {
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self {
            fetcher,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub async fn fetch(&self, url: &str) -> Result<ImageHandle, CacheError> {
        if url.trim().is_empty() {
            engine_warn!("image url is empty");
            return Err(CacheError::InvalidUrl {
                url: url.to_string(),
                reason: "empty url".to_string(),
            });
        }

        if let Some(CacheEntry::Ready(handle)) = self.entries().get(url) {
            engine_debug!("image cache hit ({})", url);
            return Ok(handle.clone());
        }

        engine_info!("downloading image ({})", url);
        self.entries()
            .entry(url.to_string())
            .or_insert(CacheEntry::Pending);

        match self.download(url).await {
            Ok(handle) => {
                self.entries()
                    .insert(url.to_string(), CacheEntry::Ready(handle.clone()));
                engine_info!("downloaded image ({})", url);
                Ok(handle)
            }
            Err(err) => {
                let mut entries = self.entries();
                if matches!(entries.get(url), Some(CacheEntry::Pending)) {
                    entries.remove(url);
                }
                drop(entries);
                engine_warn!("image download failed ({}): {}", url, err);
                if err.kind == FailureKind::InvalidUrl {
                    return Err(CacheError::InvalidUrl {
                        url: url.to_string(),
                        reason: err.message,
                    });
                }
                Err(CacheError::DownloadFailed {
                    url: url.to_string(),
                    source: err,
                })
            }
        }
    }

    /// Fetch every url strictly in order, one at a time. Failures are logged
    /// and skipped; this never fails.
    pub async fn prefetch_all(&self, urls: &[String]) -> PrefetchSummary {
        let mut summary = PrefetchSummary::default();
        if urls.is_empty() {
            return summary;
        }

        engine_info!("prefetching {} images: {}", urls.len(), urls.join(", "));
        for (index, url) in urls.iter().enumerate() {
            engine_debug!("prefetch #{} start", index);
            match self.fetch(url).await {
                Ok(_) => summary.ready += 1,
                Err(err) => {
                    engine_warn!("prefetch #{} skipped: {}", index, err);
                    summary.failed += 1;
                }
            }
        }
        engine_info!(
            "prefetch finished: {} ready, {} failed",
            summary.ready,
            summary.failed
        );
        summary
    }

    /// Ready handles for `urls`, in input order. Uncached urls are omitted.
    pub fn resolve_many(&self, urls: &[String]) -> Vec<ImageHandle> {
        let entries = self.entries();
        urls.iter()
            .filter_map(|url| match entries.get(url) {
                Some(CacheEntry::Ready(handle)) => Some(handle.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn entry_state(&self, url: &str) -> Option<EntryState> {
        self.entries().get(url).map(|entry| match entry {
            CacheEntry::Pending => EntryState::Pending,
            CacheEntry::Ready(_) => EntryState::Ready,
        })
    }

    pub fn ready_count(&self) -> usize {
        self.entries()
            .values()
            .filter(|entry| matches!(entry, CacheEntry::Ready(_)))
            .count()
    }

    async fn download(&self, url: &str) -> Result<ImageHandle, FetchError> {
        let output = self.fetcher.fetch(url).await?;
        decode_image(url, &output.bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, CacheEntry>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
