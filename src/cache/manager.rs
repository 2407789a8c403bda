use super::fetch::Fetcher;
use super::storage::{CacheStorage, GenerationInfo};
use super::{AssetRequest, AssetResponse, ResponseSource, Served};
use crate::errors::{AppError, AppResult};
use futures::future::try_join_all;
use parking_lot::Mutex;
use std::sync::Arc;
use tokio::task::JoinHandle;
use url::Url;

type Revalidation = JoinHandle<AppResult<AssetResponse>>;

pub struct AssetCache<F: Fetcher> {
    storage: CacheStorage,
    fetcher: Arc<F>,
    generation: String,
    origin: Url,
    manifest: Vec<String>,
    pending: Mutex<Vec<Revalidation>>,
}

impl<F: Fetcher> AssetCache<F> {
    pub fn new(
        storage: CacheStorage,
        fetcher: F,
        generation: &str,
        origin: &str,
        manifest: Vec<String>,
    ) -> AppResult<Self> {
        let origin = Url::parse(origin)
            .map_err(|e| AppError::Config(format!("invalid cache origin '{}': {}", origin, e)))?;
        Ok(Self {
            storage,
            fetcher: Arc::new(fetcher),
            generation: generation.to_string(),
            origin,
            manifest,
            pending: Mutex::new(Vec::new()),
        })
    }

    pub fn generation(&self) -> &str {
        &self.generation
    }

    pub fn storage(&self) -> &CacheStorage {
        &self.storage
    }

    /// GET request for `path`, resolved against the configured origin.
    pub fn request_for(&self, path: &str) -> AppResult<AssetRequest> {
        let url = self
            .origin
            .join(path)
            .map_err(|e| AppError::Config(format!("invalid asset path '{}': {}", path, e)))?;
        Ok(AssetRequest::get(url))
    }

    pub fn manifest_requests(&self) -> AppResult<Vec<AssetRequest>> {
        self.manifest.iter().map(|p| self.request_for(p)).collect()
    }

    /// Fetch every manifest asset and store them all under the current
    /// generation. A single failed fetch fails the install and nothing is
    /// committed.
    pub async fn install(&self) -> AppResult<usize> {
        let requests = self.manifest_requests()?;

        let fetches = requests.into_iter().map(|request| async move {
            let response = self.fetcher.fetch(&request).await?;
            if !response.is_success() {
                return Err(AppError::NetworkUnavailable(format!(
                    "{} returned status {}",
                    request.url, response.status
                )));
            }
            Ok((request, response))
        });

        let entries = try_join_all(fetches).await?;
        self.storage.put_all(&self.generation, &entries)?;

        tracing::info!(
            generation = %self.generation,
            assets = entries.len(),
            "cache generation installed"
        );
        Ok(entries.len())
    }

    /// Delete every generation other than the current one.
    pub fn activate(&self) -> AppResult<Vec<String>> {
        let deleted = self.storage.delete_generations_except(&self.generation)?;
        for name in &deleted {
            tracing::info!(generation = %name, "stale cache generation deleted");
        }
        Ok(deleted)
    }

    pub fn generations(&self) -> AppResult<Vec<GenerationInfo>> {
        self.storage.generations()
    }

    /// Stale-while-revalidate lookup.
    ///
    /// A network fetch always starts; a successful response is written into
    /// the current generation in the background. A cache hit is returned
    /// without waiting for it; a miss resolves to whatever the network
    /// produces.
    pub async fn handle_request(&self, request: AssetRequest) -> AppResult<Served> {
        let network = self.spawn_fetch(request.clone());

        let cached = if request.is_cacheable() {
            self.storage
                .match_request(&self.generation, &request)
                .unwrap_or_else(|e| {
                    tracing::warn!(url = %request.url, error = %e, "cache lookup failed");
                    None
                })
        } else {
            None
        };

        if let Some(response) = cached {
            tracing::debug!(url = %request.url, "cache hit");
            let mut pending = self.pending.lock();
            pending.retain(|h| !h.is_finished());
            pending.push(network);
            drop(pending);
            return Ok(Served {
                response,
                source: ResponseSource::Cache,
            });
        }

        tracing::debug!(url = %request.url, "cache miss");
        let response = network
            .await
            .map_err(|e| AppError::Other(format!("fetch task failed: {}", e)))??;
        Ok(Served {
            response,
            source: ResponseSource::Network,
        })
    }

    fn spawn_fetch(&self, request: AssetRequest) -> Revalidation {
        let fetcher = Arc::clone(&self.fetcher);
        let storage = self.storage.clone();
        let generation = self.generation.clone();

        tokio::spawn(async move {
            let result = fetcher.fetch(&request).await;
            match &result {
                Ok(response) if response.is_success() && request.is_cacheable() => {
                    // rusqlite blocks; keep it off the async worker
                    let (req, resp) = (request.clone(), response.clone());
                    let stored = tokio::task::spawn_blocking(move || {
                        storage.put(&generation, &req, &resp)
                    })
                    .await;
                    match stored {
                        Ok(Ok(())) => {}
                        Ok(Err(e)) => {
                            tracing::warn!(url = %request.url, error = %e, "cache refresh failed")
                        }
                        Err(e) => {
                            tracing::warn!(url = %request.url, error = %e, "cache refresh task failed")
                        }
                    }
                }
                Ok(response) => {
                    tracing::debug!(url = %request.url, status = response.status, "response not cached");
                }
                Err(e) => {
                    tracing::debug!(url = %request.url, error = %e, "network fetch failed");
                }
            }
            result
        })
    }

    /// Background revalidations still tracked. Finished ones are dropped
    /// whenever a new one is queued.
    pub fn pending_revalidations(&self) -> usize {
        self.pending.lock().len()
    }

    /// Wait for every background revalidation started by a cache hit.
    /// Returns how many refreshed their entry.
    pub async fn settle(&self) -> usize {
        let pending: Vec<Revalidation> = std::mem::take(&mut *self.pending.lock());

        let mut refreshed = 0;
        for handle in pending {
            if let Ok(Ok(response)) = handle.await
                && response.is_success()
            {
                refreshed += 1;
            }
        }
        refreshed
    }
}
