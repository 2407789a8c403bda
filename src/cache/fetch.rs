use super::{AssetRequest, AssetResponse};
use crate::errors::{AppError, AppResult};
use reqwest::Method;
use std::future::Future;
use std::time::Duration;

/// The network side of the asset cache.
pub trait Fetcher: Send + Sync + 'static {
    fn fetch(&self, request: &AssetRequest)
    -> impl Future<Output = AppResult<AssetResponse>> + Send;
}

/// Fetches assets over HTTP(S).
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    pub fn new() -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::NetworkUnavailable(e.to_string()))?;
        Ok(Self { client })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &AssetRequest) -> AppResult<AssetResponse> {
        let method = Method::from_bytes(request.method.as_bytes())
            .map_err(|e| AppError::Other(format!("invalid method {}: {}", request.method, e)))?;

        let response = self
            .client
            .request(method, request.url.clone())
            .send()
            .await
            .map_err(|e| AppError::NetworkUnavailable(format!("{}: {}", request.url, e)))?;

        let status = response.status().as_u16();
        let headers = response
            .headers()
            .iter()
            .filter_map(|(k, v)| {
                v.to_str()
                    .ok()
                    .map(|v| (k.as_str().to_string(), v.to_string()))
            })
            .collect();
        let body = response
            .bytes()
            .await
            .map_err(|e| AppError::NetworkUnavailable(format!("{}: {}", request.url, e)))?
            .to_vec();

        Ok(AssetResponse {
            status,
            headers,
            body,
        })
    }
}
