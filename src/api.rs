use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::FeedConfig;
use crate::error::{FeedError, FeedResult};
use crate::types::{MediaBatch, MediaItem};

/// Anything that can list the account's recent media.
#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
pub trait MediaSource {
    async fn fetch_media(&self, credential: &str, limit: u32) -> FeedResult<MediaBatch>;
}

/// Instagram Graph `me/media` listing over reqwest.
#[derive(Debug, Clone)]
pub struct GraphClient {
    http: reqwest::Client,
    endpoint: Url,
    fields: String,
    timeout: Option<Duration>,
}

impl GraphClient {
    pub fn new(config: &FeedConfig) -> FeedResult<Self> {
        let endpoint = Url::parse(&config.endpoint)?;
        Ok(Self {
            http: build_http()?,
            endpoint,
            fields: config.fields.join(","),
            timeout: config.fetch_timeout(),
        })
    }

    pub fn media_url(&self, credential: &str, limit: u32) -> Url {
        let mut url = self.endpoint.clone();
        url.query_pairs_mut()
            .append_pair("fields", &self.fields)
            .append_pair("access_token", credential)
            .append_pair("limit", &limit.to_string());
        url
    }

    fn classify(&self, e: reqwest::Error) -> FeedError {
        match self.timeout {
            Some(t) if e.is_timeout() => FeedError::Timeout(t),
            _ => FeedError::Transport(e),
        }
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn build_http() -> FeedResult<reqwest::Client> {
    Ok(reqwest::Client::builder().user_agent(concat!("folio/", env!("CARGO_PKG_VERSION"))).build()?)
}

#[cfg(target_arch = "wasm32")]
fn build_http() -> FeedResult<reqwest::Client> {
    Ok(reqwest::Client::new())
}

#[cfg_attr(not(target_arch = "wasm32"), async_trait)]
#[cfg_attr(target_arch = "wasm32", async_trait(?Send))]
impl MediaSource for GraphClient {
    async fn fetch_media(&self, credential: &str, limit: u32) -> FeedResult<MediaBatch> {
        let url = self.media_url(credential, limit);
        debug!(endpoint = %self.endpoint, limit, "fetching media");

        #[allow(unused_mut)]
        let mut request = self.http.get(url);
        #[cfg(not(target_arch = "wasm32"))]
        if let Some(t) = self.timeout {
            request = request.timeout(t);
        }

        let response = request.send().await.map_err(|e| self.classify(e))?;
        let status = response.status();
        if !status.is_success() {
            return Err(FeedError::Api { status: status.as_u16() });
        }
        let body = response.bytes().await.map_err(|e| self.classify(e))?;
        decode_batch(&body)
    }
}

/// Items from the `data` array. A missing or non-array `data` is an empty batch;
/// entries that are not renderable records are skipped.
pub fn decode_batch(body: &[u8]) -> FeedResult<MediaBatch> {
    let value: Value = serde_json::from_slice(body)?;
    let Some(Value::Array(raw)) = value.get("data") else {
        debug!("response carries no data array");
        return Ok(Vec::new());
    };
    Ok(raw
        .iter()
        .filter_map(|entry| match MediaItem::deserialize(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                debug!(error = %e, "skipping undecodable media entry");
                None
            }
        })
        .collect())
}
