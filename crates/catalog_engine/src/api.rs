use std::time::Duration;

use catalog_core::{QueryParams, Record, RecordId};
use futures_util::StreamExt;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use tokio_util::sync::CancellationToken;
use url::Url;

use crate::{FailureKind, FetchError};

#[derive(Debug, Clone)]
pub struct ApiSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
}

impl Default for ApiSettings {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000/api".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
        }
    }
}

/// Read side of the games API.
#[async_trait::async_trait]
pub trait GameApi: Send + Sync {
    /// Runs a list query. Resolves to a `Cancelled` error once `cancel` fires.
    async fn fetch_list(
        &self,
        params: &QueryParams,
        cancel: CancellationToken,
    ) -> Result<Vec<Record>, FetchError>;

    /// Genres available for filtering.
    async fn fetch_filter_options(&self) -> Result<Vec<String>, FetchError>;

    async fn fetch_record(&self, id: RecordId) -> Result<Record, FetchError>;
}

/// Every games endpoint wraps its payload in `{"data": ...}`.
#[derive(Deserialize)]
struct Envelope<T> {
    data: T,
}

#[derive(Debug, Clone)]
pub struct ReqwestGameApi {
    settings: ApiSettings,
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestGameApi {
    pub fn new(settings: ApiSettings) -> Result<Self, FetchError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| FetchError::new(FailureKind::InvalidUrl, err.to_string()))?;
        if base_url.cannot_be_a_base() {
            return Err(FetchError::new(
                FailureKind::InvalidUrl,
                format!("{base_url} cannot be used as a base url"),
            ));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| FetchError::new(FailureKind::Network, err.to_string()))?;

        Ok(Self {
            settings,
            base_url,
            client,
        })
    }

    /// Appends `segments` to the base path, e.g. `/api` + `games/genres`.
    pub fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty().extend(segments);
        }
        url
    }

    async fn get_data<T: DeserializeOwned + Send>(&self, url: Url) -> Result<T, FetchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::new(
                FailureKind::HttpStatus(status.as_u16()),
                status.to_string(),
            ));
        }

        if let Some(content_len) = response.content_length() {
            if content_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(content_len),
                    },
                    "response too large",
                ));
            }
        }

        let mut bytes = Vec::new();
        let mut stream = response.bytes_stream();
        while let Some(chunk) = stream.next().await {
            let chunk = chunk.map_err(map_reqwest_error)?;
            let next_len = bytes.len() as u64 + chunk.len() as u64;
            if next_len > self.settings.max_bytes {
                return Err(FetchError::new(
                    FailureKind::TooLarge {
                        max_bytes: self.settings.max_bytes,
                        actual: Some(next_len),
                    },
                    "response too large",
                ));
            }
            bytes.extend_from_slice(&chunk);
        }

        let envelope: Envelope<T> = serde_json::from_slice(&bytes)
            .map_err(|err| FetchError::new(FailureKind::Decode, err.to_string()))?;
        Ok(envelope.data)
    }
}

#[async_trait::async_trait]
impl GameApi for ReqwestGameApi {
    async fn fetch_list(
        &self,
        params: &QueryParams,
        cancel: CancellationToken,
    ) -> Result<Vec<Record>, FetchError> {
        let mut url = self.endpoint(&["games"]);
        let pairs = params.to_query_pairs();
        if !pairs.is_empty() {
            url.query_pairs_mut().extend_pairs(pairs);
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(FetchError::cancelled()),
            result = self.get_data(url) => result,
        }
    }

    async fn fetch_filter_options(&self) -> Result<Vec<String>, FetchError> {
        self.get_data(self.endpoint(&["games", "genres"])).await
    }

    async fn fetch_record(&self, id: RecordId) -> Result<Record, FetchError> {
        let id = id.to_string();
        self.get_data(self.endpoint(&["games", id.as_str()])).await
    }
}

fn map_reqwest_error(err: reqwest::Error) -> FetchError {
    if err.is_timeout() {
        return FetchError::new(FailureKind::Timeout, err.to_string());
    }
    if err.is_decode() {
        return FetchError::new(FailureKind::Decode, err.to_string());
    }
    FetchError::new(FailureKind::Network, err.to_string())
}
