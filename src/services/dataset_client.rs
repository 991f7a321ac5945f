use crate::core::types::{
    error_message, ColumnStats, DatasetId, Histogram, Row, ServiceReply, UploadReceipt,
};
use reqwest::{multipart, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Failures below the service's own `{ "error": ... }` replies
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid service URL '{0}'")]
    InvalidBaseUrl(String),
    #[error("could not read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(transparent)]
    Http(#[from] reqwest::Error),
    #[error("service answered {status}: {body}")]
    Status { status: StatusCode, body: String },
    #[error("unexpected response body: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The four calls the remote dataset service offers
pub trait DatasetService {
    fn upload(
        &self,
        file: &Path,
    ) -> impl Future<Output = Result<ServiceReply<UploadReceipt>, ClientError>> + Send;

    fn fetch_table(
        &self,
        dataset_id: &DatasetId,
    ) -> impl Future<Output = Result<ServiceReply<Vec<Row>>, ClientError>> + Send;

    fn fetch_stats(
        &self,
        dataset_id: &DatasetId,
        column: &str,
    ) -> impl Future<Output = Result<ServiceReply<ColumnStats>, ClientError>> + Send;

    fn fetch_histogram(
        &self,
        dataset_id: &DatasetId,
        column: &str,
    ) -> impl Future<Output = Result<ServiceReply<Histogram>, ClientError>> + Send;
}

/// HTTP client for the dataset service's JSON API
#[derive(Debug, Clone)]
pub struct HttpDatasetClient {
    http: reqwest::Client,
    base_url: Url,
    histogram_bins: Option<u32>,
}

impl HttpDatasetClient {
    pub fn new(base_url: &str) -> Result<Self, ClientError> {
        Self::builder(base_url).build()
    }

    pub fn builder(base_url: &str) -> HttpDatasetClientBuilder {
        HttpDatasetClientBuilder {
            base_url: base_url.to_string(),
            timeout: None,
            histogram_bins: None,
        }
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// `base_url` joined with percent-encoded path segments
    fn endpoint(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn read_reply<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<ServiceReply<T>, ClientError> {
        let status = response.status();
        let body = response.text().await?;
        debug!("{} ({} bytes)", status, body.len());

        if !status.is_success() {
            // Error replies keep their message even on a non-2xx status
            return match serde_json::from_str::<Value>(&body).ok().as_ref().and_then(error_message) {
                Some(message) => Ok(ServiceReply::Failed(message)),
                None => Err(ClientError::Status { status, body }),
            };
        }

        let value: Value = serde_json::from_str(&body)?;
        Ok(ServiceReply::from_value(value)?)
    }

    async fn get<T: DeserializeOwned>(&self, url: Url) -> Result<ServiceReply<T>, ClientError> {
        debug!("GET {}", url);
        let response = self.http.get(url).send().await?;
        Self::read_reply(response).await
    }
}

impl DatasetService for HttpDatasetClient {
    async fn upload(&self, file: &Path) -> Result<ServiceReply<UploadReceipt>, ClientError> {
        let bytes = tokio::fs::read(file)
            .await
            .map_err(|source| ClientError::ReadFile {
                path: file.to_path_buf(),
                source,
            })?;
        let file_name = file
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("upload.csv")
            .to_string();

        let part = multipart::Part::bytes(bytes)
            .file_name(file_name)
            .mime_str("text/csv")?;
        let form = multipart::Form::new().part("file", part);

        let url = self.endpoint(&["api", "upload"])?;
        debug!("POST {} ({})", url, file.display());
        let response = self.http.post(url).multipart(form).send().await?;
        Self::read_reply(response).await
    }

    async fn fetch_table(
        &self,
        dataset_id: &DatasetId,
    ) -> Result<ServiceReply<Vec<Row>>, ClientError> {
        let url = self.endpoint(&["api", "dataset", dataset_id.as_str(), "table"])?;
        self.get(url).await
    }

    async fn fetch_stats(
        &self,
        dataset_id: &DatasetId,
        column: &str,
    ) -> Result<ServiceReply<ColumnStats>, ClientError> {
        let url = self.endpoint(&["api", "dataset", dataset_id.as_str(), "column", column, "stats"])?;
        self.get(url).await
    }

    async fn fetch_histogram(
        &self,
        dataset_id: &DatasetId,
        column: &str,
    ) -> Result<ServiceReply<Histogram>, ClientError> {
        let mut url =
            self.endpoint(&["api", "dataset", dataset_id.as_str(), "column", column, "hist"])?;
        if let Some(bins) = self.histogram_bins {
            url.query_pairs_mut().append_pair("bins", &bins.to_string());
        }
        self.get(url).await
    }
}

/// Optional knobs for [`HttpDatasetClient`]
#[derive(Debug, Clone)]
pub struct HttpDatasetClientBuilder {
    base_url: String,
    timeout: Option<Duration>,
    histogram_bins: Option<u32>,
}

impl HttpDatasetClientBuilder {
    /// Give up on a request after `timeout`. Without one a hung request waits forever.
    pub fn timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Bucket count sent with histogram requests; the service picks when unset
    pub fn histogram_bins(mut self, bins: Option<u32>) -> Self {
        self.histogram_bins = bins;
        self
    }

    pub fn build(self) -> Result<HttpDatasetClient, ClientError> {
        let base_url = Url::parse(&self.base_url)
            .map_err(|_| ClientError::InvalidBaseUrl(self.base_url.clone()))?;
        if base_url.cannot_be_a_base() {
            return Err(ClientError::InvalidBaseUrl(self.base_url));
        }

        let mut http = reqwest::Client::builder()
            .user_agent(concat!("dsview/", env!("CARGO_PKG_VERSION")));
        if let Some(timeout) = self.timeout {
            http = http.timeout(timeout);
        }

        Ok(HttpDatasetClient {
            http: http.build()?,
            base_url,
            histogram_bins: self.histogram_bins,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_segments() {
        let client = HttpDatasetClient::new("http://127.0.0.1:8000").unwrap();
        let url = client.endpoint(&["api", "dataset", "1", "table"]).unwrap();
        assert_eq!(url.as_str(), "http://127.0.0.1:8000/api/dataset/1/table");
    }

    #[test]
    fn test_endpoint_keeps_base_path_and_encodes_columns() {
        let client = HttpDatasetClient::new("http://localhost:8000/explorer/").unwrap();
        let url = client
            .endpoint(&["api", "dataset", "7", "column", "unit price/usd", "stats"])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/explorer/api/dataset/7/column/unit%20price%2Fusd/stats"
        );
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            HttpDatasetClient::new("not a url"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
        assert!(matches!(
            HttpDatasetClient::new("mailto:someone@example.com"),
            Err(ClientError::InvalidBaseUrl(_))
        ));
    }
}
