//! Artifact retrieval from remote blob storage
//!
//! The artifact is fetched exactly once, at startup. A `file://` (or bare
//! path) source is supported for local development and tests; anything with
//! a URL scheme goes through an HTTP client with an explicit timeout so a
//! hung blob store fails startup instead of stalling it forever.

use crate::error::{Result, ScoreboxError};
use std::fmt;
use std::path::PathBuf;
use std::time::Duration;
use tracing::info;

/// Where the artifact bytes come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModelSource {
    Url(String),
    File(PathBuf),
}

impl ModelSource {
    /// Parse an operator-supplied source string.
    ///
    /// `file://` prefixes and scheme-less strings resolve to local paths;
    /// everything else is treated as a URL.
    pub fn parse(location: &str) -> Self {
        if let Some(path) = location.strip_prefix("file://") {
            ModelSource::File(PathBuf::from(path))
        } else if location.contains("://") {
            ModelSource::Url(location.to_string())
        } else {
            ModelSource::File(PathBuf::from(location))
        }
    }

    /// Compose a blob-store URL from endpoint, bucket, and object key
    pub fn from_bucket(endpoint: &str, bucket: &str, key: &str) -> Self {
        ModelSource::Url(format!(
            "{}/{}/{}",
            endpoint.trim_end_matches('/'),
            bucket,
            key
        ))
    }
}

impl fmt::Display for ModelSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelSource::Url(url) => write!(f, "{}", url),
            ModelSource::File(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Fetch the raw artifact bytes from the configured source
pub async fn fetch_artifact_bytes(source: &ModelSource, timeout: Duration) -> Result<Vec<u8>> {
    match source {
        ModelSource::File(path) => {
            let bytes = tokio::fs::read(path).await.map_err(|e| {
                ScoreboxError::FetchError(format!("read {}: {}", path.display(), e))
            })?;
            info!(path = %path.display(), bytes = bytes.len(), "Artifact read from file");
            Ok(bytes)
        }
        ModelSource::Url(url) => {
            let client = reqwest::Client::builder()
                .timeout(timeout)
                .build()
                .map_err(|e| ScoreboxError::FetchError(format!("build HTTP client: {}", e)))?;

            let response = client
                .get(url)
                .send()
                .await
                .map_err(|e| ScoreboxError::FetchError(format!("GET {}: {}", url, e)))?;

            let status = response.status();
            if !status.is_success() {
                return Err(ScoreboxError::FetchError(format!(
                    "GET {} returned {}",
                    url, status
                )));
            }

            let bytes = response
                .bytes()
                .await
                .map_err(|e| ScoreboxError::FetchError(format!("read body of {}: {}", url, e)))?;
            info!(url = %url, bytes = bytes.len(), "Artifact downloaded");
            Ok(bytes.to_vec())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_file_scheme() {
        assert_eq!(
            ModelSource::parse("file:///tmp/model.json"),
            ModelSource::File(PathBuf::from("/tmp/model.json"))
        );
    }

    #[test]
    fn test_parse_bare_path() {
        assert_eq!(
            ModelSource::parse("./model.json"),
            ModelSource::File(PathBuf::from("./model.json"))
        );
    }

    #[test]
    fn test_parse_url() {
        assert_eq!(
            ModelSource::parse("https://blobs.example.com/m/classifier.json"),
            ModelSource::Url("https://blobs.example.com/m/classifier.json".to_string())
        );
    }

    #[test]
    fn test_bucket_composition() {
        let source = ModelSource::from_bucket("https://s3.amazonaws.com/", "models", "clf.json");
        assert_eq!(
            source,
            ModelSource::Url("https://s3.amazonaws.com/models/clf.json".to_string())
        );
    }

    #[tokio::test]
    async fn test_missing_file_is_fetch_error() {
        let source = ModelSource::File(PathBuf::from("/nonexistent/model.json"));
        let err = fetch_artifact_bytes(&source, Duration::from_secs(1))
            .await
            .unwrap_err();
        assert!(matches!(err, ScoreboxError::FetchError(_)));
    }
}
