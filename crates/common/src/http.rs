use reqwest::{Client, ClientBuilder, StatusCode};
use serde::Deserialize;
use std::io;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct HttpSettings {
    pub request_timeout_secs: u64,
    pub connect_timeout_secs: u64,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            request_timeout_secs: 30,
            connect_timeout_secs: 10,
        }
    }
}

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} responded with HTTP {status}")]
    Status { url: String, status: StatusCode },

    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl FetchError {
    /// Timeouts, connection failures, bodies cut off mid-stream, 5xx and 429
    /// are worth another attempt. Local file errors and other HTTP statuses
    /// are not.
    pub fn is_transient(&self) -> bool {
        match self {
            FetchError::Request { source, .. } => {
                source.is_timeout()
                    || source.is_connect()
                    || source.is_request()
                    || source.is_body()
                    || source.is_decode()
            }
            FetchError::Status { status, .. } => {
                status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS
            }
            FetchError::Io { .. } => false,
        }
    }
}

/// Where a remote artifact lives: an HTTP(S) URL or a local file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Location {
    Remote(String),
    Local(PathBuf),
}

impl Location {
    pub fn parse(raw: &str) -> Self {
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Location::Remote(raw.to_string())
        } else if let Some(path) = raw.strip_prefix("file://") {
            Location::Local(PathBuf::from(path))
        } else {
            Location::Local(PathBuf::from(raw))
        }
    }
}

impl std::fmt::Display for Location {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Location::Remote(url) => f.write_str(url),
            Location::Local(path) => write!(f, "{}", path.display()),
        }
    }
}

/// Build an HTTP client with request and connect timeouts.
pub fn build_client(settings: &HttpSettings) -> reqwest::Result<Client> {
    ClientBuilder::new()
        .timeout(Duration::from_secs(settings.request_timeout_secs))
        .connect_timeout(Duration::from_secs(settings.connect_timeout_secs))
        .user_agent(concat!("food-classifier/", env!("CARGO_PKG_VERSION")))
        .build()
}

/// Fetch the full body of `location` with a single GET (or file read).
pub async fn fetch_bytes(client: &Client, location: &Location) -> Result<Vec<u8>, FetchError> {
    match location {
        Location::Remote(url) => {
            tracing::debug!(url = %url, "Fetching remote artifact");

            let request_err = |source| FetchError::Request {
                url: url.clone(),
                source,
            };

            let response = client.get(url).send().await.map_err(request_err)?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Status {
                    url: url.clone(),
                    status,
                });
            }

            let body = response.bytes().await.map_err(request_err)?;
            tracing::debug!(url = %url, bytes = body.len(), "Fetched remote artifact");
            Ok(body.to_vec())
        }
        Location::Local(path) => tokio::fs::read(path).await.map_err(|source| FetchError::Io {
            path: path.clone(),
            source,
        }),
    }
}

/// Same as [`fetch_bytes`], decoded as UTF-8 (lossy).
pub async fn fetch_text(client: &Client, location: &Location) -> Result<String, FetchError> {
    let bytes = fetch_bytes(client, location).await?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
