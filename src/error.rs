use thiserror::Error;

/// Failures on the real-data path of a provider.
///
/// Providers catch these and switch to mock data; only the happiness adapter's
/// per-country query hands one back to its caller.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build http client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("GET {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("GET {url} failed with HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
    #[error("malformed response from {url}: {reason}")]
    Malformed { url: String, reason: String },
    #[error("world bank api error: {0}")]
    Api(String),
    #[error("invalid year range {0:?}, expected YYYY or YYYY:YYYY")]
    InvalidRange(String),
    #[error("{endpoint} endpoint not yet implemented")]
    NotImplemented { endpoint: String },
}

impl FetchError {
    pub(crate) fn malformed(url: &str, reason: impl Into<String>) -> Self {
        FetchError::Malformed {
            url: url.to_string(),
            reason: reason.into(),
        }
    }
}
