use thiserror::Error;

/// Errors returned by [`PulseClient`](crate::PulseClient).
///
/// Only transport-level problems surface here: connection and timeout
/// failures, non-success statuses, and bodies that are not JSON at all. A
/// body that parses as JSON but does not match the expected schema is
/// reported by the client as an absent value, never as an error.
#[derive(Debug, Error)]
pub enum Error {
    /// The base URL could not be parsed or a path could not be joined to it
    #[error("invalid API URL: {0}")]
    Url(#[from] url::ParseError),

    /// The API key contains bytes that cannot be sent in a header
    #[error("API key is not a valid header value")]
    InvalidApiKey,

    /// The underlying HTTP client could not be constructed
    #[error("failed to build HTTP client: {0}")]
    Build(#[from] reqwest::Error),

    /// Connection, TLS or timeout failure
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        source: reqwest::Error,
    },

    /// The API answered with a non-success status
    #[error("unexpected status {status} from {url}")]
    Status {
        status: reqwest::StatusCode,
        url: String,
    },

    /// The response body was not valid JSON
    #[error("malformed JSON from {url}: {source}")]
    MalformedBody {
        url: String,
        source: serde_json::Error,
    },
}
