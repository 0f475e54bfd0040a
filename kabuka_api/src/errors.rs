//! Error types for the quote page client.

/// Ways a single fetch of the upstream page can fail.
///
/// None of these reach callers of the quote pipeline; the service turns every
/// variant into a synthesized response.
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The underlying HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Build(#[source] reqwest::Error),
    /// The configured base URL did not produce a valid request URL.
    #[error("invalid URL: {0}")]
    Url(String),
    /// Connect, DNS, TLS, timeout, or body read failure.
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),
    /// The upstream answered with something other than 200.
    #[error("request failed with status {status}")]
    HttpStatus { status: u16, body: String },
    /// 200 with nothing in it.
    #[error("empty response body (status {status})")]
    EmptyBody { status: u16 },
}

impl Error {
    /// HTTP status code attached to the failure, if the upstream answered at all.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::HttpStatus { status, .. } | Self::EmptyBody { status } => Some(*status),
            Self::Transport(e) => e.status().map(|s| s.as_u16()),
            Self::Build(_) | Self::Url(_) => None,
        }
    }
}
