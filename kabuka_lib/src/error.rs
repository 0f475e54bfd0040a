//! Error types for the library layer.
//!
//! Only construction can fail. Once a [`crate::QuoteService`] exists, quote
//! requests always produce a response.

use std::fmt;

use crate::known_codes::KnownCodesError;

/// Errors raised while setting up the quote service.
#[derive(Debug)]
pub enum KabukaError {
    /// The HTTP client could not be built.
    Fetch(kabuka_api::Error),
    /// The embedded known code table is malformed.
    KnownCodes(KnownCodesError),
}

impl fmt::Display for KabukaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fetch(e) => write!(f, "Fetch client error: {}", e),
            Self::KnownCodes(e) => write!(f, "Known code table error: {}", e),
        }
    }
}

impl std::error::Error for KabukaError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Fetch(e) => Some(e),
            Self::KnownCodes(e) => Some(e),
        }
    }
}

impl From<kabuka_api::Error> for KabukaError {
    fn from(e: kabuka_api::Error) -> Self {
        Self::Fetch(e)
    }
}

impl From<KnownCodesError> for KabukaError {
    fn from(e: KnownCodesError) -> Self {
        Self::KnownCodes(e)
    }
}
