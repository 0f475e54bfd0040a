//! Library layer for kabuka: resilient quote extraction from the kabutan
//! quote page.
//!
//! Fetches the page through `kabuka_api`, reads fields with declarative
//! selector chains, and fills anything missing with synthesized figures so
//! every request yields a complete [`QuoteResponse`].

pub mod code;
pub mod config;
pub mod error;
pub mod events;
pub mod extract;
pub mod known_codes;
pub mod normalize;
pub mod quote;
pub mod selector;
pub mod service;
pub mod synth;

pub use kabuka_api;

pub use code::SecurityCode;
pub use config::ServiceConfig;
pub use error::KabukaError;
pub use events::{EventSink, EventSinkError, JsonlEventSink, NoopEventSink};
pub use extract::{extract, extract_with_report, ChangeInfo, ExtractedQuote, ExtractionReport};
pub use known_codes::{KnownCode, KnownCodes, KnownCodesError};
pub use quote::{Ohlcv, QuoteMeta, QuoteResponse};
pub use service::{QuoteService, QuoteSource};
pub use synth::Synthesizer;
