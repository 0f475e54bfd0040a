//! The quote entry point: normalize, fetch, extract, then fill gaps.

use std::time::Instant;

use kabuka_api::{Client, FetchConfig};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::{Map, Value};

use crate::code::SecurityCode;
use crate::config::{ServiceConfig, DEFAULT_ADVISOR_NAME};
use crate::error::KabukaError;
use crate::events::{EventSink, JsonlEventSink, NoopEventSink};
use crate::extract::{extract_with_report, ExtractedQuote};
use crate::known_codes::{load_known_codes, KnownCodes};
use crate::quote::QuoteResponse;
use crate::synth::Synthesizer;

pub const STOCK_INFO_EVENT: &str = "stock_info";

/// Where the figures in a response came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuoteSource {
    /// At least a price or a name was read from the page.
    Real,
    /// Nothing usable was read; the response is fully synthesized.
    Synthetic,
}

impl QuoteSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Real => "real",
            Self::Synthetic => "synthetic",
        }
    }
}

/// Resilient quote lookup. [`QuoteService::get_quote`] never fails.
pub struct QuoteService {
    client: Client,
    known: KnownCodes,
    advisor_name: String,
    sink: Box<dyn EventSink>,
}

impl QuoteService {
    /// Service against the production site with default settings.
    pub fn new() -> Result<Self, KabukaError> {
        Self::with_config(ServiceConfig::default())
    }

    /// Service against another origin, e.g. a mock server in tests.
    pub fn with_base_url(base_url: &str) -> Result<Self, KabukaError> {
        Self::with_config(ServiceConfig {
            fetch: FetchConfig {
                base_url: base_url.to_string(),
                ..FetchConfig::default()
            },
            ..ServiceConfig::default()
        })
    }

    pub fn with_config(config: ServiceConfig) -> Result<Self, KabukaError> {
        let client = Client::with_config(config.fetch)?;
        let known = load_known_codes()?;
        let sink: Box<dyn EventSink> = match config.tracking_log {
            Some(path) => Box::new(JsonlEventSink::new(path)),
            None => Box::new(NoopEventSink),
        };
        let advisor_name = if config.advisor_name.is_empty() {
            DEFAULT_ADVISOR_NAME.to_string()
        } else {
            config.advisor_name
        };
        Ok(Self {
            client,
            known,
            advisor_name,
            sink,
        })
    }

    /// Replace the event sink.
    pub fn with_event_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    pub fn known_codes(&self) -> &KnownCodes {
        &self.known
    }

    /// Quote for `raw_code`. Always returns a complete response; upstream
    /// failures degrade to synthesized figures.
    pub async fn get_quote(&self, raw_code: &str) -> QuoteResponse {
        let mut rng = StdRng::from_entropy();
        self.get_quote_with_rng(raw_code, &mut rng).await
    }

    /// Same as [`QuoteService::get_quote`] with a caller-supplied random
    /// source, so tests can seed it.
    pub async fn get_quote_with_rng<R: Rng + Send>(
        &self,
        raw_code: &str,
        rng: &mut R,
    ) -> QuoteResponse {
        let code = SecurityCode::normalize(raw_code);
        let start = Instant::now();
        tracing::debug!(raw = raw_code, code = %code, "quote requested");

        let extracted = match self.client.fetch_quote_page(code.as_str()).await {
            Ok(html) => {
                let (extracted, report) = extract_with_report(&html, code.as_str());
                tracing::debug!(
                    code = %code,
                    name_rule = ?report.name_rule,
                    price_rule = ?report.price_rule,
                    name_fallback = report.name_fallback,
                    price_fallback = report.price_fallback,
                    change_found = report.change_found,
                    table_cells = ?report.table_cells,
                    "extraction finished"
                );
                extracted
            }
            Err(e) => {
                tracing::warn!(code = %code, status = ?e.status(), "fetch failed: {}", e);
                ExtractedQuote::default()
            }
        };

        let (response, source) = self.quote_from_extraction(&extracted, &code, rng);
        tracing::info!(
            code = %code,
            source = source.as_str(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "quote served"
        );
        self.record_stock_info(raw_code, &code, source);
        response
    }

    /// Complete a response from page HTML without any network access.
    pub fn quote_from_html<R: Rng + ?Sized>(
        &self,
        html: &str,
        raw_code: &str,
        rng: &mut R,
    ) -> QuoteResponse {
        let code = SecurityCode::normalize(raw_code);
        let (extracted, _) = extract_with_report(html, code.as_str());
        self.quote_from_extraction(&extracted, &code, rng).0
    }

    fn quote_from_extraction<R: Rng + ?Sized>(
        &self,
        extracted: &ExtractedQuote,
        code: &SecurityCode,
        rng: &mut R,
    ) -> (QuoteResponse, QuoteSource) {
        let source = if extracted.is_usable() {
            QuoteSource::Real
        } else {
            QuoteSource::Synthetic
        };
        let synth = Synthesizer::new(&self.known, &self.advisor_name);
        (synth.finalize(extracted, code, rng), source)
    }

    fn record_stock_info(&self, raw_code: &str, code: &SecurityCode, source: QuoteSource) {
        let mut fields = Map::new();
        fields.insert("code".to_string(), Value::String(raw_code.to_string()));
        fields.insert(
            "normalized_code".to_string(),
            Value::String(code.to_string()),
        );
        fields.insert(
            "source".to_string(),
            Value::String(source.as_str().to_string()),
        );
        if let Err(e) = self.sink.record(STOCK_INFO_EVENT, fields) {
            tracing::warn!(code = %code, "failed to record event: {}", e);
        }
    }
}
