//! The quote response returned to callers.
//!
//! Every field is always populated. On the wire the response keeps the
//! chart-style envelope consumers already parse:
//!
//! ```json
//! {"chart":{"result":[{"meta":{...},"indicators":{"quote":[{...}],"adjclose":[{"adjclose":0}]}}]},"name":"..."}
//! ```

use serde::{Deserialize, Serialize};

/// Identity and derived figures for one security.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteMeta {
    pub stock_name: String,
    /// Normalized code, as sent upstream.
    pub stock_code: String,
    /// Market-qualified symbol, e.g. `7203.T` or `^N225`.
    pub symbol: String,
    /// Current price minus change.
    pub chart_previous_close: f64,
    /// Magnitude of the change percent. The wire name is historical.
    pub low_price: f64,
}

/// Daily price block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ohlcv {
    pub close: f64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub volume: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdjClose {
    pub adjclose: f64,
}

/// A complete quote. Real and synthesized quotes have the same shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "ChartEnvelope", try_from = "ChartEnvelope")]
pub struct QuoteResponse {
    pub meta: QuoteMeta,
    pub ohlcv: Ohlcv,
    pub adjclose: f64,
    /// Persona label carried at the top level of every response.
    pub advisor: String,
}

impl QuoteResponse {
    /// Change amount implied by close and previous close.
    pub fn change(&self) -> f64 {
        self.ohlcv.close - self.meta.chart_previous_close
    }
}

#[derive(Serialize, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
    name: String,
}

#[derive(Serialize, Deserialize)]
struct Chart {
    result: Vec<ChartResult>,
}

#[derive(Serialize, Deserialize)]
struct ChartResult {
    meta: QuoteMeta,
    indicators: Indicators,
}

#[derive(Serialize, Deserialize)]
struct Indicators {
    quote: Vec<Ohlcv>,
    adjclose: Vec<AdjClose>,
}

impl From<QuoteResponse> for ChartEnvelope {
    fn from(q: QuoteResponse) -> Self {
        Self {
            chart: Chart {
                result: vec![ChartResult {
                    meta: q.meta,
                    indicators: Indicators {
                        quote: vec![q.ohlcv],
                        adjclose: vec![AdjClose {
                            adjclose: q.adjclose,
                        }],
                    },
                }],
            },
            name: q.advisor,
        }
    }
}

impl TryFrom<ChartEnvelope> for QuoteResponse {
    type Error = String;

    fn try_from(envelope: ChartEnvelope) -> Result<Self, Self::Error> {
        let mut results = envelope.chart.result.into_iter();
        let (Some(result), None) = (results.next(), results.next()) else {
            return Err("chart.result must hold exactly one entry".to_string());
        };
        let Some(ohlcv) = result.indicators.quote.into_iter().next() else {
            return Err("indicators.quote is empty".to_string());
        };
        let Some(adjclose) = result.indicators.adjclose.into_iter().next() else {
            return Err("indicators.adjclose is empty".to_string());
        };
        Ok(Self {
            meta: result.meta,
            ohlcv,
            adjclose: adjclose.adjclose,
            advisor: envelope.name,
        })
    }
}
