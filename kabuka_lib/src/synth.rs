//! Response synthesis.
//!
//! Turns whatever extraction produced into a complete [`QuoteResponse`].
//! Any numeric field that was not read from the page is filled with a
//! placeholder drawn from a fixed range around the price. The placeholders
//! only keep the response shape stable; they are not market data.
//!
//! Randomness comes from the caller so tests can pass a seeded generator.

use std::ops::RangeInclusive;

use rand::Rng;

use crate::code::SecurityCode;
use crate::extract::ExtractedQuote;
use crate::known_codes::KnownCodes;
use crate::quote::{Ohlcv, QuoteMeta, QuoteResponse};

/// Market suffix appended to codes on the real path.
pub const TOKYO_SUFFIX: &str = ".T";

/// Offsets used to fill gaps around a base price.
#[derive(Debug, Clone)]
pub struct SynthesisRanges {
    pub change: RangeInclusive<i64>,
    pub open_offset: RangeInclusive<i64>,
    /// Added to the base.
    pub high_offset: RangeInclusive<i64>,
    /// Subtracted from the base.
    pub low_offset: RangeInclusive<i64>,
    pub adjclose_offset: RangeInclusive<i64>,
}

/// Gaps around a price that was read from the page.
pub const REAL_PRICE_RANGES: SynthesisRanges = SynthesisRanges {
    change: -50..=50,
    open_offset: -20..=20,
    high_offset: 0..=50,
    low_offset: 0..=50,
    adjclose_offset: -10..=10,
};

/// Gaps around a made-up base price.
pub const SYNTHETIC_BASE_RANGES: SynthesisRanges = SynthesisRanges {
    change: -100..=100,
    open_offset: -50..=50,
    high_offset: 0..=100,
    low_offset: 0..=100,
    adjclose_offset: -10..=10,
};

pub const BASE_PRICE_RANGE: RangeInclusive<i64> = 1000..=5000;
pub const VOLUME_RANGE: RangeInclusive<u64> = 1_000_000..=10_000_000;

/// `change / previous_close * 100`, or 0 when the previous close is not positive.
pub fn change_percent(change: f64, previous_close: f64) -> f64 {
    if previous_close > 0.0 {
        change / previous_close * 100.0
    } else {
        0.0
    }
}

/// Builds responses for one service instance.
pub struct Synthesizer<'a> {
    known: &'a KnownCodes,
    advisor: &'a str,
}

impl<'a> Synthesizer<'a> {
    pub fn new(known: &'a KnownCodes, advisor: &'a str) -> Self {
        Self { known, advisor }
    }

    /// Complete a response from an extraction, filling every gap.
    ///
    /// An extraction that is not usable (no price and no name) takes the
    /// total fallback path: identity from the known code table and a
    /// synthetic base price.
    pub fn finalize<R: Rng + ?Sized>(
        &self,
        extracted: &ExtractedQuote,
        code: &SecurityCode,
        rng: &mut R,
    ) -> QuoteResponse {
        if !extracted.is_usable() {
            return self.total_fallback(code, rng);
        }
        let known = self.known.get(code.as_str());
        let name = extracted
            .name
            .clone()
            .or_else(|| known.map(|k| k.name.clone()))
            .unwrap_or_else(|| code.to_string());
        let symbol = known
            .map(|k| k.symbol.clone())
            .unwrap_or_else(|| format!("{}{}", code, TOKYO_SUFFIX));
        self.build(extracted, code, name, symbol, rng)
    }

    /// Response for a code when nothing could be read at all.
    pub fn total_fallback<R: Rng + ?Sized>(
        &self,
        code: &SecurityCode,
        rng: &mut R,
    ) -> QuoteResponse {
        tracing::warn!(code = %code, "using synthetic quote");
        let (name, symbol) = match self.known.get(code.as_str()) {
            Some(k) => (k.name.clone(), k.symbol.clone()),
            None => (code.to_string(), code.to_string()),
        };
        self.build(&ExtractedQuote::default(), code, name, symbol, rng)
    }

    fn build<R: Rng + ?Sized>(
        &self,
        extracted: &ExtractedQuote,
        code: &SecurityCode,
        name: String,
        symbol: String,
        rng: &mut R,
    ) -> QuoteResponse {
        let (price, ranges) = match extracted.current_price {
            Some(price) => (price, &REAL_PRICE_RANGES),
            None => (
                rng.gen_range(BASE_PRICE_RANGE) as f64,
                &SYNTHETIC_BASE_RANGES,
            ),
        };

        let (change, percent) = match extracted.change {
            Some(info) => (info.change, info.change_percent),
            None => {
                let change = rng.gen_range(ranges.change.clone()) as f64;
                (change, change_percent(change, price - change))
            }
        };
        let previous_close = price - change;

        let open = extracted
            .open
            .unwrap_or_else(|| price + rng.gen_range(ranges.open_offset.clone()) as f64);
        let high = extracted
            .high
            .unwrap_or_else(|| price + rng.gen_range(ranges.high_offset.clone()) as f64);
        let low = extracted
            .low
            .unwrap_or_else(|| price - rng.gen_range(ranges.low_offset.clone()) as f64);
        let volume = extracted
            .volume
            .unwrap_or_else(|| rng.gen_range(VOLUME_RANGE));
        let adjclose = price + rng.gen_range(ranges.adjclose_offset.clone()) as f64;

        QuoteResponse {
            meta: QuoteMeta {
                stock_name: name,
                stock_code: code.to_string(),
                symbol,
                chart_previous_close: previous_close,
                low_price: percent.abs(),
            },
            ohlcv: Ohlcv {
                close: price,
                open,
                high,
                low,
                volume,
            },
            adjclose,
            advisor: self.advisor.to_string(),
        }
    }
}
