//! Quote extraction from the kabutan quote page.
//!
//! Extraction never fails. Each field group is tried with its primary
//! selector; name and price fall back to the looser chains in
//! [`crate::selector`]. Whatever cannot be read stays `None`, and the page as
//! a whole only counts when it produced a price or a name.

use scraper::Html;

use crate::normalize::{price_value, volume_value};
use crate::selector::{
    element_text, first_accepted, parse_selector, Matched, Rule, NAME_FALLBACK, NAME_PRIMARY,
    PRICE_FALLBACK, PRICE_PRIMARY,
};

const CHANGE_SPANS: &str = r#"dl[class="si_i1_dl1"] dd span"#;
const PRICE_TABLE_ROWS: &str = r#"table[class="stock_kabuka0"] tbody tr"#;
const MIN_TABLE_CELLS: usize = 7;
const OPEN_CELL: usize = 0;
const HIGH_CELL: usize = 1;
const LOW_CELL: usize = 2;
const VOLUME_CELL: usize = 6;

/// Change amount and change percent, always found together.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChangeInfo {
    pub change: f64,
    pub change_percent: f64,
}

/// Fields read from one page. `None` means "not found", which is different
/// from a value of zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractedQuote {
    pub name: Option<String>,
    pub current_price: Option<f64>,
    pub change: Option<ChangeInfo>,
    pub open: Option<f64>,
    pub high: Option<f64>,
    pub low: Option<f64>,
    pub volume: Option<u64>,
}

impl ExtractedQuote {
    /// A page is usable when it produced at least a price or a name.
    pub fn is_usable(&self) -> bool {
        self.current_price.is_some() || self.name.is_some()
    }
}

/// Which rule supplied each field, for diagnostics and tests.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExtractionReport {
    pub name_rule: Option<&'static str>,
    pub price_rule: Option<&'static str>,
    /// The price fallback chain was entered.
    pub price_fallback: bool,
    /// The name fallback chain was entered.
    pub name_fallback: bool,
    pub change_found: bool,
    /// Number of cells in the first price table row, if the row exists.
    pub table_cells: Option<usize>,
}

/// Extract quote fields from page HTML.
pub fn extract(html: &str, code: &str) -> ExtractedQuote {
    extract_with_report(html, code).0
}

/// Like [`extract`], also reporting which selectors were used.
pub fn extract_with_report(html: &str, code: &str) -> (ExtractedQuote, ExtractionReport) {
    let document = Html::parse_document(html);
    let mut quote = ExtractedQuote::default();
    let mut report = ExtractionReport::default();

    let (name, used_fallback) = with_fallback("name", &NAME_PRIMARY, NAME_FALLBACK, &document);
    report.name_fallback = used_fallback;
    if let Some(m) = name {
        report.name_rule = Some(m.rule);
        quote.name = Some(m.value);
    }

    let (price, used_fallback) = with_fallback("price", &PRICE_PRIMARY, PRICE_FALLBACK, &document);
    report.price_fallback = used_fallback;
    if let Some(m) = price {
        report.price_rule = Some(m.rule);
        quote.current_price = Some(m.value);
    }

    quote.change = extract_change(&document);
    report.change_found = quote.change.is_some();

    report.table_cells = extract_price_table(&document, &mut quote);

    if !quote.is_usable() {
        tracing::warn!(code, "no price or name on page; discarding extraction");
        return (ExtractedQuote::default(), report);
    }

    tracing::debug!(code, ?quote, ?report, "extraction finished");
    (quote, report)
}

/// Primary rule, then the fallback chain when the primary yields nothing.
/// The flag tells whether the chain was entered.
fn with_fallback<T>(
    field: &'static str,
    primary: &Rule<T>,
    fallback: &[Rule<T>],
    document: &Html,
) -> (Option<Matched<T>>, bool) {
    if let Some(m) = primary.apply(document) {
        tracing::debug!(field, rule = m.rule, "primary selector matched");
        return (Some(m), false);
    }
    tracing::info!(field, "primary selector empty, trying fallback selectors");
    let found = first_accepted(fallback, document);
    match &found {
        Some(m) => tracing::info!(field, rule = m.rule, "fallback selector matched"),
        None => tracing::warn!(field, "no selector produced a value"),
    }
    (found, true)
}

fn extract_change(document: &Html) -> Option<ChangeInfo> {
    let selector = parse_selector(CHANGE_SPANS)?;
    let mut spans = document.select(&selector);
    let (Some(amount), Some(percent)) = (spans.next(), spans.next()) else {
        tracing::debug!("change info incomplete");
        return None;
    };
    let change = price_value(&element_text(&amount))?;
    let change_percent = price_value(&element_text(&percent))?;
    Some(ChangeInfo {
        change,
        change_percent,
    })
}

/// Fills open/high/low/volume from the first row of the daily price table.
/// Returns the row's cell count when a row was found.
fn extract_price_table(document: &Html, quote: &mut ExtractedQuote) -> Option<usize> {
    let rows = parse_selector(PRICE_TABLE_ROWS)?;
    let cells = parse_selector("td")?;
    let row = document.select(&rows).next()?;
    let texts: Vec<String> = row.select(&cells).map(|td| element_text(&td)).collect();

    if texts.len() < MIN_TABLE_CELLS {
        tracing::debug!(cells = texts.len(), "price table row too short");
        return Some(texts.len());
    }

    quote.open = price_value(&texts[OPEN_CELL]);
    quote.high = price_value(&texts[HIGH_CELL]);
    quote.low = price_value(&texts[LOW_CELL]);
    quote.volume = volume_value(&texts[VOLUME_CELL]);
    Some(texts.len())
}
