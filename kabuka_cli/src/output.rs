use kabuka_lib::QuoteResponse;
use tabled::settings::Style;
use tabled::{Table, Tabled};

#[derive(Clone, Debug)]
pub enum OutputFormat {
    Table,
    Json,
}

#[derive(Tabled)]
struct QuoteRow {
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Symbol")]
    symbol: String,
    #[tabled(rename = "Price")]
    price: String,
    #[tabled(rename = "Change")]
    change: String,
    #[tabled(rename = "Open")]
    open: String,
    #[tabled(rename = "High")]
    high: String,
    #[tabled(rename = "Low")]
    low: String,
    #[tabled(rename = "Volume")]
    volume: String,
}

fn build_quote_row(quote: &QuoteResponse) -> QuoteRow {
    QuoteRow {
        code: quote.meta.stock_code.clone(),
        name: quote.meta.stock_name.clone(),
        symbol: quote.meta.symbol.clone(),
        price: format_price(quote.ohlcv.close),
        change: format_change(quote.change(), quote.meta.low_price),
        open: format_price(quote.ohlcv.open),
        high: format_price(quote.ohlcv.high),
        low: format_price(quote.ohlcv.low),
        volume: format_volume(quote.ohlcv.volume),
    }
}

// -- Table output --

pub fn print_quote_table(quote: &QuoteResponse) {
    let mut table = Table::new([build_quote_row(quote)]);
    table.with(Style::rounded());
    println!("{}", table);
}

// -- JSON output --

pub fn print_json<T: serde::Serialize>(data: &T) {
    match serde_json::to_string_pretty(data) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize to JSON: {}", e),
    }
}

fn format_price(value: f64) -> String {
    format!("{:.1}", value)
}

/// Signed amount with the percent magnitude, e.g. `+35.5 (1.28%)`.
fn format_change(change: f64, percent: f64) -> String {
    format!("{:+.1} ({:.2}%)", change, percent)
}

fn format_volume(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}
