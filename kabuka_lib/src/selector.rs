//! Declarative selector chains for the quote page.
//!
//! A chain is an ordered slice of [`Rule`]s. Each rule pulls one candidate
//! string out of the document and hands it to an acceptance function; the
//! first rule whose candidate is accepted wins. Rules are plain data, so the
//! chains below can be tested and reordered without touching the extractor.

use scraper::{ElementRef, Html, Selector};

use crate::normalize::{price_value, strip_code_prefix};

/// Fallback name candidates at or above this many bytes are rejected.
pub const NAME_MAX_BYTES: usize = 100;

/// How a rule picks its candidate text out of the document.
#[derive(Debug, Clone, Copy)]
pub enum Query {
    /// Full text of the first element matching the selector.
    First(&'static str),
    /// Full text of the first matching element whose first direct text
    /// child contains one of the needles.
    OwnTextContains {
        css: &'static str,
        needles: &'static [&'static str],
    },
    /// First non-blank text node under any matching element.
    FirstTextNode(&'static str),
}

impl Query {
    /// Candidate text for this query, or `None` when nothing matches.
    pub fn candidate(&self, document: &Html) -> Option<String> {
        match *self {
            Query::First(css) => {
                let selector = parse_selector(css)?;
                document.select(&selector).next().map(|el| element_text(&el))
            }
            Query::OwnTextContains { css, needles } => {
                let selector = parse_selector(css)?;
                document
                    .select(&selector)
                    .find(|el| {
                        first_own_text(el)
                            .is_some_and(|own| needles.iter().any(|needle| own.contains(needle)))
                    })
                    .map(|el| element_text(&el))
            }
            Query::FirstTextNode(css) => {
                let selector = parse_selector(css)?;
                document.select(&selector).find_map(|el| {
                    el.text()
                        .map(str::trim)
                        .find(|t| !t.is_empty())
                        .map(str::to_string)
                })
            }
        }
    }
}

/// One step of a selector chain.
#[derive(Clone, Copy)]
pub struct Rule<T> {
    /// Short name reported when this rule supplies a field.
    pub label: &'static str,
    pub query: Query,
    /// Turns candidate text into a field value, or rejects it.
    pub accept: fn(&str) -> Option<T>,
}

/// A value accepted by a rule, with the label of the rule that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Matched<T> {
    pub value: T,
    pub rule: &'static str,
}

impl<T> Rule<T> {
    pub fn apply(&self, document: &Html) -> Option<Matched<T>> {
        let Some(text) = self.query.candidate(document) else {
            tracing::trace!(rule = self.label, "no match");
            return None;
        };
        match (self.accept)(&text) {
            Some(value) => Some(Matched {
                value,
                rule: self.label,
            }),
            None => {
                tracing::debug!(rule = self.label, candidate = %text, "candidate rejected");
                None
            }
        }
    }
}

/// Evaluate rules in order and return the first accepted value.
pub fn first_accepted<T>(rules: &[Rule<T>], document: &Html) -> Option<Matched<T>> {
    rules.iter().find_map(|rule| rule.apply(document))
}

/// A price candidate is usable when it parses to something above zero.
pub fn accept_price(text: &str) -> Option<f64> {
    price_value(text).filter(|p| *p > 0.0)
}

/// Name from the primary heading: code prefix stripped, must not be empty
/// and must not be a bare code.
pub fn accept_primary_name(text: &str) -> Option<String> {
    let name = strip_code_prefix(text);
    let bare_code = name.chars().all(|c| c.is_ascii_digit());
    (!name.is_empty() && !bare_code).then_some(name)
}

/// Name from a looser query: non-empty and under [`NAME_MAX_BYTES`] before
/// the code prefix is stripped.
pub fn accept_fallback_name(text: &str) -> Option<String> {
    let raw = text.trim();
    if raw.is_empty() || raw.len() >= NAME_MAX_BYTES {
        return None;
    }
    accept_primary_name(raw)
}

pub static PRICE_PRIMARY: Rule<f64> = Rule {
    label: "span.kabuka",
    query: Query::First(r#"span[class="kabuka"]"#),
    accept: accept_price,
};

pub static PRICE_FALLBACK: &[Rule<f64>] = &[
    Rule {
        label: "span[class*=kabuka]",
        query: Query::First(r#"span[class*="kabuka"]"#),
        accept: accept_price,
    },
    Rule {
        label: "span[class*=price]",
        query: Query::First(r#"span[class*="price"]"#),
        accept: accept_price,
    },
    Rule {
        label: "td[class*=price]",
        query: Query::First(r#"td[class*="price"]"#),
        accept: accept_price,
    },
    Rule {
        label: "div[class*=stock-price]",
        query: Query::First(r#"div[class*="stock-price"]"#),
        accept: accept_price,
    },
    Rule {
        label: "span[class*=stock_price]",
        query: Query::First(r#"span[class*="stock_price"]"#),
        accept: accept_price,
    },
    Rule {
        label: "span:contains(円)",
        query: Query::OwnTextContains {
            css: "span",
            needles: &["円"],
        },
        accept: accept_price,
    },
];

pub static NAME_PRIMARY: Rule<String> = Rule {
    label: "div#stockinfo_i1 h2",
    query: Query::First("div#stockinfo_i1 h2"),
    accept: accept_primary_name,
};

pub static NAME_FALLBACK: &[Rule<String>] = &[
    Rule {
        label: "h2:contains(company suffix)",
        query: Query::OwnTextContains {
            css: "h2",
            needles: &["ホールディングス", "株式会社", "グループ"],
        },
        accept: accept_fallback_name,
    },
    Rule {
        label: "h1",
        query: Query::First("h1"),
        accept: accept_fallback_name,
    },
    Rule {
        label: "h2",
        query: Query::First("h2"),
        accept: accept_fallback_name,
    },
    Rule {
        label: "span[class*=name]",
        query: Query::First(r#"span[class*="name"]"#),
        accept: accept_fallback_name,
    },
    Rule {
        label: "div[class*=stock-name]",
        query: Query::First(r#"div[class*="stock-name"]"#),
        accept: accept_fallback_name,
    },
    Rule {
        label: "h2 text node",
        query: Query::FirstTextNode("h2"),
        accept: accept_fallback_name,
    },
];

pub(crate) fn parse_selector(css: &str) -> Option<Selector> {
    Selector::parse(css)
        .map_err(|e| tracing::error!("Invalid selector {:?}: {:?}", css, e))
        .ok()
}

pub(crate) fn element_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

/// The element's first direct text child. Later text children are not
/// consulted.
fn first_own_text<'a>(el: &ElementRef<'a>) -> Option<&'a str> {
    el.children()
        .find_map(|child| child.value().as_text())
        .map(|t| -> &'a str { t })
}
