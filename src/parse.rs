//! Announcement text parsing.
//!
//! Announcements arrive as free-form text; we extract the base58-style
//! address, the `($SYM)` ticker, an optional `#chain` tag and the baseline
//! market cap (`├ MC: $12.3K` style, with K/M/B suffixes).

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

static ADDRESS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[A-HJ-NP-Za-km-z1-9]{32,44}").expect("valid regex"));
static SYMBOL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(\$(\w+)\)").expect("valid regex"));
static CHAIN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"#(\w+)").expect("valid regex"));
static MC_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"├ MC:\s*\$([\d\.]+[KMB]?)").expect("valid regex"));

/// The fields extracted from one announcement.
#[derive(Debug, Clone, PartialEq)]
pub struct Announcement {
    pub address: String,
    pub symbol: String,
    pub chain: String,
    pub baseline_value: f64,
}

/// Extract an announcement from raw text.
///
/// Returns `None` when the minimum required fields (address and symbol) are
/// absent; a missing market cap parses as 0 and a missing chain tag falls
/// back to `default_chain`.
pub fn extract_announcement(text: &str, default_chain: &str) -> Option<Announcement> {
    let address = match ADDRESS_RE.find(text) {
        Some(m) => m.as_str().to_string(),
        None => {
            warn!("announcement has no address");
            return None;
        }
    };

    let symbol = match SYMBOL_RE.captures(text) {
        Some(c) => c[1].to_string(),
        None => {
            warn!("announcement has no symbol");
            return None;
        }
    };

    let chain = CHAIN_RE
        .captures(text)
        .map(|c| c[1].to_lowercase())
        .unwrap_or_else(|| default_chain.to_string());

    let baseline_value = MC_RE
        .captures(text)
        .map(|c| normalize_abbreviated(&c[1]))
        .unwrap_or(0.0);

    Some(Announcement { address, symbol, chain, baseline_value })
}

/// Parse a number with an optional K/M/B suffix.
pub fn normalize_abbreviated(raw: &str) -> f64 {
    let raw = raw.trim();
    let (digits, factor) = match raw.chars().last() {
        Some('K') => (&raw[..raw.len() - 1], 1_000.0),
        Some('M') => (&raw[..raw.len() - 1], 1_000_000.0),
        Some('B') => (&raw[..raw.len() - 1], 1_000_000_000.0),
        _ => (raw, 1.0),
    };
    digits.parse::<f64>().map(|v| v * factor).unwrap_or(0.0)
}
