use crate::error::{CueError, Result};
use regex::Regex;
use std::sync::OnceLock;

/// Base units per whole reference-currency unit (6 decimal places).
pub const BASE_UNITS_PER_UNIT: u64 = 1_000_000;

static CURRENCY_RE: OnceLock<Regex> = OnceLock::new();

fn currency_re() -> &'static Regex {
    // Thousands separators, the dollar sign, and stablecoin ticker
    // spellings. "usdt" before "usd" so the suffixed variant strips whole.
    CURRENCY_RE.get_or_init(|| Regex::new(r"(?i)[$,]|usdt|usdc|usd").unwrap())
}

static AMOUNT_RE: OnceLock<Regex> = OnceLock::new();

fn amount_re() -> &'static Regex {
    AMOUNT_RE.get_or_init(|| Regex::new(r"^[0-9]+(\.[0-9]{1,6})?$").unwrap())
}

/// Parse a free-form monetary substring into an exact base-unit integer
/// string (millionths of the reference unit).
///
/// The arithmetic is decimal-string concatenation, never floating point:
/// `whole * 1_000_000 + fraction` is exactly the whole digits followed by
/// the fraction right-padded to six digits, for any number of digits.
pub fn parse_amount(raw: &str) -> Result<String> {
    let stripped = currency_re().replace_all(raw, "");
    let mut s = stripped.trim().to_string();
    if s.is_empty() {
        return Err(CueError::MissingAmount);
    }
    if s.starts_with('.') {
        s.insert(0, '0');
    }
    if s.ends_with('.') {
        s.pop();
    }
    if !amount_re().is_match(&s) {
        return Err(CueError::InvalidAmountFormat(raw.trim().to_string()));
    }

    let (whole, frac) = match s.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (s.as_str(), ""),
    };

    let mut digits = String::with_capacity(whole.len() + 6);
    digits.push_str(whole);
    digits.push_str(frac);
    for _ in frac.len()..6 {
        digits.push('0');
    }

    let canonical = digits.trim_start_matches('0');
    if canonical.is_empty() {
        return Err(CueError::NonPositiveAmount(raw.trim().to_string()));
    }
    Ok(canonical.to_string())
}
