//! Display formatting for money, dates, names, and file sizes.
//!
//! Output follows Portuguese (pt-PT) conventions: comma decimals, narrow
//! grouping with non-breaking spaces, currency symbol after the amount.
//! Every function is total and falls back to a placeholder instead of
//! failing.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::types::Timestamp;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Placeholder for missing or unparsable values.
pub const DASH: &str = "—";

/// Initials used when a name is blank.
pub const FALLBACK_INITIALS: &str = "US";

const NBSP: char = '\u{00A0}';

const DATE_FORMAT: &str = "%d/%m/%Y";

// ---------------------------------------------------------------------------
// Money
// ---------------------------------------------------------------------------

fn currency_symbol(currency: &str) -> String {
    match currency.trim().to_ascii_uppercase().as_str() {
        "EUR" => "€".to_string(),
        "USD" => "US$".to_string(),
        "GBP" => "£".to_string(),
        "BRL" => "R$".to_string(),
        other => other.to_string(),
    }
}

/// Group an integer string in threes, only once it has five or more digits.
fn group_digits(digits: &str) -> String {
    if digits.len() < 5 {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(NBSP);
        }
        out.push(c);
    }
    out
}

/// Format an amount with two decimals and the currency symbol.
///
/// ```
/// use propdocs_core::formatting::format_money;
///
/// assert_eq!(format_money(1234.5, "EUR"), "1234,50\u{a0}€");
/// assert_eq!(format_money(12345.0, "EUR"), "12\u{a0}345,00\u{a0}€");
/// ```
pub fn format_money(amount: f64, currency: &str) -> String {
    if !amount.is_finite() {
        return DASH.to_string();
    }
    // Rounding goes through the decimal string so large amounts keep every digit.
    let rounded = format!("{:.2}", amount.abs());
    let (whole, cents) = rounded.split_once('.').unwrap_or((rounded.as_str(), "00"));
    let is_zero = whole.bytes().all(|b| b == b'0') && cents.bytes().all(|b| b == b'0');
    let sign = if amount < 0.0 && !is_zero { "-" } else { "" };
    format!(
        "{sign}{},{cents}{NBSP}{}",
        group_digits(whole),
        currency_symbol(currency)
    )
}

// ---------------------------------------------------------------------------
// Dates
// ---------------------------------------------------------------------------

fn parse_date(input: &str) -> Option<NaiveDate> {
    let input = input.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Some(dt.naive_utc().date());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(input, "%Y-%m-%dT%H:%M:%S%.f") {
        return Some(dt.date());
    }
    NaiveDate::parse_from_str(input, "%Y-%m-%d").ok()
}

/// `dd/mm/yyyy` for a parseable ISO date, otherwise [`DASH`].
pub fn format_date_or_dash(iso: Option<&str>) -> String {
    iso.and_then(parse_date)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| DASH.to_string())
}

/// Same as [`format_date_or_dash`] for an already-parsed timestamp.
pub fn format_timestamp_or_dash(timestamp: Option<Timestamp>) -> String {
    timestamp
        .map(|ts| ts.date_naive().format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| DASH.to_string())
}

// ---------------------------------------------------------------------------
// Names
// ---------------------------------------------------------------------------

/// Two uppercase initials for an avatar.
///
/// Multi-word names take the first letter of the first and last words; a
/// single word takes its first two characters.
pub fn initials_from_name(name: &str) -> String {
    let words: Vec<&str> = name.split_whitespace().collect();
    let initials: String = match words.as_slice() {
        [] => return FALLBACK_INITIALS.to_string(),
        [only] => only.chars().take(2).collect(),
        [first, .., last] => first.chars().take(1).chain(last.chars().take(1)).collect(),
    };
    initials.to_uppercase().chars().take(2).collect()
}

// ---------------------------------------------------------------------------
// File sizes
// ---------------------------------------------------------------------------

/// Human-readable size using binary units and one decimal.
pub fn format_file_size(bytes: u64) -> String {
    const UNITS: [&str; 3] = ["KB", "MB", "GB"];
    if bytes < 1024 {
        return format!("{bytes} B");
    }
    let mut value = bytes as f64 / 1024.0;
    let mut unit = UNITS[0];
    for next in UNITS[1..].iter().copied() {
        if value < 1024.0 {
            break;
        }
        value /= 1024.0;
        unit = next;
    }
    format!("{value:.1} {unit}").replace('.', ",")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
