//! Display formatting for the dashboard.
//!
//! Pure functions, no I/O. Peso-denominated values follow Argentine
//! grouping (thousands `.`, decimal `,`); USD values follow English
//! grouping. Percent changes carry a `+` only when strictly positive, and
//! index values above one million are abbreviated with a `K` suffix.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

use crate::models::Quote;

const MILLION: Decimal = Decimal::from_parts(1_000_000, 0, 0, false, 0);
const THOUSAND: Decimal = Decimal::from_parts(1_000, 0, 0, false, 0);

/// Digit-grouping rules for one audience.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Locale {
    /// Argentine Spanish: `1.234.567,89`
    EsAr,
    /// English: `1,234,567.89`
    EnUs,
}

impl Locale {
    /// Pick the locale a currency is rendered in.
    pub fn for_currency(currency: &str) -> Self {
        if currency.eq_ignore_ascii_case("ARS") {
            Self::EsAr
        } else {
            Self::EnUs
        }
    }

    fn thousands_sep(self) -> char {
        match self {
            Self::EsAr => '.',
            Self::EnUs => ',',
        }
    }

    fn decimal_sep(self) -> char {
        match self {
            Self::EsAr => ',',
            Self::EnUs => '.',
        }
    }
}

/// Display-ready strings for one quote.
#[derive(Clone, Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DisplayQuote {
    pub symbol: String,
    pub price: String,
    pub change_percent: String,
}

fn group_thousands(digits: &str, sep: char) -> String {
    let len = digits.len();
    let mut grouped = String::with_capacity(len + len / 3);
    for (i, c) in digits.chars().enumerate() {
        if i != 0 && (len - i) % 3 == 0 {
            grouped.push(sep);
        }
        grouped.push(c);
    }
    grouped
}

/// Format a number with the given fraction digits and locale grouping.
pub fn format_number(value: Decimal, decimals: u32, locale: Locale) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    let plain = format!("{:.*}", decimals as usize, rounded.abs());

    let (int_part, frac_part) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let mut out = String::new();
    if rounded.is_sign_negative() && !rounded.is_zero() {
        out.push('-');
    }
    out.push_str(&group_thousands(int_part, locale.thousands_sep()));
    if let Some(frac) = frac_part {
        out.push(locale.decimal_sep());
        out.push_str(frac);
    }
    out
}

/// Format a monetary value with its currency sign.
pub fn format_money(value: Decimal, locale: Locale) -> String {
    format!("${}", format_number(value, 2, locale))
}

/// Format a percentage change.
///
/// Strictly positive values get a `+` prefix; exactly zero renders bare as
/// `0.00%`; negatives keep their native minus sign.
pub fn format_percent(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    if rounded.is_zero() {
        return "0.00%".to_string();
    }
    if rounded > Decimal::ZERO {
        format!("+{:.2}%", rounded)
    } else {
        format!("{:.2}%", rounded)
    }
}

/// Format index points, abbreviating values above one million.
pub fn format_index_points(value: Decimal, locale: Locale) -> String {
    if value.abs() > MILLION {
        let thousands =
            (value / THOUSAND).round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero);
        format!("{}K", format_number(thousands, 0, locale))
    } else {
        format_number(value, 2, locale)
    }
}

/// Build display strings for a money-denominated quote.
pub fn format_quote(quote: &Quote) -> DisplayQuote {
    let locale = Locale::for_currency(&quote.currency);
    DisplayQuote {
        symbol: quote.symbol.clone(),
        price: format_money(quote.price, locale),
        change_percent: format_percent(quote.change_percent.unwrap_or_default()),
    }
}

/// Build display strings for an index quote (points, not currency).
pub fn format_index_quote(quote: &Quote) -> DisplayQuote {
    let locale = Locale::for_currency(&quote.currency);
    DisplayQuote {
        symbol: quote.symbol.clone(),
        price: format_index_points(quote.price, locale),
        change_percent: format_percent(quote.change_percent.unwrap_or_default()),
    }
}
