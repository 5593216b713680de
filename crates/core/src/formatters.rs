//! Display formatting for amounts, counts and dates.
//!
//! Month and weekday names are English in every locale.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::constants::{
    SECONDS_PER_DAY, SECONDS_PER_HOUR, SECONDS_PER_MINUTE, SECONDS_PER_MONTH, SECONDS_PER_WEEK,
};
use crate::utils::start_of_day_utc;

const NBSP: char = '\u{a0}';
const NARROW_NBSP: char = '\u{202f}';

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Locale {
    #[default]
    #[serde(rename = "en-US")]
    EnUs,
    #[serde(rename = "en-GB")]
    EnGb,
    #[serde(rename = "de-DE")]
    DeDe,
    #[serde(rename = "fr-FR")]
    FrFr,
    #[serde(rename = "ja-JP")]
    JaJp,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::EnUs => "en-US",
            Locale::EnGb => "en-GB",
            Locale::DeDe => "de-DE",
            Locale::FrFr => "fr-FR",
            Locale::JaJp => "ja-JP",
        }
    }

    fn group_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::EnGb | Locale::JaJp => ',',
            Locale::DeDe => '.',
            Locale::FrFr => NARROW_NBSP,
        }
    }

    fn decimal_separator(&self) -> char {
        match self {
            Locale::EnUs | Locale::EnGb | Locale::JaJp => '.',
            Locale::DeDe | Locale::FrFr => ',',
        }
    }

    fn symbol_after_amount(&self) -> bool {
        matches!(self, Locale::DeDe | Locale::FrFr)
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Locale {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().replace('_', "-").to_ascii_lowercase().as_str() {
            "en-us" | "en" => Ok(Locale::EnUs),
            "en-gb" => Ok(Locale::EnGb),
            "de-de" | "de" => Ok(Locale::DeDe),
            "fr-fr" | "fr" => Ok(Locale::FrFr),
            "ja-jp" | "ja" => Ok(Locale::JaJp),
            other => Err(format!("Unsupported locale: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    #[default]
    Usd,
    Eur,
    Gbp,
    Jpy,
    Cad,
    Aud,
}

impl Currency {
    pub fn code(&self) -> &'static str {
        match self {
            Currency::Usd => "USD",
            Currency::Eur => "EUR",
            Currency::Gbp => "GBP",
            Currency::Jpy => "JPY",
            Currency::Cad => "CAD",
            Currency::Aud => "AUD",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Currency::Usd => "$",
            Currency::Eur => "€",
            Currency::Gbp => "£",
            Currency::Jpy => "¥",
            Currency::Cad => "CA$",
            Currency::Aud => "A$",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "EUR" => Ok(Currency::Eur),
            "GBP" => Ok(Currency::Gbp),
            "JPY" => Ok(Currency::Jpy),
            "CAD" => Ok(Currency::Cad),
            "AUD" => Ok(Currency::Aud),
            other => Err(format!("Unsupported currency: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DateFormat {
    Short,
    #[default]
    Medium,
    Long,
    Relative,
}

impl FromStr for DateFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "short" => Ok(DateFormat::Short),
            "medium" => Ok(DateFormat::Medium),
            "long" => Ok(DateFormat::Long),
            "relative" => Ok(DateFormat::Relative),
            other => Err(format!("Unknown date format: {}", other)),
        }
    }
}

/// Locale and currency used for every amount shown to the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplaySettings {
    pub locale: Locale,
    pub currency: Currency,
}

impl DisplaySettings {
    pub fn currency(&self, amount: Decimal) -> String {
        format_currency(amount, self.locale, self.currency)
    }
}

/// Currency string with exactly two decimals, e.g. `$1,234.50` or `1.234,50 €`.
pub fn format_currency(amount: Decimal, locale: Locale, currency: Currency) -> String {
    let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    let number = group_digits(rounded.abs(), 2, locale);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };

    if locale.symbol_after_amount() {
        format!("{}{}{}{}", sign, number, NBSP, currency.symbol())
    } else {
        format!("{}{}{}", sign, currency.symbol(), number)
    }
}

fn group_digits(value: Decimal, decimals: u32, locale: Locale) -> String {
    let fixed = format!("{:.*}", decimals as usize, value);
    let (integer, fraction) = match fixed.split_once('.') {
        Some((integer, fraction)) => (integer, Some(fraction)),
        None => (fixed.as_str(), None),
    };

    let mut grouped = String::with_capacity(fixed.len() + integer.len() / 3);
    for (i, digit) in integer.chars().enumerate() {
        if i > 0 && (integer.len() - i) % 3 == 0 {
            grouped.push(locale.group_separator());
        }
        grouped.push(digit);
    }
    if let Some(fraction) = fraction {
        grouped.push(locale.decimal_separator());
        grouped.push_str(fraction);
    }
    grouped
}

pub fn format_date(date: NaiveDate, mode: DateFormat) -> String {
    format_date_at(date, mode, Utc::now())
}

pub fn format_date_at(date: NaiveDate, mode: DateFormat, now: DateTime<Utc>) -> String {
    match mode {
        DateFormat::Short => date.format("%b %-d").to_string(),
        DateFormat::Medium => date.format("%b %-d, %Y").to_string(),
        DateFormat::Long => date.format("%A, %B %-d, %Y").to_string(),
        DateFormat::Relative => format_relative_date_at(start_of_day_utc(date), now),
    }
}

pub fn format_relative_date(then: DateTime<Utc>) -> String {
    format_relative_date_at(then, Utc::now())
}

/// "just now", "N minutes ago" ... "N weeks ago", then the medium date.
pub fn format_relative_date_at(then: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let elapsed = (now - then).num_seconds();

    let (count, unit) = if elapsed < SECONDS_PER_MINUTE {
        return "just now".to_string();
    } else if elapsed < SECONDS_PER_HOUR {
        (elapsed / SECONDS_PER_MINUTE, "minute")
    } else if elapsed < SECONDS_PER_DAY {
        (elapsed / SECONDS_PER_HOUR, "hour")
    } else if elapsed < SECONDS_PER_WEEK {
        (elapsed / SECONDS_PER_DAY, "day")
    } else if elapsed < SECONDS_PER_MONTH {
        (elapsed / SECONDS_PER_WEEK, "week")
    } else {
        return format_date_at(then.date_naive(), DateFormat::Medium, now);
    };

    let plural = if count > 1 { "s" } else { "" };
    format!("{} {}{} ago", count, unit, plural)
}

/// Abbreviates with K/M/B/T from 1000 up, trimming trailing zeros.
pub fn format_number(num: Decimal, decimals: u32) -> String {
    if num.is_zero() {
        return "0".to_string();
    }
    let thousand = Decimal::from(1000);
    if num < thousand {
        return num
            .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
            .to_string();
    }

    const SUFFIXES: [&str; 5] = ["", "K", "M", "B", "T"];
    let mut scaled = num;
    let mut index = 0;
    while scaled >= thousand && index < SUFFIXES.len() - 1 {
        scaled /= thousand;
        index += 1;
    }
    let rounded = scaled
        .round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    format!("{}{}", rounded, SUFFIXES[index])
}

pub fn format_percentage(value: Decimal, decimals: u32) -> String {
    let rounded = value.round_dp_with_strategy(decimals, RoundingStrategy::MidpointAwayFromZero);
    format!("{:.*}%", decimals as usize, rounded)
}

/// "Xh Ym" when at least an hour, else "Ym".
pub fn format_duration(seconds: u64) -> String {
    let hours = seconds / 3600;
    let minutes = (seconds % 3600) / 60;
    if hours > 0 {
        format!("{}h {}m", hours, minutes)
    } else {
        format!("{}m", minutes)
    }
}

pub fn get_initials(name: &str) -> String {
    let parts: Vec<&str> = name.split_whitespace().collect();
    let first_letter = |part: &str| part.chars().next();
    let letters: Vec<char> = match parts.as_slice() {
        [] => Vec::new(),
        [only] => first_letter(only).into_iter().collect(),
        [first, .., last] => first_letter(first)
            .into_iter()
            .chain(first_letter(last))
            .collect(),
    };
    letters.into_iter().flat_map(char::to_uppercase).collect()
}

pub fn truncate(text: &str, max_len: usize) -> String {
    if text.chars().count() <= max_len {
        return text.to_string();
    }
    let mut truncated: String = text.chars().take(max_len).collect();
    truncated.push_str("...");
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rust_decimal_macros::dec;

    #[test]
    fn currency_in_supported_locales() {
        assert_eq!(
            format_currency(dec!(1234.5), Locale::EnUs, Currency::Usd),
            "$1,234.50"
        );
        assert_eq!(
            format_currency(dec!(-1234567.891), Locale::EnGb, Currency::Gbp),
            "-£1,234,567.89"
        );
        assert_eq!(
            format_currency(dec!(1234.5), Locale::DeDe, Currency::Eur),
            "1.234,50\u{a0}€"
        );
        assert_eq!(
            format_currency(dec!(999), Locale::FrFr, Currency::Eur),
            "999,00\u{a0}€"
        );
        assert_eq!(
            format_currency(Decimal::ZERO, Locale::JaJp, Currency::Jpy),
            "¥0.00"
        );
    }

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(
            format_currency(dec!(0.005), Locale::EnUs, Currency::Usd),
            "$0.01"
        );
        assert_eq!(
            format_currency(dec!(-0.001), Locale::EnUs, Currency::Usd),
            "$0.00"
        );
    }

    #[test]
    fn relative_date_boundaries() {
        let now = Utc.with_ymd_and_hms(2024, 11, 20, 12, 0, 0).unwrap();
        let ago = |secs: i64| format_relative_date_at(now - Duration::seconds(secs), now);
        assert_eq!(ago(59), "just now");
        assert_eq!(ago(61), "1 minute ago");
        assert_eq!(ago(150), "2 minutes ago");
        assert_eq!(ago(3601), "1 hour ago");
        assert_eq!(ago(2 * 86_400), "2 days ago");
        assert_eq!(ago(604_800), "1 week ago");
        assert_eq!(ago(2_592_000), "Oct 21, 2024");
    }

    #[test]
    fn date_modes() {
        let date = NaiveDate::from_ymd_opt(2024, 11, 5).unwrap();
        assert_eq!(format_date(date, DateFormat::Short), "Nov 5");
        assert_eq!(format_date(date, DateFormat::Medium), "Nov 5, 2024");
        assert_eq!(format_date(date, DateFormat::Long), "Tuesday, November 5, 2024");
        let now = Utc.with_ymd_and_hms(2024, 11, 7, 1, 0, 0).unwrap();
        assert_eq!(
            format_date_at(date, DateFormat::Relative, now),
            "2 days ago"
        );
    }

    #[test]
    fn abbreviated_numbers() {
        assert_eq!(format_number(Decimal::ZERO, 1), "0");
        assert_eq!(format_number(dec!(999.4), 1), "999");
        assert_eq!(format_number(dec!(1000), 1), "1K");
        assert_eq!(format_number(dec!(1250), 1), "1.3K");
        assert_eq!(format_number(dec!(2500000), 1), "2.5M");
        assert_eq!(format_number(dec!(7000000000), 2), "7B");
        assert_eq!(format_number(dec!(3200000000000000), 1), "3200T");
    }

    #[test]
    fn small_helpers() {
        assert_eq!(format_percentage(dec!(12.345), 1), "12.3%");
        assert_eq!(format_percentage(dec!(50), 0), "50%");
        assert_eq!(format_duration(3_900), "1h 5m");
        assert_eq!(format_duration(59), "0m");
        assert_eq!(get_initials("Alex Rivera"), "AR");
        assert_eq!(get_initials("  maria de la cruz "), "MC");
        assert_eq!(get_initials("sam"), "S");
        assert_eq!(get_initials(""), "");
        assert_eq!(truncate("Weekly groceries", 6), "Weekly...");
        assert_eq!(truncate("Gas", 6), "Gas");
    }

    #[test]
    fn parses_codes() {
        assert_eq!("de_DE".parse::<Locale>().unwrap(), Locale::DeDe);
        assert_eq!("eur".parse::<Currency>().unwrap(), Currency::Eur);
        assert!("xx".parse::<Locale>().is_err());
        assert_eq!(serde_json::to_string(&Locale::JaJp).unwrap(), "\"ja-JP\"");
        assert_eq!(serde_json::to_string(&Currency::Cad).unwrap(), "\"CAD\"");
    }
}
