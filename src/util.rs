// Utility helpers for parsing and basic statistics.
//
// This module centralizes all the "dirty" CSV/number/date handling so the
// rest of the code can assume clean, typed values.
use chrono::{Month, NaiveDate, NaiveDateTime};
use num_format::{Locale, ToFormattedString};

/// Parse a string-like value into `f64` while being forgiving about
/// formatting issues that are common in CSV exports (commas, spaces, text).
///
/// - Accepts `Option<&str>` so callers can pass through optional fields.
/// - Trims whitespace.
/// - Rejects values that contain alphabetic characters.
/// - Strips thousands separators like `","` before parsing.
/// - Returns `None` for anything that cannot be safely parsed.
pub fn parse_f64_safe(s: Option<&str>) -> Option<f64> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if s.chars().any(|c| c.is_ascii_alphabetic()) {
        return None;
    }
    let s = s.replace(",", "");
    s.parse::<f64>().ok()
}

pub fn parse_u32_safe(s: Option<&str>) -> Option<u32> {
    // `?` propagates `None` early if the option is missing.
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    // Item sequence numbers occasionally come through as "1.0".
    if let Some(stripped) = s.strip_suffix(".0") {
        return stripped.parse::<u32>().ok();
    }
    s.parse::<u32>().ok()
}

/// Parse a timestamp column into `NaiveDateTime`.
///
/// The orders CSV carries full `YYYY-MM-DD HH:MM:SS` timestamps; a bare
/// `YYYY-MM-DD` is accepted as midnight so date-only exports still load.
pub fn parse_datetime_safe(s: Option<&str>) -> Option<NaiveDateTime> {
    let s = s?.trim();
    if s.is_empty() {
        return None;
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S") {
        return Some(ts);
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
}

pub fn days_diff(start: NaiveDate, end: NaiveDate) -> i64 {
    // `NaiveDate` supports subtraction; the result is a `Duration` in days.
    (end - start).num_days()
}

pub fn average(v: &[f64]) -> f64 {
    // Standard arithmetic mean; returns 0 for an empty slice to avoid NaNs.
    if v.is_empty() {
        return 0.0;
    }
    let sum: f64 = v.iter().copied().sum();
    sum / v.len() as f64
}

/// Human label for a calendar-month bucket, e.g. `"January 2018"`.
pub fn month_label(year: i32, month: u32) -> String {
    let name = Month::try_from(month as u8).map(|m| m.name()).unwrap_or("?");
    format!("{} {}", name, year)
}

pub fn format_number(n: f64, decimals: usize) -> String {
    // Format a floating-point value with:
    // - a fixed number of decimal places, and
    // - locale-aware thousands separators (e.g., `1,234,567.89`).
    let neg = n.is_sign_negative();
    let abs_n = n.abs();
    // First, format to a plain fixed-decimal string like `1234567.89`.
    let s = format!("{:.*}", decimals, abs_n);
    let mut parts = s.split('.');
    let int_part = parts.next().unwrap_or("0");
    let frac_part = parts.next();
    // Use `num-format` to insert commas into the integer portion.
    let int_val: i64 = int_part.parse().unwrap_or(0);
    let mut res = int_val.to_formatted_string(&Locale::en);
    if let Some(frac) = frac_part {
        if decimals > 0 {
            res.push('.');
            res.push_str(frac);
        }
    } else if decimals > 0 {
        res.push('.');
        res.push_str(&"0".repeat(decimals));
    }
    if neg {
        format!("-{}", res)
    } else {
        res
    }
}

pub fn format_int<T>(n: T) -> String
where
    T: ToFormattedString,
{
    // Thin wrapper around `num-format` for integer-like values. This is used
    // for counts in console messages (e.g., `9,855 rows loaded`).
    n.to_formatted_string(&Locale::en)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_full_timestamps_and_bare_dates() {
        let ts = parse_datetime_safe(Some("2018-01-05 14:30:00")).unwrap();
        assert_eq!(ts.to_string(), "2018-01-05 14:30:00");
        let midnight = parse_datetime_safe(Some("2018-01-05")).unwrap();
        assert_eq!(midnight.to_string(), "2018-01-05 00:00:00");
        assert!(parse_datetime_safe(Some("")).is_none());
        assert!(parse_datetime_safe(Some("05/01/2018")).is_none());
        assert!(parse_datetime_safe(None).is_none());
    }

    #[test]
    fn parse_f64_rejects_text_and_strips_commas() {
        assert_eq!(parse_f64_safe(Some("1,234.50")), Some(1234.50));
        assert_eq!(parse_f64_safe(Some(" 10 ")), Some(10.0));
        assert_eq!(parse_f64_safe(Some("n/a")), None);
        assert_eq!(parse_f64_safe(Some("")), None);
    }

    #[test]
    fn item_sequence_accepts_float_exports() {
        assert_eq!(parse_u32_safe(Some("3")), Some(3));
        assert_eq!(parse_u32_safe(Some("3.0")), Some(3));
        assert_eq!(parse_u32_safe(Some("abc")), None);
    }

    #[test]
    fn formats_numbers_with_separators() {
        assert_eq!(format_number(1234567.891, 2), "1,234,567.89");
        assert_eq!(format_number(-42.0, 2), "-42.00");
        assert_eq!(format_int(9855), "9,855");
    }

    #[test]
    fn month_labels() {
        assert_eq!(month_label(2018, 1), "January 2018");
        assert_eq!(month_label(2018, 12), "December 2018");
    }
}
