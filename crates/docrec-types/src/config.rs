//! Date format configuration
//!
//! Patterns use the familiar `yyyy-MM-dd HH:mm:ss` letters and are translated
//! to chrono format strings when used. Instants are read and written in UTC.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use docrec_diagnostics::{RecordError, Result};
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// The short (date) and long (date-time) patterns used to read and write dates
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DateFormats {
    pub date: String,
    pub date_time: String,
}

impl Default for DateFormats {
    fn default() -> Self {
        Self {
            date: Self::DEFAULT_DATE.to_string(),
            date_time: Self::DEFAULT_DATE_TIME.to_string(),
        }
    }
}

impl DateFormats {
    pub const DEFAULT_DATE: &'static str = "yyyy-MM-dd";
    pub const DEFAULT_DATE_TIME: &'static str = "yyyy-MM-dd HH:mm:ss";

    pub fn new(date: impl Into<String>, date_time: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            date_time: date_time.into(),
        }
    }

    /// Pattern used for an input: the long one when the input is longer
    /// than the short pattern itself
    pub fn select(&self, input: &str) -> &str {
        if input.len() > self.date.len() {
            &self.date_time
        } else {
            &self.date
        }
    }

    /// Parse a date string with the selected pattern
    pub fn parse(&self, input: &str) -> Result<DateTime<Utc>> {
        let pattern = self.select(input);
        parse_with_pattern(input, pattern).ok_or_else(|| {
            log::debug!("'{input}' does not match date pattern '{pattern}'");
            RecordError::date_parse(input, pattern)
        })
    }

    /// Format an instant with the long pattern
    pub fn format(&self, instant: &DateTime<Utc>) -> String {
        let mut out = String::new();
        match write!(out, "{}", instant.format(&to_chrono_pattern(&self.date_time))) {
            Ok(()) => out,
            Err(_) => instant.to_rfc3339(),
        }
    }
}

/// Parse `input` with a single pattern; date-only patterns yield midnight
pub fn parse_with_pattern(input: &str, pattern: &str) -> Option<DateTime<Utc>> {
    let format = to_chrono_pattern(pattern);
    let input = input.trim();

    if format.contains("%z") || format.contains("%:z") {
        return DateTime::parse_from_str(input, &format)
            .ok()
            .map(|dt| dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(input, &format) {
        return Some(Utc.from_utc_datetime(&naive));
    }
    NaiveDate::parse_from_str(input, &format)
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Translate pattern letters to a chrono format string
pub fn to_chrono_pattern(pattern: &str) -> String {
    let mut out = String::with_capacity(pattern.len() * 2);
    let chars: Vec<char> = pattern.chars().collect();
    let mut i = 0;

    while i < chars.len() {
        let c = chars[i];
        let run = chars[i..].iter().take_while(|&&next| next == c).count();

        match c {
            '\'' => {
                // quoted literal; '' is an escaped quote
                if run >= 2 {
                    out.push('\'');
                    i += 2;
                    continue;
                }
                i += 1;
                while i < chars.len() {
                    if chars[i] == '\'' {
                        if chars.get(i + 1) == Some(&'\'') {
                            out.push('\'');
                            i += 2;
                            continue;
                        }
                        break;
                    }
                    push_literal(&mut out, chars[i]);
                    i += 1;
                }
                i += 1;
                continue;
            }
            'y' => out.push_str(if run == 2 { "%y" } else { "%Y" }),
            'M' => out.push_str(match run {
                1 | 2 => "%m",
                3 => "%b",
                _ => "%B",
            }),
            'd' => out.push_str("%d"),
            'H' => out.push_str("%H"),
            'h' => out.push_str("%I"),
            'm' => out.push_str("%M"),
            's' => out.push_str("%S"),
            'S' => out.push_str("%3f"),
            'a' => out.push_str("%p"),
            'E' => out.push_str(if run <= 3 { "%a" } else { "%A" }),
            'Z' => out.push_str("%z"),
            'X' => out.push_str("%:z"),
            other => {
                for _ in 0..run {
                    push_literal(&mut out, other);
                }
            }
        }
        i += run;
    }
    out
}

fn push_literal(out: &mut String, c: char) {
    if c == '%' {
        out.push_str("%%");
    } else {
        out.push(c);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Datelike;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let formats: DateFormats = serde_json::from_str(r#"{"date": "dd/MM/yyyy"}"#).unwrap();
        assert_eq!(formats.date, "dd/MM/yyyy");
        assert_eq!(formats.date_time, DateFormats::DEFAULT_DATE_TIME);
    }

    #[test]
    fn test_pattern_translation() {
        assert_eq!(to_chrono_pattern("yyyy-MM-dd"), "%Y-%m-%d");
        assert_eq!(to_chrono_pattern("yyyy-MM-dd HH:mm:ss"), "%Y-%m-%d %H:%M:%S");
        assert_eq!(to_chrono_pattern("yyyy-MM-dd'T'HH:mm:ss.SSS"), "%Y-%m-%dT%H:%M:%S.%3f");
        assert_eq!(to_chrono_pattern("dd MMM yy"), "%d %b %y");
        assert_eq!(to_chrono_pattern("h 'o''clock' 100%"), "%I o'clock 100%%");
    }

    #[test]
    fn test_select_by_length() {
        let formats = DateFormats::default();
        assert_eq!(formats.select("2024-01-15"), "yyyy-MM-dd");
        assert_eq!(formats.select("2024-01-15 10:30:00"), "yyyy-MM-dd HH:mm:ss");
    }

    #[test]
    fn test_parse_short_and_long() {
        let formats = DateFormats::default();
        let day = formats.parse("2024-01-15").ok();
        assert_eq!(day.map(|d| (d.year(), d.month(), d.day())), Some((2024, 1, 15)));
        assert_eq!(
            formats.parse("2024-01-15 10:30:00").ok().map(|d| d.timestamp()),
            Some(1_705_314_600)
        );
    }

    #[test]
    fn test_parse_failure_names_format() {
        let err = DateFormats::default().parse("15/01/2024 10:30");
        assert_eq!(
            err.err(),
            Some(RecordError::date_parse("15/01/2024 10:30", "yyyy-MM-dd HH:mm:ss"))
        );
    }

    #[test]
    fn test_format_uses_long_pattern() {
        let instant = Utc.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).single();
        let text = instant.map(|i| DateFormats::default().format(&i));
        assert_eq!(text.as_deref(), Some("2024-01-15 10:30:00"));
    }
}
