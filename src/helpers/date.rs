//! Date helper functions

use chrono::{DateTime, TimeZone};

/// Format a date using a Moment.js-compatible format string
///
/// # Examples
/// ```ignore
/// format_date(&date, "DD/MM/YYYY") // -> "01/01/2024"
/// ```
pub fn format_date<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let chrono_format = moment_to_chrono_format(format);
    date.format(&chrono_format).to_string()
}

/// Generate a <time> HTML element
pub fn time_tag<Tz: TimeZone>(date: &DateTime<Tz>, format: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let datetime = date.format("%Y-%m-%dT%H:%M:%S%:z").to_string();
    let display = format_date(date, format);
    format!(r#"<time datetime="{}">{}</time>"#, datetime, display)
}

/// Convert a Moment.js format string to a chrono format string
fn moment_to_chrono_format(format: &str) -> String {
    // Longest patterns first within each category so substrings don't
    // clobber each other
    let replacements = [
        ("YYYY", "%Y"),
        ("YY", "%y"),
        ("MMMM", "%B"),
        ("MMM", "%b"),
        ("MM", "%m"),
        ("DD", "%d"),
        ("HH", "%H"),
        ("hh", "%I"),
        ("mm", "%M"),
        ("ss", "%S"),
        ("dddd", "%A"),
        ("ddd", "%a"),
    ];

    let mut result = format.to_string();
    for (from, to) in replacements {
        result = result.replace(from, to);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, TimeZone};

    #[test]
    fn test_format_date() {
        let date = Local.with_ymd_and_hms(2024, 1, 15, 10, 30, 0).unwrap();
        assert_eq!(format_date(&date, "YYYY-MM-DD"), "2024-01-15");
        assert_eq!(format_date(&date, "DD/MM/YYYY"), "15/01/2024");
    }

    #[test]
    fn test_time_tag() {
        let date = Local.with_ymd_and_hms(2024, 1, 15, 0, 0, 0).unwrap();
        let tag = time_tag(&date, "DD/MM/YYYY");
        assert!(tag.starts_with("<time datetime=\"2024-01-15T00:00:00"));
        assert!(tag.contains(">15/01/2024</time>"));
    }

    #[test]
    fn test_moment_to_chrono() {
        assert_eq!(moment_to_chrono_format("YYYY-MM-DD"), "%Y-%m-%d");
        assert_eq!(moment_to_chrono_format("HH:mm:ss"), "%H:%M:%S");
    }
}
