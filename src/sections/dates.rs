//! Date formatting shared by all entry renderers.

use chrono::NaiveDate;

use crate::settings::DateFormat;

/// Label used for open-ended ranges when the settings do not override it.
pub const PRESENT: &str = "Present";

/// Formats a resume date with the default format and present label.
///
/// `YYYY-MM` and `YYYY-MM-DD` become `"Mon YYYY"`, an empty value or `present` (any case)
/// becomes `"Present"`, anything unparseable is returned unchanged.
pub fn format_date(value: &str) -> String {
    format_date_with(value, DateFormat::Short, PRESENT)
}

/// Formats a resume date with an explicit output format and present label.
pub fn format_date_with(value: &str, format: DateFormat, present: &str) -> String {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("present") {
        return present.to_owned();
    }

    match parse_date(trimmed) {
        Some(date) => {
            let pattern = match format {
                DateFormat::Short => "%b %Y",
                DateFormat::Long => "%B %Y",
                DateFormat::Numeric => "%m/%Y",
                DateFormat::Year => "%Y",
            };
            date.format(pattern).to_string()
        }
        None => value.to_owned(),
    }
}

fn parse_date(value: &str) -> Option<NaiveDate> {
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(date);
    }
    let bytes = value.as_bytes();
    if bytes.len() == 7 && bytes[4] == b'-' {
        return NaiveDate::parse_from_str(&format!("{}-01", value), "%Y-%m-%d").ok();
    }
    None
}

/// Formats a `start – end` range.
///
/// Returns `None` when both ends are blank.  A missing end means the range is ongoing; a
/// missing start shows only the end.
pub fn format_date_range(
    start: &str,
    end: &str,
    format: DateFormat,
    present: &str,
    separator: &str,
) -> Option<String> {
    let start = start.trim();
    let end = end.trim();
    match (start.is_empty(), end.is_empty()) {
        (true, true) => None,
        (true, false) => Some(format_date_with(end, format, present)),
        _ => Some(format!(
            "{}{}{}",
            format_date_with(start, format, present),
            separator,
            format_date_with(end, format, present)
        )),
    }
}

/// Formats a single point in time, or `None` when blank.
pub fn format_single_date(value: &str, format: DateFormat, present: &str) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(format_date_with(value, format, present))
    }
}
