use chrono::format::{Item, StrftimeItems};
use chrono::{NaiveDate, NaiveDateTime};

/// Formats tried in order when no caller-supplied format matches first.
/// Month-first slashes follow the usual spreadsheet export convention;
/// dotted day-first is the SAP default.
pub const DEFAULT_DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
    "%d.%m.%Y",
    "%d-%b-%Y",
    "%d %b %Y",
    "%b %d, %Y",
];

/// Parses calendar dates, trying extra formats before the defaults.
#[derive(Debug, Clone, Default)]
pub struct DateParser {
    extra: Vec<String>,
}

impl DateParser {
    pub fn new(extra: Vec<String>) -> Self {
        Self { extra }
    }

    /// Parse `value`, discarding any time of day. `None` if no format fits.
    pub fn parse(&self, value: &str) -> Option<NaiveDate> {
        let value = value.trim();
        if value.is_empty() {
            return None;
        }
        self.extra
            .iter()
            .map(String::as_str)
            .chain(DEFAULT_DATE_FORMATS.iter().copied())
            .find_map(|fmt| parse_with(value, fmt))
    }
}

fn parse_with(value: &str, fmt: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value, fmt)
        .ok()
        .or_else(|| NaiveDateTime::parse_from_str(value, fmt).ok().map(|dt| dt.date()))
}

/// True if `fmt` is a strftime pattern chrono understands.
pub fn is_valid_format(fmt: &str) -> bool {
    !fmt.is_empty() && !StrftimeItems::new(fmt).any(|item| matches!(item, Item::Error))
}
