//! Date cell normalization to ISO `YYYY-MM-DD`

use chrono::NaiveDate;

/// Accepted layouts, day-first before year-first
///
/// Two-digit years are tried first: `%Y` also accepts a two-digit year,
/// while `%y` rejects a four-digit one as trailing input.
const DATE_FORMATS: &[&str] = &[
    "%d/%m/%y", "%d-%m-%y", "%d.%m.%y", "%d/%m/%Y", "%d-%m-%Y", "%d.%m.%Y", "%Y/%m/%d",
    "%Y-%m-%d", "%Y.%m.%d",
];

/// Parse a date cell into a calendar date
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }

    // Spreadsheet exports often carry a midnight time part
    let date_part = trimmed
        .split(|c: char| c == ' ' || c == 'T')
        .next()
        .unwrap_or(trimmed);

    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(date_part, fmt).ok())
}

/// Normalize a date cell to `YYYY-MM-DD`, or `None` if it does not parse
pub fn normalize_date(value: &str) -> Option<String> {
    parse_date(value).map(|d| d.format("%Y-%m-%d").to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_day_first_formats() {
        assert_eq!(normalize_date("05/01/2024").as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date("05-01-2024").as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date("05.01.2024").as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date("05.01.24").as_deref(), Some("2024-01-05"));
    }

    #[test]
    fn test_year_first_and_time_suffix() {
        assert_eq!(normalize_date("2024-01-05").as_deref(), Some("2024-01-05"));
        assert_eq!(normalize_date("2024/01/05").as_deref(), Some("2024-01-05"));
        assert_eq!(
            normalize_date("2024-01-05 00:00:00").as_deref(),
            Some("2024-01-05")
        );
        assert_eq!(
            normalize_date("2024-01-05T00:00:00").as_deref(),
            Some("2024-01-05")
        );
    }

    #[test]
    fn test_unparseable_dates() {
        assert_eq!(normalize_date(""), None);
        assert_eq!(normalize_date("next tuesday"), None);
        assert_eq!(normalize_date("31/02/2024"), None);
    }
}
