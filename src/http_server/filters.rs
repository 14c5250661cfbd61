use chrono::NaiveDateTime;

use crate::aggregation::START_TIME_FORMAT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateFormat {
    /// `Tuesday May, 21, 2019 at 9:30PM`
    Full,
    /// `Tue 05, 21, 2019 9:30PM`
    Medium,
}

impl DateFormat {
    fn pattern(self) -> &'static str {
        match self {
            DateFormat::Full => "%A %B, %-d, %Y at %-I:%M%p",
            DateFormat::Medium => "%a %m, %d, %Y %-I:%M%p",
        }
    }
}

/// Reformats a stored start time for display. Unparseable input is returned unchanged.
pub fn format_datetime(value: &str, format: DateFormat) -> String {
    match NaiveDateTime::parse_from_str(value, START_TIME_FORMAT) {
        Ok(dt) => dt.format(format.pattern()).to_string(),
        Err(_) => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_format() {
        assert_eq!(
            format_datetime("2019-05-21 21:30:00", DateFormat::Full),
            "Tuesday May, 21, 2019 at 9:30PM"
        );
    }

    #[test]
    fn test_medium_format() {
        assert_eq!(
            format_datetime("2019-05-21 21:30:00", DateFormat::Medium),
            "Tue 05, 21, 2019 9:30PM"
        );
        assert_eq!(
            format_datetime("2035-04-01 09:05:00", DateFormat::Medium),
            "Sun 04, 01, 2035 9:05AM"
        );
    }

    #[test]
    fn test_unparseable_value_passes_through() {
        assert_eq!(format_datetime("soon", DateFormat::Full), "soon");
    }
}
