//! Start-date parsing.
//!
//! Dates arrive in mixed formats. Ambiguous numeric dates are read
//! day-first (`05/03/2020` is 5 March 2020).

use chrono::{DateTime, NaiveDate, NaiveDateTime};

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%d/%m/%Y %H:%M:%S",
    "%d/%m/%Y %H:%M",
    "%d.%m.%Y %H:%M",
    "%d-%m-%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%Y/%m/%d",
    "%d/%m/%Y",
    "%d-%m-%Y",
    "%d.%m.%Y",
    "%d/%m/%y",
    "%d-%m-%y",
    "%d.%m.%y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
    "%B %d %Y",
    "%b %d %Y",
];

/// Parse a start date, returning `None` for anything unrecognised.
pub fn parse_start_date(raw: &str) -> Option<NaiveDate> {
    let s = raw.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Some(date) = NaiveDateTime::parse_from_str(s, fmt)
            .ok()
            .and_then(|naive| plausible(naive.date()))
        {
            return Some(date);
        }
    }

    for fmt in DATE_FORMATS {
        // %Y also accepts short years; let the %y formats handle those
        if let Some(date) = NaiveDate::parse_from_str(s, fmt).ok().and_then(plausible) {
            return Some(date);
        }
    }

    parse_partial(s)
}

/// Year-month (`2020-03`) and bare-year (`2020`) values.
fn parse_partial(s: &str) -> Option<NaiveDate> {
    if s.len() == 4 && s.bytes().all(|b| b.is_ascii_digit()) {
        let year: i32 = s.parse().ok()?;
        return plausible(NaiveDate::from_ymd_opt(year, 1, 1)?);
    }

    if let Ok(date) = NaiveDate::parse_from_str(&format!("{}-01", s), "%Y-%m-%d") {
        return plausible(date);
    }

    // Date followed by an unrecognised time part
    let head = s.split(['T', ' ']).next()?;
    if head.len() < s.len() {
        return NaiveDate::parse_from_str(head, "%Y-%m-%d")
            .ok()
            .and_then(plausible);
    }

    None
}

fn plausible(date: NaiveDate) -> Option<NaiveDate> {
    use chrono::Datelike;
    (1000..=9999).contains(&date.year()).then_some(date)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(y, m, d)
    }

    #[test]
    fn test_iso_dates() {
        assert_eq!(parse_start_date("2020-03-05"), ymd(2020, 3, 5));
        assert_eq!(parse_start_date("2020-03-05 14:30:00"), ymd(2020, 3, 5));
        assert_eq!(parse_start_date("2020-03-05T14:30:00.250"), ymd(2020, 3, 5));
        assert_eq!(parse_start_date("2020-03-05T14:30:00Z"), ymd(2020, 3, 5));
    }

    #[test]
    fn test_day_first() {
        assert_eq!(parse_start_date("05/03/2020"), ymd(2020, 3, 5));
        assert_eq!(parse_start_date("05.03.2020"), ymd(2020, 3, 5));
        assert_eq!(parse_start_date("25-12-2019"), ymd(2019, 12, 25));
        assert_eq!(parse_start_date("05/03/2020 09:15"), ymd(2020, 3, 5));
    }

    #[test]
    fn test_two_digit_year() {
        assert_eq!(parse_start_date("05/03/20"), ymd(2020, 3, 5));
    }

    #[test]
    fn test_month_names() {
        assert_eq!(parse_start_date("5 March 2020"), ymd(2020, 3, 5));
        assert_eq!(parse_start_date("March 5, 2020"), ymd(2020, 3, 5));
        assert_eq!(parse_start_date("5 Mar 2020"), ymd(2020, 3, 5));
    }

    #[test]
    fn test_partial_dates() {
        assert_eq!(parse_start_date("2017"), ymd(2017, 1, 1));
        assert_eq!(parse_start_date("2017-06"), ymd(2017, 6, 1));
        assert_eq!(parse_start_date("2017-06-02 noon"), ymd(2017, 6, 2));
    }

    #[test]
    fn test_unparseable() {
        assert_eq!(parse_start_date(""), None);
        assert_eq!(parse_start_date("   "), None);
        assert_eq!(parse_start_date("unknown"), None);
        assert_eq!(parse_start_date("31/02/2020"), None);
        assert_eq!(parse_start_date("not available"), None);
    }
}
