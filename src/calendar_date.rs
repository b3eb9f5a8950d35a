//! Calendar dates, e.g. the date of an income, in JSON and query strings.

use serde::{Deserialize, Deserializer, de};
use time::{
    Date, Duration, Month, OffsetDateTime, format_description::well_known::Rfc3339,
    macros::format_description,
};

time::serde::format_description!(pub iso_date, Date, "[year]-[month]-[day]");

/// Parse either a `YYYY-MM-DD` date or an RFC 3339 date-time.
///
/// The date part of a date-time is used as is, without converting it to another timezone.
pub fn parse_date(raw: &str) -> Option<Date> {
    let raw = raw.trim();

    Date::parse(raw, format_description!("[year]-[month]-[day]"))
        .ok()
        .or_else(|| {
            OffsetDateTime::parse(raw, &Rfc3339)
                .ok()
                .map(|date_time| date_time.date())
        })
}

/// Deserialize a date with [parse_date].
pub fn deserialize_date<'de, D>(deserializer: D) -> Result<Date, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;

    parse_date(&raw).ok_or_else(|| de::Error::custom(format!("invalid date \"{raw}\"")))
}

/// Deserialize an optional date with [parse_date], treating an empty string as absent.
pub fn deserialize_optional_date<'de, D>(deserializer: D) -> Result<Option<Date>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;

    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => parse_date(raw)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date \"{raw}\""))),
    }
}

/// The first day of the month `date` falls in.
pub fn first_of_month(date: Date) -> Date {
    date - Duration::days(i64::from(date.day()) - 1)
}

/// The first day of the month after the one `date` falls in.
pub fn first_of_next_month(date: Date) -> Date {
    // The 1st plus 31 days always lands in the next month.
    first_of_month(first_of_month(date) + Duration::days(31))
}

/// The first day of the month `months` months before the one `date` falls in.
pub fn first_of_month_before(date: Date, months: u32) -> Date {
    let month_index = date.year() * 12 + i32::from(u8::from(date.month())) - 1;
    let target_index = month_index - months as i32;
    let year = target_index.div_euclid(12);
    let month = (target_index.rem_euclid(12) + 1) as u8;

    match Month::try_from(month).and_then(|month| Date::from_calendar_date(year, month, 1)) {
        Ok(date) => date,
        Err(_) => Date::MIN,
    }
}

#[cfg(test)]
mod tests {
    use serde::Deserialize;
    use time::macros::date;

    use super::{
        deserialize_optional_date, first_of_month, first_of_month_before, first_of_next_month,
        iso_date, parse_date,
    };

    #[test]
    fn parses_plain_date() {
        assert_eq!(parse_date("2024-02-29"), Some(date!(2024 - 02 - 29)));
    }

    #[test]
    fn parses_date_part_of_date_time() {
        assert_eq!(
            parse_date("2024-03-01T23:30:00+13:00"),
            Some(date!(2024 - 03 - 01))
        );
        assert_eq!(
            parse_date("2024-03-01T00:00:00.000Z"),
            Some(date!(2024 - 03 - 01))
        );
    }

    #[test]
    fn rejects_garbage() {
        assert_eq!(parse_date("yesterday"), None);
        assert_eq!(parse_date("2024-02-30"), None);
    }

    #[derive(Debug, Deserialize)]
    struct Dated {
        #[serde(default, deserialize_with = "deserialize_optional_date")]
        date: Option<time::Date>,
    }

    #[test]
    fn optional_date_treats_empty_as_absent() {
        let dated: Dated = serde_json::from_str(r#"{"date": ""}"#).unwrap();
        assert_eq!(dated.date, None);

        let dated: Dated = serde_json::from_str("{}").unwrap();
        assert_eq!(dated.date, None);

        let dated: Dated = serde_json::from_str(r#"{"date": "2025-01-31"}"#).unwrap();
        assert_eq!(dated.date, Some(date!(2025 - 01 - 31)));
    }

    #[test]
    fn serializes_iso_date() {
        #[derive(serde::Serialize)]
        struct Wrapper {
            #[serde(with = "iso_date")]
            date: time::Date,
        }

        let json = serde_json::to_string(&Wrapper {
            date: date!(2025 - 07 - 04),
        })
        .unwrap();

        assert_eq!(json, r#"{"date":"2025-07-04"}"#);
    }

    #[test]
    fn month_boundaries() {
        assert_eq!(first_of_month(date!(2025 - 02 - 28)), date!(2025 - 02 - 01));
        assert_eq!(first_of_next_month(date!(2025 - 01 - 31)), date!(2025 - 02 - 01));
        assert_eq!(first_of_next_month(date!(2024 - 12 - 15)), date!(2025 - 01 - 01));
        assert_eq!(
            first_of_month_before(date!(2025 - 03 - 15), 5),
            date!(2024 - 10 - 01)
        );
        assert_eq!(
            first_of_month_before(date!(2025 - 03 - 15), 0),
            date!(2025 - 03 - 01)
        );
    }
}
