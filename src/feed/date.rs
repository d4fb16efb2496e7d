use serde_json::Value;
use time::format_description::well_known::{Iso8601, Rfc2822, Rfc3339};
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{Date, OffsetDateTime, PrimitiveDateTime, UtcOffset};

/// Local date-times without an offset. They are taken to be in UTC.
static DATE_TIME_FORMATS: &[&[BorrowedFormatItem<'_>]] = &[
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second].[subsecond]"),
];

static DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Interprets a JSON value as a point in time.
///
/// Strings are tried against the common textual formats; numbers are milliseconds since the Unix
/// epoch.
pub fn parse(value: &Value) -> Option<OffsetDateTime> {
    let date = match value {
        Value::String(s) => parse_str(s.trim()),
        Value::Number(n) => {
            let millis = n.as_i64().map(i128::from).or_else(|| {
                n.as_f64()
                    .filter(|f| f.is_finite())
                    .map(|f| f.trunc() as i128)
            })?;

            OffsetDateTime::from_unix_timestamp_nanos(millis.checked_mul(1_000_000)?).ok()
        }
        _ => None,
    }?;

    date.checked_to_offset(UtcOffset::UTC)
}

fn parse_str(s: &str) -> Option<OffsetDateTime> {
    if let Ok(date) = OffsetDateTime::parse(s, &Rfc3339) {
        return Some(date);
    }

    if let Ok(date) = OffsetDateTime::parse(s, &Rfc2822) {
        return Some(date);
    }

    if let Ok(date) = OffsetDateTime::parse(s, &Iso8601::DEFAULT) {
        return Some(date);
    }

    for &format in DATE_TIME_FORMATS {
        if let Ok(date) = PrimitiveDateTime::parse(s, format) {
            return Some(date.assume_utc());
        }
    }

    Date::parse(s, DATE_FORMAT)
        .ok()
        .map(|date| date.midnight().assume_utc())
}

/// Formats the date the way RSS wants it in `pubDate`.
pub fn to_rfc2822(date: OffsetDateTime) -> Result<String, time::error::Format> {
    date.format(&Rfc2822)
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use time::macros::datetime;

    use super::*;

    #[test]
    fn date_only() {
        assert_eq!(
            parse(&json!("2020-01-01")),
            Some(datetime!(2020-01-01 0:00 UTC))
        );
    }

    #[test]
    fn rfc3339_is_normalized_to_utc() {
        assert_eq!(
            parse(&json!("2021-06-15T12:30:00+02:00")),
            Some(datetime!(2021-06-15 10:30 UTC))
        );
        assert_eq!(
            parse(&json!("2021-06-15T10:30:00.250Z")),
            Some(datetime!(2021-06-15 10:30:00.25 UTC))
        );
    }

    #[test]
    fn rfc2822() {
        assert_eq!(
            parse(&json!("Tue, 15 Jun 2021 10:30:00 +0000")),
            Some(datetime!(2021-06-15 10:30 UTC))
        );
    }

    #[test]
    fn local_date_time_is_utc() {
        assert_eq!(
            parse(&json!("2021-06-15T10:30:00")),
            Some(datetime!(2021-06-15 10:30 UTC))
        );
        assert_eq!(
            parse(&json!("2021-06-15 10:30:00")),
            Some(datetime!(2021-06-15 10:30 UTC))
        );
    }

    #[test]
    fn epoch_milliseconds() {
        assert_eq!(
            parse(&json!(1_577_836_800_000_i64)),
            Some(datetime!(2020-01-01 0:00 UTC))
        );
        assert_eq!(
            parse(&json!(1_577_836_800_500.0)),
            Some(datetime!(2020-01-01 0:00:00.5 UTC))
        );
    }

    #[test]
    fn garbage() {
        assert_eq!(parse(&json!("yesterday")), None);
        assert_eq!(parse(&json!("")), None);
        assert_eq!(parse(&json!(null)), None);
        assert_eq!(parse(&json!(true)), None);
        assert_eq!(parse(&json!({ "date": "2020-01-01" })), None);
    }

    #[test]
    fn instants_past_year_9999_in_utc() {
        assert_eq!(parse(&json!("9999-12-31T23:59:59-01:00")), None);
        assert_eq!(parse(&json!("Fri, 31 Dec 9999 23:59:59 -0100")), None);
        assert_eq!(
            parse(&json!("9999-12-31T23:59:59+01:00")),
            Some(datetime!(9999-12-31 22:59:59 UTC))
        );
    }

    #[test]
    fn formats_for_rss() {
        assert_eq!(
            to_rfc2822(datetime!(2020-01-01 0:00 UTC)).unwrap(),
            "Wed, 01 Jan 2020 00:00:00 +0000"
        );
    }
}
