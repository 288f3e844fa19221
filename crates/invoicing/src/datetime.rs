//! Wall-clock timestamps on the wire.
//!
//! Invoices carry local wall-clock time without a zone. Inbound values may be
//! RFC 3339 (the offset is dropped, the wall time kept), naive ISO-8601, or a
//! bare date.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Deserializer, Serializer, de};

const WIRE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";
const DATE_FORMAT: &str = "%Y-%m-%d";

/// Human-facing rendering used in summaries and QR text.
pub const DISPLAY_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub fn format(value: &NaiveDateTime) -> String {
    value.format(WIRE_FORMAT).to_string()
}

pub fn parse(raw: &str) -> Result<NaiveDateTime, chrono::ParseError> {
    let raw = raw.trim();
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.naive_local());
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, WIRE_FORMAT) {
        return Ok(naive);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map(|date| date.and_time(NaiveTime::MIN))
}

pub fn serialize<S: Serializer>(value: &NaiveDateTime, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(value))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDateTime, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|e| de::Error::custom(format!("invalid timestamp `{raw}`: {e}")))
}

/// Same conventions for optional fields; `null` maps to `None`.
pub mod option {
    use super::*;

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveDateTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(v) => super::serialize(v, serializer),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveDateTime>, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .map_err(|e| de::Error::custom(format!("invalid timestamp `{raw}`: {e}"))),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd_hms(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(y, m, d)
            .unwrap()
            .and_hms_opt(h, min, s)
            .unwrap()
    }

    #[test]
    fn parses_accepted_shapes() {
        let expected = ymd_hms(2024, 3, 15, 10, 30, 0);
        assert_eq!(parse("2024-03-15T10:30:00").unwrap(), expected);
        assert_eq!(parse("2024-03-15T10:30:00+03:00").unwrap(), expected);
        assert_eq!(parse("2024-03-15T10:30:00Z").unwrap(), expected);
        assert_eq!(parse("2024-03-15").unwrap(), ymd_hms(2024, 3, 15, 0, 0, 0));
    }

    #[test]
    fn keeps_fractional_seconds() {
        let parsed = parse("2024-03-15T10:30:00.250").unwrap();
        assert_eq!(format(&parsed), "2024-03-15T10:30:00.250");
    }

    #[test]
    fn whole_seconds_format_without_fraction() {
        assert_eq!(format(&ymd_hms(2024, 1, 2, 3, 4, 5)), "2024-01-02T03:04:05");
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse("yesterday").is_err());
    }
}
