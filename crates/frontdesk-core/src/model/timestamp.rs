// Lenient timestamp decoding.
//
// Datetime fields arrive as RFC 3339 strings, but date-only fields
// (`2025-04-10`) show up depending on the content type's schema. Both are
// accepted; a date-only value is read as midnight UTC. Anything else is
// read as absent rather than failing the whole record.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer};
use tracing::debug;

pub(crate) fn parse(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

pub(crate) fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(match raw.as_deref() {
        None | Some("") => None,
        Some(s) => {
            let parsed = parse(s);
            if parsed.is_none() {
                debug!(value = s, "ignoring unparsable timestamp");
            }
            parsed
        }
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    #[test]
    fn rfc3339_with_offset_is_normalized() {
        let dt = parse("2025-04-10T14:00:00+02:00").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 4, 10, 12, 0, 0).unwrap());
    }

    #[test]
    fn date_only_is_midnight_utc() {
        let dt = parse("2025-04-10").unwrap();
        assert_eq!(dt, Utc.with_ymd_and_hms(2025, 4, 10, 0, 0, 0).unwrap());
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse("next tuesday").is_none());
    }

    #[derive(Debug, serde::Deserialize)]
    struct Stamped {
        #[serde(default, deserialize_with = "deserialize")]
        at: Option<DateTime<Utc>>,
    }

    #[test]
    fn unparsable_field_reads_as_absent() {
        let s: Stamped = serde_json::from_str(r#"{"at":"soon"}"#).unwrap();
        assert!(s.at.is_none());
        let s: Stamped = serde_json::from_str(r#"{"at":""}"#).unwrap();
        assert!(s.at.is_none());
        let s: Stamped = serde_json::from_str(r#"{"at":"2025-04-10"}"#).unwrap();
        assert!(s.at.is_some());
    }
}
