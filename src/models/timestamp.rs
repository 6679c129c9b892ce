//! Serde helpers for backend timestamps.
//!
//! The backend writes `java.util.Date` values as ISO-8601 strings
//! ("2025-03-01T09:15:00.000+00:00") but older endpoints still answer with
//! epoch milliseconds. Both are accepted; values are always written back as
//! RFC 3339.

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serializer, de};

#[derive(Deserialize)]
#[serde(untagged)]
enum Raw {
    Millis(i64),
    Text(String),
}

fn from_raw<E: de::Error>(raw: Raw) -> Result<DateTime<Utc>, E> {
    match raw {
        Raw::Millis(ms) => Utc
            .timestamp_millis_opt(ms)
            .single()
            .ok_or_else(|| E::custom(format!("timestamp out of range: {ms}"))),
        Raw::Text(s) => DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(|e| E::custom(format!("invalid timestamp '{s}': {e}"))),
    }
}

pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&value.to_rfc3339())
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    from_raw(Raw::deserialize(deserializer)?)
}

/// Same conversion for lists of timestamps.
pub mod list {
    use super::*;

    pub fn serialize<S: Serializer>(values: &[DateTime<Utc>], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(values.iter().map(|v| v.to_rfc3339()))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<DateTime<Utc>>, D::Error> {
        Vec::<Raw>::deserialize(deserializer)?
            .into_iter()
            .map(from_raw)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use serde::{Deserialize, Serialize};

    #[derive(Serialize, Deserialize)]
    struct Stamped {
        #[serde(with = "crate::models::timestamp")]
        at: DateTime<Utc>,
        #[serde(with = "crate::models::timestamp::list")]
        seen: Vec<DateTime<Utc>>,
    }

    #[test]
    fn test_accepts_iso_and_millis() {
        let json = r#"{"at":"2025-03-01T09:15:00.000+00:00","seen":[1735689600000,"2025-01-02T00:00:00Z"]}"#;
        let s: Stamped = serde_json::from_str(json).unwrap();
        assert_eq!(s.at, Utc.with_ymd_and_hms(2025, 3, 1, 9, 15, 0).unwrap());
        assert_eq!(s.seen[0], Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap());
        assert_eq!(s.seen[1], Utc.with_ymd_and_hms(2025, 1, 2, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_writes_rfc3339() {
        let s = Stamped {
            at: Utc.with_ymd_and_hms(2025, 3, 1, 9, 15, 0).unwrap(),
            seen: vec![],
        };
        let v = serde_json::to_value(&s).unwrap();
        assert_eq!(v["at"], "2025-03-01T09:15:00+00:00");
    }

    #[test]
    fn test_rejects_garbage() {
        let json = r#"{"at":"yesterday","seen":[]}"#;
        assert!(serde_json::from_str::<Stamped>(json).is_err());
    }
}
