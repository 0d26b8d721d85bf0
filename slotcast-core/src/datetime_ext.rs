use chrono::DateTime;
use chrono::TimeZone;
use chrono::Utc;

pub const MINUTE_MS: i64 = 60 * 1000;
pub const HOUR_MS: i64 = 60 * MINUTE_MS;
pub const DAY_MS: i64 = 24 * HOUR_MS;

/// Converts a UNIX time in milliseconds into a `DateTime<Utc>`.
///
/// Values outside the range supported by chrono are clamped to the epoch.
pub fn datetime_from_millis(ms: i64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(ms)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

// The `serde_iso8601` module provides serde implementation for
// chrono::DateTime<Utc> in the same format as JavaScript's
// `Date.prototype.toISOString()`, which can be applied with the `with` field
// attribute.
//
// chrono::serde has no module for RFC 3339 strings with a fixed precision, so
// the string is built with `to_rfc3339_opts()` here.
pub mod serde_iso8601 {
    use chrono::DateTime;
    use chrono::SecondsFormat;
    use chrono::Utc;
    use serde::de;
    use serde::ser;
    use serde::Deserialize;

    pub fn serialize<S>(dt: &DateTime<Utc>, s: S) -> Result<S::Ok, S::Error>
    where
        S: ser::Serializer,
    {
        s.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Millis, true))
    }

    pub fn deserialize<'de, D>(d: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: de::Deserializer<'de>,
    {
        let s = String::deserialize(d)?;
        DateTime::parse_from_rfc3339(&s)
            .map(|dt| dt.with_timezone(&Utc))
            .map_err(de::Error::custom)
    }

    #[cfg(test)]
    mod tests {
        use chrono::DateTime;
        use chrono::TimeZone;
        use chrono::Utc;
        use serde::Deserialize;
        use serde::Serialize;

        #[derive(Debug, Deserialize, Serialize, PartialEq)]
        struct Data {
            #[serde(with = "crate::datetime_ext::serde_iso8601")]
            datetime: DateTime<Utc>,
        }

        const JSON: &str = r#"{"datetime":"2017-07-14T02:40:00.123Z"}"#;

        #[test]
        fn test_serialize() {
            let data = Data {
                datetime: Utc.timestamp_millis_opt(1_500_000_000_123).unwrap(),
            };
            assert_eq!(serde_json::to_string(&data).unwrap(), JSON);
        }

        #[test]
        fn test_deserialize() {
            let data = serde_json::from_str::<Data>(JSON).unwrap();
            assert_eq!(data.datetime.timestamp_millis(), 1_500_000_000_123);

            let data =
                serde_json::from_str::<Data>(r#"{"datetime":"2017-07-14T11:40:00.123+09:00"}"#)
                    .unwrap();
            assert_eq!(data.datetime.timestamp_millis(), 1_500_000_000_123);

            assert!(serde_json::from_str::<Data>(r#"{"datetime":"invalid"}"#).is_err());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_datetime_from_millis() {
        assert_eq!(datetime_from_millis(0), DateTime::<Utc>::UNIX_EPOCH);
        assert_eq!(
            datetime_from_millis(1_500_000_000_000).timestamp(),
            1_500_000_000
        );
        assert_eq!(datetime_from_millis(i64::MAX), DateTime::<Utc>::UNIX_EPOCH);
    }

    #[test]
    fn test_constants() {
        assert_eq!(DAY_MS, 86_400_000);
        assert_eq!(HOUR_MS, 3_600_000);
    }
}
