//! Codec of [`Timer`] records stored as JSON strings.
//!
//! The wire format is `{"expiresAt": <ms since epoch>, "duration": <secs>}`
//! where `duration` is optional.

use derive_more::{Display, Error};

use crate::domain::Timer;

/// Encodes the provided [`Timer`] into its stored representation.
#[expect(clippy::missing_panics_doc, reason = "infallible")]
#[must_use]
pub fn encode(timer: &Timer) -> String {
    serde_json::to_string(timer).expect("`Timer` is always serializable")
}

/// Decodes a [`Timer`] from its stored representation.
///
/// # Errors
///
/// If the `input` is not a valid [`Timer`] record.
pub fn decode(input: &str) -> Result<Timer, MalformedRecordError> {
    serde_json::from_str(input).map_err(MalformedRecordError)
}

/// Error of decoding a malformed [`Timer`] record.
#[derive(Debug, Display, Error)]
#[display("Malformed `Timer` record: {_0}")]
pub struct MalformedRecordError(serde_json::Error);

#[cfg(test)]
mod spec {
    use crate::domain::{
        timer::{self, ExpirationDateTime},
        Timer,
    };

    use super::{decode, encode};

    fn expires_at(millis: i64) -> ExpirationDateTime {
        ExpirationDateTime::from_unix_timestamp_millis(millis).unwrap()
    }

    #[test]
    fn encodes() {
        assert_eq!(
            encode(&Timer {
                expires_at: expires_at(1_700_000_300_000),
                duration: timer::Duration::from_secs(300),
            }),
            r#"{"expiresAt":1700000300000,"duration":300}"#,
        );
        assert_eq!(
            encode(&Timer {
                expires_at: expires_at(1_700_000_000_123),
                duration: None,
            }),
            r#"{"expiresAt":1700000000123}"#,
        );
    }

    #[test]
    fn round_trips() {
        for timer in [
            Timer {
                expires_at: expires_at(1_700_000_300_000),
                duration: timer::Duration::from_secs(300),
            },
            Timer {
                expires_at: expires_at(1),
                duration: None,
            },
        ] {
            assert_eq!(decode(&encode(&timer)).unwrap(), timer);
        }
    }

    #[test]
    fn tolerates_missing_duration_and_unknown_fields() {
        assert_eq!(
            decode(r#"{"expiresAt":1700000180000,"extra":true}"#).unwrap(),
            Timer {
                expires_at: expires_at(1_700_000_180_000),
                duration: None,
            },
        );
    }

    #[test]
    fn rejects_malformed() {
        for input in [
            "",
            "not json",
            "null",
            "{}",
            r#"{"expiresAt":"tomorrow"}"#,
            r#"{"expiresAt":1.5}"#,
            r#"{"expiresAt":9223372036854775807}"#,
            r#"{"expiresAt":1700000180000,"duration":0}"#,
            r#"{"expiresAt":1700000180000,"duration":-3}"#,
        ] {
            assert!(decode(input).is_err(), "decoded `{input}`");
        }
    }
}
