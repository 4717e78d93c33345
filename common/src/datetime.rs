//! Date and time utilities.

use std::{cmp::Ordering, marker::PhantomData};

use derive_more::Debug;
use time::format_description::well_known::Rfc3339;

/// Untyped date and time.
pub type DateTime = DateTimeOf;

/// Number of nanoseconds in a millisecond.
const NANOS_PER_MILLI: i128 = 1_000_000;

/// UTC date and time with a millisecond precision.
#[derive(Debug)]
pub struct DateTimeOf<Of: ?Sized = ()> {
    /// Inner representation of the date and time.
    inner: time::OffsetDateTime,

    /// Type parameter describing the kind of date and time.
    #[debug(skip)]
    _of: PhantomData<Of>,
}

impl<Of: ?Sized> DateTimeOf<Of> {
    /// Creates a new [`DateTime`] representing the current date and time.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn now() -> Self {
        let inner = time::OffsetDateTime::now_utc();
        Self {
            _of: PhantomData,
            inner: inner
                .replace_millisecond(inner.millisecond())
                .expect("infallible"),
        }
    }

    /// Creates a new [`DateTime`] from the provided number of milliseconds
    /// elapsed since the Unix epoch.
    ///
    /// [`None`] is returned if the timestamp is out of the supported range.
    #[must_use]
    pub fn from_unix_timestamp_millis(millis: i64) -> Option<Self> {
        Some(Self {
            inner: time::OffsetDateTime::from_unix_timestamp_nanos(
                i128::from(millis) * NANOS_PER_MILLI,
            )
            .ok()?,
            _of: PhantomData,
        })
    }

    /// Returns the number of milliseconds elapsed since the Unix epoch.
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn unix_timestamp_millis(&self) -> i64 {
        i64::try_from(
            self.inner.unix_timestamp_nanos().div_euclid(NANOS_PER_MILLI),
        )
        .expect("supported range always fits `i64` milliseconds")
    }

    /// Returns the signed number of milliseconds from this [`DateTime`] to
    /// the `other` one.
    ///
    /// The result is negative if `other` precedes this [`DateTime`].
    #[must_use]
    pub fn millis_until<O: ?Sized>(&self, other: &DateTimeOf<O>) -> i64 {
        other.unix_timestamp_millis() - self.unix_timestamp_millis()
    }

    /// Returns the [`DateTime`] as an [RFC 3339] string.
    ///
    /// [RFC 3339]: https://tools.ietf.org/html/rfc3339
    #[expect(clippy::missing_panics_doc, reason = "infallible")]
    #[must_use]
    pub fn to_rfc3339(&self) -> String {
        self.inner.format(&Rfc3339).unwrap_or_else(|e| {
            panic!("cannot format `DateTime` as RFC 3339: {e}")
        })
    }

    /// Coerces one kind of [`DateTime`] into another.
    #[must_use]
    pub fn coerce<NewOf: ?Sized>(self) -> DateTimeOf<NewOf> {
        DateTimeOf {
            inner: self.inner,
            _of: PhantomData,
        }
    }
}

impl<Of: ?Sized> Copy for DateTimeOf<Of> {}
impl<Of: ?Sized> Clone for DateTimeOf<Of> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<Of: ?Sized> Eq for DateTimeOf<Of> {}
impl<Of: ?Sized> PartialEq for DateTimeOf<Of> {
    fn eq(&self, other: &Self) -> bool {
        self.inner == other.inner
    }
}

impl<Of: ?Sized> Ord for DateTimeOf<Of> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.inner.cmp(&other.inner)
    }
}
impl<Of: ?Sized> PartialOrd for DateTimeOf<Of> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(feature = "serde")]
pub mod serde {
    //! Module providing integration with [`serde`] crate.

    use super::DateTimeOf;

    pub mod unix_timestamp_millis {
        //! Module providing serialization and deserialization of
        //! [`DateTimeOf`] as a Unix timestamp in milliseconds.

        use serde::{de::Error, Deserialize, Deserializer, Serializer};

        use super::DateTimeOf;

        /// Serializes the [`DateTimeOf`] as a Unix timestamp in milliseconds.
        ///
        /// # Errors
        ///
        /// Returns an error if the `serializer` fails.
        pub fn serialize<Of, S>(
            dt: &DateTimeOf<Of>,
            serializer: S,
        ) -> Result<S::Ok, S::Error>
        where
            S: Serializer,
            Of: ?Sized,
        {
            serializer.serialize_i64(dt.unix_timestamp_millis())
        }

        /// Deserializes the Unix timestamp in milliseconds into a
        /// [`DateTimeOf`].
        ///
        /// # Errors
        ///
        /// Returns an error if the timestamp is invalid.
        pub fn deserialize<'de, D, Of>(
            deserializer: D,
        ) -> Result<DateTimeOf<Of>, D::Error>
        where
            D: Deserializer<'de>,
            Of: ?Sized,
        {
            DateTimeOf::from_unix_timestamp_millis(i64::deserialize(
                deserializer,
            )?)
            .ok_or_else(|| Error::custom("timestamp out of range"))
        }
    }
}

#[cfg(test)]
mod spec {
    use super::DateTime;

    #[test]
    fn unix_timestamp_millis() {
        let dt = DateTime::from_unix_timestamp_millis(1_700_000_123_456)
            .unwrap();
        assert_eq!(dt.unix_timestamp_millis(), 1_700_000_123_456);

        let epoch = DateTime::from_unix_timestamp_millis(0).unwrap();
        assert_eq!(epoch.to_rfc3339(), "1970-01-01T00:00:00Z");

        assert!(DateTime::from_unix_timestamp_millis(i64::MAX).is_none());
    }

    #[test]
    fn now_has_millisecond_precision() {
        let now = DateTime::now();
        let restored =
            DateTime::from_unix_timestamp_millis(now.unix_timestamp_millis())
                .unwrap();
        assert_eq!(now, restored);
    }

    #[test]
    fn millis_until() {
        let a = DateTime::from_unix_timestamp_millis(1_000).unwrap();
        let b = DateTime::from_unix_timestamp_millis(3_500).unwrap();

        assert_eq!(a.millis_until(&b), 2_500);
        assert_eq!(b.millis_until(&a), -2_500);
        assert_eq!(a.millis_until(&a), 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn serde_unix_timestamp_millis() {
        #[derive(Debug, PartialEq, serde::Deserialize, serde::Serialize)]
        struct Wrapper {
            #[serde(with = "super::serde::unix_timestamp_millis")]
            at: DateTime,
        }

        let wrapper = Wrapper {
            at: DateTime::from_unix_timestamp_millis(42_000).unwrap(),
        };
        let json = serde_json::to_string(&wrapper).unwrap();
        assert_eq!(json, r#"{"at":42000}"#);
        assert_eq!(serde_json::from_str::<Wrapper>(&json).unwrap(), wrapper);

        assert!(
            serde_json::from_str::<Wrapper>(r#"{"at":"soon"}"#).is_err()
        );
    }
}
