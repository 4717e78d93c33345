//! [`Timer`] definitions.

use std::time;

use common::{unit, DateTimeOf};
#[cfg(doc)]
use common::DateTime;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};

/// Countdown timer persisted for a session.
#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Timer {
    /// [`DateTime`] when this [`Timer`] completes.
    #[serde(with = "common::datetime::serde::unix_timestamp_millis")]
    pub expires_at: ExpirationDateTime,

    /// [`Duration`] this [`Timer`] was started with, if known.
    ///
    /// Used for progress rendering only, never for expiration.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration: Option<Duration>,
}

/// [`DateTime`] of a [`Timer`] expiration.
pub type ExpirationDateTime = DateTimeOf<(Timer, unit::Expiration)>;

/// Requested length of a [`Timer`] in whole seconds.
///
/// Always positive.
#[derive(
    Clone,
    Copy,
    Debug,
    Deserialize,
    Display,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    Serialize,
)]
#[display("{_0}s")]
#[serde(try_from = "u32", into = "u32")]
pub struct Duration(u32);

impl Duration {
    /// Default [`Duration`] of a [`Timer`]: 3 minutes.
    pub const DEFAULT: Self = Self(180);

    /// Default upper bound of a [`Timer`] [`Duration`]: 24 hours.
    pub const MAX: Self = Self(24 * 60 * 60);

    /// Default [`Duration`]s offered for selection.
    pub const PRESETS: [Self; 5] =
        [Self(180), Self(300), Self(600), Self(1800), Self(3600)];

    /// Creates a new [`Duration`] from the provided number of seconds.
    ///
    /// [`None`] is returned if `secs` is zero.
    #[must_use]
    pub const fn from_secs(secs: u32) -> Option<Self> {
        if secs == 0 {
            None
        } else {
            Some(Self(secs))
        }
    }

    /// Creates a new [`Duration`] from the provided [`time::Duration`],
    /// truncating sub-second precision.
    ///
    /// [`None`] is returned if the whole seconds are zero or don't fit.
    #[must_use]
    pub fn from_std(duration: time::Duration) -> Option<Self> {
        u32::try_from(duration.as_secs())
            .ok()
            .and_then(Self::from_secs)
    }

    /// Leniently parses a user-provided number of seconds.
    ///
    /// The input is rounded to the nearest integer. [`None`] is returned if
    /// the input is not a finite number or rounds to less than one second.
    #[must_use]
    pub fn coerce(input: &str) -> Option<Self> {
        let secs = input.trim().parse::<f64>().ok()?.round();
        if !secs.is_finite() || secs < 1.0 {
            return None;
        }
        #[expect(
            clippy::cast_possible_truncation,
            clippy::cast_sign_loss,
            reason = "range is checked"
        )]
        let secs = if secs >= f64::from(u32::MAX) {
            u32::MAX
        } else {
            secs as u32
        };
        Self::from_secs(secs)
    }

    /// Returns the number of seconds in this [`Duration`].
    #[must_use]
    pub const fn as_secs(self) -> u32 {
        self.0
    }

    /// Returns the number of milliseconds in this [`Duration`].
    #[must_use]
    pub fn as_millis(self) -> i64 {
        i64::from(self.0) * 1000
    }
}

impl TryFrom<u32> for Duration {
    type Error = ZeroDurationError;

    fn try_from(secs: u32) -> Result<Self, Self::Error> {
        Self::from_secs(secs).ok_or(ZeroDurationError)
    }
}

impl From<Duration> for u32 {
    fn from(duration: Duration) -> Self {
        duration.0
    }
}

/// Error of creating a zero-length [`Duration`].
#[derive(Clone, Copy, Debug, Display, Error)]
#[display("`Duration` must be at least one second")]
pub struct ZeroDurationError;

/// Scope of a [`Timer`] storage key.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub enum Scope {
    /// Single [`Timer`] shared by every client.
    Global,

    /// [`Timer`] per session.
    #[default]
    Session,
}

/// Resolved state of a [`Timer`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum State {
    /// No [`Timer`] exists.
    Absent,

    /// [`Timer`] is still counting down.
    Active {
        /// Time left until the [`Timer`] completes.
        remaining: time::Duration,

        /// [`DateTime`] when the [`Timer`] completes.
        expires_at: ExpirationDateTime,

        /// [`Duration`] the [`Timer`] was started with, if known.
        duration: Option<Duration>,
    },

    /// [`Timer`] has been observed as completed for the first time and is
    /// now removed.
    JustExpired,
}
