//! [`Session`] definitions.
//!
//! [`Session`]: Id

use std::{str::FromStr, sync::LazyLock};

use derive_more::{AsRef, Display};
use regex::Regex;

/// Opaque identifier of a browsing session owning a timer.
///
/// Identifiers are carried by clients and are not authenticated.
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Id(String);

impl Id {
    /// Number of random bytes in a [`Id::random()`]ly generated [`Id`].
    const RANDOM_BYTES: usize = 16;

    /// Generates a new random [`Id`] as a hex-encoded sequence of
    /// cryptographically random bytes.
    #[must_use]
    pub fn random() -> Self {
        Self(hex::encode(rand::random::<[u8; Self::RANDOM_BYTES]>()))
    }

    /// Creates a new [`Id`] if the given `id` is valid.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Option<Self> {
        let id = id.into();
        Self::check(&id).then_some(Self(id))
    }

    /// Checks whether the given `id` is a valid [`Id`].
    fn check(id: impl AsRef<str>) -> bool {
        /// Regular expression checking [`Id`] invariants:
        /// - Must not be empty;
        /// - Must contain only ASCII letters, digits, `-` or `_`;
        /// - Must be at most 128 characters long.
        static REGEX: LazyLock<Regex> = LazyLock::new(|| {
            Regex::new(r"^[A-Za-z0-9_-]{1,128}$").expect("valid regex")
        });

        REGEX.is_match(id.as_ref())
    }
}

impl FromStr for Id {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s).ok_or("invalid session `Id`")
    }
}
