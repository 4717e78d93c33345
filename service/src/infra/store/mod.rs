//! Key-value [`Store`]-related implementations.

mod backend;
pub mod codec;
mod memory;
#[cfg(feature = "redis")]
pub mod redis;

use derive_more::{AsRef, Display, Error as StdError, From};

use crate::domain::{session, timer};

#[cfg(feature = "redis")]
pub use self::redis::Redis;
pub use self::{backend::Backend, memory::Memory};

/// Key-value store operation.
///
/// Every implementation supports the following operations:
/// - `Select<By<Option<String>, Key>>` reading the value under a [`Key`];
/// - `Insert<Entry>` unconditionally writing an [`Entry`];
/// - `Delete<Key>` removing a [`Key`], succeeding if it's already absent.
pub use common::Handler as Store;

/// [`Store`] error.
#[derive(Debug, Display, From, StdError)]
pub enum Error {
    #[cfg(feature = "redis")]
    /// [`Redis`] error.
    Redis(redis::Error),
}

/// Key of a value in a [`Store`].
#[derive(AsRef, Clone, Debug, Display, Eq, Hash, PartialEq)]
#[as_ref(str)]
pub struct Key(String);

impl Key {
    /// Prefix of every [`timer::Timer`] [`Key`].
    const TIMER: &'static str = "timer";

    /// Creates a new [`Key`] of a [`timer::Timer`] record for the provided
    /// [`session::Id`] in the provided [`timer::Scope`].
    #[must_use]
    pub fn timer(scope: timer::Scope, session: &session::Id) -> Self {
        match scope {
            timer::Scope::Global => Self(Self::TIMER.to_owned()),
            timer::Scope::Session => Self(format!("{}:{session}", Self::TIMER)),
        }
    }
}

/// Key-value pair to be written into a [`Store`].
#[derive(Clone, Debug)]
pub struct Entry {
    /// [`Key`] to write the value under.
    pub key: Key,

    /// Value to write.
    pub value: String,
}

#[cfg(test)]
mod spec {
    use crate::domain::{session, timer};

    use super::Key;

    #[test]
    fn timer_key() {
        let id = session::Id::new("abc").unwrap();

        assert_eq!(
            Key::timer(timer::Scope::Session, &id).as_ref(),
            "timer:abc",
        );
        assert_eq!(Key::timer(timer::Scope::Global, &id).as_ref(), "timer");
    }
}
