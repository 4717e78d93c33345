//! [`Backend`] selecting a [`Store`] implementation at runtime.

use common::operations::{By, Delete, Insert, Select};
use tracerr::Traced;

#[cfg(feature = "redis")]
use crate::infra::store::Redis;
use crate::infra::store::{self, Entry, Key, Memory, Store};

/// [`Store`] implementation chosen by configuration.
#[derive(Clone, Debug)]
pub enum Backend {
    /// [`Memory`] [`Store`].
    Memory(Memory),

    /// [`Redis`] [`Store`].
    #[cfg(feature = "redis")]
    Redis(Redis),
}

impl From<Memory> for Backend {
    fn from(store: Memory) -> Self {
        Self::Memory(store)
    }
}

#[cfg(feature = "redis")]
impl From<Redis> for Backend {
    fn from(store: Redis) -> Self {
        Self::Redis(store)
    }
}

impl Store<Select<By<Option<String>, Key>>> for Backend {
    type Ok = Option<String>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        op: Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let res = match self {
            Self::Memory(s) => s.execute(op).await,
            #[cfg(feature = "redis")]
            Self::Redis(s) => s.execute(op).await,
        };
        res.map_err(tracerr::wrap!())
    }
}

impl Store<Insert<Entry>> for Backend {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        op: Insert<Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        let res = match self {
            Self::Memory(s) => s.execute(op).await,
            #[cfg(feature = "redis")]
            Self::Redis(s) => s.execute(op).await,
        };
        res.map_err(tracerr::wrap!())
    }
}

impl Store<Delete<Key>> for Backend {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(&self, op: Delete<Key>) -> Result<Self::Ok, Self::Err> {
        let res = match self {
            Self::Memory(s) => s.execute(op).await,
            #[cfg(feature = "redis")]
            Self::Redis(s) => s.execute(op).await,
        };
        res.map_err(tracerr::wrap!())
    }
}
