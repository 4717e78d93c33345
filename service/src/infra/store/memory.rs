//! In-process [`Memory`] [`Store`] implementation.

use std::{collections::HashMap, sync::Arc};

use common::operations::{By, Delete, Insert, Select};
use tokio::sync::RwLock;
use tracerr::Traced;

use crate::infra::store::{self, Entry, Key, Store};

/// [`Store`] keeping values in the memory of the current process.
///
/// Clones share the same underlying values.
#[derive(Clone, Debug, Default)]
pub struct Memory {
    /// Values of this [`Memory`] [`Store`].
    values: Arc<RwLock<HashMap<Key, String>>>,
}

impl Memory {
    /// Creates a new empty [`Memory`] [`Store`].
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store<Select<By<Option<String>, Key>>> for Memory {
    type Ok = Option<String>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        Ok(self.values.read().await.get(by.inner()).cloned())
    }
}

impl Store<Insert<Entry>> for Memory {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Insert(Entry { key, value }): Insert<Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.values.write().await.insert(key, value));
        Ok(())
    }
}

impl Store<Delete<Key>> for Memory {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Delete(key): Delete<Key>,
    ) -> Result<Self::Ok, Self::Err> {
        drop(self.values.write().await.remove(&key));
        Ok(())
    }
}

#[cfg(test)]
mod spec {
    use common::operations::{By, Delete, Insert, Select};

    use crate::{
        domain::{session, timer},
        infra::store::{Entry, Key, Store as _},
    };

    use super::Memory;

    fn key(id: &str) -> Key {
        Key::timer(timer::Scope::Session, &session::Id::new(id).unwrap())
    }

    #[tokio::test]
    async fn puts_gets_and_deletes() {
        let store = Memory::new();

        assert_eq!(store.execute(Select(By::new(key("a")))).await.unwrap(), None);

        store
            .execute(Insert(Entry {
                key: key("a"),
                value: "1".to_owned(),
            }))
            .await
            .unwrap();
        store
            .execute(Insert(Entry {
                key: key("a"),
                value: "2".to_owned(),
            }))
            .await
            .unwrap();
        assert_eq!(
            store.execute(Select(By::new(key("a")))).await.unwrap(),
            Some("2".to_owned()),
        );
        assert_eq!(store.execute(Select(By::new(key("b")))).await.unwrap(), None);

        store.execute(Delete(key("a"))).await.unwrap();
        store.execute(Delete(key("a"))).await.unwrap();
        assert_eq!(store.execute(Select(By::new(key("a")))).await.unwrap(), None);
    }

    #[tokio::test]
    async fn clones_share_values() {
        let store = Memory::new();
        let clone = store.clone();

        store
            .execute(Insert(Entry {
                key: key("a"),
                value: "1".to_owned(),
            }))
            .await
            .unwrap();

        assert_eq!(
            clone.execute(Select(By::new(key("a")))).await.unwrap(),
            Some("1".to_owned()),
        );
    }
}
