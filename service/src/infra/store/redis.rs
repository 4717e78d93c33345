//! [Redis] [`Store`] implementation.
//!
//! [Redis]: https://redis.io

use std::time;

use common::operations::{By, Delete, Insert, Select};
use deadpool_redis::{redis::AsyncCommands as _, Runtime};
use derive_more::{Debug, Display, Error as StdError, From};
use secrecy::{ExposeSecret as _, SecretString};
use tracerr::Traced;

use crate::infra::store::{self, Entry, Key, Store};

pub use deadpool_redis::{
    redis::RedisError as CommandError, Connection, CreatePoolError,
    Pool, PoolConfig, PoolError,
};

/// [`Redis`] connection configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// URL of the [Redis] server to connect to.
    ///
    /// [Redis]: https://redis.io
    #[debug(skip)]
    pub url: SecretString,

    /// Maximum number of pooled connections.
    pub pool_size: usize,

    /// Longest time to wait for a free pooled connection.
    pub wait_timeout: time::Duration,
}

/// [Redis] [`Store`] client.
///
/// [Redis]: https://redis.io
#[derive(Clone, Debug)]
pub struct Redis {
    /// [`Pool`] of [Redis] connections.
    ///
    /// [Redis]: https://redis.io
    #[debug(skip)]
    pool: Pool,
}

impl Redis {
    /// Creates a new [`Redis`] client with the provided [`Config`].
    ///
    /// Connections are established lazily, on first use.
    ///
    /// # Errors
    ///
    /// If failed to create a new connection [`Pool`].
    pub fn new(conf: &Config) -> Result<Self, Traced<store::Error>> {
        let mut pool_conf =
            deadpool_redis::Config::from_url(conf.url.expose_secret());
        let mut pool = PoolConfig::new(conf.pool_size);
        pool.timeouts.wait = Some(conf.wait_timeout);
        pool_conf.pool = Some(pool);

        let pool = pool_conf
            .create_pool(Some(Runtime::Tokio1))
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)?;
        Ok(Self { pool })
    }

    /// Takes a [`Connection`] from the [`Pool`].
    async fn connection(&self) -> Result<Connection, Traced<store::Error>> {
        self.pool
            .get()
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl Store<Select<By<Option<String>, Key>>> for Redis {
    type Ok = Option<String>;
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Select(by): Select<By<Option<String>, Key>>,
    ) -> Result<Self::Ok, Self::Err> {
        let key = by.into_inner();
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .get::<_, Option<String>>(key.as_ref())
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl Store<Insert<Entry>> for Redis {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Insert(Entry { key, value }): Insert<Entry>,
    ) -> Result<Self::Ok, Self::Err> {
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .set::<_, _, ()>(key.as_ref(), value)
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

impl Store<Delete<Key>> for Redis {
    type Ok = ();
    type Err = Traced<store::Error>;

    async fn execute(
        &self,
        Delete(key): Delete<Key>,
    ) -> Result<Self::Ok, Self::Err> {
        // `DEL` of a missing key is not an error.
        self.connection()
            .await
            .map_err(tracerr::wrap!())?
            .del::<_, ()>(key.as_ref())
            .await
            .map_err(tracerr::from_and_wrap!(=> Error))
            .map_err(tracerr::map_from)
    }
}

/// [`Redis`] [`Store`] [`Error`].
#[derive(Debug, Display, StdError, From)]
pub enum Error {
    /// [Redis] command error.
    ///
    /// [Redis]: https://redis.io
    #[display("Redis command failed: {_0}")]
    Command(CommandError),

    /// Error of creating a new connection [`Pool`].
    #[display("Failed to create a new `Pool`: {_0}")]
    PoolCreation(CreatePoolError),

    /// Connection [`Pool`] error.
    #[display("`Pool` error: {_0}")]
    Pool(PoolError),
}
