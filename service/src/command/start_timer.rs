//! [`Command`] for starting a [`Timer`].

use common::{operations::Insert, DateTime};
use derive_more::{Display, Error, From};
use tracerr::Traced;
use tracing as log;

use crate::{
    domain::{
        session,
        timer::{self, ExpirationDateTime},
        Timer,
    },
    infra::{
        store::{self, codec, Entry, Key},
        Store,
    },
    Service,
};

use super::Command;

/// [`Command`] for starting a [`Timer`].
///
/// Any existing [`Timer`] of the session is overwritten.
#[derive(Clone, Debug)]
pub struct StartTimer {
    /// [`session::Id`] to start the [`Timer`] for.
    pub session: session::Id,

    /// Requested [`timer::Duration`].
    ///
    /// [`Config::default_duration`] is used if [`None`].
    ///
    /// [`Config::default_duration`]: crate::Config::default_duration
    pub duration: Option<timer::Duration>,

    /// [`DateTime`] the [`Timer`] starts at.
    pub at: DateTime,
}

impl StartTimer {
    /// Creates a new [`StartTimer`] [`Command`] starting at the current
    /// [`DateTime`].
    #[must_use]
    pub fn now(
        session: session::Id,
        duration: Option<timer::Duration>,
    ) -> Self {
        Self {
            session,
            duration,
            at: DateTime::now(),
        }
    }
}

impl<S> Command<StartTimer> for Service<S>
where
    S: Store<Insert<Entry>, Ok = (), Err = Traced<store::Error>>,
{
    type Ok = Timer;
    type Err = Traced<ExecutionError>;

    async fn execute(
        &self,
        StartTimer {
            session,
            duration,
            at,
        }: StartTimer,
    ) -> Result<Self::Ok, Self::Err> {
        use ExecutionError as E;

        let duration = duration
            .unwrap_or(self.config().default_duration)
            .min(self.config().max_duration);

        let expires_at = at
            .unix_timestamp_millis()
            .checked_add(duration.as_millis())
            .and_then(ExpirationDateTime::from_unix_timestamp_millis)
            .ok_or(E::ExpirationOutOfRange)
            .map_err(tracerr::wrap!())?;
        let timer = Timer {
            expires_at,
            duration: Some(duration),
        };

        let key = Key::timer(self.config().scope, &session);
        self.store()
            .execute(Insert(Entry {
                key: key.clone(),
                value: codec::encode(&timer),
            }))
            .await
            .map_err(tracerr::map_from_and_wrap!(=> E))?;

        log::info!(
            "started `{key}` for {duration}, expiring at {}",
            expires_at.to_rfc3339(),
        );

        Ok(timer)
    }
}

/// Error of [`StartTimer`] [`Command`] execution.
#[derive(Debug, Display, Error, From)]
pub enum ExecutionError {
    /// [`Store`] error.
    #[display("`Store` operation failed: {_0}")]
    Store(store::Error),

    /// Expiration [`DateTime`] is out of the supported range.
    #[display("`Timer` expiration is out of range")]
    ExpirationOutOfRange,
}

#[cfg(test)]
mod spec {
    use common::{
        operations::{By, Select},
        DateTime,
    };

    use crate::{
        domain::{session, timer, Timer},
        infra::{
            store::{codec, Key},
            Memory, Store as _,
        },
        Config, Service,
    };

    use super::StartTimer;

    const T0: i64 = 1_700_000_000_000;

    fn session(id: &str) -> session::Id {
        session::Id::new(id).unwrap()
    }

    async fn stored(store: &Memory, id: &str) -> Option<Timer> {
        store
            .execute(Select(By::new(Key::timer(
                timer::Scope::Session,
                &session(id),
            ))))
            .await
            .unwrap()
            .map(|v| codec::decode(&v).unwrap())
    }

    async fn start(
        service: &Service<Memory>,
        id: &str,
        secs: Option<u32>,
    ) -> Timer {
        service
            .execute(StartTimer {
                session: session(id),
                duration: secs.map(|s| timer::Duration::from_secs(s).unwrap()),
                at: DateTime::from_unix_timestamp_millis(T0).unwrap(),
            })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn writes_record() {
        let store = Memory::new();
        let service = Service::new(Config::default(), store.clone());

        let started = start(&service, "abc", Some(300)).await;

        assert_eq!(started.expires_at.unix_timestamp_millis(), T0 + 300_000);
        assert_eq!(started.duration, timer::Duration::from_secs(300));
        assert_eq!(stored(&store, "abc").await, Some(started));
        assert_eq!(
            store
                .execute(Select(By::new(Key::timer(
                    timer::Scope::Session,
                    &session("abc"),
                ))))
                .await
                .unwrap()
                .as_deref(),
            Some(r#"{"expiresAt":1700000300000,"duration":300}"#),
        );
    }

    #[tokio::test]
    async fn uses_default_duration() {
        let store = Memory::new();
        let service = Service::new(Config::default(), store.clone());

        let started = start(&service, "abc", None).await;

        assert_eq!(started.expires_at.unix_timestamp_millis(), T0 + 180_000);
        assert_eq!(started.duration, Some(timer::Duration::DEFAULT));
    }

    #[tokio::test]
    async fn clamps_to_max_duration() {
        let service = Service::new(Config::default(), Memory::new());

        let started = start(&service, "abc", Some(u32::MAX)).await;

        assert_eq!(started.duration, Some(timer::Duration::MAX));
        assert_eq!(
            started.expires_at.unix_timestamp_millis(),
            T0 + timer::Duration::MAX.as_millis(),
        );
    }

    #[tokio::test]
    async fn overwrites_only_own_session() {
        let store = Memory::new();
        let service = Service::new(Config::default(), store.clone());

        let b = start(&service, "b", Some(600)).await;
        _ = start(&service, "a", Some(60)).await;
        let a = start(&service, "a", Some(120)).await;

        assert_eq!(stored(&store, "a").await, Some(a));
        assert_eq!(stored(&store, "b").await, Some(b));
    }
}
