//! [`Query`] resolving the [`timer::State`] of a session.

use std::time;

use common::{
    operations::{By, Delete, Select},
    DateTime,
};
use tracerr::Traced;
use tracing as log;

#[cfg(doc)]
use crate::domain::Timer;
use crate::{
    domain::{session, timer},
    infra::{
        store::{self, codec, Key},
        Store,
    },
    Service,
};

use super::Query;

/// [`Query`] resolving the [`timer::State`] of a session.
///
/// Expired and malformed [`Timer`] records are lazily removed from the
/// [`Store`] as a side effect.
#[derive(Clone, Debug)]
pub struct ResolveTimer {
    /// [`session::Id`] owning the [`Timer`].
    pub session: session::Id,

    /// [`DateTime`] to resolve the [`timer::State`] at.
    pub at: DateTime,
}

impl ResolveTimer {
    /// Creates a new [`ResolveTimer`] [`Query`] resolving at the current
    /// [`DateTime`].
    #[must_use]
    pub fn now(session: session::Id) -> Self {
        Self {
            session,
            at: DateTime::now(),
        }
    }
}

impl<S> Query<ResolveTimer> for Service<S>
where
    S: Store<
            Select<By<Option<String>, Key>>,
            Ok = Option<String>,
            Err = Traced<store::Error>,
        > + Store<Delete<Key>, Ok = (), Err = Traced<store::Error>>,
{
    type Ok = timer::State;
    type Err = ExecutionError;

    async fn execute(
        &self,
        ResolveTimer { session, at }: ResolveTimer,
    ) -> Result<Self::Ok, Self::Err> {
        let key = Key::timer(self.config().scope, &session);

        let Some(value) = self
            .store()
            .execute(Select(By::new(key.clone())))
            .await
            .map_err(tracerr::wrap!())?
        else {
            return Ok(timer::State::Absent);
        };

        let timer = match codec::decode(&value) {
            Ok(timer) => timer,
            Err(e) => {
                log::warn!("discarding `{key}`: {e}");
                discard(self.store(), key).await;
                return Ok(timer::State::Absent);
            }
        };

        let remaining = at.millis_until(&timer.expires_at);
        if remaining > 0 {
            return Ok(timer::State::Active {
                remaining: time::Duration::from_millis(remaining.unsigned_abs()),
                expires_at: timer.expires_at,
                duration: timer.duration,
            });
        }

        log::debug!(
            "`{key}` expired at {}",
            timer.expires_at.to_rfc3339(),
        );
        discard(self.store(), key).await;
        Ok(timer::State::JustExpired)
    }
}

/// Removes the provided [`Key`] from the [`Store`].
///
/// Failures are only logged, as the next write overwrites the [`Key`]
/// anyway.
async fn discard<S>(store: &S, key: Key)
where
    S: Store<Delete<Key>, Ok = (), Err = Traced<store::Error>>,
{
    _ = store.execute(Delete(key.clone())).await.map_err(|e| {
        log::warn!("failed to delete `{key}`: {e}");
    });
}

/// Error of [`ResolveTimer`] [`Query`] execution.
pub type ExecutionError = Traced<store::Error>;
