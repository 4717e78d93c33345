//! [`Command`] definition.

pub mod start_timer;

/// [`Command`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Command;

pub use self::start_timer::StartTimer;
