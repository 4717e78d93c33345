//! [`Query`] definition.

pub mod resolve_timer;

/// [`Query`] of the [`Service`].
///
/// [`Service`]: crate::Service
pub use common::Handler as Query;

pub use self::resolve_timer::ResolveTimer;
