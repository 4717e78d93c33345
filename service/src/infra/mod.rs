//! Infrastructure layer.

pub mod store;

#[cfg(feature = "redis")]
pub use self::store::{redis, Redis};
pub use self::store::{Backend, Memory, Store};
