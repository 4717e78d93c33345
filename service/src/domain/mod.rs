//! Domain definitions.

pub mod session;
pub mod timer;

pub use self::timer::Timer;
