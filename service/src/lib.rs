//! Service contains the business logic of the countdown timer.
//!
//! List of available Cargo features:
#![doc = document_features::document_features!()]
#![deny(
    nonstandard_style,
    rust_2018_idioms,
    rustdoc::all,
    trivial_casts,
    trivial_numeric_casts,
    unsafe_code
)]
#![forbid(non_ascii_idents)]
#![warn(
    clippy::allow_attributes,
    clippy::allow_attributes_without_reason,
    clippy::pedantic,
    clippy::wildcard_enum_match_arm,
    deprecated_in_future,
    missing_copy_implementations,
    missing_debug_implementations,
    missing_docs,
    unreachable_pub,
    unused_crate_dependencies,
    unused_import_braces,
    unused_labels,
    unused_lifetimes,
    unused_qualifications,
    unused_results
)]

pub mod command;
pub mod domain;
pub mod infra;
pub mod query;

use crate::domain::timer;

pub use self::{command::Command, query::Query};

/// [`Service`] configuration.
#[derive(Clone, Debug)]
pub struct Config {
    /// [`timer::Scope`] of the stored timers.
    pub scope: timer::Scope,

    /// [`timer::Duration`] used when none is requested.
    pub default_duration: timer::Duration,

    /// Upper bound of a requested [`timer::Duration`].
    pub max_duration: timer::Duration,

    /// [`timer::Duration`]s offered for selection.
    ///
    /// Empty if selection is disabled.
    pub durations: Vec<timer::Duration>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scope: timer::Scope::default(),
            default_duration: timer::Duration::DEFAULT,
            max_duration: timer::Duration::MAX,
            durations: timer::Duration::PRESETS.to_vec(),
        }
    }
}

/// Domain service.
#[derive(Clone, Debug)]
pub struct Service<S> {
    /// Configuration of this [`Service`].
    config: Config,

    /// Key-value [`Store`] of this [`Service`].
    ///
    /// [`Store`]: infra::Store
    store: S,
}

impl<S> Service<S> {
    /// Creates a new [`Service`] with the provided parameters.
    #[must_use]
    pub fn new(config: Config, store: S) -> Self {
        Self { config, store }
    }

    /// Returns [`Config`] of this [`Service`].
    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Returns key-value [`Store`] of this [`Service`].
    ///
    /// [`Store`]: infra::Store
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }
}
