//! [`Config`]-related definitions.

use std::time;

use config::{builder::DefaultState, ConfigBuilder, ConfigError};
use derive_more::{Debug, Display, Error};
use secrecy::SecretString;
use serde::Deserialize;
use service::domain::timer;
use smart_default::SmartDefault;

/// Application configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Server configuration.
    pub server: Server,

    /// Service configuration.
    pub service: Service,

    /// Key-value store configuration.
    pub store: Store,

    /// Log configuration.
    pub log: Log,
}

impl Config {
    /// Creates a new [`Config`] by:
    /// - loading it from the provided `path` (if any);
    /// - merging it with the environment variables (if any);
    /// - using default values for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn new(path: impl AsRef<str>) -> Result<Self, ConfigError> {
        ConfigBuilder::<DefaultState>::default()
            .add_source(config::File::with_name(path.as_ref()).required(false))
            .add_source(config::Environment::with_prefix("CONF").separator("."))
            .build()?
            .try_deserialize()
    }
}

/// Server configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Server {
    /// Host to bind the server to.
    #[default("0.0.0.0".to_owned())]
    pub host: String,

    /// Port to bind the server to.
    #[default(8080)]
    pub port: u16,
}

/// Service configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Service {
    /// Timer configuration.
    pub timer: Timer,
}

impl TryFrom<Service> for service::Config {
    type Error = InvalidTimerError;

    fn try_from(value: Service) -> Result<Self, Self::Error> {
        use InvalidTimerError as E;

        let Service {
            timer:
                Timer {
                    scope,
                    default_duration,
                    max_duration,
                    durations,
                },
        } = value;

        let default_duration = duration("default_duration", default_duration)?;
        let max_duration = duration("max_duration", max_duration)?;
        if default_duration > max_duration {
            return Err(E::DefaultExceedsMax);
        }
        let durations = durations
            .into_iter()
            .map(|d| {
                duration("durations", d.into_inner())
                    .map(|d| d.min(max_duration))
            })
            .collect::<Result<_, _>>()?;

        Ok(Self {
            scope: scope.into(),
            default_duration,
            max_duration,
            durations,
        })
    }
}

/// Converts the configured `field` into a [`timer::Duration`].
fn duration(
    field: &'static str,
    value: time::Duration,
) -> Result<timer::Duration, InvalidTimerError> {
    if value < time::Duration::from_secs(1) {
        return Err(InvalidTimerError::TooShort(field));
    }
    timer::Duration::from_std(value).ok_or(InvalidTimerError::TooLong(field))
}

/// Error of converting an invalid [`Timer`] configuration.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum InvalidTimerError {
    /// Duration is shorter than one second.
    #[display("`{_0}` must be at least one second")]
    TooShort(#[error(not(source))] &'static str),

    /// Duration doesn't fit into `u32` seconds.
    #[display("`{_0}` must be at most {} seconds", u32::MAX)]
    TooLong(#[error(not(source))] &'static str),

    /// Default duration is longer than the maximum one.
    #[display("`default_duration` must not exceed `max_duration`")]
    DefaultExceedsMax,
}

/// Timer configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Timer {
    /// Scope of the stored timers.
    pub scope: Scope,

    /// Duration of a timer started without an explicit one.
    #[default(time::Duration::from_secs(3 * 60))]
    #[serde(with = "humantime_serde")]
    pub default_duration: time::Duration,

    /// Longest duration a timer may be started with.
    #[default(time::Duration::from_secs(24 * 60 * 60))]
    #[serde(with = "humantime_serde")]
    pub max_duration: time::Duration,

    /// Durations offered for selection.
    ///
    /// Selection is disabled if empty.
    #[default(
        [3, 5, 10, 30, 60]
            .into_iter()
            .map(|mins| time::Duration::from_secs(mins * 60).into())
            .collect()
    )]
    pub durations: Vec<humantime_serde::Serde<time::Duration>>,
}

/// Scope of the stored timers.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scope {
    /// Single timer shared by all clients.
    Global,

    /// Timer per session.
    #[default]
    Session,
}

impl From<Scope> for timer::Scope {
    fn from(value: Scope) -> Self {
        match value {
            Scope::Global => Self::Global,
            Scope::Session => Self::Session,
        }
    }
}

/// Key-value store configuration.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Store {
    /// Backend to store timers in.
    pub backend: Backend,

    /// Redis configuration.
    pub redis: Redis,
}

/// Key-value store backend.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Backend {
    /// Process memory, lost on restart.
    #[default]
    Memory,

    /// Redis server.
    Redis,
}

/// Redis configuration.
#[derive(Clone, Debug, Deserialize, SmartDefault)]
#[serde(default)]
pub struct Redis {
    /// URL to connect to.
    #[debug(skip)]
    #[default("redis://127.0.0.1:6379".to_owned())]
    pub url: String,

    /// Maximum number of pooled connections.
    #[default(16)]
    pub pool_size: usize,

    /// Longest time a request waits for a free pooled connection.
    #[default(time::Duration::from_secs(5))]
    #[serde(with = "humantime_serde")]
    pub wait_timeout: time::Duration,
}

impl TryFrom<Redis> for service::infra::redis::Config {
    type Error = InvalidRedisError;

    fn try_from(value: Redis) -> Result<Self, Self::Error> {
        let Redis {
            url,
            pool_size,
            wait_timeout,
        } = value;

        if pool_size == 0 {
            return Err(InvalidRedisError::ZeroPoolSize);
        }
        if wait_timeout.is_zero() {
            return Err(InvalidRedisError::ZeroWaitTimeout);
        }

        Ok(Self {
            url: SecretString::from(url),
            pool_size,
            wait_timeout,
        })
    }
}

/// Error of converting an invalid [`Redis`] configuration.
#[derive(Clone, Copy, Debug, Display, Error)]
pub enum InvalidRedisError {
    /// Pool cannot hold any connection.
    #[display("`pool_size` must be at least 1")]
    ZeroPoolSize,

    /// Pool never hands out a connection.
    #[display("`wait_timeout` must be positive")]
    ZeroWaitTimeout,
}

/// Log configuration.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(default)]
pub struct Log {
    /// Log level.
    pub level: LogLevel,
}

/// Log level.
#[derive(Clone, Copy, Debug, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,

    /// Designates lower priority information.
    Debug,

    /// Designates useful information.
    #[default]
    Info,

    /// Designates hazardous situations.
    Warn,

    /// Designates very serious errors.
    Error,
}

impl From<LogLevel> for tracing::Level {
    fn from(value: LogLevel) -> Self {
        match value {
            LogLevel::Trace => Self::TRACE,
            LogLevel::Debug => Self::DEBUG,
            LogLevel::Info => Self::INFO,
            LogLevel::Warn => Self::WARN,
            LogLevel::Error => Self::ERROR,
        }
    }
}
