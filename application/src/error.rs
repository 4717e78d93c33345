//! [`Error`]-related definitions.

use std::fmt;

use axum::response::{IntoResponse, Response};
use derive_more::Error as StdError;
use itertools::Itertools as _;
use service::{command::start_timer, infra::store};
use tracerr::{Trace, Traced};
use tracing as log;

/// Defines a new error type.
#[expect(clippy::module_name_repetitions, reason = "more readable")]
#[macro_export]
macro_rules! define_error {
    (
        enum $name:ident {
            $(
                #[code = $code:literal]
                #[status = $status_code:ident]
                #[message = $message:literal]
                $variant:ident
            ),* $(,)?
        }
    ) => {
        /// Error type.
        #[derive(
            Clone,
            Copy,
            Debug,
            ::derive_more::Display,
            ::derive_more::Error
        )]
        #[repr(u16)]
        pub enum $name {
            $(
                #[display($message)]
                #[doc = $message]
                $variant,
            )*
        }

        impl From<$name> for $crate::Error {
            fn from(err: $name) -> Self {
                match err {
                    $(
                        $name::$variant => Self {
                            code: $code,
                            status_code: ::http::StatusCode::$status_code,
                            message: $message.to_string(),
                            backtrace: None,
                        },
                    )*
                }
            }
        }
    };
}

/// HTTP API [`Error`].
#[derive(Clone, Debug, StdError)]
pub struct Error {
    /// [`Error`] code.
    pub code: Code,

    /// [`http::StatusCode`] of this [`Error`].
    pub status_code: http::StatusCode,

    /// Backtrace of this [`Error`].
    #[error(not(backtrace))]
    pub backtrace: Option<Trace>,

    /// [`Error`] message.
    pub message: String,
}

impl Error {
    /// [`Code`] of an internal server [`Error`].
    pub const INTERNAL: Code = "INTERNAL_SERVER_ERROR";

    /// Create a new [`Error`] representing an internal server error.
    #[must_use]
    pub fn internal(msg: &impl ToString) -> Self {
        Self {
            code: Self::INTERNAL,
            status_code: http::StatusCode::INTERNAL_SERVER_ERROR,
            message: msg.to_string(),
            backtrace: None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Self {
            code,
            status_code: _,
            backtrace,
            message,
        } = self;

        write!(
            f,
            "[{code}]: {message}{}",
            backtrace
                .iter()
                .format_with("\n", |trace, f| f(&format_args!("\n{trace}"))),
        )
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        if self.status_code.is_server_error() {
            log::error!("{self}");
        }

        // Internal details stay in logs.
        let message = if self.code == Self::INTERNAL {
            "Internal server error".to_owned()
        } else {
            self.message
        };
        (self.status_code, format!("[{}]: {message}", self.code))
            .into_response()
    }
}

/// [`Error`] code.
pub type Code = &'static str;

/// Helper trait for converting types into [`Error`]s.
pub trait AsError {
    /// Tries to convert the type into an [`Error`].
    ///
    /// [`None`] is returned if the type cannot be converted into an [`Error`].
    fn try_as_error(&self) -> Option<Error>;

    /// Converts the type into an [`Error`].
    fn as_error(&self) -> Error
    where
        Self: fmt::Display,
    {
        self.try_as_error()
            .unwrap_or_else(|| Error::internal(&self))
    }

    /// Converts the type into an [`Error`] by consuming it.
    fn into_error(self) -> Error
    where
        Self: fmt::Display + Sized,
    {
        self.as_error()
    }
}

impl<E: AsError> AsError for Traced<E> {
    fn try_as_error(&self) -> Option<Error> {
        let mut error = self.as_ref().try_as_error()?;
        error.backtrace = Some(self.trace().clone());
        Some(error)
    }
}

impl AsError for store::Error {
    fn try_as_error(&self) -> Option<Error> {
        Some(StoreError::Unavailable.into())
    }
}

impl AsError for start_timer::ExecutionError {
    fn try_as_error(&self) -> Option<Error> {
        match self {
            Self::Store(e) => e.try_as_error(),
            Self::ExpirationOutOfRange => None,
        }
    }
}

impl AsError for handlebars::RenderError {
    fn try_as_error(&self) -> Option<Error> {
        None
    }
}

define_error! {
    enum StoreError {
        #[code = "STORE_UNAVAILABLE"]
        #[status = SERVICE_UNAVAILABLE]
        #[message = "Timer storage is unavailable"]
        Unavailable,
    }
}

define_error! {
    enum SessionError {
        #[code = "MISSING_SESSION_ID"]
        #[status = BAD_REQUEST]
        #[message = "`sessionId` is required"]
        Missing,

        #[code = "INVALID_SESSION_ID"]
        #[status = BAD_REQUEST]
        #[message = "`sessionId` must be 1 to 128 ASCII letters, digits, `-` \
                     or `_`"]
        Invalid,
    }
}
