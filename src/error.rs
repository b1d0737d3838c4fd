//! Contains the `Error` and `Result` types that `mongodb_dbutils` uses.

use std::sync::Arc;

use thiserror::Error;

/// The result type for all methods that can return an error in the `mongodb_dbutils` crate.
pub type Result<T> = std::result::Result<T, Error>;

/// An error that can occur in the `mongodb_dbutils` crate. The inner
/// [`ErrorKind`](enum.ErrorKind.html) is wrapped in an `Arc` to allow the errors to be
/// cloned, which is how a single failed authentication attempt is reported to every caller that
/// was waiting on it.
#[derive(Clone, Debug, Error)]
#[error("{kind}")]
#[non_exhaustive]
pub struct Error {
    /// The type of error that occurred.
    pub kind: Arc<ErrorKind>,
}

impl Error {
    /// Creates an `Authentication` error for the given principal with the provided reason.
    pub fn authentication_error(principal: &str, reason: impl AsRef<str>) -> Self {
        ErrorKind::Authentication {
            message: format!("authentication of {} failed: {}", principal, reason.as_ref()),
        }
        .into()
    }

    /// Creates a `Connectivity` error with the provided reason.
    pub fn connectivity_error(reason: impl Into<String>) -> Self {
        ErrorKind::Connectivity {
            message: reason.into(),
        }
        .into()
    }

    pub(crate) fn invalid_argument(message: impl Into<String>) -> Self {
        ErrorKind::InvalidArgument {
            message: message.into(),
        }
        .into()
    }

    pub(crate) fn invalid_response(message: impl Into<String>) -> Self {
        ErrorKind::InvalidResponse {
            message: message.into(),
        }
        .into()
    }

    #[cfg_attr(not(feature = "sync"), allow(dead_code))]
    pub(crate) fn internal(message: impl Into<String>) -> Self {
        ErrorKind::Internal {
            message: message.into(),
        }
        .into()
    }

    /// Whether this error was caused by rejected credentials or an authentication protocol
    /// failure.
    pub fn is_auth_error(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::Authentication { .. })
    }

    /// Whether this error was caused by the server being unreachable.
    pub fn is_network_error(&self) -> bool {
        self.kind.is_network_error()
    }

    /// Whether this error was caused by using a client after it was shut down.
    pub fn is_shutdown(&self) -> bool {
        matches!(self.kind.as_ref(), ErrorKind::Shutdown)
    }
}

impl<E> From<E> for Error
where
    ErrorKind: From<E>,
{
    fn from(err: E) -> Self {
        Self {
            kind: Arc::new(err.into()),
        }
    }
}

impl std::ops::Deref for Error {
    type Target = Arc<ErrorKind>;

    fn deref(&self) -> &Self::Target {
        &self.kind
    }
}

/// The types of errors that can occur.
#[allow(missing_docs)]
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The server rejected the supplied credentials, or the authentication conversation failed.
    #[error("{message}")]
    #[non_exhaustive]
    Authentication { message: String },

    /// The server could not be reached.
    #[error("Unable to reach the server: {message}")]
    #[non_exhaustive]
    Connectivity { message: String },

    /// An invalid argument was provided, e.g. an empty database name or a credential without a
    /// username.
    #[error("An invalid argument was provided: {message}")]
    #[non_exhaustive]
    InvalidArgument { message: String },

    /// The server returned a reply that could not be interpreted.
    #[error("The server returned an invalid reply: {message}")]
    #[non_exhaustive]
    InvalidResponse { message: String },

    /// Wrapper around [`std::io::Error`](https://doc.rust-lang.org/std/io/struct.Error.html).
    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("Internal error: {message}")]
    #[non_exhaustive]
    Internal { message: String },

    /// The `Client` was used after `Client::shutdown` was called.
    #[error("Client has been shut down")]
    Shutdown,
}

impl ErrorKind {
    pub(crate) fn is_network_error(&self) -> bool {
        matches!(self, ErrorKind::Io(..) | ErrorKind::Connectivity { .. })
    }
}
