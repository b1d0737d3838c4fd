//! The contract between this crate and the database driver it runs on top of.

use std::sync::atomic::{AtomicU64, Ordering};

use futures_core::future::BoxFuture;
use futures_util::FutureExt;
use serde::Deserialize;

use crate::{client::auth::Credential, error::Result};

/// Identifies a session started through [`Connector::start_session`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, derive_more::Display)]
#[display("session {}", _0)]
pub struct SessionId(pub u64);

impl SessionId {
    /// Returns a process-unique session id.
    pub fn next() -> Self {
        static NEXT_SESSION_ID: AtomicU64 = AtomicU64::new(1);
        Self(NEXT_SESSION_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// The reply to a `buildInfo` command.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct BuildInfo {
    /// The server version string, e.g. `"4.0.3"`.
    pub version: String,

    /// The git revision the server was built from.
    #[serde(default)]
    pub git_version: Option<String>,
}

impl BuildInfo {
    /// Creates a `BuildInfo` reporting the given version.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            git_version: None,
        }
    }
}

/// A driver-side connection to a deployment.
///
/// Implementations must be safe to use from many tasks and threads at once; the resolver calls
/// them concurrently for different keys. Errors should be reported as
/// [`ErrorKind::Authentication`](crate::error::ErrorKind::Authentication) when the server
/// rejects a credential and as
/// [`ErrorKind::Connectivity`](crate::error::ErrorKind::Connectivity) when it cannot be reached.
pub trait Connector: Send + Sync + 'static {
    /// Authenticates `credential` against the database named `db`.
    fn authenticate<'a>(&'a self, db: &'a str, credential: &'a Credential)
        -> BoxFuture<'a, Result<()>>;

    /// Whether `credential` is already authenticated against the database named `db`, in which
    /// case no authentication round-trip is needed.
    fn is_authenticated<'a>(
        &'a self,
        db: &'a str,
        credential: &'a Credential,
    ) -> BoxFuture<'a, Result<bool>> {
        let _ = (db, credential);
        async { Ok(false) }.boxed()
    }

    /// Runs the `buildInfo` command.
    fn build_info(&self) -> BoxFuture<'_, Result<BuildInfo>>;

    /// Creates a user with the given password on the database named `db`.
    fn create_user<'a>(
        &'a self,
        db: &'a str,
        username: &'a str,
        password: &'a str,
    ) -> BoxFuture<'a, Result<()>>;

    /// Drops the database named `db`.
    fn drop_database<'a>(&'a self, db: &'a str) -> BoxFuture<'a, Result<()>>;

    /// Starts a session that callbacks run inside of.
    fn start_session(&self) -> BoxFuture<'_, Result<SessionId>> {
        async { Ok(SessionId::next()) }.boxed()
    }

    /// Ends a session started with [`Connector::start_session`]. This is called from `Drop`, so
    /// it cannot block or fail.
    fn end_session(&self, session: SessionId) {
        let _ = session;
    }

    /// Releases any resources held by the connector.
    fn shutdown(&self) -> BoxFuture<'_, ()> {
        async {}.boxed()
    }
}
