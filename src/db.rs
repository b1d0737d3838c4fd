use std::sync::Arc;

use crate::{
    client::{auth::validate_db_name, WeakClient},
    connector::BuildInfo,
    error::{Error, Result},
    Client,
};

/// `Database` is the client-side abstraction of a MongoDB database. A `Database` is obtained
/// either unauthenticated through [`Client::database`](struct.Client.html#method.database), or
/// authenticated through a [`CredentialResolver`](struct.CredentialResolver.html).
///
/// `Database` uses [`std::sync::Arc`](https://doc.rust-lang.org/std/sync/struct.Arc.html) internally,
/// so it can safely be shared across threads or async tasks, and clones of one handle refer to the
/// same underlying value (see [`Database::ptr_eq`]).
#[derive(Clone, Debug)]
pub struct Database {
    client: Client,
    inner: Arc<DatabaseInner>,
}

#[derive(Debug)]
struct DatabaseInner {
    name: String,
    auth: Option<AuthInfo>,
}

/// Where and as whom a resolved handle was authenticated.
#[derive(Debug)]
struct AuthInfo {
    source: String,
    principal: String,
}

/// A cached [`Database`] that does not keep its client alive.
#[derive(Debug)]
pub(crate) struct WeakDatabase {
    client: WeakClient,
    inner: Arc<DatabaseInner>,
}

impl WeakDatabase {
    /// A clone of the handle this was downgraded from, unless its client is gone or shut down.
    pub(crate) fn upgrade(&self) -> Option<Database> {
        Some(Database {
            client: self.client.upgrade()?,
            inner: self.inner.clone(),
        })
    }
}

impl Database {
    pub(crate) fn new(client: Client, name: &str) -> Self {
        Self {
            client,
            inner: Arc::new(DatabaseInner {
                name: name.to_string(),
                auth: None,
            }),
        }
    }

    pub(crate) fn authenticated(client: Client, name: &str, source: &str, principal: &str) -> Self {
        Self {
            client,
            inner: Arc::new(DatabaseInner {
                name: name.to_string(),
                auth: Some(AuthInfo {
                    source: source.to_string(),
                    principal: principal.to_string(),
                }),
            }),
        }
    }

    pub(crate) fn downgrade(&self) -> WeakDatabase {
        WeakDatabase {
            client: self.client.weak(),
            inner: self.inner.clone(),
        }
    }

    /// Get the `Client` that this database descended from.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// Gets the name of the `Database`.
    pub fn name(&self) -> &str {
        &self.inner.name
    }

    /// The database the credential of this handle was verified against, if it was resolved with
    /// one.
    pub fn auth_source(&self) -> Option<&str> {
        self.inner.auth.as_ref().map(|auth| auth.source.as_str())
    }

    /// The username this handle was authenticated as, if any.
    pub fn principal(&self) -> Option<&str> {
        self.inner.auth.as_ref().map(|auth| auth.principal.as_str())
    }

    /// Whether this handle was obtained through a successful authentication.
    pub fn is_authenticated(&self) -> bool {
        self.inner.auth.is_some()
    }

    /// Whether `self` and `other` are clones of the same handle. A resolver hands out clones of
    /// one handle per cache key.
    pub fn ptr_eq(&self, other: &Database) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Gets an unauthenticated handle to another database on the same client.
    pub fn sister(&self, name: &str) -> Database {
        self.client.database(name)
    }

    /// Creates a user with the given password on this database.
    pub async fn create_user(&self, username: &str, password: &str) -> Result<()> {
        self.check_usable()?;
        if username.is_empty() {
            return Err(Error::invalid_argument("username must not be empty"));
        }
        self.client
            .connector()
            .create_user(self.name(), username, password)
            .await
    }

    /// Drops the database, deleting all data it contains.
    pub async fn drop(&self) -> Result<()> {
        self.check_usable()?;
        self.client.connector().drop_database(self.name()).await
    }

    /// Runs the `buildInfo` command through this database's client.
    pub async fn build_info(&self) -> Result<BuildInfo> {
        self.client.build_info().await
    }

    fn check_usable(&self) -> Result<()> {
        self.client.check_open()?;
        validate_db_name(self.name())
    }
}
