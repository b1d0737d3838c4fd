use super::Client;
use crate::{connector::BuildInfo, error::Result, Database as AsyncDatabase};

/// A blocking handle to a database. See the async
/// [`Database`](../struct.Database.html) for details.
#[derive(Clone, Debug)]
pub struct Database {
    async_database: AsyncDatabase,
    client: Client,
}

impl Database {
    pub(crate) fn new(async_database: AsyncDatabase, client: Client) -> Self {
        Self {
            async_database,
            client,
        }
    }

    /// Gets the name of the `Database`.
    pub fn name(&self) -> &str {
        self.async_database.name()
    }

    /// Get the `Client` that this database descended from.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The database the credential of this handle was verified against, if any.
    pub fn auth_source(&self) -> Option<&str> {
        self.async_database.auth_source()
    }

    /// The username this handle was authenticated as, if any.
    pub fn principal(&self) -> Option<&str> {
        self.async_database.principal()
    }

    /// Whether this handle was obtained through a successful authentication.
    pub fn is_authenticated(&self) -> bool {
        self.async_database.is_authenticated()
    }

    /// Whether `self` and `other` are clones of the same handle.
    pub fn ptr_eq(&self, other: &Database) -> bool {
        self.async_database.ptr_eq(&other.async_database)
    }

    /// Gets an unauthenticated handle to another database on the same client.
    pub fn sister(&self, name: &str) -> Database {
        Database::new(self.async_database.sister(name), self.client.clone())
    }

    /// Creates a user with the given password on this database.
    pub fn create_user(&self, username: &str, password: &str) -> Result<()> {
        self.client
            .block_on(self.async_database.create_user(username, password))
    }

    /// Drops the database, deleting all data it contains.
    pub fn drop(&self) -> Result<()> {
        self.client.block_on(self.async_database.drop())
    }

    /// Runs the `buildInfo` command through this database's client.
    pub fn build_info(&self) -> Result<BuildInfo> {
        self.client.block_on(self.async_database.build_info())
    }

    /// The async handle this one wraps.
    pub fn as_async(&self) -> &AsyncDatabase {
        &self.async_database
    }
}
