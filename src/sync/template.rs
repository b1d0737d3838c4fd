use super::{Client, CredentialResolver, Database};
use crate::{
    error::Result,
    options::Credential,
    template::SessionGuard,
    version::ServerVersion,
    DatabaseTemplate as AsyncDatabaseTemplate,
};

/// A blocking wrapper around the async
/// [`DatabaseTemplate`](../struct.DatabaseTemplate.html). Callbacks run on the calling thread.
#[derive(Clone, Debug)]
pub struct DatabaseTemplate {
    async_template: AsyncDatabaseTemplate,
    client: Client,
}

impl DatabaseTemplate {
    /// Creates a template running unauthenticated callbacks against `database_name`.
    pub fn new(client: &Client, database_name: &str) -> Self {
        Self {
            async_template: AsyncDatabaseTemplate::new(client.async_client.clone(), database_name),
            client: client.clone(),
        }
    }

    /// Creates a template whose callbacks are authenticated with `credential` through
    /// `resolver`, verified against `auth_database` if given.
    pub fn with_credential(
        client: &Client,
        database_name: &str,
        credential: Credential,
        auth_database: Option<&str>,
        resolver: &CredentialResolver,
    ) -> Self {
        let builder = AsyncDatabaseTemplate::builder()
            .client(client.async_client.clone())
            .database_name(database_name)
            .credential(credential)
            .resolver(resolver.as_async().clone());
        let async_template = match auth_database {
            Some(auth_database) => builder.auth_database(auth_database).build(),
            None => builder.build(),
        };
        Self {
            async_template,
            client: client.clone(),
        }
    }

    /// The name of the database callbacks run against.
    pub fn database_name(&self) -> &str {
        self.async_template.database_name()
    }

    /// Resolves the handle callbacks receive.
    pub fn database(&self) -> Result<Database> {
        self.client
            .block_on(self.async_template.database())
            .map(|db| Database::new(db, self.client.clone()))
    }

    /// Runs `callback` against the template's database inside a session. The session is ended
    /// on every exit path, including a callback that panics when panics unwind.
    pub fn execute<F, T>(&self, callback: F) -> Result<T>
    where
        F: FnOnce(Database) -> Result<T>,
    {
        let db = self.database()?;
        let _session = self
            .client
            .block_on(SessionGuard::start(&self.client.async_client))?;
        callback(db)
    }

    /// Gets the version of the server the template's client is connected to.
    pub fn server_version(&self) -> Result<ServerVersion> {
        self.client.block_on(self.async_template.server_version())
    }

    /// Drops the template's database.
    pub fn drop_database(&self) -> Result<()> {
        self.execute(|db| db.drop())
    }
}
