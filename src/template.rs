use std::future::Future;

use typed_builder::TypedBuilder;

use crate::{
    client::auth::Credential,
    connector::SessionId,
    error::Result,
    trace::TEMPLATE_TRACING_EVENT_TARGET,
    version::ServerVersion,
    Client,
    CredentialResolver,
    Database,
};

/// Runs callbacks against one database of a [`Client`].
///
/// When a credential is configured, the database handle is obtained through the template's
/// [`CredentialResolver`]; share one resolver between templates (and anything else resolving
/// handles) to share its cache. Every callback runs inside a session that is ended once the
/// callback finishes, fails, or is dropped before completing.
///
/// ```rust
/// # use mongodb_dbutils::{Client, DatabaseTemplate, options::Credential, error::Result};
/// # async fn run(client: Client) -> Result<()> {
/// let template = DatabaseTemplate::builder()
///     .client(client)
///     .database_name("dbAuthTests")
///     .credential(Credential::new("admin", "admin"))
///     .auth_database("admin")
///     .build();
///
/// template
///     .execute(|db| async move { db.create_user("reader", "secret").await })
///     .await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, TypedBuilder)]
pub struct DatabaseTemplate {
    client: Client,

    #[builder(setter(into))]
    database_name: String,

    /// The credential callbacks are authenticated with. Callbacks get an unauthenticated handle
    /// when this is unset.
    #[builder(default, setter(strip_option))]
    credential: Option<Credential>,

    /// The database the credential is verified against, overriding the credential's own source.
    #[builder(default, setter(strip_option, into))]
    auth_database: Option<String>,

    #[builder(default)]
    resolver: CredentialResolver,
}

impl DatabaseTemplate {
    /// Creates a template running unauthenticated callbacks against `database_name`.
    pub fn new(client: Client, database_name: impl Into<String>) -> Self {
        Self::builder()
            .client(client)
            .database_name(database_name)
            .build()
    }

    /// The client this template runs on.
    pub fn client(&self) -> &Client {
        &self.client
    }

    /// The name of the database callbacks run against.
    pub fn database_name(&self) -> &str {
        &self.database_name
    }

    /// Resolves the handle callbacks receive.
    pub async fn database(&self) -> Result<Database> {
        let anonymous = Credential::anonymous();
        let credential = self.credential.as_ref().unwrap_or(&anonymous);
        match self.auth_database {
            Some(ref auth_db) => {
                self.resolver
                    .resolve_with_auth_db(&self.client, &self.database_name, credential, auth_db)
                    .await
            }
            None => {
                self.resolver
                    .resolve(&self.client, &self.database_name, credential)
                    .await
            }
        }
    }

    /// Runs `callback` against the template's database inside a session. The session is ended
    /// on every exit path.
    pub async fn execute<F, Fut, T>(&self, callback: F) -> Result<T>
    where
        F: FnOnce(Database) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let db = self.database().await?;
        let _session = SessionGuard::start(&self.client).await?;
        callback(db).await
    }

    /// Gets the version of the server the template's client is connected to.
    pub async fn server_version(&self) -> Result<ServerVersion> {
        self.client.server_version().await
    }

    /// Drops the template's database.
    pub async fn drop_database(&self) -> Result<()> {
        self.execute(|db| async move { db.drop().await }).await
    }
}

/// Ends its session when dropped.
#[derive(Debug)]
pub(crate) struct SessionGuard {
    client: Client,
    id: SessionId,
}

impl SessionGuard {
    pub(crate) async fn start(client: &Client) -> Result<Self> {
        client.check_open()?;
        let id = client.connector().start_session().await?;
        tracing::debug!(
            target: TEMPLATE_TRACING_EVENT_TARGET,
            client_id = %client.id(),
            session = %id,
            "session started"
        );
        Ok(Self {
            client: client.clone(),
            id,
        })
    }
}

impl Drop for SessionGuard {
    fn drop(&mut self) {
        self.client.connector().end_session(self.id);
        tracing::debug!(
            target: TEMPLATE_TRACING_EVENT_TARGET,
            client_id = %self.client.id(),
            session = %self.id,
            "session ended"
        );
    }
}
