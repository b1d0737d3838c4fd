use super::{Client, Database};
use crate::{
    error::Result,
    options::{Credential, ResolverOptions},
    CredentialResolver as AsyncCredentialResolver,
};

/// A blocking wrapper around the async
/// [`CredentialResolver`](../struct.CredentialResolver.html). Clones share one cache, which is
/// also shared with the async resolver returned by [`CredentialResolver::as_async`].
#[derive(Clone, Debug, Default)]
pub struct CredentialResolver {
    async_resolver: AsyncCredentialResolver,
}

impl From<AsyncCredentialResolver> for CredentialResolver {
    fn from(async_resolver: AsyncCredentialResolver) -> Self {
        Self { async_resolver }
    }
}

impl CredentialResolver {
    /// Creates a resolver with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver configured with `options`.
    pub fn with_options(options: ResolverOptions) -> Self {
        AsyncCredentialResolver::with_options(options).into()
    }

    /// Resolves a handle to the database named `db_name`, blocking until any authentication it
    /// needs, including one started by another thread, has completed.
    pub fn resolve(
        &self,
        client: &Client,
        db_name: &str,
        credential: &Credential,
    ) -> Result<Database> {
        client
            .block_on(
                self.async_resolver
                    .resolve(&client.async_client, db_name, credential),
            )
            .map(|db| Database::new(db, client.clone()))
    }

    /// Resolves a handle to the database named `db_name`, verifying `credential` against the
    /// database named `auth_db`.
    pub fn resolve_with_auth_db(
        &self,
        client: &Client,
        db_name: &str,
        credential: &Credential,
        auth_db: &str,
    ) -> Result<Database> {
        client
            .block_on(self.async_resolver.resolve_with_auth_db(
                &client.async_client,
                db_name,
                credential,
                auth_db,
            ))
            .map(|db| Database::new(db, client.clone()))
    }

    /// Drops every handle cached for `client`.
    pub fn evict_client(&self, client: &Client) -> usize {
        self.async_resolver.evict_client(&client.async_client)
    }

    /// Drops every cached handle.
    pub fn clear(&self) {
        self.async_resolver.clear()
    }

    /// The number of authenticated handles currently cached.
    pub fn cached_handles(&self) -> usize {
        self.async_resolver.cached_handles()
    }

    /// The async resolver this one wraps.
    pub fn as_async(&self) -> &AsyncCredentialResolver {
        &self.async_resolver
    }
}
