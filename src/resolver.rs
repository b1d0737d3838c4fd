pub mod options;

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU64, Ordering},
        Arc,
        PoisonError,
        RwLock,
        RwLockReadGuard,
        RwLockWriteGuard,
    },
};

use futures_core::future::BoxFuture;
use futures_util::{
    future::{FutureExt, Shared},
    TryFutureExt,
};

use crate::{
    client::{
        auth::{validate_auth_source, validate_db_name, Credential},
        ClientId,
        WeakClient,
    },
    db::WeakDatabase,
    error::{ErrorKind, Result},
    trace::{TracingRepresentation, RESOLVER_TRACING_EVENT_TARGET},
    Client,
    Database,
};

use self::options::ResolverOptions;

type AuthAttempt = Shared<BoxFuture<'static, Result<Database>>>;

/// Resolves authenticated [`Database`] handles, authenticating at most once per distinct
/// (client, database, credential, authentication database) combination.
///
/// The first caller for a key starts the authentication round-trip. Callers arriving while it is
/// in flight wait for that same attempt and receive its outcome, success or failure. A successful
/// outcome is cached and later callers get a clone of the cached handle without any round-trip;
/// a failed one leaves nothing behind, so the next call authenticates again.
///
/// The cache does not keep clients alive. Handles cached for a client are released once the
/// client is shut down or every handle to it has been dropped.
///
/// `CredentialResolver` uses [`std::sync::Arc`](https://doc.rust-lang.org/std/sync/struct.Arc.html)
/// internally; clones share one cache. Create one resolver and hand it to everything that needs
/// authenticated handles:
///
/// ```rust
/// # use mongodb_dbutils::{Client, CredentialResolver, options::Credential, error::Result};
/// # async fn run(client: Client) -> Result<()> {
/// let resolver = CredentialResolver::new();
/// let credential = Credential::new("admin", "admin");
///
/// // Verified against "admin", used for "dbAuthTests".
/// let db = resolver
///     .resolve_with_auth_db(&client, "dbAuthTests", &credential, "admin")
///     .await?;
/// assert_eq!(db.name(), "dbAuthTests");
/// assert_eq!(db.auth_source(), Some("admin"));
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug, Default)]
pub struct CredentialResolver {
    inner: Arc<ResolverInner>,
}

#[derive(Debug, Default)]
struct ResolverInner {
    options: ResolverOptions,
    cache: RwLock<HashMap<CacheKey, CacheEntry>>,
    next_attempt_id: AtomicU64,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
struct CacheKey {
    client_id: ClientId,
    db_name: String,
    credential: Credential,
    auth_source: String,
}

enum CacheEntry {
    Ready(WeakDatabase),
    InFlight {
        attempt_id: u64,
        attempt: AuthAttempt,
        client: WeakClient,
        /// Cleared when the entry is evicted mid-flight. The attempt keeps serving its waiters,
        /// new ones included, but its outcome is not cached.
        cacheable: bool,
    },
}

impl CacheEntry {
    /// Whether the entry still belongs in the cache. In-flight entries whose client went away
    /// stay until their attempt settles, but stop being cacheable.
    fn retain_live(&mut self) -> bool {
        match self {
            Self::Ready(db) => db.upgrade().is_some(),
            Self::InFlight {
                client, cacheable, ..
            } => {
                if client.upgrade().is_none() {
                    *cacheable = false;
                }
                true
            }
        }
    }

    /// Drops a ready entry, or marks an in-flight one as not cacheable. Returns whether the
    /// entry should be kept.
    fn evict(&mut self) -> bool {
        match self {
            Self::Ready(_) => false,
            Self::InFlight { cacheable, .. } => {
                *cacheable = false;
                true
            }
        }
    }
}

impl std::fmt::Debug for CacheEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Ready(db) => f.debug_tuple("Ready").field(db).finish(),
            Self::InFlight {
                attempt_id,
                cacheable,
                ..
            } => f
                .debug_struct("InFlight")
                .field("attempt_id", attempt_id)
                .field("cacheable", cacheable)
                .finish(),
        }
    }
}

impl CredentialResolver {
    /// Creates a resolver with the default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a resolver configured with `options`.
    pub fn with_options(options: ResolverOptions) -> Self {
        Self {
            inner: Arc::new(ResolverInner {
                options,
                ..Default::default()
            }),
        }
    }

    /// Resolves a handle to the database named `db_name`.
    ///
    /// The credential is verified against its own `source` if it names one, and against
    /// `db_name` otherwise. An empty credential is never authenticated: the plain handle from
    /// [`Client::database`] is returned right away.
    pub async fn resolve(
        &self,
        client: &Client,
        db_name: &str,
        credential: &Credential,
    ) -> Result<Database> {
        self.resolve_common(client, db_name, credential, None)
            .await
    }

    /// Resolves a handle to the database named `db_name`, verifying `credential` against the
    /// database named `auth_db` (commonly `"admin"`). `auth_db` takes precedence over the
    /// credential's own `source`.
    pub async fn resolve_with_auth_db(
        &self,
        client: &Client,
        db_name: &str,
        credential: &Credential,
        auth_db: &str,
    ) -> Result<Database> {
        validate_auth_source(auth_db)?;
        self.resolve_common(client, db_name, credential, Some(auth_db))
            .await
    }

    /// Drops every handle cached for `client`, returning how many handles were removed.
    ///
    /// Attempts still in flight for the client keep running, and callers arriving meanwhile join
    /// them rather than starting another round-trip, but their outcome is not cached.
    pub fn evict_client(&self, client: &Client) -> usize {
        let client_id = client.id();
        let mut cache = self.write_cache();
        let mut evicted = 0;
        cache.retain(|key, entry| {
            if key.client_id != client_id || entry.evict() {
                return true;
            }
            evicted += 1;
            false
        });
        if evicted > 0 {
            tracing::debug!(
                target: RESOLVER_TRACING_EVENT_TARGET,
                %client_id,
                evicted,
                "evicted cached database handles"
            );
        }
        evicted
    }

    /// Drops every cached handle. Attempts still in flight are handled as in
    /// [`CredentialResolver::evict_client`].
    pub fn clear(&self) {
        self.write_cache().retain(|_, entry| entry.evict());
    }

    /// The number of authenticated handles currently cached.
    pub fn cached_handles(&self) -> usize {
        let mut cache = self.write_cache();
        cache.retain(|_, entry| entry.retain_live());
        cache
            .values()
            .filter(|entry| matches!(entry, CacheEntry::Ready(_)))
            .count()
    }

    async fn resolve_common(
        &self,
        client: &Client,
        db_name: &str,
        credential: &Credential,
        auth_db: Option<&str>,
    ) -> Result<Database> {
        validate_db_name(db_name)?;
        credential.validate()?;

        if client.is_shut_down() {
            self.evict_client(client);
            return Err(ErrorKind::Shutdown.into());
        }

        if credential.is_empty() {
            return Ok(client.database(db_name));
        }

        let key = CacheKey {
            client_id: client.id(),
            db_name: db_name.to_string(),
            credential: credential.clone(),
            auth_source: credential.resolved_source(db_name, auth_db).to_string(),
        };

        if let Some(db) = self.cached(&key) {
            return Ok(db);
        }

        let (attempt_id, attempt) = match self.join_or_start(client, &key) {
            Ok(db) => return Ok(db),
            Err(in_flight) => in_flight,
        };

        let result = attempt.await;
        self.settle(&key, attempt_id, &result);
        result
    }

    fn cached(&self, key: &CacheKey) -> Option<Database> {
        match self.read_cache().get(key) {
            Some(CacheEntry::Ready(db)) => db.upgrade(),
            _ => None,
        }
    }

    /// Under the write lock, either returns the handle cached in the meantime, joins the attempt
    /// already in flight for `key`, or starts a new one. Entries of clients that are gone are
    /// pruned on the way.
    fn join_or_start(
        &self,
        client: &Client,
        key: &CacheKey,
    ) -> std::result::Result<Database, (u64, AuthAttempt)> {
        let mut cache = self.write_cache();
        cache.retain(|_, entry| entry.retain_live());
        let existing = match cache.get(key) {
            Some(CacheEntry::Ready(db)) => db.upgrade().map(Ok),
            Some(CacheEntry::InFlight {
                attempt_id,
                attempt,
                ..
            }) => {
                tracing::debug!(
                    target: RESOLVER_TRACING_EVENT_TARGET,
                    client_id = %key.client_id,
                    db = %key.db_name,
                    auth_source = %key.auth_source,
                    attempt_id = *attempt_id,
                    "waiting on in-flight authentication"
                );
                Some(Err((*attempt_id, attempt.clone())))
            }
            None => None,
        };

        match existing {
            Some(found) => found,
            None => Err(self.start_attempt(&mut cache, client, key)),
        }
    }

    fn start_attempt(
        &self,
        cache: &mut HashMap<CacheKey, CacheEntry>,
        client: &Client,
        key: &CacheKey,
    ) -> (u64, AuthAttempt) {
        let attempt_id = self.inner.next_attempt_id.fetch_add(1, Ordering::Relaxed);
        let attempt = authenticate(
            client.clone(),
            key.clone(),
            self.inner.options.check_existing_authentication(),
        )
        .boxed()
        .shared();
        cache.insert(
            key.clone(),
            CacheEntry::InFlight {
                attempt_id,
                attempt: attempt.clone(),
                client: client.weak(),
                cacheable: true,
            },
        );
        (attempt_id, attempt)
    }

    /// Replaces the in-flight entry for `key` with the outcome of attempt `attempt_id`. Only the
    /// first waiter to get here changes anything, and only if the entry still belongs to that
    /// attempt: it may have been replaced by a later attempt after a failure. An entry evicted
    /// mid-flight is removed instead of cached.
    fn settle(&self, key: &CacheKey, attempt_id: u64, result: &Result<Database>) {
        let mut cache = self.write_cache();
        let cacheable = match cache.get_mut(key) {
            Some(entry) => {
                if !matches!(entry, CacheEntry::InFlight { attempt_id: id, .. } if *id == attempt_id)
                {
                    return;
                }
                entry.retain_live();
                matches!(entry, CacheEntry::InFlight { cacheable: true, .. })
            }
            None => return,
        };

        match result {
            Ok(db) if cacheable => {
                cache.insert(key.clone(), CacheEntry::Ready(db.downgrade()));
            }
            _ => {
                cache.remove(key);
            }
        }
    }

    fn read_cache(&self) -> RwLockReadGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.inner
            .cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn write_cache(&self) -> RwLockWriteGuard<'_, HashMap<CacheKey, CacheEntry>> {
        self.inner
            .cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

/// Performs the single authentication round-trip for `key`.
async fn authenticate(client: Client, key: CacheKey, check_existing: bool) -> Result<Database> {
    let connector = client.connector();
    let credential = &key.credential;

    if check_existing
        && connector
            .is_authenticated(&key.auth_source, credential)
            .await?
    {
        tracing::debug!(
            target: RESOLVER_TRACING_EVENT_TARGET,
            client_id = %key.client_id,
            db = %key.db_name,
            credential = %credential.tracing_representation(),
            auth_source = %key.auth_source,
            "credential already authenticated"
        );
        return Ok(authenticated_handle(&client, &key));
    }

    connector
        .authenticate(&key.auth_source, credential)
        .inspect_err(|error| {
            tracing::warn!(
                target: RESOLVER_TRACING_EVENT_TARGET,
                client_id = %key.client_id,
                db = %key.db_name,
                credential = %credential.tracing_representation(),
                auth_source = %key.auth_source,
                error = %error.tracing_representation(),
                "authentication failed"
            );
        })
        .await?;

    tracing::info!(
        target: RESOLVER_TRACING_EVENT_TARGET,
        client_id = %key.client_id,
        db = %key.db_name,
        credential = %credential.tracing_representation(),
        auth_source = %key.auth_source,
        "authenticated"
    );
    Ok(authenticated_handle(&client, &key))
}

fn authenticated_handle(client: &Client, key: &CacheKey) -> Database {
    Database::authenticated(
        client.clone(),
        &key.db_name,
        &key.auth_source,
        key.credential.principal(),
    )
}
