pub mod auth;
pub mod options;

use std::sync::{
    atomic::{AtomicBool, AtomicU32, Ordering},
    Arc,
    Weak,
};

use derive_where::derive_where;

use crate::{
    connector::{BuildInfo, Connector},
    db::Database,
    error::{ErrorKind, Result},
    options::ClientOptions,
    trace::CLIENT_TRACING_EVENT_TARGET,
    version::ServerVersion,
};

/// A process-unique identifier for a [`Client`]. Resolved database handles are cached per
/// `ClientId`, so two clients wrapping equivalent connectors never share cached handles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, derive_more::Display)]
#[display("client {}", _0)]
pub struct ClientId(u32);

impl ClientId {
    fn next() -> Self {
        static NEXT_CLIENT_ID: AtomicU32 = AtomicU32::new(1);
        Self(NEXT_CLIENT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// A `Client` is a handle to a deployment reached through a [`Connector`].
///
/// `Client` uses [`std::sync::Arc`](https://doc.rust-lang.org/std/sync/struct.Arc.html) internally,
/// so it can safely be shared across threads or async tasks. For example:
///
/// ```rust
/// # use mongodb_dbutils::{Client, Connector, error::Result};
/// # fn start_workers(connector: impl Connector) -> Result<()> {
/// let client = Client::new(connector);
///
/// for i in 0..5 {
///     let client_ref = client.clone();
///
///     tokio::task::spawn(async move {
///         let db = client_ref.database(&format!("db{}", i));
///
///         // Do something with the database
///     });
/// }
/// # Ok(())
/// # }
/// ```
///
/// A `Client` holds no cached authentication state itself; that lives in the
/// [`CredentialResolver`](crate::CredentialResolver) the application injects wherever handles are
/// resolved.
#[derive(Clone, Debug)]
pub struct Client {
    inner: Arc<ClientInner>,
}

#[derive_where(Debug)]
struct ClientInner {
    id: ClientId,
    options: ClientOptions,
    #[derive_where(skip)]
    connector: Box<dyn Connector>,
    shut_down: AtomicBool,
}

impl Client {
    /// Creates a new `Client` on top of `connector`.
    pub fn new(connector: impl Connector) -> Self {
        Self::with_options(connector, ClientOptions::default())
    }

    /// Creates a new `Client` on top of `connector`, configured with `options`.
    pub fn with_options(connector: impl Connector, options: ClientOptions) -> Self {
        let inner = Arc::new(ClientInner {
            id: ClientId::next(),
            options,
            connector: Box::new(connector),
            shut_down: AtomicBool::new(false),
        });
        tracing::debug!(
            target: CLIENT_TRACING_EVENT_TARGET,
            client_id = %inner.id,
            app_name = inner.options.app_name.as_deref(),
            "client created"
        );
        Self { inner }
    }

    /// The identifier of this `Client`.
    pub fn id(&self) -> ClientId {
        self.inner.id
    }

    /// The options this `Client` was created with.
    pub fn options(&self) -> &ClientOptions {
        &self.inner.options
    }

    /// Gets a handle to a database specified by `name`. The handle is not authenticated; use a
    /// [`CredentialResolver`](crate::CredentialResolver) to obtain an authenticated one.
    ///
    /// This method does not send or receive anything across the wire to the database, so it can be
    /// used repeatedly without incurring any costs from I/O.
    pub fn database(&self, name: &str) -> Database {
        Database::new(self.clone(), name)
    }

    /// Runs the `buildInfo` command against the deployment.
    pub async fn build_info(&self) -> Result<BuildInfo> {
        self.check_open()?;
        self.inner.connector.build_info().await
    }

    /// Gets the version of the server this `Client` is connected to.
    pub async fn server_version(&self) -> Result<ServerVersion> {
        let build_info = self.build_info().await?;
        ServerVersion::parse(&build_info.version)
    }

    /// Shuts this `Client` down. Every clone of it observes the shutdown: later operations fail
    /// with [`ErrorKind::Shutdown`], and resolvers drop the handles they cached for it the next
    /// time they are asked to resolve through it.
    ///
    /// Calling this more than once has no further effect.
    pub async fn shutdown(&self) {
        if self.inner.shut_down.swap(true, Ordering::SeqCst) {
            return;
        }
        self.inner.connector.shutdown().await;
        tracing::debug!(
            target: CLIENT_TRACING_EVENT_TARGET,
            client_id = %self.inner.id,
            "client shut down"
        );
    }

    /// Whether [`Client::shutdown`] has been called on this `Client` or one of its clones.
    pub fn is_shut_down(&self) -> bool {
        self.inner.shut_down.load(Ordering::SeqCst)
    }

    pub(crate) fn check_open(&self) -> Result<()> {
        if self.is_shut_down() {
            return Err(ErrorKind::Shutdown.into());
        }
        Ok(())
    }

    pub(crate) fn connector(&self) -> &dyn Connector {
        self.inner.connector.as_ref()
    }

    pub(crate) fn weak(&self) -> WeakClient {
        WeakClient {
            inner: Arc::downgrade(&self.inner),
        }
    }
}

/// A reference to a [`Client`] that does not keep it alive.
#[derive(Clone, Debug)]
pub(crate) struct WeakClient {
    inner: Weak<ClientInner>,
}

impl WeakClient {
    /// The client, unless every handle to it has been dropped or it has been shut down.
    pub(crate) fn upgrade(&self) -> Option<Client> {
        self.inner
            .upgrade()
            .map(|inner| Client { inner })
            .filter(|client| !client.is_shut_down())
    }
}
