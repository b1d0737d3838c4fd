use std::{future::Future, sync::Arc};

use tokio::runtime::Runtime;

use super::Database;
use crate::{
    connector::{BuildInfo, Connector},
    error::{Error, Result},
    options::ClientOptions,
    version::ServerVersion,
    Client as AsyncClient,
    ClientId,
};

const RUNTIME_WORKER_THREADS: usize = 2;

/// This is the entry point for the synchronous API. A `Client` wraps the asynchronous
/// [`mongodb_dbutils::Client`](../struct.Client.html) together with a tokio runtime the wrapped
/// client runs on. Clones share both.
///
/// `Client` uses [`std::sync::Arc`](https://doc.rust-lang.org/std/sync/struct.Arc.html) internally,
/// so it can safely be shared across threads. For example:
///
/// ```rust
/// # use mongodb_dbutils::{sync::Client, Connector, error::Result};
/// #
/// # fn start_workers(connector: impl Connector) -> Result<()> {
/// let client = Client::new(connector)?;
///
/// for i in 0..5 {
///     let client_ref = client.clone();
///
///     std::thread::spawn(move || {
///         let db = client_ref.database(&format!("db{}", i));
///
///         // Do something with the database
///     });
/// }
/// # Ok(())
/// # }
/// ```
///
/// The runtime is shut down when the last clone is dropped, which must not happen from within an
/// async context.
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) async_client: AsyncClient,
    runtime: Arc<Runtime>,
}

impl Client {
    /// Creates a new `Client` on top of `connector`.
    pub fn new(connector: impl Connector) -> Result<Self> {
        Self::with_options(connector, ClientOptions::default())
    }

    /// Creates a new `Client` on top of `connector`, configured with `options`.
    pub fn with_options(connector: impl Connector, options: ClientOptions) -> Result<Self> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(RUNTIME_WORKER_THREADS)
            .thread_name("mongodb-dbutils")
            .enable_all()
            .build()
            .map_err(|e| Error::internal(format!("failed to start the runtime: {}", e)))?;
        Ok(Self {
            async_client: AsyncClient::with_options(connector, options),
            runtime: Arc::new(runtime),
        })
    }

    /// The identifier of the wrapped async `Client`.
    pub fn id(&self) -> ClientId {
        self.async_client.id()
    }

    /// Gets a handle to a database specified by `name`. The handle is not authenticated.
    ///
    /// This method does not send or receive anything across the wire to the database, so it can be
    /// used repeatedly without incurring any costs from I/O.
    pub fn database(&self, name: &str) -> Database {
        Database::new(self.async_client.database(name), self.clone())
    }

    /// Runs the `buildInfo` command against the deployment.
    pub fn build_info(&self) -> Result<BuildInfo> {
        self.block_on(self.async_client.build_info())
    }

    /// Gets the version of the server this `Client` is connected to.
    pub fn server_version(&self) -> Result<ServerVersion> {
        self.block_on(self.async_client.server_version())
    }

    /// Shuts this `Client` down. See [`Client::shutdown`](../struct.Client.html#method.shutdown).
    pub fn shutdown(&self) {
        self.block_on(self.async_client.shutdown())
    }

    /// Whether this `Client` has been shut down.
    pub fn is_shut_down(&self) -> bool {
        self.async_client.is_shut_down()
    }

    pub(crate) fn block_on<F: Future>(&self, fut: F) -> F::Output {
        self.runtime.block_on(fut)
    }
}
