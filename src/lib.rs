//! This crate resolves authenticated database handles for MongoDB clients and runs callbacks
//! against them. It does not talk to a server itself: the driver is plugged in through the
//! [`Connector`] trait, and this crate adds the bookkeeping on top of it.
//!
//! The central type is [`CredentialResolver`]. Given a [`Client`], a database name and a
//! [`Credential`](options::Credential), it returns a [`Database`] handle, authenticating the
//! credential exactly once per distinct (client, database, credential, authentication database)
//! combination, no matter how many tasks or threads ask for it at the same time.
//!
//! # Example Usage
//!
//! ## Resolving an authenticated handle
//! ```no_run
//! # async fn foo(connector: impl mongodb_dbutils::Connector) -> mongodb_dbutils::error::Result<()> {
//! use mongodb_dbutils::{options::Credential, Client, CredentialResolver};
//!
//! let client = Client::new(connector);
//! let resolver = CredentialResolver::new();
//! let credential = Credential::new("admin", "admin");
//!
//! // Authenticates against "dbAuthTests" itself.
//! let db = resolver.resolve(&client, "dbAuthTests", &credential).await?;
//!
//! // Authenticates against "admin" and hands back a handle to "dbAuthTests".
//! let db = resolver
//!     .resolve_with_auth_db(&client, "dbAuthTests", &credential, "admin")
//!     .await?;
//! # Ok(()) }
//! ```
//!
//! ## Running callbacks
//! ```no_run
//! # async fn foo(client: mongodb_dbutils::Client) -> mongodb_dbutils::error::Result<()> {
//! use mongodb_dbutils::DatabaseTemplate;
//!
//! let template = DatabaseTemplate::new(client, "dbAuthTests");
//! let version = template.server_version().await?;
//! if version.is_at_least(4, 0) {
//!     template.drop_database().await?;
//! }
//! # Ok(()) }
//! ```
//!
//! ### Using the sync API
//! The crate also provides a blocking API in the `sync` module, enabled by the default `"sync"`
//! feature. The sync types call through to the async ones on a runtime owned by
//! [`sync::Client`], so they can be used from plain threads.
//!
//! # Logging
//!
//! Events are emitted with [`tracing`](https://docs.rs/tracing) under the
//! `mongodb_dbutils::client`, `mongodb_dbutils::resolver` and `mongodb_dbutils::template`
//! targets. Passwords are never logged.

#![warn(missing_docs)]
#![cfg_attr(docsrs, feature(doc_cfg))]

pub mod options;

mod client;
mod connector;
mod db;
pub mod error;
mod resolver;
#[cfg(feature = "sync")]
#[cfg_attr(docsrs, doc(cfg(feature = "sync")))]
pub mod sync;
mod template;
#[cfg(test)]
mod test;
mod trace;
mod version;

pub use crate::{
    client::{Client, ClientId},
    connector::{BuildInfo, Connector, SessionId},
    db::Database,
    resolver::CredentialResolver,
    template::DatabaseTemplate,
    version::ServerVersion,
};

pub use futures_core::future::BoxFuture;
