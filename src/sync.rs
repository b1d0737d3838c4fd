//! Contains the sync API. This is only available when the `sync` feature is enabled.
//!
//! The sync types wrap their async counterparts and block on them using a runtime owned by
//! [`Client`]. They must not be used from inside an async context.

mod client;
mod db;
mod resolver;
mod template;


pub use client::Client;
pub use db::Database;
pub use resolver::CredentialResolver;
pub use template::DatabaseTemplate;
