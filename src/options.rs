//! Contains all of the types needed to configure clients, credentials and resolvers.
//!
//! The options structs in this module use the
//! [`typed-builder`](https://crates.io/crates/typed-builder) crate to derive a type-safe builder
//! API on them, and can also be deserialized from configuration files with `serde`. For example,
//! to create a [`ResolverOptions`](struct.ResolverOptions.html) that always authenticates:
//!
//! ```rust
//! # use mongodb_dbutils::options::ResolverOptions;
//! #
//! let options = ResolverOptions::builder()
//!     .check_existing_authentication(false)
//!     .build();
//! ```

pub use crate::{
    client::{
        auth::{Credential, EXTERNAL_AUTH_SOURCE},
        options::ClientOptions,
    },
    resolver::options::ResolverOptions,
};
