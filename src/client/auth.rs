//! Contains the types needed to specify the credentials a database handle is resolved with.

#[cfg(test)]
mod test;

use derive_where::derive_where;
use serde::Deserialize;
use typed_builder::TypedBuilder;

use crate::error::{Error, Result};

/// The authentication database used for credentials that are verified outside of MongoDB, e.g.
/// LDAP or X.509.
pub const EXTERNAL_AUTH_SOURCE: &str = "$external";

const INVALID_DB_NAME_CHARS: [char; 7] = ['/', '\\', '.', ' ', '"', '$', '\0'];

/// A principal/secret pair, optionally tied to the database it should be verified against.
///
/// A credential with neither a username nor a password is considered empty; resolving a
/// database with an empty credential never performs authentication.
///
/// The password is never included in the `Debug` output.
#[derive(Clone, Default, Deserialize, TypedBuilder, PartialEq, Eq, Hash)]
#[derive_where(Debug)]
#[builder(field_defaults(default, setter(into)))]
#[non_exhaustive]
pub struct Credential {
    /// The username to authenticate with.
    pub username: Option<String>,

    /// The password to authenticate with.
    #[derive_where(skip)]
    pub password: Option<String>,

    /// The database used to authenticate. When this is not set, the credential is verified
    /// against the database being resolved, unless an authentication database is given
    /// explicitly.
    pub source: Option<String>,
}

impl Credential {
    /// Creates a credential for the given username and password with no authentication database.
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: Some(username.into()),
            password: Some(password.into()),
            source: None,
        }
    }

    /// An empty credential. Resolving with it returns unauthenticated handles.
    pub fn anonymous() -> Self {
        Self::default()
    }

    /// Whether this credential carries neither a username nor a password.
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.password.is_none()
    }

    /// Checks that a non-empty credential carries everything needed to authenticate.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Ok(());
        }

        match self.username.as_deref() {
            Some(username) if !username.is_empty() => {}
            _ => {
                return Err(Error::invalid_argument(
                    "no username provided for password authentication",
                ))
            }
        }

        if self.password.is_none() {
            return Err(Error::invalid_argument(
                "no password provided for password authentication",
            ));
        }

        if let Some(ref source) = self.source {
            validate_auth_source(source)?;
        }

        Ok(())
    }

    /// The database this credential is verified against: the explicit `auth_db` if given, then
    /// the credential's own `source`, then the database being resolved.
    pub(crate) fn resolved_source<'a>(
        &'a self,
        db_name: &'a str,
        auth_db: Option<&'a str>,
    ) -> &'a str {
        auth_db.or(self.source.as_deref()).unwrap_or(db_name)
    }

    pub(crate) fn principal(&self) -> &str {
        self.username.as_deref().unwrap_or_default()
    }
}

/// Validates the name of a database handles are resolved for.
pub(crate) fn validate_db_name(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(Error::invalid_argument("database name must not be empty"));
    }

    if let Some(c) = name.chars().find(|c| INVALID_DB_NAME_CHARS.contains(c)) {
        return Err(Error::invalid_argument(format!(
            "database name {:?} contains the invalid character {:?}",
            name, c
        )));
    }

    Ok(())
}

/// Validates the name of an authentication database. `$external` is accepted in addition to
/// ordinary database names.
pub(crate) fn validate_auth_source(name: &str) -> Result<()> {
    if name == EXTERNAL_AUTH_SOURCE {
        return Ok(());
    }
    validate_db_name(name)
}
