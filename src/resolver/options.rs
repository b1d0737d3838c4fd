use serde::Deserialize;
use typed_builder::TypedBuilder;

/// Contains the options that can be used to create a new
/// [`CredentialResolver`](../struct.CredentialResolver.html).
#[derive(Clone, Debug, Default, Deserialize, TypedBuilder, PartialEq)]
#[builder(field_defaults(default, setter(strip_option)))]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ResolverOptions {
    /// Whether to ask the connector if a credential is already authenticated before starting an
    /// authentication round-trip for it.
    ///
    /// The default value is true.
    pub check_existing_authentication: Option<bool>,
}

impl ResolverOptions {
    pub(crate) fn check_existing_authentication(&self) -> bool {
        self.check_existing_authentication.unwrap_or(true)
    }
}
