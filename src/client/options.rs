//! Contains the options that can be used to create a new [`Client`](../struct.Client.html).

use serde::Deserialize;
use typed_builder::TypedBuilder;

/// Contains the options that can be used to create a new [`Client`](../struct.Client.html).
#[derive(Clone, Debug, Default, Deserialize, TypedBuilder, PartialEq)]
#[serde(rename_all = "camelCase")]
#[non_exhaustive]
pub struct ClientOptions {
    /// A name for the application using the `Client`. It is attached to the log events the
    /// `Client` and the handles obtained from it emit, so that events from several applications
    /// sharing a process can be told apart.
    #[builder(default, setter(strip_option))]
    pub app_name: Option<String>,
}
