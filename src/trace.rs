use crate::{client::auth::Credential, error::Error};

pub(crate) const CLIENT_TRACING_EVENT_TARGET: &str = "mongodb_dbutils::client";
pub(crate) const RESOLVER_TRACING_EVENT_TARGET: &str = "mongodb_dbutils::resolver";
pub(crate) const TEMPLATE_TRACING_EVENT_TARGET: &str = "mongodb_dbutils::template";

pub(crate) trait TracingRepresentation {
    type Representation;

    fn tracing_representation(&self) -> Self::Representation;
}

impl TracingRepresentation for Credential {
    type Representation = String;

    /// `principal@source`; the password never appears.
    fn tracing_representation(&self) -> String {
        match self.source {
            Some(ref source) => format!("{}@{}", self.principal(), source),
            None => self.principal().to_string(),
        }
    }
}

impl TracingRepresentation for Error {
    type Representation = String;

    fn tracing_representation(&self) -> String {
        self.to_string()
    }
}
