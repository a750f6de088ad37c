//! Errors raised by resource and data source adapters

use declarative::RemoteError;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Api(#[from] controlplane::Error),

    #[error("unable to render policies: {0}")]
    Render(#[from] policy::RenderError),

    /// The typed record cannot be turned into a request
    #[error("{0}")]
    Invalid(String),

    #[error("{0}")]
    Config(String),
}

impl Error {
    /// Error for a required attribute left unset in state
    pub fn missing(attribute: &str) -> Self {
        Self::Invalid(format!("attribute {attribute:?} must be set"))
    }
}

impl RemoteError for Error {
    fn is_not_found(&self) -> bool {
        matches!(self, Self::Api(e) if e.is_not_found())
    }
}
