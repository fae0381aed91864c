//! Error types for catalog-client

/// Result type for catalog-client operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while talking to the remote catalog
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The remote host could not be reached (DNS, refused connection, timeout)
    #[error("{message}")]
    Network { message: String },

    /// The host answered the index request with a non-success status
    #[error("{status} {status_text}")]
    RemoteUnavailable { status: u16, status_text: String },

    /// The host answered a component request with a non-success status
    #[error("Component '{name}' not found")]
    ComponentNotFound { name: String },

    /// The response body was not the JSON document we expected
    #[error("invalid catalog document: {message}")]
    Decode { message: String },

    /// The configured base URL cannot carry path segments
    #[error("invalid catalog base URL '{url}'")]
    InvalidBaseUrl { url: String },
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Decode {
                message: err.to_string(),
            }
        } else {
            Error::Network {
                message: err.to_string(),
            }
        }
    }
}
