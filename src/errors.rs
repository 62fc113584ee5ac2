// Error taxonomy for a single upload. Each variant is one outcome category
// the caller can branch on; the binaries map them onto process exit codes.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UploadError {
    /// Local precondition failure. Raised before any network activity.
    #[error("Error: {0}")]
    Argument(String),

    /// The server answered with a non-2xx status.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// DNS, connect, TLS, timeout or body read failure.
    #[error("Network error: {0}")]
    Network(String),

    /// 2xx response whose body is not the expected JSON shape.
    #[error("Protocol error: {0}")]
    Protocol(String),
}

pub type UploadResult<T> = Result<T, UploadError>;

impl UploadError {
    pub fn argument(message: impl Into<String>) -> Self {
        Self::Argument(message.into())
    }

    pub fn file_not_found(path: &str) -> Self {
        Self::Argument(format!("file not found: {}", path))
    }

    /// Process exit code for this failure: 1 arguments, 2 HTTP, 3 everything else.
    pub fn exit_code(&self) -> u8 {
        match self {
            UploadError::Argument(_) => 1,
            UploadError::Http { .. } => 2,
            UploadError::Network(_) | UploadError::Protocol(_) => 3,
        }
    }
}

impl From<reqwest::Error> for UploadError {
    fn from(error: reqwest::Error) -> Self {
        // reqwest only reports builder errors for malformed requests, which
        // never reach the wire.
        if error.is_builder() {
            return UploadError::Argument(error.to_string());
        }
        let message = if error.is_timeout() {
            format!("request timed out: {}", error)
        } else {
            error.to_string()
        };
        UploadError::Network(message)
    }
}
