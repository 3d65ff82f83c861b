use crate::client::LogoutReason;
use thiserror::Error;

/// Everything that can go wrong on the consumer side of the admin API.
#[derive(Debug, Error)]
pub enum ClientError {
    /// Network or TLS failure, never treated as an auth rejection.
    #[error("Admin server unreachable: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Session ended: {0}. Run: gatekeeper login")]
    LoggedOut(LogoutReason),

    #[error("Request rejected (HTTP {status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected response: {0}")]
    Decode(String),

    #[error("Credential store error: {0}")]
    Store(String),
}

impl ClientError {
    /// A plain 401 that carried no logout code, e.g. the gate is not in front
    /// of the endpoint or the server speaks another dialect.
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Rejected { status: 401, .. })
    }
}

impl From<std::io::Error> for ClientError {
    fn from(err: std::io::Error) -> Self {
        Self::Store(err.to_string())
    }
}
