//! Client side of the board: REST calls and the admin session.

pub mod api;
pub mod gate;

pub use api::JobsClient;
pub use gate::{Access, AccessGate, FileSessionStore, MemorySessionStore, SessionStore, View};

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Session store error: {0}")]
    Session(#[from] std::io::Error),
}

impl ClientError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, ClientError::Api { status: 404, .. })
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ClientError::Api { status: 401, .. })
    }
}
