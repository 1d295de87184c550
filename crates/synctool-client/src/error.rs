use synctool_core::SyncError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("{status} server error while contacting api")]
    ServerStatus { status: u16 },

    #[error("No media URL configured")]
    NoMediaConfig,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Failed to decode feed: {0}")]
    Decode(#[from] serde_json::Error),

    #[error(transparent)]
    Core(#[from] SyncError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, ClientError>;
