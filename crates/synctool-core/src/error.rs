use synctool_models::LabelError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SyncError {
    #[error("Model '{0}' is not registered")]
    UnknownModel(String),

    #[error("No models registered for app '{0}'")]
    UnknownApp(String),

    #[error("Table '{0}' does not exist in the database")]
    TableNotFound(String),

    #[error("Table '{table}' has a composite primary key, which is not supported")]
    CompositePrimaryKey { table: String },

    #[error("Field '{field}' of model '{model}' is not a column of its table")]
    UnknownField { model: String, field: String },

    #[error("Column '{column}' of table '{table}' holds a type the feed cannot carry")]
    UnsupportedColumn { table: String, column: String },

    #[error(transparent)]
    InvalidLabel(#[from] LabelError),

    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SyncError>;
