//! Dev server error type.

use thiserror::Error;

use crate::app::AppError;

#[derive(Debug, Error)]
pub enum DevServerError {
    #[error("invalid bind address '{0}'")]
    InvalidAddress(String),

    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid proxy target '{target}': {reason}")]
    InvalidTarget { target: String, reason: String },

    #[error(transparent)]
    App(#[from] AppError),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}
