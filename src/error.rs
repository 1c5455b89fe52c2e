use thiserror::Error;

use crate::models::TodoId;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Server responded with {status}: {body}")]
    Transport { status: u16, body: String },

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Failed to decode response: {0}")]
    Decode(String),

    #[error("No todo with id {0}")]
    UnknownTodo(TodoId),

    #[error("The todo list is not loaded")]
    NotLoaded,

    #[error("Todo {0} already has a change in flight")]
    Busy(TodoId),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
