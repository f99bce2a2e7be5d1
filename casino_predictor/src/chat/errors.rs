//! Completion service error types.

use thiserror::Error;

/// Why a completion request failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ChatError {
    /// The service could not be reached at all
    #[error("Could not connect to the completion service")]
    Connection,

    /// The service accepted the request but did not answer in time
    #[error("Completion request timed out")]
    Timeout,

    /// The service answered with a non-success status code
    #[error("Completion service returned status {0}")]
    Status(u16),

    /// Anything else, including malformed response bodies
    #[error("Unexpected completion error: {0}")]
    Unexpected(String),
}

impl ChatError {
    /// User-facing text for the failure.
    pub fn user_message(&self) -> String {
        match self {
            ChatError::Connection => "Could not connect to Ollama. Make sure it is running:\n   \
                 open a terminal and run: ollama serve"
                .to_string(),
            ChatError::Timeout => {
                "The model is taking too long. Try a simpler question.".to_string()
            }
            ChatError::Status(code) => format!(
                "Error talking to Ollama (status {code}). Is 'ollama serve' running?"
            ),
            ChatError::Unexpected(detail) => format!("Unexpected error: {detail}"),
        }
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ChatError::Timeout
        } else if err.is_connect() {
            ChatError::Connection
        } else if let Some(status) = err.status() {
            ChatError::Status(status.as_u16())
        } else {
            ChatError::Unexpected(err.to_string())
        }
    }
}

/// Result type for completion requests
pub type ChatResult<T> = Result<T, ChatError>;
