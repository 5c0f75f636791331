/// Errors raised while configuring the client or persisting the session.
///
/// Store intents never surface these; they settle into a table's `error` field instead.
#[derive(Debug, thiserror::Error)]
pub enum ClinicError {
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error("failed to create session directory: {0}")]
    SessionDirCreation(std::io::Error),
    #[error("failed to read session file: {0}")]
    SessionRead(std::io::Error),
    #[error("failed to write session file: {0}")]
    SessionWrite(std::io::Error),
    #[error("failed to serialize session: {0}")]
    Serialization(serde_json::Error),
    #[error("failed to deserialize session: {0}")]
    Deserialization(serde_json::Error),
}

pub type ClinicResult<T> = std::result::Result<T, ClinicError>;

/// Failure of a single repository call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepositoryError {
    /// The backend answered with a failure status.
    #[error("request failed (status {status:?}): {}", .message.as_deref().unwrap_or("no message"))]
    Request {
        status: Option<u16>,
        message: Option<String>,
    },
    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body could not be decoded.
    #[error("failed to decode response: {0}")]
    Decode(String),
}

impl RepositoryError {
    /// The human-readable message carried by the failure, if any.
    ///
    /// Backend failures only count when they included a message; transport and decode failures
    /// always describe themselves.
    pub fn message(&self) -> Option<&str> {
        match self {
            RepositoryError::Request { message, .. } => message.as_deref(),
            RepositoryError::Transport(message) | RepositoryError::Decode(message) => {
                Some(message.as_str())
            }
        }
    }

    /// The message to show the user, falling back to `default` when the failure carried none.
    pub fn message_or(&self, default: impl Into<String>) -> String {
        match self.message() {
            Some(message) if !message.trim().is_empty() => message.to_owned(),
            _ => default.into(),
        }
    }
}

pub type RepositoryResult<T> = std::result::Result<T, RepositoryError>;
