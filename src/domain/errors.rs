// Command failure taxonomy
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum FailureReason {
    /// Structurally invalid request; retrying the same command will fail again.
    UserError,
    /// A collaborator was temporarily unavailable.
    TransientError,
    /// Bug in the engine itself.
    InternalError,
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FailureReason::UserError => "USER_ERROR",
            FailureReason::TransientError => "TRANSIENT_ERROR",
            FailureReason::InternalError => "INTERNAL_ERROR",
        };
        f.write_str(name)
    }
}

/// Expected, recoverable failure of a command.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}: {message}")]
pub struct CommandFailed {
    pub reason: FailureReason,
    pub message: String,
}

impl CommandFailed {
    pub fn user_error(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::UserError,
            message: message.into(),
        }
    }

    pub fn transient(message: impl Into<String>) -> Self {
        Self {
            reason: FailureReason::TransientError,
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error(transparent)]
    Failed(#[from] CommandFailed),
    /// The document model is inconsistent; fatal for the current command only.
    #[error("invariant violated: {0}")]
    Invariant(String),
}

/// Shorthand used by handlers for validation failures.
pub fn user_error<T>(message: impl Into<String>) -> Result<T, CommandError> {
    Err(CommandError::Failed(CommandFailed::user_error(message)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_display() {
        let failed = CommandFailed::user_error("Section 3 does not exist");
        assert_eq!(failed.to_string(), "USER_ERROR: Section 3 does not exist");

        let error: CommandError = CommandFailed::transient("catalog offline").into();
        assert_eq!(error.to_string(), "TRANSIENT_ERROR: catalog offline");
    }

    #[test]
    fn test_reason_json() {
        let json = serde_json::to_string(&FailureReason::UserError).unwrap();
        assert_eq!(json, r#""USER_ERROR""#);
    }
}
