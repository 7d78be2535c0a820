// Catalog trait for resolving metadata references
use crate::domain::errors::{CommandFailed, FailureReason};
use crate::domain::refs::{ObjRef, ObjectIdentity};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Failure reported by an injected collaborator (catalog or persistence).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CollaboratorError {
    #[error("{0} could not be found")]
    NotFound(String),
    #[error("temporarily unavailable: {0}")]
    Transient(String),
    #[error("{0}")]
    Permanent(String),
}

impl CollaboratorError {
    pub fn reason(&self) -> FailureReason {
        match self {
            CollaboratorError::NotFound(_) | CollaboratorError::Permanent(_) => {
                FailureReason::UserError
            }
            CollaboratorError::Transient(_) => FailureReason::TransientError,
        }
    }
}

impl From<CollaboratorError> for CommandFailed {
    fn from(error: CollaboratorError) -> Self {
        CommandFailed {
            reason: error.reason(),
            message: error.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayFormDescriptor {
    pub identity: ObjectIdentity,
    pub title: String,
    /// Identifier of the attribute the display form belongs to.
    pub attribute: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DateDataSetDescriptor {
    pub identity: ObjectIdentity,
    pub title: String,
}

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Resolve an attribute display form; `NotFound` when the reference is unknown
    async fn resolve_display_form(
        &self,
        reference: &ObjRef,
    ) -> Result<DisplayFormDescriptor, CollaboratorError>;

    /// Resolve a date data set used by widget date filtering
    async fn resolve_date_data_set(
        &self,
        reference: &ObjRef,
    ) -> Result<DateDataSetDescriptor, CollaboratorError>;
}
