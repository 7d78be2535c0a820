// Handler environment - injected collaborators and processing options
use crate::application::catalog::Catalog;
use crate::application::repository::DashboardRepository;
use crate::domain::sharing::Actor;
use chrono::{DateTime, Utc};
use std::sync::Arc;

pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct HandlerOptions {
    pub workspace: String,
    pub default_title: String,
    /// Reject out-of-range insertion indices instead of clamping them.
    pub strict_placement: bool,
}

impl Default for HandlerOptions {
    fn default() -> Self {
        Self {
            workspace: "default".to_string(),
            default_title: "Untitled".to_string(),
            strict_placement: true,
        }
    }
}

#[derive(Clone)]
pub struct Environment {
    pub catalog: Arc<dyn Catalog>,
    pub repository: Arc<dyn DashboardRepository>,
    pub ids: Arc<dyn IdGenerator>,
    pub clock: Arc<dyn Clock>,
    pub actor: Actor,
    pub options: HandlerOptions,
}
