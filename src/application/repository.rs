// Repository trait for dashboard persistence
use crate::application::catalog::CollaboratorError;
use crate::domain::dashboard::Dashboard;
use async_trait::async_trait;

#[async_trait]
pub trait DashboardRepository: Send + Sync {
    /// Load the stored dashboard, `None` when nothing has been saved yet
    async fn load(&self) -> Result<Option<Dashboard>, CollaboratorError>;

    /// Store the dashboard and return the document as persisted
    async fn save(&self, dashboard: Dashboard) -> Result<Dashboard, CollaboratorError>;
}
