// Dashboard domain model - persisted document and the in-memory revision built from it
use super::filters::FilterContext;
use super::layout::Layout;
use super::refs::ObjectIdentity;
use super::sharing::{ActorRole, DashboardPermissions, SharingProperties};
use super::stash::Stash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Dashboard document as stored by the persistence collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub identity: ObjectIdentity,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub layout: Layout,
    #[serde(default)]
    pub filter_context: FilterContext,
    #[serde(default)]
    pub sharing: SharingProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

/// One revision of the dashboard.
///
/// Heavy parts sit behind `Arc` and are changed with `Arc::make_mut`, so a
/// revision handed out to readers or kept for undo is never mutated in place.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardState {
    pub persisted: Option<Arc<Dashboard>>,
    pub title: String,
    pub description: String,
    pub layout: Arc<Layout>,
    pub filter_context: Arc<FilterContext>,
    pub sharing: SharingProperties,
    pub permissions: DashboardPermissions,
    pub stash: Arc<Stash>,
}

impl DashboardState {
    /// State of a dashboard that has never been saved.
    pub fn new_dashboard(default_title: impl Into<String>, role: ActorRole) -> Self {
        let sharing = SharingProperties::default();
        Self {
            persisted: None,
            title: default_title.into(),
            description: String::new(),
            layout: Arc::new(Layout::default()),
            filter_context: Arc::new(FilterContext::default()),
            sharing,
            permissions: DashboardPermissions::compute(&sharing, role),
            stash: Arc::new(Stash::default()),
        }
    }

    pub fn from_persisted(dashboard: Dashboard, role: ActorRole) -> Self {
        Self::from_snapshot(Arc::new(dashboard), role)
    }

    pub fn from_snapshot(snapshot: Arc<Dashboard>, role: ActorRole) -> Self {
        Self {
            title: snapshot.title.clone(),
            description: snapshot.description.clone(),
            layout: Arc::new(snapshot.layout.clone()),
            filter_context: Arc::new(snapshot.filter_context.clone()),
            sharing: snapshot.sharing,
            permissions: DashboardPermissions::compute(&snapshot.sharing, role),
            stash: Arc::new(Stash::default()),
            persisted: Some(snapshot),
        }
    }

    pub fn is_new(&self) -> bool {
        self.persisted.is_none()
    }

    pub fn identity(&self) -> Option<&ObjectIdentity> {
        self.persisted.as_deref().map(|d| &d.identity)
    }

    /// Document to hand to the persistence collaborator.
    pub fn to_document(&self, identity: ObjectIdentity, updated: DateTime<Utc>) -> Dashboard {
        Dashboard {
            identity,
            title: self.title.clone(),
            description: self.description.clone(),
            layout: (*self.layout).clone(),
            filter_context: (*self.filter_context).clone(),
            sharing: self.sharing,
            updated: Some(updated),
        }
    }
}
