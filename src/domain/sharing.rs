// Sharing domain model - share status and the permissions derived from it
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ShareStatus {
    #[default]
    Private,
    Shared,
    Public,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharingProperties {
    pub share_status: ShareStatus,
    #[serde(default)]
    pub is_locked: bool,
    #[serde(default)]
    pub is_under_strict_control: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ActorRole {
    Viewer,
    Editor,
    Owner,
    Admin,
}

/// The user on whose behalf commands are processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Actor {
    pub login: String,
    pub role: ActorRole,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardPermissions {
    pub can_view: bool,
    pub can_edit: bool,
    pub can_share: bool,
    pub can_edit_locked: bool,
    pub can_share_locked: bool,
}

impl DashboardPermissions {
    pub fn compute(sharing: &SharingProperties, role: ActorRole) -> Self {
        let visible = sharing.share_status != ShareStatus::Private;

        match role {
            ActorRole::Admin => Self {
                can_view: true,
                can_edit: true,
                can_share: true,
                can_edit_locked: true,
                can_share_locked: true,
            },
            ActorRole::Owner => Self {
                can_view: true,
                can_edit: true,
                can_share: true,
                can_edit_locked: true,
                can_share_locked: false,
            },
            ActorRole::Editor => Self {
                can_view: visible,
                can_edit: visible && !sharing.is_locked,
                can_share: visible && !sharing.is_locked && !sharing.is_under_strict_control,
                can_edit_locked: false,
                can_share_locked: false,
            },
            ActorRole::Viewer => Self {
                can_view: visible,
                ..Self::default()
            },
        }
    }
}
