// Dashboard handlers - title, sharing, reset and save
use super::{Applied, HistoryEffect};
use crate::application::environment::Environment;
use crate::domain::dashboard::DashboardState;
use crate::domain::errors::{user_error, CommandError, CommandFailed};
use crate::domain::events::EventPayload;
use crate::domain::refs::ObjectIdentity;
use crate::domain::sharing::{DashboardPermissions, SharingProperties};
use std::sync::Arc;

pub fn rename(state: &DashboardState, title: &str) -> Result<Applied, CommandError> {
    let title = title.trim();
    if title.is_empty() {
        return user_error("Dashboard title cannot be blank");
    }

    let mut next = state.clone();
    next.title = title.to_string();
    Ok(Applied::new(
        next,
        vec![EventPayload::DashboardRenamed {
            title: title.to_string(),
        }],
        HistoryEffect::Untouched,
    ))
}

/// Only a saved dashboard can be shared; permissions follow from the new sharing state.
pub fn change_sharing(
    state: &DashboardState,
    sharing: &SharingProperties,
    env: &Environment,
) -> Result<Applied, CommandError> {
    if state.is_new() {
        return user_error("Cannot change sharing of a dashboard that was never saved");
    }

    let permissions = DashboardPermissions::compute(sharing, env.actor.role);
    let mut next = state.clone();
    next.sharing = *sharing;
    next.permissions = permissions;

    tracing::debug!(
        "Sharing of {:?} is now {:?}",
        state.identity().map(|i| &i.identifier),
        sharing.share_status
    );
    Ok(Applied::new(
        next,
        vec![EventPayload::SharingChanged {
            sharing: *sharing,
            permissions,
        }],
        HistoryEffect::Untouched,
    ))
}

/// Back to the last saved document, or to an empty dashboard if there is none.
pub fn reset(state: &DashboardState, env: &Environment) -> Applied {
    let role = env.actor.role;
    let next = match &state.persisted {
        Some(snapshot) => DashboardState::from_snapshot(snapshot.clone(), role),
        None => DashboardState::new_dashboard(env.options.default_title.clone(), role),
    };

    Applied::new(
        next,
        vec![EventPayload::DashboardWasReset {
            dashboard: state.persisted.as_deref().cloned(),
        }],
        HistoryEffect::Clear,
    )
}

/// Persists the current revision; the stored document becomes the reset target.
pub async fn save(state: &DashboardState, env: &Environment) -> Result<Applied, CommandError> {
    let new_dashboard = state.is_new();
    let identity = match state.identity() {
        Some(identity) => identity.clone(),
        None => ObjectIdentity::new(env.ids.next_id()),
    };

    let document = state.to_document(identity, env.clock.now());
    let saved = env
        .repository
        .save(document)
        .await
        .map_err(CommandFailed::from)?;

    let mut next = state.clone();
    next.persisted = Some(Arc::new(saved.clone()));

    tracing::info!(
        "Saved dashboard {} ({})",
        saved.identity.identifier,
        if new_dashboard { "new" } else { "existing" }
    );
    Ok(Applied::new(
        next,
        vec![EventPayload::DashboardSaved {
            dashboard: saved,
            new_dashboard,
        }],
        HistoryEffect::Untouched,
    ))
}
