// HTTP request handlers
use crate::application::dispatcher::DispatchError;
use crate::domain::commands::DashboardCommand;
use crate::domain::errors::FailureReason;
use crate::domain::events::{DashboardEvent, EventPayload};
use crate::domain::layout::ItemPath;
use crate::domain::selectors::select_item;
use crate::infrastructure::ndjson_stream::stream_from_receiver;
use crate::presentation::app_state::AppState;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::sync::Arc;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CommandResponse {
    pub correlation_id: String,
    pub events: Vec<DashboardEvent>,
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// Latest committed dashboard revision
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(state.dispatcher.snapshot())
}

/// Single top-level item addressed by section and item index
pub async fn get_item(
    Path((section, item)): Path<(usize, usize)>,
    State(state): State<Arc<AppState>>,
) -> Response {
    let snapshot = state.dispatcher.snapshot();
    match select_item(&snapshot, &ItemPath::root(section, item)) {
        Some(found) => Json(found.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

/// Run one command and answer with every event it emitted
pub async fn post_command(
    State(state): State<Arc<AppState>>,
    Json(command): Json<DashboardCommand>,
) -> Response {
    let events = match state.dispatcher.dispatch_and_collect(command).await {
        Ok(events) => events,
        Err(e @ DispatchError::DispatcherClosed) => {
            tracing::error!("Command rejected: {}", e);
            return StatusCode::SERVICE_UNAVAILABLE.into_response();
        }
        Err(e) => {
            tracing::error!("Command dispatch failed: {}", e);
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let status = status_for(&events);
    let correlation_id = events
        .first()
        .map(|event| event.correlation_id.clone())
        .unwrap_or_default();

    (
        status,
        Json(CommandResponse {
            correlation_id,
            events,
        }),
    )
        .into_response()
}

fn status_for(events: &[DashboardEvent]) -> StatusCode {
    for event in events {
        match &event.payload {
            EventPayload::CommandFailed { reason, .. } => {
                return match reason {
                    FailureReason::UserError => StatusCode::UNPROCESSABLE_ENTITY,
                    FailureReason::TransientError => StatusCode::SERVICE_UNAVAILABLE,
                    FailureReason::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
                };
            }
            EventPayload::InternalErrorOccurred { .. } => {
                return StatusCode::INTERNAL_SERVER_ERROR;
            }
            _ => {}
        }
    }
    StatusCode::OK
}

/// Stream every event emitted from now on
pub async fn stream_events(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    stream_from_receiver(state.dispatcher.subscribe())
}
