// Event log listener - structured trace of every dashboard event
use crate::application::event_bus::EventListener;
use crate::domain::events::{DashboardEvent, EventPayload};

pub struct EventLogListener;

impl EventListener for EventLogListener {
    fn on_event(&self, event: &DashboardEvent) {
        match &event.payload {
            EventPayload::CommandFailed {
                reason, message, ..
            } => {
                tracing::warn!(
                    correlation_id = %event.correlation_id,
                    "Command failed ({:?}): {}",
                    reason,
                    message
                );
            }
            EventPayload::InternalErrorOccurred { message } => {
                tracing::error!(
                    correlation_id = %event.correlation_id,
                    "Internal error: {}",
                    message
                );
            }
            _ => {
                tracing::debug!(
                    correlation_id = %event.correlation_id,
                    workspace = %event.context.workspace,
                    "{:?}",
                    event.kind()
                );
            }
        }
    }
}
