// Dispatcher - single task that owns the dashboard and applies commands in FIFO order
use crate::application::environment::{Environment, IdGenerator};
use crate::application::event_bus::{EventBus, EventListener, ListenerId};
use crate::application::handlers::{self, Applied, HistoryEffect};
use crate::application::history::{UndoEntry, UndoHistory};
use crate::domain::commands::DashboardCommand;
use crate::domain::dashboard::DashboardState;
use crate::domain::errors::{CommandError, FailureReason};
use crate::domain::events::{DashboardEvent, EventContext, EventKind, EventPayload};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("command {correlation_id} failed with {reason}: {message}")]
    CommandFailed {
        correlation_id: String,
        reason: FailureReason,
        message: String,
    },
    #[error("command {correlation_id} hit an internal error: {message}")]
    Internal {
        correlation_id: String,
        message: String,
    },
    #[error("command {correlation_id} completed without emitting {expected:?}")]
    ExpectedEventMissing {
        correlation_id: String,
        expected: EventKind,
    },
    #[error("dispatcher is not running")]
    DispatcherClosed,
}

struct Envelope {
    command: DashboardCommand,
    correlation_id: String,
    responder: Option<oneshot::Sender<Vec<DashboardEvent>>>,
}

pub struct Dispatcher {
    state: DashboardState,
    history: UndoHistory,
    env: Environment,
    bus: EventBus,
    snapshots: watch::Sender<Arc<DashboardState>>,
    receiver: mpsc::UnboundedReceiver<Envelope>,
}

impl Dispatcher {
    pub fn new(
        state: DashboardState,
        env: Environment,
        event_buffer: usize,
    ) -> (Self, DispatcherHandle) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let (snapshots, snapshot_rx) = watch::channel(Arc::new(state.clone()));
        let bus = EventBus::new(event_buffer);

        let handle = DispatcherHandle {
            sender,
            snapshots: snapshot_rx,
            bus: bus.clone(),
            ids: env.ids.clone(),
        };
        let dispatcher = Self {
            state,
            history: UndoHistory::default(),
            env,
            bus,
            snapshots,
            receiver,
        };
        (dispatcher, handle)
    }

    pub fn spawn(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    pub async fn run(mut self) {
        tracing::info!("Dispatcher started for workspace {}", self.env.options.workspace);
        while let Some(envelope) = self.receiver.recv().await {
            let events = self.process_with_id(envelope.command, envelope.correlation_id).await;
            if let Some(responder) = envelope.responder {
                // caller stopped waiting; state is committed regardless
                let _ = responder.send(events);
            }
        }
        tracing::info!("Dispatcher stopped, all handles dropped");
    }

    pub fn state(&self) -> &DashboardState {
        &self.state
    }

    pub fn history(&self) -> &UndoHistory {
        &self.history
    }

    /// Processes one command right away and returns everything it emitted.
    pub async fn process(&mut self, command: DashboardCommand) -> Vec<DashboardEvent> {
        let correlation_id = command
            .correlation_id
            .clone()
            .unwrap_or_else(|| self.env.ids.next_id());
        self.process_with_id(command, correlation_id).await
    }

    async fn process_with_id(
        &mut self,
        command: DashboardCommand,
        correlation_id: String,
    ) -> Vec<DashboardEvent> {
        let name = command.payload.name();
        let mut emitted = Vec::new();
        self.emit(
            &correlation_id,
            EventPayload::CommandStarted {
                command: name.to_string(),
            },
            &mut emitted,
        );

        let outcome = AssertUnwindSafe(handlers::handle(
            &self.state,
            &self.history,
            &command.payload,
            &self.env,
        ))
        .catch_unwind()
        .await;

        match outcome {
            Ok(Ok(applied)) => {
                let events = self.commit(applied, name, &correlation_id);
                for payload in events {
                    self.emit(&correlation_id, payload, &mut emitted);
                }
            }
            Ok(Err(CommandError::Failed(failed))) => {
                tracing::warn!("{} ({}) failed: {}", name, correlation_id, failed);
                self.emit(
                    &correlation_id,
                    EventPayload::CommandFailed {
                        reason: failed.reason,
                        message: failed.message,
                        command: command.payload,
                    },
                    &mut emitted,
                );
            }
            Ok(Err(CommandError::Invariant(message))) => {
                tracing::error!("{} ({}) broke an invariant: {}", name, correlation_id, message);
                self.emit(
                    &correlation_id,
                    EventPayload::InternalErrorOccurred { message },
                    &mut emitted,
                );
            }
            Err(panic) => {
                let message = panic_message(panic.as_ref());
                tracing::error!("{} ({}) panicked: {}", name, correlation_id, message);
                self.emit(
                    &correlation_id,
                    EventPayload::InternalErrorOccurred { message },
                    &mut emitted,
                );
            }
        }

        emitted
    }

    fn commit(
        &mut self,
        applied: Applied,
        command: &'static str,
        correlation_id: &str,
    ) -> Vec<EventPayload> {
        match applied.history {
            HistoryEffect::Untouched => {}
            HistoryEffect::Record => self.history.push(UndoEntry {
                layout: self.state.layout.clone(),
                stash: self.state.stash.clone(),
                command,
                correlation_id: correlation_id.to_string(),
            }),
            HistoryEffect::Pop(count) => {
                self.history.pop_many(count);
            }
            HistoryEffect::Clear => self.history.clear(),
        }

        self.state = applied.state;
        self.snapshots.send_replace(Arc::new(self.state.clone()));
        tracing::debug!(
            "Committed {} ({}), undo depth {}",
            command,
            correlation_id,
            self.history.len()
        );
        applied.events
    }

    fn emit(&self, correlation_id: &str, payload: EventPayload, emitted: &mut Vec<DashboardEvent>) {
        let event = DashboardEvent {
            correlation_id: correlation_id.to_string(),
            context: EventContext {
                workspace: self.env.options.workspace.clone(),
                dashboard: self.state.identity().map(|identity| identity.to_ref()),
                timestamp: self.env.clock.now(),
            },
            payload,
        };
        self.bus.publish(&event);
        emitted.push(event);
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "command handler panicked".to_string()
    }
}

/// Cloneable access to a running dispatcher.
#[derive(Clone)]
pub struct DispatcherHandle {
    sender: mpsc::UnboundedSender<Envelope>,
    snapshots: watch::Receiver<Arc<DashboardState>>,
    bus: EventBus,
    ids: Arc<dyn IdGenerator>,
}

impl DispatcherHandle {
    fn enqueue(
        &self,
        mut command: DashboardCommand,
        responder: Option<oneshot::Sender<Vec<DashboardEvent>>>,
    ) -> Result<String, DispatchError> {
        let correlation_id = match &command.correlation_id {
            Some(id) => id.clone(),
            None => {
                let id = self.ids.next_id();
                command.correlation_id = Some(id.clone());
                id
            }
        };
        self.sender
            .send(Envelope {
                command,
                correlation_id: correlation_id.clone(),
                responder,
            })
            .map_err(|_| DispatchError::DispatcherClosed)?;
        Ok(correlation_id)
    }

    /// Queues the command and returns its correlation id; results arrive on the event bus.
    ///
    /// Safe to call from an event listener: the command runs after the current one.
    pub fn dispatch(&self, command: DashboardCommand) -> Result<String, DispatchError> {
        self.enqueue(command, None)
    }

    /// Queues the command and resolves with every event it emitted.
    pub async fn dispatch_and_collect(
        &self,
        command: DashboardCommand,
    ) -> Result<Vec<DashboardEvent>, DispatchError> {
        let (tx, rx) = oneshot::channel();
        self.enqueue(command, Some(tx))?;
        rx.await.map_err(|_| DispatchError::DispatcherClosed)
    }

    /// Resolves with the first event of `expected` emitted for this command.
    pub async fn dispatch_and_wait_for(
        &self,
        command: DashboardCommand,
        expected: EventKind,
    ) -> Result<DashboardEvent, DispatchError> {
        let events = self.dispatch_and_collect(command).await?;
        let correlation_id = events
            .first()
            .map(|event| event.correlation_id.clone())
            .unwrap_or_default();

        for event in events {
            if event.kind() == expected {
                return Ok(event);
            }
            match event.payload {
                EventPayload::CommandFailed { reason, message, .. } => {
                    return Err(DispatchError::CommandFailed {
                        correlation_id: event.correlation_id,
                        reason,
                        message,
                    });
                }
                EventPayload::InternalErrorOccurred { message } => {
                    return Err(DispatchError::Internal {
                        correlation_id: event.correlation_id,
                        message,
                    });
                }
                _ => {}
            }
        }
        Err(DispatchError::ExpectedEventMissing {
            correlation_id,
            expected,
        })
    }

    /// Latest committed revision.
    pub fn snapshot(&self) -> Arc<DashboardState> {
        self.snapshots.borrow().clone()
    }

    pub fn watch_snapshots(&self) -> watch::Receiver<Arc<DashboardState>> {
        self.snapshots.clone()
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.bus.subscribe()
    }

    pub fn register_listener(&self, listener: Arc<dyn EventListener>) -> ListenerId {
        self.bus.register(listener)
    }

    pub fn unregister_listener(&self, id: ListenerId) -> bool {
        self.bus.unregister(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::*;
    use crate::domain::commands::{CommandPayload, UndoPoint};
    use crate::domain::refs::ObjRef;
    use crate::domain::sharing::{ActorRole, ShareStatus, SharingProperties};
    use crate::domain::widget::{FilterReference, Widget, WidgetHeader};
    use std::sync::Mutex;

    fn start(state: DashboardState) -> DispatcherHandle {
        start_with(state, environment())
    }

    fn start_with(state: DashboardState, env: Environment) -> DispatcherHandle {
        let (dispatcher, handle) = Dispatcher::new(state, env, 64);
        dispatcher.spawn();
        handle
    }

    #[tokio::test]
    async fn test_correlation_id_echoed_on_every_event() {
        let handle = start(persisted_state());

        let ok = handle
            .dispatch_and_collect(DashboardCommand::rename_dashboard("Q3").with_correlation_id("c-ok"))
            .await
            .unwrap();
        let failed = handle
            .dispatch_and_collect(DashboardCommand::remove_layout_section(7, None).with_correlation_id("c-bad"))
            .await
            .unwrap();

        assert_eq!(
            ok.iter().map(DashboardEvent::kind).collect::<Vec<_>>(),
            vec![EventKind::CommandStarted, EventKind::DashboardRenamed]
        );
        assert!(ok.iter().all(|e| e.correlation_id == "c-ok"));
        assert_eq!(failed.len(), 2);
        assert!(failed.iter().all(|e| e.correlation_id == "c-bad"));
        match &failed[1].payload {
            EventPayload::CommandFailed { reason, command, .. } => {
                assert_eq!(*reason, FailureReason::UserError);
                assert_eq!(command.name(), "removeLayoutSection");
            }
            other => panic!("unexpected payload {:?}", other),
        }
        assert_eq!(failed[1].context.dashboard, Some(ObjRef::identifier("dash.sales")));
        assert_eq!(failed[1].context.workspace, "test-workspace");
    }

    #[tokio::test]
    async fn test_generated_correlation_id() {
        let handle = start(new_state());
        let id = handle.dispatch(DashboardCommand::add_layout_section(0)).unwrap();
        let events = handle
            .dispatch_and_collect(DashboardCommand::add_layout_section(0))
            .await
            .unwrap();

        assert_eq!(id, "id-1");
        assert!(events.iter().all(|e| e.correlation_id == "id-2"));
        assert_eq!(handle.snapshot().layout.sections.len(), 2);
    }

    #[tokio::test]
    async fn test_dispatch_and_wait_for_outcomes() {
        let handle = start(persisted_state());

        let removed = handle
            .dispatch_and_wait_for(
                DashboardCommand::remove_layout_section(0, Some("k")),
                EventKind::SectionRemoved,
            )
            .await
            .unwrap();
        assert!(matches!(removed.payload, EventPayload::SectionRemoved { index: 0, .. }));

        let failed = handle
            .dispatch_and_wait_for(
                DashboardCommand::change_kpi_widget_header(
                    ObjRef::identifier("text.notes"),
                    WidgetHeader::titled("x"),
                )
                .with_correlation_id("c-kpi"),
                EventKind::KpiWidgetHeaderChanged,
            )
            .await;
        match failed {
            Err(DispatchError::CommandFailed { correlation_id, reason, .. }) => {
                assert_eq!(correlation_id, "c-kpi");
                assert_eq!(reason, FailureReason::UserError);
            }
            other => panic!("unexpected outcome {:?}", other),
        }

        let missing = handle
            .dispatch_and_wait_for(DashboardCommand::rename_dashboard("x"), EventKind::SectionAdded)
            .await;
        assert!(matches!(missing, Err(DispatchError::ExpectedEventMissing { .. })));
    }

    #[tokio::test]
    async fn test_remove_then_undo_round_trip() {
        let original = persisted_state();
        let handle = start(original.clone());

        handle
            .dispatch_and_wait_for(
                DashboardCommand::remove_layout_section(0, Some("stashed")),
                EventKind::SectionRemoved,
            )
            .await
            .unwrap();
        assert!(handle.snapshot().stash.contains("stashed"));

        let changed = handle
            .dispatch_and_wait_for(DashboardCommand::undo_layout_changes(), EventKind::LayoutChanged)
            .await
            .unwrap();

        let snapshot = handle.snapshot();
        assert_eq!(*snapshot.layout, *original.layout);
        assert!(!snapshot.stash.contains("stashed"));
        assert_eq!(
            changed.payload,
            EventPayload::LayoutChanged {
                layout: (*original.layout).clone()
            }
        );
    }

    #[tokio::test]
    async fn test_undo_does_not_revert_filters() {
        let handle = start(new_state());

        handle
            .dispatch_and_wait_for(
                DashboardCommand::add_attribute_filter(ObjRef::identifier("label.region"), 0),
                EventKind::AttributeFilterAdded,
            )
            .await
            .unwrap();
        let undone = handle
            .dispatch_and_wait_for(DashboardCommand::undo_layout_changes(), EventKind::LayoutChanged)
            .await;

        assert!(undone.is_ok());
        assert_eq!(handle.snapshot().filter_context.attribute_filter_count(), 1);
    }

    #[tokio::test]
    async fn test_undo_after_filter_removal_drops_stale_ignores() {
        let handle = start(persisted_state());

        handle
            .dispatch_and_wait_for(
                DashboardCommand::new(CommandPayload::ChangeWidgetFilterSettings {
                    target: ObjRef::identifier("kpi.revenue").into(),
                    ignore_dashboard_filters: vec![FilterReference::Attribute {
                        display_form: ObjRef::identifier("label.region"),
                    }],
                    date_data_set: None,
                }),
                EventKind::WidgetFilterSettingsChanged,
            )
            .await
            .unwrap();
        handle
            .dispatch_and_wait_for(DashboardCommand::add_layout_section(-1), EventKind::SectionAdded)
            .await
            .unwrap();
        handle
            .dispatch_and_wait_for(
                DashboardCommand::new(CommandPayload::RemoveAttributeFilters {
                    local_identifiers: vec!["f-region".to_string()],
                }),
                EventKind::AttributeFilterRemoved,
            )
            .await
            .unwrap();
        handle
            .dispatch_and_wait_for(DashboardCommand::undo_layout_changes(), EventKind::LayoutChanged)
            .await
            .unwrap();

        let snapshot = handle.snapshot();
        assert_eq!(snapshot.layout.sections.len(), 2);
        assert_eq!(snapshot.filter_context.attribute_filter_count(), 0);
        match &snapshot.layout.sections[0].items[0].widget {
            Some(Widget::Kpi(kpi)) => assert!(kpi.ignore_dashboard_filters.is_empty()),
            other => panic!("unexpected widget {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_repeated_undo_walks_back_through_history() {
        let original = persisted_state();
        let (mut dispatcher, _handle) = Dispatcher::new(original.clone(), environment(), 16);

        dispatcher
            .process(DashboardCommand::remove_section_item(1, 0, Some("notes")).with_correlation_id("c-1"))
            .await;
        dispatcher
            .process(
                DashboardCommand::new(CommandPayload::ClearStash {
                    stash_identifiers: Vec::new(),
                })
                .with_correlation_id("c-2"),
            )
            .await;
        assert_eq!(dispatcher.history().len(), 2);
        assert!(dispatcher.state().stash.is_empty());

        dispatcher.process(DashboardCommand::undo_layout_changes()).await;
        assert_eq!(dispatcher.history().len(), 1);
        assert!(dispatcher.state().stash.contains("notes"));
        assert!(dispatcher.state().layout.sections[1].items.is_empty());
        let after_first_undo = dispatcher.state().clone();

        // a change made after an undo is the next one undone
        dispatcher.process(DashboardCommand::add_layout_section(-1)).await;
        assert_eq!(dispatcher.history().len(), 2);
        dispatcher.process(DashboardCommand::undo_layout_changes()).await;
        assert_eq!(*dispatcher.state().layout, *after_first_undo.layout);
        assert_eq!(*dispatcher.state().stash, *after_first_undo.stash);

        dispatcher.process(DashboardCommand::undo_layout_changes()).await;
        assert_eq!(dispatcher.history().len(), 0);
        assert_eq!(*dispatcher.state().layout, *original.layout);
        assert!(dispatcher.state().stash.is_empty());

        let events = dispatcher.process(DashboardCommand::undo_layout_changes()).await;
        assert_eq!(events[1].kind(), EventKind::LayoutChanged);
        assert_eq!(*dispatcher.state().layout, *original.layout);
    }

    #[tokio::test]
    async fn test_undo_to_correlation_prefix() {
        let original = persisted_state();
        let (mut dispatcher, _handle) = Dispatcher::new(original.clone(), environment(), 16);

        dispatcher
            .process(DashboardCommand::add_layout_section(-1).with_correlation_id("setup"))
            .await;
        let before_drag = dispatcher.state().clone();
        dispatcher
            .process(DashboardCommand::remove_section_item(0, 0, Some("drag")).with_correlation_id("dnd-1-remove"))
            .await;
        dispatcher
            .process(
                DashboardCommand::eager_remove_section_item(1, 0, None).with_correlation_id("dnd-1-drop"),
            )
            .await;
        assert_eq!(dispatcher.state().layout.sections.len(), 2);
        assert_eq!(dispatcher.history().len(), 3);

        dispatcher
            .process(DashboardCommand::undo_layout_changes_to(UndoPoint::CorrelationPrefix {
                prefix: "dnd-1".to_string(),
            }))
            .await;
        assert_eq!(dispatcher.history().len(), 1);
        assert_eq!(*dispatcher.state().layout, *before_drag.layout);
        assert!(!dispatcher.state().stash.contains("drag"));

        dispatcher
            .process(DashboardCommand::undo_layout_changes_to(UndoPoint::Count { count: 3 }))
            .await;
        assert_eq!(dispatcher.history().len(), 0);
        assert_eq!(*dispatcher.state().layout, *original.layout);
    }

    #[tokio::test]
    async fn test_reset_clears_undo_history() {
        let original = persisted_state();
        let (mut dispatcher, _handle) = Dispatcher::new(original.clone(), environment(), 8);

        dispatcher.process(DashboardCommand::remove_layout_section(0, None)).await;
        dispatcher.process(DashboardCommand::rename_dashboard("Scratch")).await;
        assert_eq!(dispatcher.history().len(), 1);

        let events = dispatcher.process(DashboardCommand::reset_dashboard()).await;
        assert_eq!(events[1].kind(), EventKind::DashboardWasReset);
        assert!(dispatcher.history().is_empty());
        assert_eq!(dispatcher.state().title, "Sales");
        assert_eq!(*dispatcher.state().layout, *original.layout);
    }

    #[tokio::test]
    async fn test_change_sharing_on_new_dashboard_fails() {
        let handle = start(new_state());
        let sharing = SharingProperties {
            share_status: ShareStatus::Shared,
            is_locked: false,
            is_under_strict_control: false,
        };

        let result = handle
            .dispatch_and_wait_for(DashboardCommand::change_sharing(sharing), EventKind::SharingChanged)
            .await;
        assert!(matches!(
            result,
            Err(DispatchError::CommandFailed { reason: FailureReason::UserError, .. })
        ));
    }

    #[tokio::test]
    async fn test_fifo_order_with_listener_redispatch() {
        let handle = start(new_state());
        let started = Arc::new(Mutex::new(Vec::new()));

        let log = started.clone();
        let inner = handle.clone();
        handle.register_listener(Arc::new(move |event: &DashboardEvent| {
            match &event.payload {
                EventPayload::CommandStarted { .. } => {
                    log.lock().unwrap().push(event.correlation_id.clone())
                }
                EventPayload::SectionAdded { .. } if event.correlation_id == "first" => {
                    inner
                        .dispatch(DashboardCommand::rename_dashboard("from listener").with_correlation_id("third"))
                        .unwrap();
                }
                _ => {}
            }
        }));

        handle
            .dispatch(DashboardCommand::add_layout_section(0).with_correlation_id("first"))
            .unwrap();
        handle
            .dispatch_and_collect(DashboardCommand::add_layout_section(-1).with_correlation_id("second"))
            .await
            .unwrap();
        handle
            .dispatch_and_collect(DashboardCommand::rename_dashboard("last").with_correlation_id("fourth"))
            .await
            .unwrap();

        assert_eq!(
            *started.lock().unwrap(),
            vec!["first", "second", "third", "fourth"]
        );
        assert_eq!(handle.snapshot().title, "last");
    }

    #[tokio::test]
    async fn test_handler_panic_is_isolated() {
        let env = environment_with(
            Arc::new(FakeCatalog::with_behavior(CatalogBehavior::Panic)),
            ActorRole::Owner,
        );
        let handle = start_with(persisted_state(), env);

        let result = handle
            .dispatch_and_wait_for(
                DashboardCommand::add_attribute_filter(ObjRef::identifier("label.product"), 0),
                EventKind::AttributeFilterAdded,
            )
            .await;
        match result {
            Err(DispatchError::Internal { message, .. }) => {
                assert!(message.contains("catalog index corrupted"))
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(handle.snapshot().filter_context.attribute_filter_count(), 1);

        let renamed = handle
            .dispatch_and_wait_for(DashboardCommand::rename_dashboard("Still alive"), EventKind::DashboardRenamed)
            .await;
        assert!(renamed.is_ok());
    }

    #[tokio::test]
    async fn test_snapshots_and_subscribers() {
        let handle = start(new_state());
        let mut snapshots = handle.watch_snapshots();
        let mut events = handle.subscribe();

        handle
            .dispatch_and_collect(DashboardCommand::new(CommandPayload::AddLayoutSection {
                index: 0,
                initial_header: None,
                initial_items: Vec::new(),
            }))
            .await
            .unwrap();

        assert!(snapshots.has_changed().unwrap());
        assert_eq!(snapshots.borrow_and_update().layout.sections.len(), 1);
        assert_eq!(events.recv().await.unwrap().kind(), EventKind::CommandStarted);
        assert_eq!(events.recv().await.unwrap().kind(), EventKind::SectionAdded);
    }

    #[tokio::test]
    async fn test_save_then_reset_restores_saved_revision() {
        let handle = start(new_state());

        handle
            .dispatch_and_collect(DashboardCommand::add_layout_section(0))
            .await
            .unwrap();
        let saved = handle
            .dispatch_and_wait_for(DashboardCommand::new(CommandPayload::SaveDashboard), EventKind::DashboardSaved)
            .await
            .unwrap();
        // id-1 and id-2 went to correlation ids
        assert_eq!(saved.context.dashboard, Some(ObjRef::identifier("id-3")));

        handle
            .dispatch_and_collect(DashboardCommand::add_layout_section(0))
            .await
            .unwrap();
        handle
            .dispatch_and_collect(DashboardCommand::reset_dashboard())
            .await
            .unwrap();

        let snapshot = handle.snapshot();
        assert!(!snapshot.is_new());
        assert_eq!(snapshot.layout.sections.len(), 1);
    }
}
