// Event bus - ordered synchronous listeners plus broadcast subscribers
use crate::domain::events::DashboardEvent;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};
use tokio::sync::broadcast;

pub type ListenerId = u64;

/// Receives every event synchronously, before the next command is processed.
pub trait EventListener: Send + Sync {
    fn on_event(&self, event: &DashboardEvent);
}

impl<F> EventListener for F
where
    F: Fn(&DashboardEvent) + Send + Sync,
{
    fn on_event(&self, event: &DashboardEvent) {
        self(event)
    }
}

struct Inner {
    listeners: RwLock<Vec<(ListenerId, Arc<dyn EventListener>)>>,
    next_id: AtomicU64,
    sender: broadcast::Sender<DashboardEvent>,
}

#[derive(Clone)]
pub struct EventBus {
    inner: Arc<Inner>,
}

impl EventBus {
    /// `capacity` bounds how far a broadcast subscriber may lag behind.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            inner: Arc::new(Inner {
                listeners: RwLock::new(Vec::new()),
                next_id: AtomicU64::new(1),
                sender,
            }),
        }
    }

    pub fn register(&self, listener: Arc<dyn EventListener>) -> ListenerId {
        let id = self.inner.next_id.fetch_add(1, Ordering::Relaxed);
        self.inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, listener));
        id
    }

    pub fn unregister(&self, id: ListenerId) -> bool {
        let mut listeners = self
            .inner
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let before = listeners.len();
        listeners.retain(|(listener_id, _)| *listener_id != id);
        listeners.len() != before
    }

    pub fn subscribe(&self) -> broadcast::Receiver<DashboardEvent> {
        self.inner.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    /// Calls listeners in registration order; a panicking listener is logged and skipped.
    pub fn publish(&self, event: &DashboardEvent) {
        // listeners may register or unregister while being called
        let listeners: Vec<(ListenerId, Arc<dyn EventListener>)> = self
            .inner
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone();

        for (id, listener) in listeners {
            if catch_unwind(AssertUnwindSafe(|| listener.on_event(event))).is_err() {
                tracing::error!(
                    "Listener {} panicked on {:?} ({})",
                    id,
                    event.kind(),
                    event.correlation_id
                );
            }
        }

        // no subscribers is fine
        let _ = self.inner.sender.send(event.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::test_support::fixed_time;
    use crate::domain::events::{EventContext, EventPayload};
    use std::sync::Mutex;

    struct PanickingListener;

    impl EventListener for PanickingListener {
        fn on_event(&self, _event: &DashboardEvent) {
            panic!("listener bug");
        }
    }

    fn event(correlation_id: &str) -> DashboardEvent {
        DashboardEvent {
            correlation_id: correlation_id.to_string(),
            context: EventContext {
                workspace: "ws".to_string(),
                dashboard: None,
                timestamp: fixed_time(),
            },
            payload: EventPayload::DashboardRenamed {
                title: "t".to_string(),
            },
        }
    }

    #[test]
    fn test_listeners_called_in_order_and_isolated() {
        let bus = EventBus::new(8);
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = seen.clone();
        bus.register(Arc::new(move |e: &DashboardEvent| {
            first.lock().unwrap().push(format!("a:{}", e.correlation_id))
        }));
        bus.register(Arc::new(PanickingListener));
        let last = seen.clone();
        let last_id = bus.register(Arc::new(move |e: &DashboardEvent| {
            last.lock().unwrap().push(format!("c:{}", e.correlation_id))
        }));

        bus.publish(&event("1"));
        assert!(bus.unregister(last_id));
        assert!(!bus.unregister(last_id));
        bus.publish(&event("2"));

        assert_eq!(*seen.lock().unwrap(), vec!["a:1", "c:1", "a:2"]);
        assert_eq!(bus.listener_count(), 2);
    }

    #[tokio::test]
    async fn test_broadcast_subscribers() {
        let bus = EventBus::new(8);
        let mut receiver = bus.subscribe();

        bus.publish(&event("x"));
        let received = receiver.recv().await.unwrap();
        assert_eq!(received.correlation_id, "x");
    }
}
