// Application state for dependency injection
use crate::application::dispatcher::DispatcherHandle;

pub struct AppState {
    pub dispatcher: DispatcherHandle,
}
