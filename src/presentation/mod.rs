// Presentation layer - HTTP surface over the dispatcher
pub mod app_state;
pub mod handlers;
