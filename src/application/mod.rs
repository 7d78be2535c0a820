// Application layer - Command processing and collaborator ports
pub mod catalog;
pub mod dispatcher;
pub mod environment;
pub mod event_bus;
pub mod handlers;
pub mod history;
pub mod repository;

#[cfg(test)]
pub(crate) mod test_support;
