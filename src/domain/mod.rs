// Domain layer - Dashboard document model, commands and events
pub mod commands;
pub mod dashboard;
pub mod errors;
pub mod events;
pub mod filters;
pub mod layout;
pub mod refs;
pub mod selectors;
pub mod sharing;
pub mod stash;
pub mod widget;
