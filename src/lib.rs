// Dashboard engine - command processing core for editable analytical dashboards
pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod presentation;
