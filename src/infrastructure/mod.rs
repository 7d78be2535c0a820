// Infrastructure layer - External dependencies and adapters
pub mod config;
pub mod event_log;
pub mod file_repository;
pub mod ndjson_stream;
pub mod static_catalog;
pub mod system;
