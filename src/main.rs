// Main entry point - Dependency injection and server setup
use std::{net::SocketAddr, sync::Arc};

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use dashboard_engine::application::dispatcher::Dispatcher;
use dashboard_engine::application::environment::Environment;
use dashboard_engine::application::repository::DashboardRepository;
use dashboard_engine::domain::dashboard::DashboardState;
use dashboard_engine::infrastructure::config::load_app_config;
use dashboard_engine::infrastructure::event_log::EventLogListener;
use dashboard_engine::infrastructure::file_repository::JsonFileRepository;
use dashboard_engine::infrastructure::static_catalog::StaticCatalog;
use dashboard_engine::infrastructure::system::{SystemClock, UuidIdGenerator};
use dashboard_engine::presentation::app_state::AppState;
use dashboard_engine::presentation::handlers::{
    get_dashboard, get_item, health_check, post_command, stream_events,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // Load configuration
    let config = load_app_config()?;

    // Create collaborators (infrastructure layer)
    let repository = Arc::new(JsonFileRepository::new(config.document_path()));
    let catalog = Arc::new(StaticCatalog::from_settings(&config.catalog));

    let env = Environment {
        catalog,
        repository: repository.clone(),
        ids: Arc::new(UuidIdGenerator),
        clock: Arc::new(SystemClock),
        actor: config.actor(),
        options: config.handler_options(),
    };

    // Initial revision from the stored document, if any
    let role = env.actor.role;
    let state = match repository.load().await? {
        Some(dashboard) => {
            tracing::info!("Loaded dashboard {}", dashboard.identity.identifier);
            DashboardState::from_persisted(dashboard, role)
        }
        None => {
            tracing::info!("No stored dashboard, starting a new one");
            DashboardState::new_dashboard(config.dashboard.default_title.clone(), role)
        }
    };

    // Start the dispatcher (application layer)
    let (dispatcher, handle) = Dispatcher::new(state, env, config.events.buffer);
    handle.register_listener(Arc::new(EventLogListener));
    dispatcher.spawn();

    let state = Arc::new(AppState { dispatcher: handle });

    // Build router (presentation layer)
    let router = Router::new()
        .route("/healthz", get(health_check))
        .route("/dashboard", get(get_dashboard))
        .route("/dashboard/sections/:section/items/:item", get(get_item))
        .route("/commands", post(post_command))
        .route("/events", get(stream_events))
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    // Start server
    let addr: SocketAddr = config.server.bind.parse()?;
    tracing::info!(
        "Starting dashboard engine for workspace {} on {}",
        config.dashboard.workspace,
        addr
    );

    axum::serve(tokio::net::TcpListener::bind(addr).await?, router).await?;

    Ok(())
}
