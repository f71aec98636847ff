//! Webhook server running the order-intake assistant.
//!
//! Receives chat events over HTTP, throttles them per user, runs them
//! through the conversation engine and delivers the resulting
//! notifications, with structured logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod throttle;
pub mod transport;

use std::path::Path;
use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use conversation::{ConversationEngine, EngineSettings};
use dispatch::{NotificationDispatcher, Transport};
use domain::{CatalogFile, ServiceCatalog, StatusCatalog};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{InMemoryStore, Store};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use config::Config;
use error::ConfigError;
use routes::metrics::MetricsState;
use throttle::Throttle;
use transport::LogTransport;

/// Shared application state accessible from all handlers.
pub struct AppState<S: Store, T: Transport> {
    pub engine: ConversationEngine<S>,
    pub dispatcher: NotificationDispatcher<T>,
    pub throttle: Arc<Throttle>,
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: Store + 'static, T: Transport + 'static>(
    state: Arc<AppState<S, T>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(MetricsState {
            handle: metrics_handle,
            throttle: state.throttle.clone(),
        });

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/updates", post(routes::updates::handle::<S, T>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Loads the service and status catalogs.
///
/// Without a path the built-in catalog is used. Either way the catalog is
/// validated, so a reachable branch without questions stops start-up.
pub fn load_catalogs(path: Option<&Path>) -> Result<(ServiceCatalog, StatusCatalog), ConfigError> {
    let Some(path) = path else {
        let catalog = ServiceCatalog::builtin();
        catalog.validate()?;
        return Ok((catalog, StatusCatalog::default()));
    };

    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::CatalogFile {
        path: path.display().to_string(),
        source,
    })?;
    let catalogs = CatalogFile::from_json(&json)?.into_catalogs()?;
    tracing::info!(
        path = %path.display(),
        services = catalogs.0.services().len(),
        branches = catalogs.0.branches().len(),
        "catalog loaded"
    );
    Ok(catalogs)
}

/// Creates the application state with an in-memory store and the given
/// transport.
pub fn create_state<T: Transport>(
    config: &Config,
    catalog: ServiceCatalog,
    statuses: StatusCatalog,
    transport: T,
) -> Arc<AppState<InMemoryStore, T>> {
    let store = InMemoryStore::with_statuses(config.owner_id, statuses);
    let settings = EngineSettings {
        bot_username: config.bot_username.clone(),
        admin_page_size: config.admin_page_size,
        ..EngineSettings::default()
    };

    Arc::new(AppState {
        engine: ConversationEngine::new(store, Arc::new(catalog), settings),
        dispatcher: NotificationDispatcher::new(transport, config.owner_id, config.group_chat_id),
        throttle: Arc::new(Throttle::new(config.throttle)),
    })
}

/// Creates the default application state, delivering notifications to the
/// log.
pub fn create_default_state(
    config: &Config,
) -> Result<Arc<AppState<InMemoryStore, LogTransport>>, ConfigError> {
    let (catalog, statuses) = load_catalogs(config.catalog_path.as_deref())?;
    Ok(create_state(config, catalog, statuses, LogTransport::new()))
}
