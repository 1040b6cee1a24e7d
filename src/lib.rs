//! An in-process mock of the Vuforia Web Services target management API.
//!
//! The mock serves the eight target management endpoints with the real
//! service's authentication scheme, validator ordering, error bodies, and
//! the time-delayed `processing` simulation, so client libraries and test
//! suites can run against it unmodified.
//!
//! The server keeps everything in memory. Databases are registered at
//! startup from configuration, or programmatically through
//! [`store::Registry::add_database`] when the router is embedded in a test
//! harness.

pub mod api;
pub mod auth;
pub mod config;
pub mod database;
pub mod errors;
pub mod store;
pub mod target;
pub mod telemetry;
pub mod types;
pub mod validators;

#[cfg(test)]
mod test_utils;

use crate::config::Config;
use crate::store::Registry;
use axum::{
    middleware,
    routing::get,
    Router,
};
use bon::Builder;
use std::future::Future;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone, Builder)]
pub struct AppState {
    pub registry: Arc<Registry>,
    pub config: Config,
}

/// Build the full router: the validated VWS surface plus a liveness route,
/// wrapped in the response post-processor and request tracing.
pub fn build_router(state: AppState) -> Router {
    let vws = Router::new()
        .route(
            "/targets",
            axum::routing::post(api::handlers::targets::add_target)
                .get(api::handlers::targets::target_list),
        )
        .route(
            "/targets/{target_id}",
            get(api::handlers::targets::get_target)
                .put(api::handlers::targets::update_target)
                .delete(api::handlers::targets::delete_target),
        )
        .route("/summary", get(api::handlers::summaries::database_summary))
        .route(
            "/summary/{target_id}",
            get(api::handlers::summaries::target_summary),
        )
        .route(
            "/duplicates/{target_id}",
            get(api::handlers::duplicates::duplicates),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            api::validate_request,
        ))
        .with_state(state);

    Router::new()
        .merge(vws)
        .route("/healthz", get(api::handlers::health))
        .layer(middleware::from_fn(api::finalize_response))
        .layer(TraceLayer::new_for_http())
}

/// The configured, ready-to-serve application.
pub struct Application {
    router: Router,
    config: Config,
}

impl Application {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        let registry = Arc::new(Registry::new());
        for seed in config.databases.clone() {
            registry.add_database(seed.into()).await?;
        }
        let state = AppState::builder()
            .registry(registry)
            .config(config.clone())
            .build();
        Ok(Self {
            router: build_router(state),
            config,
        })
    }

    pub async fn serve(self, shutdown: impl Future<Output = ()> + Send + 'static) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.config.bind_address()).await?;
        tracing::info!(address = %listener.local_addr()?, "Serving the target management API");
        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown)
            .await?;
        Ok(())
    }
}
