mod handlers;

use std::sync::Arc;

use axum::{
    http::HeaderValue,
    routing::{delete, get, post, put},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};

use crate::config::Config;
use crate::models::RateTable;
use crate::store::SessionStore;

/// Shared state for all handlers: the session worksheets and the
/// process-wide rate table.
#[derive(Clone)]
pub struct AppState {
    pub sessions: SessionStore,
    pub rates: Arc<RateTable>,
}

impl AppState {
    pub fn new(rates: RateTable) -> Self {
        Self::with_sessions(rates, SessionStore::new())
    }

    pub fn with_sessions(rates: RateTable, sessions: SessionStore) -> Self {
        Self {
            sessions,
            rates: Arc::new(rates),
        }
    }
}

/// Router with permissive CORS, for local use and tests.
pub fn create_router(state: AppState) -> Router {
    build_router(state, CorsLayer::permissive())
}

/// Router configured from the process [`Config`].
pub fn create_router_with_config(config: &Config) -> Router {
    let state = AppState::with_sessions(
        config.rates.clone(),
        SessionStore::with_max_sessions(config.max_sessions),
    );
    let cors = match &config.cors_origins {
        Some(origins) => CorsLayer::new()
            .allow_origin(AllowOrigin::list(
                origins
                    .iter()
                    .filter_map(|o| o.parse::<HeaderValue>().ok()),
            ))
            .allow_methods(Any)
            .allow_headers(Any),
        None => CorsLayer::permissive(),
    };
    build_router(state, cors)
}

fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let api = Router::new()
        // Rate card
        .route("/rates", get(handlers::list_rates))
        // Sessions
        .route("/sessions", post(handlers::create_session))
        .route("/sessions/{id}", get(handlers::get_session))
        .route("/sessions/{id}", delete(handlers::end_session))
        .route("/sessions/{id}/seed", post(handlers::seed_worksheet))
        // Rows
        .route("/sessions/{id}/rows", get(handlers::list_rows))
        .route("/sessions/{id}/rows", post(handlers::add_row))
        .route("/sessions/{id}/rows", put(handlers::replace_rows))
        .route("/sessions/{id}/rows/{index}", put(handlers::update_row))
        .route("/sessions/{id}/rows/{index}", delete(handlers::remove_row))
        // Roll-up and export
        .route("/sessions/{id}/summary", get(handlers::get_summary))
        .route("/sessions/{id}/export", get(handlers::export_csv))
        // Health
        .route("/health", get(handlers::health));

    Router::new()
        .nest("/api/v1", api)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
