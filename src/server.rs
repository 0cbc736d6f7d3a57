//! HTTP layer: the axum router and its shared state.

/// Error rendering for handlers.
pub mod error;

mod handlers;

use crate::{read, store::Store, write};

use axum::{
    Router,
    http::StatusCode,
    routing::{delete, get, post},
};
use std::{sync::Arc, time::Duration};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

/// State shared by every handler.
#[derive(Clone)]
pub struct AppState {
    /// Store every operation is sent to.
    pub store: Arc<dyn Store>,
    /// Page bound for scans and queries.
    pub max_pages: usize,
    /// Unprocessed-entry policy for batch puts.
    pub retry: write::batch_write_item::UnprocessedRetry,
}

impl AppState {
    /// State with default page bound and retry policy.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self {
            store,
            max_pages: read::common::DEFAULT_MAX_PAGES,
            retry: write::batch_write_item::UnprocessedRetry::default(),
        }
    }
}

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState, request_timeout: Duration) -> Router {
    let table_routes = Router::new()
        .route("/", post(handlers::create_table))
        .route("/{table}", delete(handlers::delete_table))
        .route("/{table}/items", post(handlers::put_item))
        .route("/{table}/items/batch", post(handlers::batch_put))
        .route("/{table}/items/get", post(handlers::get_item))
        .route("/{table}/query", post(handlers::query))
        .route("/{table}/scan", post(handlers::scan));

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/tables", table_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            request_timeout,
        ))
        .with_state(state)
}
