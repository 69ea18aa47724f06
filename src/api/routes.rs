use axum::{middleware, routing::get, Router};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::middleware::{make_span_with_request_id, request_id_middleware};

use super::handlers;
use super::AppState;

/// Creates the application router with all routes
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_check))
        // Pages
        .route("/", get(handlers::survey_page))
        .route("/results/:id", get(handlers::results_page))
        .nest("/api", api_routes())
        .layer(
            ServiceBuilder::new()
                .layer(middleware::from_fn(request_id_middleware))
                .layer(TraceLayer::new_for_http().make_span_with(make_span_with_request_id))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

/// JSON routes under /api
fn api_routes() -> Router<AppState> {
    Router::new()
        .route("/questions", get(handlers::get_questions))
        .route(
            "/recommendations",
            get(handlers::get_results).post(handlers::submit),
        )
        .route("/catalog/seed", get(handlers::seed_catalog))
}
