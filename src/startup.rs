use axum::{
    http::{header, Method},
    middleware,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use utoipa::OpenApi;
use utoipa_scalar::Scalar;

use crate::{
    handlers,
    middleware::{metrics_middleware, request_id_middleware, require_debug_key},
    openapi::ApiDoc,
};

pub fn build_router(state: Arc<crate::AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(state.config.cors_origin.clone())
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT])
        .allow_credentials(true);

    // Schedule routes
    let schedule_routes = Router::new()
        .route("/", get(handlers::schedules_handler::list_schedules))
        .route(
            "/new",
            get(handlers::schedules_handler::new_schedule_form)
                .post(handlers::schedules_handler::create_schedule),
        )
        .route("/{year_month}", get(handlers::schedules_handler::get_schedule))
        .route("/{year_month}/confirm", post(handlers::schedules_handler::confirm_schedule));

    // Editor session routes
    let editor_routes = Router::new()
        .route("/", post(handlers::editors_handler::create_editor))
        .route("/{id}", get(handlers::editors_handler::get_editor))
        .route("/{id}/events", post(handlers::editors_handler::apply_editor_event))
        .route("/{id}/submit", post(handlers::editors_handler::submit_editor));

    // Debug routes, only reachable with the X-Debug-Key header
    let debug_routes = Router::new()
        .route("/debug", get(handlers::debug::debug_handler))
        .route_layer(middleware::from_fn_with_state(state.clone(), require_debug_key));

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/metrics", get(handlers::metrics::metrics_handler))
        .nest("/api/schedules", schedule_routes)
        .nest("/api/editors", editor_routes)
        .merge(debug_routes)
        .route("/api-docs/openapi.json", get(|| async { Json(ApiDoc::openapi()) }))
        .route("/scalar", get(scalar_ui))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

async fn scalar_ui() -> Html<String> {
    Html(Scalar::new(ApiDoc::openapi()).to_html())
}
