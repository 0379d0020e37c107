use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch},
    Router,
};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::warn;

use crate::handlers::{greenhouses, health, realtime, zones};
use crate::state::AppState;

pub fn build_router(state: AppState, cors: CorsLayer) -> Router {
    let greenhouse_routes = Router::new()
        .route("/active", get(greenhouses::list_active_greenhouses))
        .route("/active/summary", get(greenhouses::list_active_summaries))
        .route("/operator/{operator_id}", get(greenhouses::list_by_operator))
        .route(
            "/{id}",
            get(greenhouses::get_greenhouse)
                .put(greenhouses::update_greenhouse)
                .delete(greenhouses::delete_greenhouse),
        )
        .route("/{id}/status", patch(greenhouses::change_status))
        .route("/{id}/activate", patch(greenhouses::activate))
        .route("/{id}/deactivate", patch(greenhouses::deactivate))
        .route("/{id}/maintenance", patch(greenhouses::start_maintenance))
        .route("/{id}/zones", get(zones::list_zones).post(zones::create_zone));

    let zone_routes = Router::new()
        .route("/{id}", get(zones::get_zone).delete(zones::delete_zone))
        .route("/{id}/status", patch(zones::change_zone_status));

    Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(realtime::websocket_handler))
        .route("/api/v1/greenhouses", get(greenhouses::list_greenhouses).post(greenhouses::create_greenhouse))
        .nest("/api/v1/greenhouses", greenhouse_routes)
        .nest("/api/v1/zones", zone_routes)
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http().make_span_with(DefaultMakeSpan::default()))
}

/// CORS restricted to the configured front-end origins.
pub fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                warn!("Ignoring invalid CORS origin: {}", origin);
                None
            },
        })
        .collect();

    CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::PATCH])
        .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION])
        .allow_credentials(true)
}
