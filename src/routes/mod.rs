use axum::http::HeaderValue;
use axum::{
    routing::{get, patch},
    Router,
};
use chrono::{DateTime, NaiveDateTime, Utc};
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::state::AppState;

pub mod health;
pub mod rechecks;
pub mod reference;
pub mod registers;
pub mod reports;

pub fn create_router(state: AppState) -> Router<()> {
    let cors = if let Some(origins) = state.config.cors_allowed_origin.as_ref() {
        let headers: Vec<HeaderValue> = origins
            .split(',')
            .map(str::trim)
            .filter(|value| !value.is_empty())
            .filter_map(|value| match value.parse::<HeaderValue>() {
                Ok(header) => Some(header),
                Err(_) => {
                    tracing::warn!(origin = value, "ignoring invalid CORS allowed origin");
                    None
                }
            })
            .collect();

        CorsLayer::new()
            .allow_origin(AllowOrigin::list(headers))
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    } else {
        CorsLayer::new()
            .allow_origin(AllowOrigin::mirror_request())
            .allow_methods(tower_http::cors::AllowMethods::mirror_request())
            .allow_headers(tower_http::cors::AllowHeaders::mirror_request())
            .allow_credentials(true)
    };

    let registers_routes = Router::new()
        .route(
            "/",
            get(registers::list_registers).post(registers::create_register),
        )
        .route(
            "/:id",
            get(registers::get_register)
                .patch(registers::update_register)
                .delete(registers::delete_register),
        )
        .route("/:id/status", patch(registers::set_register_status))
        .route(
            "/:id/rechecks",
            get(rechecks::list_register_rechecks).post(rechecks::create_recheck),
        );

    let rechecks_routes = Router::new()
        .route("/", get(rechecks::list_rechecks))
        .route(
            "/:recheck_no",
            get(rechecks::get_recheck)
                .patch(rechecks::update_recheck)
                .delete(rechecks::delete_recheck),
        );

    let reports_routes = Router::new()
        .route("/summary", get(reports::register_summary))
        .route("/registers", get(reports::register_report));

    Router::new()
        .nest("/api/registers", registers_routes)
        .nest("/api/rechecks", rechecks_routes)
        .nest("/api/reports", reports_routes)
        .route("/api/dealers", get(reference::list_dealers))
        .route("/api/sizes", get(reference::list_sizes))
        .route("/api/consultants", get(reference::list_consultants))
        .route("/api/observations", get(reference::list_observations))
        .route("/api/health", get(health::health_check))
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}

pub(crate) fn to_iso(dt: NaiveDateTime) -> String {
    DateTime::<Utc>::from_naive_utc_and_offset(dt, Utc).to_rfc3339()
}
