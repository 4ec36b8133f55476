mod cors;

use axum::Router;
use axum::routing::{delete, get, patch, post};
use scanboard_core::AppError;
use tower_http::trace::TraceLayer;

use crate::state::AppState;
use crate::handlers;

pub fn build_router(app_state: AppState, frontend_url: &str) -> Result<Router, AppError> {
    let api_routes = Router::new()
        .route(
            "/api/settings/global",
            get(handlers::settings::list_global_settings_handler),
        )
        .route(
            "/api/settings/global/{setting_id}",
            patch(handlers::settings::update_global_setting_handler),
        )
        .route(
            "/api/scans/{scan_type}",
            get(handlers::scans::list_scans_handler),
        )
        .route(
            "/api/scans/{scan_type}/listing-state",
            post(handlers::scans::apply_listing_transition_handler),
        )
        .route(
            "/api/scans/{scan_type}/{scan_id}",
            delete(handlers::scans::delete_scan_handler),
        )
        .route(
            "/api/scans/{scan_type}/{scan_id}/download",
            post(handlers::scans::download_scan_handler),
        )
        .route(
            "/api/registries",
            get(handlers::registries::list_registries_handler),
        )
        .route(
            "/api/registries/gitlab",
            post(handlers::registries::add_gitlab_registry_handler),
        );

    Ok(Router::new()
        .route("/health", get(handlers::health::health_handler))
        .merge(api_routes)
        .layer(TraceLayer::new_for_http())
        .layer(cors::build_cors_layer(frontend_url)?)
        .with_state(app_state))
}
