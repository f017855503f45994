use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{
    cors::{Any, CorsLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::Config;
use crate::routes::{assignments, draw, health, participation, reminders, roster, settings};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        pool,
        config: config.clone(),
    };

    // Build CORS layer based on configuration
    let cors = if config.security.cors_origins.is_empty() {
        // Default: allow any origin (for development)
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        // Production: only allow specified origins
        use tower_http::cors::AllowOrigin;
        let origins: Vec<_> = config
            .security
            .cors_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(AllowOrigin::list(origins))
            .allow_methods(Any)
            .allow_headers(Any)
    };

    // Public routes (no authentication required)
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live))
        .route("/api/v1/settings", get(settings::get_public_settings));

    // Participant routes (bearer token, enforced by the handler's extractor)
    let participant_routes = Router::new().route("/api/v1/draw", post(draw::draw_name));

    // Admin routes (bearer token + admin-list membership, enforced per handler)
    let admin_routes = Router::new()
        .route("/api/v1/admin/roster", post(roster::replace_roster))
        .route("/api/v1/admin/assignments", get(assignments::list_assignments))
        .route(
            "/api/v1/admin/participation",
            get(participation::get_participation),
        )
        .route("/api/v1/admin/reminders", post(reminders::send_reminders))
        .route(
            "/api/v1/admin/settings",
            get(settings::get_admin_settings).put(settings::update_settings),
        )
        .route(
            "/api/v1/admin/settings/test-email",
            post(settings::send_test_email),
        );

    Router::new()
        .merge(public_routes)
        .merge(participant_routes)
        .merge(admin_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(cors)
        .with_state(state)
}
