use axum::{
    routing::{get, post},
    Router,
};
use sqlx::PgPool;
use std::sync::Arc;
use std::time::Duration;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use domain::services::GroupPrivacy;
use persistence::repositories::PgGroupPrivacy;

use crate::config::Config;
use crate::routes::{health, privacy, settings};

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub config: Arc<Config>,
    /// Group-membership privacy collaborator erasure delegates to.
    pub groups: Arc<dyn GroupPrivacy>,
}

pub fn create_app(config: Config, pool: PgPool) -> Router {
    let groups: Arc<dyn GroupPrivacy> = Arc::new(PgGroupPrivacy::new(pool.clone()));
    create_app_with_groups(config, pool, groups)
}

/// Build the application with an explicit group privacy collaborator.
/// Tests inject a recording fake here.
pub fn create_app_with_groups(
    config: Config,
    pool: PgPool,
    groups: Arc<dyn GroupPrivacy>,
) -> Router {
    let config = Arc::new(config);
    let request_timeout = Duration::from_secs(config.server.request_timeout_secs);

    let state = AppState {
        pool,
        config,
        groups,
    };

    // Public health endpoints
    let public_routes = Router::new()
        .route("/api/health", get(health::health_check))
        .route("/api/health/ready", get(health::ready))
        .route("/api/health/live", get(health::live));

    // Privacy routes (v1)
    let privacy_routes = Router::new()
        .route("/api/v1/privacy/metadata", get(privacy::get_metadata))
        .route(
            "/api/v1/privacy/users/:user_id/contexts",
            get(privacy::get_contexts_for_user),
        )
        .route(
            "/api/v1/privacy/contexts/user/:user_id/users",
            get(privacy::get_users_in_user_context),
        )
        .route(
            "/api/v1/privacy/contexts/course/:course_id/users",
            get(privacy::get_users_in_course_context),
        )
        .route(
            "/api/v1/privacy/users/:user_id/export",
            post(privacy::export_user_data),
        )
        .route(
            "/api/v1/privacy/users/:user_id/erase",
            post(privacy::erase_for_user),
        )
        .route(
            "/api/v1/privacy/contexts/user/:user_id/erase",
            post(privacy::erase_user_context),
        )
        .route(
            "/api/v1/privacy/contexts/course/:course_id/erase",
            post(privacy::erase_course_context),
        )
        .route(
            "/api/v1/privacy/contexts/course/:course_id/erase-users",
            post(privacy::erase_users_in_course),
        );

    // Plugin settings routes (v1)
    let settings_routes = Router::new()
        .route("/api/v1/settings", get(settings::list_settings))
        .route(
            "/api/v1/settings/:name",
            get(settings::get_setting).put(settings::update_setting),
        )
        .route(
            "/api/v1/settings/install-defaults",
            post(settings::install_defaults),
        );

    Router::new()
        .merge(public_routes)
        .merge(privacy_routes)
        .merge(settings_routes)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .with_state(state)
}
