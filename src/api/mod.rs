pub mod auth;
mod emargements;
pub mod error;
mod sessions;
mod validation;

use axum::{
    middleware,
    routing::{delete, get, post, put},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

use crate::AppState;

/// Plain confirmation payload returned by write operations
#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    // Auth routes (public)
    let auth_routes = Router::new()
        .route("/signup", post(auth::signup))
        .route("/login", post(auth::login));

    // Protected routes
    let protected_routes = Router::new()
        .route("/protected", get(auth::protected))
        // Sessions
        .route("/sessions", get(sessions::list_sessions))
        .route("/sessions", post(sessions::create_session))
        .route("/sessions/:id", get(sessions::get_session))
        .route("/sessions/:id", put(sessions::update_session))
        .route("/sessions/:id", delete(sessions::delete_session))
        // Attendance
        .route("/sessions/:id/emargement", post(emargements::check_in))
        .route("/sessions/:id/emargement", get(emargements::list_check_ins))
        // Protected by auth
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::auth_middleware,
        ));

    Router::new()
        .route("/health", get(health_check))
        .nest("/auth", auth_routes)
        .merge(protected_routes)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health_check() -> &'static str {
    "OK"
}
