use axum::{
    middleware::from_fn,
    routing::{get, post},
    Router,
};

use crate::handlers::newsletter_handlers::{generate, get_fields, preview, update_fields};
use crate::middleware::session_middleware::session_middleware;
use crate::state::AppState;

pub fn newsletter_routes(state: AppState) -> Router {
    Router::new()
        .route("/generate", post(generate))
        .route("/fields", get(get_fields).post(update_fields))
        .route("/preview", get(preview))
        .layer(from_fn(session_middleware))
        .with_state(state)
}
