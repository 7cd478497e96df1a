pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

use axum::{routing::get, Router};
use tower_cookies::CookieManagerLayer;
use tower_http::trace::TraceLayer;

use routes::newsletter::newsletter_routes;
use state::AppState;

pub fn app(state: AppState) -> Router {
    Router::new()
        .nest("/api", newsletter_routes(state))
        .route("/health", get(|| async { "ok" }))
        .layer(CookieManagerLayer::new())
        .layer(TraceLayer::new_for_http())
}
