use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware::Next,
    response::IntoResponse,
};
use tower_cookies::{Cookie, Cookies};
use tracing::debug;
use uuid::Uuid;

pub const SESSION_COOKIE: &str = "cc_session";

/// Session the current request belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SessionId(pub Uuid);

/// Attach a [`SessionId`] to every request, issuing a cookie when the
/// client has none (or an unreadable one).
pub async fn session_middleware(mut req: Request<Body>, next: Next) -> impl IntoResponse {
    let cookies = match req.extensions().get::<Cookies>() {
        Some(c) => c.clone(),
        None => return (StatusCode::INTERNAL_SERVER_ERROR, "Cookie manager missing").into_response(),
    };

    let existing = cookies
        .get(SESSION_COOKIE)
        .and_then(|c| Uuid::parse_str(c.value()).ok());

    let id = match existing {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4();
            cookies.add(
                Cookie::build((SESSION_COOKIE, id.to_string()))
                    .path("/")
                    .http_only(true)
                    .build(),
            );
            debug!(session = %id, "new session");
            id
        }
    };

    req.extensions_mut().insert(SessionId(id));
    next.run(req).await
}
