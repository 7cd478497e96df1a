use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Extension, Json,
};
use collector_corner_cli::{
    render::edition_title, render_preview, AssembleError, EditionMonth, FetchError, Field,
    FieldValues, RawSource, Session,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::warn;

use crate::middleware::session_middleware::SessionId;
use crate::state::AppState;

type ApiError = (StatusCode, Json<Value>);

fn api_error(status: StatusCode, message: impl Into<String>) -> ApiError {
    (status, Json(json!({ "message": message.into() })))
}

fn assemble_error(err: AssembleError) -> ApiError {
    let status = match &err {
        AssembleError::EmptyInput | AssembleError::Fetch(FetchError::InvalidUrl { .. }) => {
            StatusCode::BAD_REQUEST
        }
        AssembleError::Fetch(FetchError::Timeout { .. }) => StatusCode::GATEWAY_TIMEOUT,
        AssembleError::Fetch(_) | AssembleError::Generation(_) => StatusCode::BAD_GATEWAY,
    };
    api_error(status, err.to_string())
}

fn parse_month(month: Option<&str>) -> Result<Option<EditionMonth>, ApiError> {
    month
        .filter(|m| !m.trim().is_empty())
        .map(|m| m.parse::<EditionMonth>())
        .transpose()
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e.to_string()))
}

#[derive(Debug, Deserialize)]
pub struct GeneratePayload {
    pub url: Option<String>,
    pub text: Option<String>,
    pub month: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FieldsResponse {
    pub month: Option<EditionMonth>,
    pub fields: FieldValues,
    pub full_text: String,
}

impl From<&Session> for FieldsResponse {
    fn from(session: &Session) -> Self {
        FieldsResponse {
            month: session.month(),
            fields: session.fields().clone(),
            full_text: session.full_text().as_str().to_string(),
        }
    }
}

/// POST /api/generate
///
/// Fetch (when a URL is the source), draft, and refill the session's four
/// generated fields. Spotlight and call to action survive.
pub async fn generate(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(payload): Json<GeneratePayload>,
) -> Result<impl IntoResponse, ApiError> {
    let source = RawSource::select(payload.url.as_deref(), payload.text.as_deref())
        .map_err(assemble_error)?;
    let month = parse_month(payload.month.as_deref())?.unwrap_or_else(EditionMonth::current);

    let session = state.session(id);
    let mut session = session.lock().await;
    state
        .assembler
        .assemble(&source, month, &mut session)
        .await
        .map_err(|e| {
            warn!(session = %id, error = %e, "generation failed");
            assemble_error(e)
        })?;

    Ok((StatusCode::OK, Json(FieldsResponse::from(&*session))))
}

/// GET /api/fields
///
/// A session that never wrote anything reads as an empty form.
pub async fn get_fields(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
) -> Json<FieldsResponse> {
    match state.existing_session(id) {
        Some(session) => Json(FieldsResponse::from(&*session.lock().await)),
        None => Json(FieldsResponse::from(&Session::default())),
    }
}

/// Only the fields present in the body are overwritten.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateFieldsPayload {
    pub featured_pressing: Option<String>,
    pub valuation_tip: Option<String>,
    pub just_in: Option<String>,
    pub collector_buzz: Option<String>,
    pub spotlight: Option<String>,
    pub call_to_action: Option<String>,
}

impl UpdateFieldsPayload {
    fn into_edits(self) -> Vec<(Field, String)> {
        [
            (Field::FeaturedPressing, self.featured_pressing),
            (Field::ValuationTip, self.valuation_tip),
            (Field::JustIn, self.just_in),
            (Field::CollectorBuzz, self.collector_buzz),
            (Field::Spotlight, self.spotlight),
            (Field::CallToAction, self.call_to_action),
        ]
        .into_iter()
        .filter_map(|(field, value)| value.map(|v| (field, v)))
        .collect()
    }
}

/// POST /api/fields
pub async fn update_fields(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Json(payload): Json<UpdateFieldsPayload>,
) -> Json<FieldsResponse> {
    let session = state.session(id);
    let mut session = session.lock().await;
    for (field, value) in payload.into_edits() {
        session.set(field, value);
    }
    Json(FieldsResponse::from(&*session))
}

#[derive(Debug, Deserialize)]
pub struct PreviewQuery {
    pub month: Option<String>,
}

/// GET /api/preview
///
/// Month precedence: query string, then the month of the last generation,
/// then the current month.
pub async fn preview(
    State(state): State<AppState>,
    Extension(SessionId(id)): Extension<SessionId>,
    Query(query): Query<PreviewQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let requested = parse_month(query.month.as_deref())?;
    let (stored_month, fields) = match state.existing_session(id) {
        Some(session) => {
            let session = session.lock().await;
            (session.month(), session.fields().clone())
        }
        None => (None, FieldValues::default()),
    };
    let month = requested.or(stored_month).unwrap_or_else(EditionMonth::current);

    let markdown = render_preview(month, &fields, &state.shop_name);
    Ok(Json(json!({
        "title": edition_title(month),
        "markdown": markdown,
    })))
}
