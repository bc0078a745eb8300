use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::error::AppError;
use crate::state::SharedState;
use crate::submission::phase::FormPhase;
use crate::submission::{parser, pipeline};
use crate::views;

/// Accept one application. The response is the structured result as JSON,
/// or, for a plain HTML form post, the form page re-rendered through the
/// submission state machine.
pub async fn submit(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Response, AppError> {
    let content_type = headers.get("content-type").and_then(|v| v.to_str().ok());
    if !content_type.is_some_and(|ct| ct.contains("multipart/form-data")) {
        return Err(AppError::BadRequest(
            "Expected a multipart/form-data body".to_string(),
        ));
    }

    let raw = parser::parse_multipart(&headers, body)
        .await
        .map_err(AppError::BadRequest)?;

    let result = pipeline::run(&state, raw).await;

    if wants_html(&headers) {
        let phase = FormPhase::new().submit().resolve(&result);
        return Ok(views::form::render(phase).into_response());
    }

    Ok(Json(result).into_response())
}

fn wants_html(headers: &HeaderMap) -> bool {
    headers
        .get("accept")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}
