//! Note analysis endpoint

use axum::{extract::rejection::JsonRejection, extract::State, routing::post, Json, Router};

use crate::error::{ApiError, ApiResult};
use crate::models::{AnalysisResult, Note};
use crate::AppState;

/// POST /analyze
///
/// Classifies the note, fetches a reference summary for its topic, and scores
/// how closely the note matches it. Reference lookup problems still return
/// 200 with the placeholder summary; only malformed input is an error.
pub async fn analyze_note(
    State(state): State<AppState>,
    payload: Result<Json<Note>, JsonRejection>,
) -> ApiResult<Json<AnalysisResult>> {
    let Json(note) = payload?;
    note.validate()
        .map_err(|field| ApiError::Validation(format!("{} must not be empty", field)))?;

    let result = state.analyzer.analyze(&note).await;
    Ok(Json(result))
}

/// Build analysis routes
pub fn analyze_routes() -> Router<AppState> {
    Router::new().route("/analyze", post(analyze_note))
}
