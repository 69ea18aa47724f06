use axum::{
    extract::{rejection::JsonRejection, Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
    Extension, Json,
};
use serde::Serialize;
use serde_json::{json, Value};

use crate::{
    error::{AppError, AppResult},
    middleware::RequestId,
    models::{survey_questions, ResultBundle, ResultsQuery, SubmitRequest, SubmitResponse, SurveyQuestion},
};

use super::AppState;

const SURVEY_PAGE: &str = include_str!("../../ui/survey.html");
const RESULTS_PAGE: &str = include_str!("../../ui/results.html");

#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub success: bool,
    pub message: String,
}

/// Health check endpoint
pub async fn health_check() -> (StatusCode, Json<Value>) {
    (StatusCode::OK, Json(json!({ "status": "healthy" })))
}

/// The fixed survey
pub async fn get_questions() -> Json<Vec<SurveyQuestion>> {
    Json(survey_questions())
}

/// Runs the recommendation flow and returns the new results id
pub async fn submit(
    State(state): State<AppState>,
    Extension(request_id): Extension<RequestId>,
    payload: Result<Json<SubmitRequest>, JsonRejection>,
) -> AppResult<Json<SubmitResponse>> {
    let Json(request) = payload.map_err(|rejection| {
        tracing::warn!(request_id = %request_id, error = %rejection.body_text(), "Rejected submit body");
        AppError::InvalidInput("Invalid request body.".to_string())
    })?;

    match state.recommendations.submit(request).await {
        Ok(results_id) => Ok(Json(SubmitResponse { results_id })),
        Err(e) => {
            tracing::error!(
                request_id = %request_id,
                error = %e,
                error_type = e.error_type().unwrap_or("none"),
                "Recommendation request failed"
            );
            Err(e)
        }
    }
}

/// Returns a stored results bundle
pub async fn get_results(
    State(state): State<AppState>,
    Query(query): Query<ResultsQuery>,
) -> AppResult<Json<ResultBundle>> {
    let bundle = state
        .recommendations
        .retrieve(query.results_id.as_deref())
        .await?;
    Ok(Json(bundle))
}

/// Overwrites the catalog file with the embedded seed list
pub async fn seed_catalog(State(state): State<AppState>) -> Response {
    match state.catalog.seed().await {
        Ok(count) => Json(SeedResponse {
            success: true,
            message: format!("Successfully saved {} books to the database", count),
        })
        .into_response(),
        Err(e) => {
            tracing::error!(error = %e, path = %state.catalog.path().display(), "Catalog seeding failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(SeedResponse {
                    success: false,
                    message: "Failed to create book data".to_string(),
                }),
            )
                .into_response()
        }
    }
}

pub async fn survey_page() -> Html<&'static str> {
    Html(SURVEY_PAGE)
}

/// The page reads its id from the path and fetches the bundle itself
pub async fn results_page() -> Html<&'static str> {
    Html(RESULTS_PAGE)
}
