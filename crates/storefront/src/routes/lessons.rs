//! Catalog service route handlers.

use axum::{
    Json,
    extract::{Path, Query, State, rejection::JsonRejection},
};
use serde::Deserialize;
use tracing::instrument;

use lesson_shop_core::{Lesson, LessonId, LessonPatch};

use crate::db::{PRICE_PRECISION, PRICE_SCALE};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Largest `spaces` value the store can hold.
const MAX_SPACES: u32 = i32::MAX.unsigned_abs();

/// Search query parameters.
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// List every lesson.
#[instrument(skip(state))]
pub async fn index(State(state): State<AppState>) -> Result<Json<Vec<Lesson>>> {
    let lessons = state.lessons().find_all().await?;
    Ok(Json(lessons))
}

/// Lessons whose subject or location contains `q`, ignoring case.
///
/// An absent or blank `q` is a client error; the catalog view reloads the
/// full list itself when the search box is cleared.
#[instrument(skip(state))]
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<Lesson>>> {
    let text = query.q.as_deref().map(str::trim).unwrap_or_default();
    if text.is_empty() {
        return Err(AppError::BadRequest(
            "query parameter 'q' is required".to_string(),
        ));
    }

    let lessons = state.lessons().search(text).await?;
    Ok(Json(lessons))
}

/// Merge the given fields into a lesson.
#[instrument(skip(state, payload))]
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<LessonPatch>, JsonRejection>,
) -> Result<Json<Lesson>> {
    let id: LessonId = id
        .parse()
        .map_err(|e: lesson_shop_core::IdError| AppError::BadRequest(e.to_string()))?;
    let Json(patch) = payload?;

    if patch.is_empty() {
        return Err(AppError::BadRequest("update has no fields".to_string()));
    }
    if patch.spaces.is_some_and(|spaces| spaces > MAX_SPACES) {
        return Err(AppError::BadRequest(format!(
            "spaces must be at most {MAX_SPACES}"
        )));
    }
    if patch
        .price
        .is_some_and(|price| !price.fits_numeric(PRICE_PRECISION, PRICE_SCALE))
    {
        return Err(AppError::BadRequest(format!(
            "price must have at most {PRICE_SCALE} decimal places and {} whole digits",
            PRICE_PRECISION - PRICE_SCALE
        )));
    }

    let lesson = state
        .lessons()
        .update(id, &patch)
        .await
        .map_err(|e| AppError::from_repository(e, format!("lesson {id}")))?;

    tracing::info!(lesson_id = %id, spaces = lesson.spaces, "Lesson updated");
    Ok(Json(lesson))
}
