//! Lesson image assets.
//!
//! Images are looked up by the basename of the requested name only, so
//! `../config.env` or `a/b/c.png` can never leave the image directory.

use std::path::{Path as FsPath, PathBuf};

use axum::{
    extract::{Path, Request, State},
    response::{IntoResponse, Response},
};
use tower::ServiceExt;
use tower_http::services::ServeFile;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::state::AppState;

/// Resolve a requested image name to a file inside `dir`.
///
/// Returns `None` when the name has no final component (empty, `.`, `..`).
pub(crate) fn resolve_image(dir: &FsPath, requested: &str) -> Option<PathBuf> {
    let name = FsPath::new(requested).file_name()?;
    Some(dir.join(name))
}

/// Serve a lesson image, or 404 if it does not exist.
#[instrument(skip(state, request))]
pub async fn show(
    State(state): State<AppState>,
    Path(file): Path<String>,
    request: Request,
) -> Result<Response> {
    let not_found = || AppError::NotFound(format!("image {file}"));

    let path = resolve_image(&state.config().image_dir, &file).ok_or_else(not_found)?;
    let is_file = tokio::fs::metadata(&path)
        .await
        .is_ok_and(|meta| meta.is_file());
    if !is_file {
        tracing::debug!(path = %path.display(), "Image not found");
        return Err(not_found());
    }

    let response = match ServeFile::new(path).oneshot(request).await {
        Ok(response) => response,
        Err(never) => match never {},
    };
    Ok(response.into_response())
}
