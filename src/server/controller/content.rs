use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};

use crate::server::{error::AppError, state::AppState};

/// Get the parsed community document.
///
/// Returns the content cached by the last successful `document-sync` run, including
/// the asset map used to resolve `asset:` image references.
///
/// # Arguments
/// - `state` - Application state containing the content cache
///
/// # Returns
/// - `200 OK` - Parsed `DocumentContent`
/// - `404 Not Found` - No sync has completed yet
pub async fn get_content(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let Some(content) = state.content.read().await.clone() else {
        return Err(AppError::NotFound(
            "Content has not been synced yet".to_string(),
        ));
    };

    Ok((StatusCode::OK, Json(content)))
}
