//! Narration audio handler.

use axum::{
    extract::{Query, State},
    http::header::{CACHE_CONTROL, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use serde::Deserialize;

use recipe_finder_core::normalize_s3_image_url;
use recipe_finder_core::types::image::is_bucket_url;

use crate::error::AppError;
use crate::media::preload_audio;
use crate::middleware::RequireSession;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AudioQuery {
    pub src: String,
}

/// Preload a narration clip from the recipe bucket and hand it back whole.
///
/// Only bucket URLs are fetched.
///
/// # Route
///
/// `GET /api/audio?src=`
pub async fn audio(
    State(state): State<AppState>,
    RequireSession(_auth): RequireSession,
    Query(query): Query<AudioQuery>,
) -> Result<Response, AppError> {
    if !is_bucket_url(&query.src) {
        return Err(AppError::BadRequest("unsupported audio source".to_string()));
    }

    let url = normalize_s3_image_url(&query.src);
    let clip = preload_audio(state.media_client(), &url).await?;

    Ok((
        [
            (CONTENT_TYPE, clip.content_type),
            (CACHE_CONTROL, "private, max-age=3600".to_string()),
        ],
        clip.bytes,
    )
        .into_response())
}
