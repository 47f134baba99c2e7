//! HTTP route handlers. Kept thin: the resolution layers own the fallback
//! logic, the handlers only translate outcomes into status codes, cache
//! headers, and redirects.

use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use summit_core::EventId;
use summit_resolver::images::{thumbnail_filename, ImageKind, ImageReply, IMAGE_MAX_AGE_SECS};
use summit_resolver::{Fetcher as _, PathGenerator};

use crate::server::AppState;

/// GET /health
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "healthy",
        "upstreamConfigured": !state.config.upstream_base_url.is_empty(),
    }))
}

/// GET /api/events
///
/// Same-origin proxy for the upstream event list. Credentials are attached
/// here so they never reach the browser. This endpoint does surface upstream
/// failures: it is itself the first tier that [`summit_resolver::EventResolver`]
/// falls back from.
pub async fn list_events(State(state): State<AppState>) -> Response {
    let url = state.config.upstream_url("events");
    match state.fetcher.get_json(&url, &state.config.auth_headers()).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(err) => {
            tracing::warn!(kind = err.error_kind(), error = %err, "event list proxy failed");
            error_response(StatusCode::BAD_GATEWAY, "upstream event service unavailable")
        }
    }
}

/// GET /api/events/{id}
pub async fn get_event(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    let id = EventId::from_raw(id);
    let url = state.config.upstream_url(&format!("events/{}", id.as_str()));
    match state.fetcher.get_json(&url, &state.config.auth_headers()).await {
        Ok(payload) => (StatusCode::OK, Json(payload)).into_response(),
        Err(err) => {
            tracing::warn!(id = %id, kind = err.error_kind(), error = %err, "event proxy failed");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to fetch event")
        }
    }
}

#[derive(Deserialize)]
pub struct BannerImageQuery {
    pub file: Option<String>,
    pub thumbnail: Option<String>,
}

/// GET /api/banner-image?file=...&thumbnail=...
///
/// Filename-based image proxy. Unlike the per-event image routes this one
/// can fail: a missing `file` parameter is a 400 and an unresolvable
/// filename a 404.
pub async fn banner_image(
    State(state): State<AppState>,
    Query(query): Query<BannerImageQuery>,
) -> Response {
    let Some(file) = query.file.filter(|f| !f.trim().is_empty()) else {
        return error_response(StatusCode::BAD_REQUEST, "missing required query parameter: file");
    };

    let filename = if truthy(query.thumbnail.as_deref()) {
        thumbnail_filename(&file)
    } else {
        file
    };

    let candidates = state.images.default_filename_candidates(&filename);
    match state.images.resolve_for_filename(&candidates).await {
        Ok(image) => image_bytes_response(image.bytes, &image.content_type, IMAGE_MAX_AGE_SECS),
        Err(err) => {
            tracing::warn!(filename, kind = err.error_kind(), "banner image not found");
            error_response(StatusCode::NOT_FOUND, "image not found")
        }
    }
}

/// GET /api/event-image/{id}
///
/// Guaranteed-success: every request ends in image bytes or a redirect to
/// the placeholder, never an error status.
pub async fn event_image(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    per_event_image(state, EventId::from_raw(id), ImageKind::Banner).await
}

/// GET /api/event-thumbnail/{id}
pub async fn event_thumbnail(State(state): State<AppState>, Path(id): Path<String>) -> Response {
    per_event_image(state, EventId::from_raw(id), ImageKind::Thumbnail).await
}

async fn per_event_image(state: AppState, id: EventId, kind: ImageKind) -> Response {
    let is_thumbnail = kind == ImageKind::Thumbnail;
    let config = state.config.clone();
    // Candidate URLs for a bare filename from the event record: this
    // server's own banner-image proxy first, then upstream hosting paths.
    let path_gen = move |filename: &str, _id: &EventId| {
        vec![
            config.internal_url(&format!(
                "api/banner-image?file={filename}&thumbnail={is_thumbnail}"
            )),
            config.upstream_url(&format!("images/{filename}")),
            config.upstream_url(&format!("uploads/events/{filename}")),
        ]
    };
    let path_gen: &PathGenerator = &path_gen;

    match state.images.handle_image_request(&state.events, &id, kind, path_gen).await {
        ImageReply::Bytes { image, max_age_secs } => {
            image_bytes_response(image.bytes, &image.content_type, max_age_secs)
        }
        ImageReply::Redirect { location, max_age_secs } => (
            StatusCode::TEMPORARY_REDIRECT,
            [
                (header::LOCATION, location),
                (header::CACHE_CONTROL, cache_control(max_age_secs)),
            ],
        )
            .into_response(),
    }
}

fn truthy(value: Option<&str>) -> bool {
    matches!(
        value.map(str::to_ascii_lowercase).as_deref(),
        Some("1" | "true" | "yes")
    )
}

fn cache_control(max_age_secs: u64) -> String {
    format!("public, max-age={max_age_secs}")
}

fn image_bytes_response(bytes: bytes::Bytes, content_type: &str, max_age_secs: u64) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (header::CACHE_CONTROL, cache_control(max_age_secs)),
        ],
        bytes,
    )
        .into_response()
}

fn error_response(status: StatusCode, message: &str) -> Response {
    (status, Json(serde_json::json!({"error": message}))).into_response()
}
