// handlers/protected/pinned/collection.rs - GET/POST /pinned-resources/
use axum::{
    extract::{rejection::JsonRejection, Extension, State},
    http::StatusCode,
    Json,
};

use crate::api::format::{PinRequest, PinnedResourcesView};
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::PinnedResourceService;
use crate::state::AppState;

/// GET /pinned-resources/ - the caller's pinned documents, links and files, expanded
pub async fn get(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> ApiResult<PinnedResourcesView> {
    let view = PinnedResourceService::from_state(&state).list(user.user_id).await?;
    Ok(ApiResponse::success(view))
}

/// POST /pinned-resources/ - pin resources by id.
///
/// Body: `{"document": [1], "link": [10, 11], "file": [20]}`, every field optional.
/// Responds 201 when this call created the caller's pinned set, 200 otherwise.
pub async fn post(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: Result<Json<PinRequest>, JsonRejection>,
) -> ApiResult<PinnedResourcesView> {
    let Json(request) = payload?;
    let outcome = PinnedResourceService::from_state(&state).pin(user.user_id, &request).await?;

    let status = if outcome.created { StatusCode::CREATED } else { StatusCode::OK };
    Ok(ApiResponse::with_status(outcome.view, status))
}
