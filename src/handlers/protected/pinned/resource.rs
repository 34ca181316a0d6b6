// handlers/protected/pinned/resource.rs - DELETE /pinned-resources/:id/
use axum::extract::{
    rejection::{PathRejection, QueryRejection},
    Extension, Path, Query, State,
};
use serde::Deserialize;

use crate::api::format::MessageResponse;
use crate::error::ApiError;
use crate::middleware::{ApiResponse, ApiResult, AuthUser};
use crate::services::PinnedResourceService;
use crate::state::AppState;
use crate::types::{ResourceId, ResourceKind};

#[derive(Debug, Deserialize)]
pub struct UnpinQuery {
    pub resource_type: Option<String>,
}

/// DELETE /pinned-resources/:id/?resource_type=link|file|document
///
/// Removes one reference from the caller's set. The type tag is case-insensitive;
/// a missing or unknown tag is a 400 and nothing is touched.
pub async fn delete(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: Result<Path<ResourceId>, PathRejection>,
    query: Result<Query<UnpinQuery>, QueryRejection>,
) -> ApiResult<MessageResponse> {
    let Query(query) = query?;
    let kind: ResourceKind = query
        .resource_type
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Invalid resource type"))?
        .parse()?;
    let Path(id) = id?;

    PinnedResourceService::from_state(&state).unpin(user.user_id, kind, id).await?;
    Ok(ApiResponse::success(MessageResponse::removed(kind)))
}
