/**
 * Meta Tag Routes
 * Per-page SEO metadata. Lookups are public, edits are admin only.
 *
 * `/api/meta-tags/{key}` is shared: GET treats the key as a URL-encoded page
 * path, PATCH and DELETE treat it as a numeric id.
 */
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::auth::require_admin;
use super::error::ApiError;
use super::{parse_id, MessageResponse};
use crate::state::AppState;
use crate::store::models::MetaTag;
use crate::store::StoreError;
use crate::validation::{validate_meta_tag_patch, validate_new_meta_tag};

const ENTITY: &str = "meta tags";
const NOT_FOUND: &str = "Meta tags not found";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetaTagsResponse {
    pub message: String,
    pub meta_tags: MetaTag,
}

/// GET /api/meta-tags/{pagePath}
///
/// The path arrives percent-decoded. A key without a leading slash
/// (`about`) also matches the stored `/about`.
pub async fn get_by_path(
    State(state): State<AppState>,
    Path(page_path): Path<String>,
) -> Result<Json<MetaTag>, ApiError> {
    let tag = {
        let store = state.store.read().await;
        store.get_meta_tag_by_path(&page_path).or_else(|| {
            (!page_path.starts_with('/'))
                .then(|| store.get_meta_tag_by_path(&format!("/{page_path}")))
                .flatten()
        })
    };

    tag.map(Json)
        .ok_or_else(|| ApiError::not_found("Meta tags not found for this page"))
}

/// GET /api/meta-tags
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<MetaTag>>, ApiError> {
    require_admin(&state, &headers)?;
    let tags = state.store.read().await.get_all_meta_tags();
    Ok(Json(tags))
}

/// POST /api/meta-tags
pub async fn create(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers)?;
    let Json(body) = payload?;
    let new = validate_new_meta_tag(&body)?;

    let result = state.store.write().await.create_meta_tag(new);
    let meta_tags = match result {
        Ok(tag) => tag,
        Err(StoreError::PathConflict {
            page_path,
            existing_id,
        }) => {
            tracing::warn!(%page_path, existing_id, "Duplicate meta tags rejected");
            return Err(ApiError::Conflict {
                message: "Meta tags already exist for this page. Please use PATCH to update them."
                    .to_string(),
                id: Some(existing_id),
            });
        }
        Err(e) => return Err(e.into()),
    };
    tracing::info!(id = meta_tags.id, page_path = %meta_tags.page_path, "Meta tags created");

    Ok((
        StatusCode::CREATED,
        Json(MetaTagsResponse {
            message: "Meta tags created successfully".to_string(),
            meta_tags,
        }),
    ))
}

/// PATCH /api/meta-tags/{id}
pub async fn update(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<MetaTagsResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;
    if state.store.read().await.get_meta_tag(id).is_none() {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    let Json(body) = payload?;
    let patch = validate_meta_tag_patch(&body)?;
    let meta_tags = state.store.write().await.update_meta_tag(id, patch)?;
    tracing::info!(id, page_path = %meta_tags.page_path, "Meta tags updated");

    Ok(Json(MetaTagsResponse {
        message: "Meta tags updated successfully".to_string(),
        meta_tags,
    }))
}

/// DELETE /api/meta-tags/{id}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;

    state.store.write().await.delete_meta_tag(id)?;
    tracing::info!(id, "Meta tags deleted");
    Ok(Json(MessageResponse::new("Meta tags deleted successfully")))
}
