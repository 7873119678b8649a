/**
 * Blog Routes
 * Public reads of published posts, admin CRUD and export
 */
use axum::{
    extract::{rejection::JsonRejection, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::auth::{is_admin, require_admin};
use super::error::ApiError;
use super::{parse_id, MessageResponse};
use crate::export;
use crate::state::AppState;
use crate::store::models::BlogPost;
use crate::validation::{validate_blog_post_patch, validate_new_blog_post};

const ENTITY: &str = "blog post";
const NOT_FOUND: &str = "Blog post not found";

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlogPostResponse {
    pub message: String,
    pub blog_post: BlogPost,
}

// ============================================================================
// Public handlers
// ============================================================================

/// GET /api/blog - Published posts, newest first
pub async fn list_published(State(state): State<AppState>) -> Json<Vec<BlogPost>> {
    let posts = state.store.read().await.get_published_blog_posts();
    Json(posts)
}

/// GET /api/blog/category/{category}
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<BlogPost>> {
    let posts = state.store.read().await.get_blog_posts_by_category(&category);
    Json(posts)
}

/// GET /api/blog/search?q=
pub async fn search(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    let q = query
        .q
        .filter(|q| !q.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Search query is required"))?;

    let results = state.store.read().await.search_blog_posts(&q);
    tracing::debug!(query = %q, hits = results.len(), "Blog search");
    Ok(Json(results))
}

/// GET /api/blog/{id} - Drafts are only visible to the admin
pub async fn get_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<BlogPost>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    let post = state.store.read().await.get_blog_post(id);

    match post {
        Some(post) if post.is_published || is_admin(&state, &headers) => Ok(Json(post)),
        _ => Err(ApiError::not_found(NOT_FOUND)),
    }
}

// ============================================================================
// Admin handlers
// ============================================================================

/// GET /api/admin/blog - Every post, drafts included
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<BlogPost>>, ApiError> {
    require_admin(&state, &headers)?;
    let posts = state.store.read().await.get_all_blog_posts();
    Ok(Json(posts))
}

/// POST /api/blog
pub async fn create_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers)?;
    let Json(body) = payload?;
    let new = validate_new_blog_post(&body)?;

    let blog_post = state.store.write().await.create_blog_post(new);
    tracing::info!(id = blog_post.id, title = %blog_post.title, "Blog post created");

    Ok((
        StatusCode::CREATED,
        Json(BlogPostResponse {
            message: "Blog post created successfully".to_string(),
            blog_post,
        }),
    ))
}

/// PATCH /api/blog/{id}
pub async fn update_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<BlogPostResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;
    if state.store.read().await.get_blog_post(id).is_none() {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    let Json(body) = payload?;
    let patch = validate_blog_post_patch(&body)?;
    let blog_post = state.store.write().await.update_blog_post(id, patch)?;
    tracing::info!(id, "Blog post updated");

    Ok(Json(BlogPostResponse {
        message: "Blog post updated successfully".to_string(),
        blog_post,
    }))
}

/// DELETE /api/blog/{id}
pub async fn delete_post(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;

    state.store.write().await.delete_blog_post(id)?;
    tracing::info!(id, "Blog post deleted");
    Ok(Json(MessageResponse::new("Blog post deleted successfully")))
}

/// GET /api/blog/export
pub async fn export_xlsx(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers)?;
    let posts = state.store.read().await.get_all_blog_posts();

    export::download(&state.export_dir, "blog_posts", export::blog_posts_sheet(&posts))
        .await
        .map_err(|e| ApiError::internal("Error exporting blog posts", e))
}
