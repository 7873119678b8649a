/**
 * Portfolio Routes
 * Public project gallery with featured/category filters; admin CRUD and export
 */
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::auth::require_admin;
use super::error::ApiError;
use super::{parse_id, MessageResponse};
use crate::export;
use crate::state::AppState;
use crate::store::models::PortfolioProject;
use crate::validation::{validate_new_portfolio_project, validate_portfolio_project_patch};

const ENTITY: &str = "portfolio project";
const NOT_FOUND: &str = "Portfolio project not found";

#[derive(Debug, Serialize, Deserialize)]
pub struct ProjectResponse {
    pub message: String,
    pub project: PortfolioProject,
}

/// GET /api/portfolio
pub async fn list_projects(State(state): State<AppState>) -> Json<Vec<PortfolioProject>> {
    let projects = state.store.read().await.get_all_portfolio_projects();
    Json(projects)
}

/// GET /api/portfolio/featured
pub async fn list_featured(State(state): State<AppState>) -> Json<Vec<PortfolioProject>> {
    let projects = state.store.read().await.get_featured_portfolio_projects();
    Json(projects)
}

/// GET /api/portfolio/category/{category}
pub async fn list_by_category(
    State(state): State<AppState>,
    Path(category): Path<String>,
) -> Json<Vec<PortfolioProject>> {
    let projects = state
        .store
        .read()
        .await
        .get_portfolio_projects_by_category(&category);
    Json(projects)
}

/// GET /api/portfolio/{id}
pub async fn get_project(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PortfolioProject>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    let project = state.store.read().await.get_portfolio_project(id);
    project
        .map(Json)
        .ok_or_else(|| ApiError::not_found(NOT_FOUND))
}

/// POST /api/portfolio
pub async fn create_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers)?;
    let Json(body) = payload?;
    let new = validate_new_portfolio_project(&body)?;

    let project = state.store.write().await.create_portfolio_project(new);
    tracing::info!(id = project.id, title = %project.title, "Portfolio project created");

    Ok((
        StatusCode::CREATED,
        Json(ProjectResponse {
            message: "Portfolio project created successfully".to_string(),
            project,
        }),
    ))
}

/// PATCH /api/portfolio/{id}
pub async fn update_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<ProjectResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;
    if state.store.read().await.get_portfolio_project(id).is_none() {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    let Json(body) = payload?;
    let patch = validate_portfolio_project_patch(&body)?;
    let project = state
        .store
        .write()
        .await
        .update_portfolio_project(id, patch)?;
    tracing::info!(id, "Portfolio project updated");

    Ok(Json(ProjectResponse {
        message: "Portfolio project updated successfully".to_string(),
        project,
    }))
}

/// DELETE /api/portfolio/{id}
pub async fn delete_project(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;

    state.store.write().await.delete_portfolio_project(id)?;
    tracing::info!(id, "Portfolio project deleted");
    Ok(Json(MessageResponse::new(
        "Portfolio project deleted successfully",
    )))
}

/// GET /api/portfolio/export
pub async fn export_xlsx(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers)?;
    let projects = state.store.read().await.get_all_portfolio_projects();

    export::download(
        &state.export_dir,
        "portfolio_projects",
        export::portfolio_projects_sheet(&projects),
    )
    .await
    .map_err(|e| ApiError::internal("Error exporting portfolio projects", e))
}
