/**
 * Testimonial Routes
 * Public submission and approved listings; moderation is admin only
 */
use axum::{
    extract::{rejection::JsonRejection, Path, State},
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
use crate::store::models::Testimonial;
use crate::validation::{validate_new_testimonial, validate_testimonial_patch};

const ENTITY: &str = "testimonial";
const NOT_FOUND: &str = "Testimonial not found";

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestimonialSubmittedResponse {
    pub message: String,
    pub testimonial_id: i32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TestimonialResponse {
    pub message: String,
    pub testimonial: Testimonial,
}

/// GET /api/testimonials
pub async fn list_approved(State(state): State<AppState>) -> Json<Vec<Testimonial>> {
    let testimonials = state.store.read().await.get_approved_testimonials();
    Json(testimonials)
}

/// GET /api/testimonials/type/{projectType}
pub async fn list_by_project_type(
    State(state): State<AppState>,
    Path(project_type): Path<String>,
) -> Json<Vec<Testimonial>> {
    let testimonials = state
        .store
        .read()
        .await
        .get_testimonials_by_project_type(&project_type);
    Json(testimonials)
}

/// GET /api/testimonials/{id} - Pending testimonials are only visible to the admin
pub async fn get_testimonial(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<Testimonial>, ApiError> {
    let id = parse_id(&id, ENTITY)?;
    let testimonial = state.store.read().await.get_testimonial(id);

    match testimonial {
        Some(t) if t.is_approved || is_admin(&state, &headers) => Ok(Json(t)),
        _ => Err(ApiError::not_found(NOT_FOUND)),
    }
}

/// POST /api/testimonials - Stored unapproved until moderated
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let new = validate_new_testimonial(&body)?;

    let testimonial = state.store.write().await.create_testimonial(new);
    tracing::info!(id = testimonial.id, project_type = %testimonial.project_type, "Testimonial submitted");

    Ok((
        StatusCode::CREATED,
        Json(TestimonialSubmittedResponse {
            message: "Thank you for your testimonial! It will be reviewed by our team and published soon."
                .to_string(),
            testimonial_id: testimonial.id,
        }),
    ))
}

/// GET /api/admin/testimonials
pub async fn list_all(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Vec<Testimonial>>, ApiError> {
    require_admin(&state, &headers)?;
    let testimonials = state.store.read().await.get_all_testimonials();
    Ok(Json(testimonials))
}

/// PATCH /api/testimonials/{id}
pub async fn update_testimonial(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<Json<TestimonialResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;
    if state.store.read().await.get_testimonial(id).is_none() {
        return Err(ApiError::not_found(NOT_FOUND));
    }

    let Json(body) = payload?;
    let patch = validate_testimonial_patch(&body)?;
    let testimonial = state.store.write().await.update_testimonial(id, patch)?;
    tracing::info!(id, "Testimonial updated");

    Ok(Json(TestimonialResponse {
        message: "Testimonial updated successfully".to_string(),
        testimonial,
    }))
}

/// PATCH /api/testimonials/{id}/approve
pub async fn approve(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<TestimonialResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;

    let testimonial = state.store.write().await.approve_testimonial(id)?;
    tracing::info!(id, "Testimonial approved");

    Ok(Json(TestimonialResponse {
        message: "Testimonial approved successfully".to_string(),
        testimonial,
    }))
}

/// DELETE /api/testimonials/{id}
pub async fn delete_testimonial(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;

    state.store.write().await.delete_testimonial(id)?;
    tracing::info!(id, "Testimonial deleted");
    Ok(Json(MessageResponse::new("Testimonial deleted successfully")))
}

/// GET /api/testimonials/export
pub async fn export_xlsx(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers)?;
    let testimonials = state.store.read().await.get_all_testimonials();

    export::download(
        &state.export_dir,
        "testimonials",
        export::testimonials_sheet(&testimonials),
    )
    .await
    .map_err(|e| ApiError::internal("Error exporting testimonials", e))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{ids, send, test_app, TEST_TOKEN};
    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    fn submission() -> Value {
        json!({
            "clientName": "X",
            "testimonial": "This is at least twenty characters long.",
            "rating": 5,
            "projectType": "Residential"
        })
    }

    #[tokio::test]
    async fn test_moderation_scenario() {
        let (app, _dir) = test_app(false);

        let mut blank = submission();
        blank["clientName"] = json!("");
        let (status, body) =
            send(app.clone(), Method::POST, "/api/testimonials", None, Some(blank)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["errors"][0]["path"][0], "clientName");

        let mut pending = submission();
        pending["isApproved"] = json!(true);
        let (status, body) =
            send(app.clone(), Method::POST, "/api/testimonials", None, Some(pending)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["testimonialId"], 1);

        let (_, public) = send(app.clone(), Method::GET, "/api/testimonials", None, None).await;
        assert_eq!(public, json!([]));
        let (status, _) = send(app.clone(), Method::GET, "/api/testimonials/1", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, pending) =
            send(app.clone(), Method::GET, "/api/testimonials/1", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(pending["clientName"], "X");
        assert_eq!(pending["isApproved"], false);

        let (status, approved) = send(
            app.clone(),
            Method::PATCH,
            "/api/testimonials/1/approve",
            Some(TEST_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(approved["testimonial"]["isApproved"], true);

        let (_, public) = send(app.clone(), Method::GET, "/api/testimonials", None, None).await;
        assert_eq!(ids(&public), vec![1]);
        let (_, by_type) =
            send(app, Method::GET, "/api/testimonials/type/Residential", None, None).await;
        assert_eq!(ids(&by_type), vec![1]);
    }

    #[tokio::test]
    async fn test_approve_unknown_is_not_found() {
        let (app, _dir) = test_app(false);
        let (status, body) = send(
            app,
            Method::PATCH,
            "/api/testimonials/42/approve",
            Some(TEST_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Testimonial not found");
    }

    #[tokio::test]
    async fn test_patch_keeps_approval_and_validates_rating() {
        let (app, _dir) = test_app(true);

        let (status, _) = send(
            app.clone(),
            Method::PATCH,
            "/api/testimonials/1",
            Some(TEST_TOKEN),
            Some(json!({ "rating": 0 })),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, body) = send(
            app,
            Method::PATCH,
            "/api/testimonials/1",
            Some(TEST_TOKEN),
            Some(json!({ "rating": 3, "company": "" })),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["testimonial"]["rating"], 3);
        assert!(body["testimonial"]["company"].is_null());
        assert_eq!(body["testimonial"]["isApproved"], true);
    }

    #[tokio::test]
    async fn test_admin_listing_includes_pending() {
        let (app, _dir) = test_app(true);
        send(app.clone(), Method::POST, "/api/testimonials", None, Some(submission())).await;

        let (_, public) = send(app.clone(), Method::GET, "/api/testimonials", None, None).await;
        assert_eq!(public.as_array().unwrap().len(), 4);
        let (status, _) = send(app.clone(), Method::GET, "/api/admin/testimonials", None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        let (_, all) =
            send(app, Method::GET, "/api/admin/testimonials", Some(TEST_TOKEN), None).await;
        assert_eq!(ids(&all)[0], 5);
        assert_eq!(all.as_array().unwrap().len(), 5);
    }

    #[tokio::test]
    async fn test_delete_testimonial() {
        let (app, _dir) = test_app(true);
        let (status, _) =
            send(app.clone(), Method::DELETE, "/api/testimonials/2", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) = send(app, Method::GET, "/api/testimonials/2", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
