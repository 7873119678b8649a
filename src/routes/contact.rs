/**
 * Contact Routes
 * Public contact form plus admin review of submissions
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
use crate::validation::validate_new_contact;

const ENTITY: &str = "contact submission";

#[derive(Debug, Serialize, Deserialize)]
pub struct ContactCreatedResponse {
    pub message: String,
    pub id: i32,
}

/// POST /api/contact
pub async fn submit(
    State(state): State<AppState>,
    payload: Result<Json<Value>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let Json(body) = payload?;
    let new = validate_new_contact(&body)?;

    let submission = state.store.write().await.create_contact_submission(new);
    tracing::info!(id = submission.id, service = %submission.service, "Contact form submitted");

    Ok((
        StatusCode::CREATED,
        Json(ContactCreatedResponse {
            message: "Contact form submitted successfully".to_string(),
            id: submission.id,
        }),
    ))
}

/// GET /api/contact
pub async fn list(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers)?;
    let submissions = state.store.read().await.get_all_contact_submissions();
    Ok(Json(submissions))
}

/// GET /api/contact/{id}
pub async fn get_one(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;

    let submission = state.store.read().await.get_contact_submission(id);
    submission
        .map(Json)
        .ok_or_else(|| ApiError::not_found("Contact submission not found"))
}

/// PATCH /api/contact/{id}/read
pub async fn mark_read(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;

    let submission = state.store.write().await.mark_contact_submission_as_read(id)?;
    Ok(Json(submission))
}

/// DELETE /api/contact/{id}
pub async fn delete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers)?;
    let id = parse_id(&id, ENTITY)?;

    state.store.write().await.delete_contact_submission(id)?;
    tracing::info!(id, "Contact submission deleted");
    Ok(Json(MessageResponse::new(
        "Contact submission deleted successfully",
    )))
}

/// GET /api/contact/export
pub async fn export_xlsx(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    require_admin(&state, &headers)?;
    let submissions = state.store.read().await.get_all_contact_submissions();

    export::download(
        &state.export_dir,
        "contact_submissions",
        export::contact_submissions_sheet(&submissions),
    )
    .await
    .map_err(|e| ApiError::internal("Error exporting contact submissions", e))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{ids, send, send_raw, test_app, TEST_TOKEN};
    use axum::http::{header, Method, StatusCode};
    use serde_json::{json, Value};

    fn valid_body(name: &str) -> Value {
        json!({
            "name": name,
            "email": "jane@example.com",
            "phone": "555-123-4567",
            "service": "Renovation",
            "message": "Looking to remodel our kitchen this spring."
        })
    }

    #[tokio::test]
    async fn test_submit_returns_created_id() {
        let (app, _dir) = test_app(false);
        let (status, body) =
            send(app, Method::POST, "/api/contact", None, Some(valid_body("Jane"))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["message"], "Contact form submitted successfully");
    }

    #[tokio::test]
    async fn test_submit_invalid_lists_all_errors() {
        let (app, _dir) = test_app(false);
        let (status, body) = send(
            app,
            Method::POST,
            "/api/contact",
            None,
            Some(json!({ "name": "J", "email": "bad" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Validation error");
        let fields: Vec<&str> = body["errors"]
            .as_array()
            .unwrap()
            .iter()
            .map(|e| e["path"][0].as_str().unwrap())
            .collect();
        assert_eq!(fields, vec!["email", "phone", "service", "message"]);
    }

    #[tokio::test]
    async fn test_submit_accepts_short_phone_and_message() {
        let (app, _dir) = test_app(false);
        let mut body = valid_body("J");
        body["phone"] = json!("555-1234");
        body["message"] = json!("Call me");
        let (status, created) = send(app, Method::POST, "/api/contact", None, Some(body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["id"], 1);
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let (app, _dir) = test_app(false);
        let req = axum::http::Request::post("/api/contact")
            .header("content-type", "application/json")
            .body(axum::body::Body::from("{not json"))
            .unwrap();
        let res = tower::ServiceExt::oneshot(app, req).await.unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_admin_routes_require_token() {
        let (app, _dir) = test_app(false);
        for uri in ["/api/contact", "/api/contact/1", "/api/contact/export"] {
            let (status, _) = send(app.clone(), Method::GET, uri, None, None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
            let (status, _) = send(app.clone(), Method::GET, uri, Some("wrong"), None).await;
            assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        }
    }

    #[tokio::test]
    async fn test_list_mark_read_and_delete() {
        let (app, _dir) = test_app(false);
        send(app.clone(), Method::POST, "/api/contact", None, Some(valid_body("Ann"))).await;
        tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        send(app.clone(), Method::POST, "/api/contact", None, Some(valid_body("Bob"))).await;

        let (status, list) = send(app.clone(), Method::GET, "/api/contact", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(ids(&list), vec![2, 1]);
        assert_eq!(list[0]["isRead"], false);

        let (status, read) = send(
            app.clone(),
            Method::PATCH,
            "/api/contact/1/read",
            Some(TEST_TOKEN),
            None,
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(read["isRead"], true);

        let (status, _) =
            send(app.clone(), Method::DELETE, "/api/contact/1", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        let (status, _) =
            send(app.clone(), Method::GET, "/api/contact/1", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (status, _) =
            send(app, Method::DELETE, "/api/contact/1", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_id_is_bad_request() {
        let (app, _dir) = test_app(false);
        let (status, body) =
            send(app, Method::PATCH, "/api/contact/abc/read", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "Invalid contact submission ID");
    }

    #[tokio::test]
    async fn test_export_downloads_xlsx() {
        let (app, _dir) = test_app(false);
        send(app.clone(), Method::POST, "/api/contact", None, Some(valid_body("Ann"))).await;

        let (status, headers, bytes) =
            send_raw(app, Method::GET, "/api/contact/export", Some(TEST_TOKEN), None).await;
        assert_eq!(status, StatusCode::OK);
        let disposition = headers[header::CONTENT_DISPOSITION].to_str().unwrap();
        assert!(disposition.contains("contact_submissions_"));
        assert_eq!(&bytes[..2], b"PK");
    }
}
