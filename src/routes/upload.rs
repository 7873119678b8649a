/**
 * Upload Routes
 * Admin image uploads for project galleries and blog covers, served back
 * under /uploads/{name}
 */
use axum::{
    body::Body,
    extract::{Multipart, Path, Request, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tower::ServiceExt;
use tower_http::services::ServeFile;

use super::auth::require_admin;
use super::error::ApiError;
use crate::state::AppState;
use crate::uploads::BlobError;

pub const MAX_FILE_SIZE: usize = 5 * 1024 * 1024; // 5MB
const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp", "gif"];

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub url: String,
    pub filename: String,
    pub size: usize,
    pub mime_type: String,
}

/// Sniffs the image type from its leading bytes, returning the MIME type and
/// the extension the stored blob gets.
fn validate_image_magic_bytes(bytes: &[u8]) -> Option<(&'static str, &'static str)> {
    match bytes {
        // JPEG: FF D8 FF
        [0xFF, 0xD8, 0xFF, ..] => Some(("image/jpeg", "jpg")),
        // PNG: 89 50 4E 47
        [0x89, 0x50, 0x4E, 0x47, ..] => Some(("image/png", "png")),
        // GIF: 47 49 46 38
        [0x47, 0x49, 0x46, 0x38, ..] => Some(("image/gif", "gif")),
        // WebP: RIFF .... WEBP
        [0x52, 0x49, 0x46, 0x46, _, _, _, _, 0x57, 0x45, 0x42, 0x50, ..] => {
            Some(("image/webp", "webp"))
        }
        _ => None,
    }
}

/// POST /api/uploads - multipart form with a single image field
pub async fn upload_image(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApiError> {
    require_admin(&state, &headers)?;

    let field = match multipart.next_field().await {
        Ok(Some(field)) => field,
        Ok(None) => return Err(ApiError::bad_request("No file provided")),
        Err(e) => {
            tracing::warn!(error = %e, "Multipart error");
            return Err(ApiError::bad_request("Invalid multipart data"));
        }
    };

    let original_name = field.file_name().unwrap_or("unknown").to_string();
    let original_ext = original_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .to_lowercase();
    if !ALLOWED_EXTENSIONS.contains(&original_ext.as_str()) {
        return Err(ApiError::bad_request(
            "Unsupported file type. Allowed: JPEG, PNG, WebP, GIF.",
        ));
    }

    let bytes = field.bytes().await.map_err(|e| {
        tracing::warn!(error = %e, "Failed to read upload bytes");
        ApiError::bad_request("Failed to read file data")
    })?;

    if bytes.len() > MAX_FILE_SIZE {
        return Err(ApiError::bad_request("File too large. Maximum size is 5MB."));
    }
    if bytes.is_empty() {
        return Err(ApiError::bad_request("Empty file"));
    }

    let (mime_type, extension) = validate_image_magic_bytes(&bytes).ok_or_else(|| {
        ApiError::bad_request("File content does not match an allowed image type.")
    })?;

    let filename = state
        .blobs
        .save(&bytes, extension)
        .await
        .map_err(|e| ApiError::internal("Failed to save file", e))?;

    tracing::info!(%filename, size = bytes.len(), mime_type, "Image uploaded");

    Ok((
        StatusCode::CREATED,
        Json(UploadResponse {
            url: format!("/uploads/{filename}"),
            filename,
            size: bytes.len(),
            mime_type: mime_type.to_string(),
        }),
    ))
}

/// GET /uploads/{name}
pub async fn serve_upload(
    State(state): State<AppState>,
    Path(name): Path<String>,
    request: Request,
) -> Result<Response, ApiError> {
    let path = match state.blobs.open(&name).await {
        Ok(path) => path,
        Err(BlobError::NotFound(_) | BlobError::InvalidName(_)) => {
            return Err(ApiError::not_found("File not found"))
        }
        Err(e) => return Err(ApiError::internal("Failed to read file", e)),
    };

    let response = ServeFile::new(path)
        .oneshot(request)
        .await
        .map_err(|e| ApiError::internal("Failed to read file", e))?;
    Ok(response.map(Body::new))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routes::test_support::{send_raw, test_app, TEST_TOKEN};
    use axum::http::{header, Method};

    const PNG: &[u8] = &[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0, 0, 0, 0];
    const BOUNDARY: &str = "XBOUNDARYX";

    fn multipart_request(token: Option<&str>, filename: &str, bytes: &[u8]) -> Request {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"{filename}\"\r\nContent-Type: application/octet-stream\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(bytes);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        let mut req = axum::http::Request::builder()
            .method(Method::POST)
            .uri("/api/uploads")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            );
        if let Some(token) = token {
            req = req.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        req.body(Body::from(body)).unwrap()
    }

    async fn json_of(res: Response) -> (StatusCode, serde_json::Value) {
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[test]
    fn test_magic_bytes() {
        assert_eq!(validate_image_magic_bytes(PNG), Some(("image/png", "png")));
        assert_eq!(
            validate_image_magic_bytes(&[0xFF, 0xD8, 0xFF, 0xE0]),
            Some(("image/jpeg", "jpg"))
        );
        assert_eq!(validate_image_magic_bytes(b"GIF89a"), Some(("image/gif", "gif")));
        assert_eq!(
            validate_image_magic_bytes(b"RIFF\0\0\0\0WEBPVP8 "),
            Some(("image/webp", "webp"))
        );
        assert_eq!(validate_image_magic_bytes(b"<svg"), None);
        assert_eq!(validate_image_magic_bytes(&[0xFF]), None);
    }

    #[tokio::test]
    async fn test_upload_then_fetch() {
        let (app, _dir) = test_app(false);
        let res = app
            .clone()
            .oneshot(multipart_request(Some(TEST_TOKEN), "site.png", PNG))
            .await
            .unwrap();
        let (status, body) = json_of(res).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["mimeType"], "image/png");
        assert_eq!(body["size"], PNG.len());
        let url = body["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/uploads/") && url.ends_with(".png"));

        let (status, _, bytes) = send_raw(app, Method::GET, &url, None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(&bytes[..], PNG);
    }

    #[tokio::test]
    async fn test_stored_extension_follows_content() {
        let (app, _dir) = test_app(false);
        let res = app
            .oneshot(multipart_request(Some(TEST_TOKEN), "photo.jpg", PNG))
            .await
            .unwrap();
        let (status, body) = json_of(res).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["mimeType"], "image/png");
        assert!(body["filename"].as_str().unwrap().ends_with(".png"));
    }

    #[tokio::test]
    async fn test_upload_requires_admin() {
        let (app, _dir) = test_app(false);
        let res = app
            .oneshot(multipart_request(None, "site.png", PNG))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_upload_rejects_disguised_content() {
        let (app, _dir) = test_app(false);
        let res = app
            .clone()
            .oneshot(multipart_request(Some(TEST_TOKEN), "site.png", b"<svg onload=x>"))
            .await
            .unwrap();
        let (status, body) = json_of(res).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "File content does not match an allowed image type.");

        let res = app
            .oneshot(multipart_request(Some(TEST_TOKEN), "notes.txt", PNG))
            .await
            .unwrap();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_unknown_upload_is_not_found() {
        let (app, _dir) = test_app(false);
        let (status, _, _) = send_raw(app, Method::GET, "/uploads/missing.png", None, None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
