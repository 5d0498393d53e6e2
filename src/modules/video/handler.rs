use axum::{
    Json,
    extract::{Multipart, State},
    http::StatusCode,
    response::IntoResponse,
};
use tracing::{error, info};

use super::dto::UploadVideoResponse;
use super::service::VideoService;
use crate::common::response::{ApiError, ErrorBody};
use crate::state::AppState;

/// Accepts one multipart `video` field, stores it under a timestamped name
/// and runs the grayscale pass before answering.
#[utoipa::path(
    post,
    path = "/upload-video",
    request_body(content = String, content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "Video stored; processed_video is null when the grayscale pass failed", body = UploadVideoResponse),
        (status = 400, description = "Missing or invalid video file", body = ErrorBody)
    ),
    tag = "Video"
)]
pub async fn upload_video(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> impl IntoResponse {
    while let Some(field) = multipart.next_field().await.unwrap_or(None) {
        let name = field.name().unwrap_or("").to_string();
        if name != "video" {
            continue;
        }

        // Parts without a filename are plain form values, not file uploads.
        let file_name = match field.file_name() {
            Some(name) => name.to_string(),
            None => continue,
        };
        if file_name.is_empty() {
            return ApiError("No video file selected".to_string(), StatusCode::BAD_REQUEST)
                .into_response();
        }
        if !state.config.allows_extension(&file_name) {
            return ApiError("Invalid file format".to_string(), StatusCode::BAD_REQUEST)
                .into_response();
        }

        let data = match field.bytes().await {
            Ok(data) => data,
            Err(e) => return ApiError(e.to_string(), StatusCode::BAD_REQUEST).into_response(),
        };

        info!("Received {} ({} bytes)", file_name, data.len());

        let outcome = match VideoService::ingest(state.clone(), file_name, data).await {
            Ok(outcome) => outcome,
            Err(e) => {
                return ApiError(e.to_string(), StatusCode::INTERNAL_SERVER_ERROR).into_response();
            }
        };

        let processed_video = match outcome.processed {
            Ok(path) => Some(path.to_string_lossy().into_owned()),
            Err(e) => {
                error!("Error processing video {}: {}", outcome.source.display(), e);
                None
            }
        };

        return (
            StatusCode::OK,
            Json(UploadVideoResponse {
                message: "Video Uploaded and Processed".to_string(),
                processed_video,
            }),
        )
            .into_response();
    }

    ApiError("No video file provided".to_string(), StatusCode::BAD_REQUEST).into_response()
}

#[cfg(test)]
mod tests {
    use crate::app;
    use crate::config::settings::AppConfig;
    use crate::infrastructure::storage::local::LocalStorage;
    use crate::state::AppState;
    use axum::Router;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use std::path::{Path, PathBuf};
    use tower::ServiceExt;

    const BOUNDARY: &str = "gait-test-boundary";

    fn unique_temp_dir(prefix: &str) -> PathBuf {
        let nanos = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        let dir = std::env::temp_dir().join(format!("{prefix}_{}_{}", std::process::id(), nanos));
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    async fn test_app(upload_dir: &Path) -> Router {
        let config = AppConfig {
            server_port: 3000,
            upload_dir: upload_dir.to_path_buf(),
            allowed_extensions: vec!["mp4".into(), "avi".into(), "mov".into()],
            log_file: upload_dir.join("test.log"),
            pose: None,
        };
        let storage = LocalStorage::new(upload_dir).unwrap();
        app::create_app(AppState::new(config, storage)).await
    }

    fn multipart_request(field: &str, file_name: Option<&str>, payload: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        let disposition = match file_name {
            Some(name) => format!(
                "Content-Disposition: form-data; name=\"{field}\"; filename=\"{name}\"\r\n"
            ),
            None => format!("Content-Disposition: form-data; name=\"{field}\"\r\n"),
        };
        body.extend_from_slice(disposition.as_bytes());
        body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
        body.extend_from_slice(payload);
        body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());

        Request::builder()
            .method("POST")
            .uri("/upload-video")
            .header(
                header::CONTENT_TYPE,
                format!("multipart/form-data; boundary={BOUNDARY}"),
            )
            .body(Body::from(body))
            .unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn stored_files(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[tokio::test]
    async fn liveness_endpoint_reports_running() {
        let dir = unique_temp_dir("gait_live");
        let app = test_app(&dir).await;

        let response = app
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"Gait Analysis Backend is running!");
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn rejects_requests_without_a_video_field() {
        let dir = unique_temp_dir("gait_missing_field");
        let app = test_app(&dir).await;

        let response = app
            .oneshot(multipart_request("document", Some("walk.mp4"), b"data"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No video file provided");
        assert!(stored_files(&dir).is_empty());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn rejects_an_empty_filename() {
        let dir = unique_temp_dir("gait_empty_name");
        let app = test_app(&dir).await;

        let response = app
            .oneshot(multipart_request("video", Some(""), b"data"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No video file selected");
        assert!(stored_files(&dir).is_empty());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn ignores_video_parts_without_a_filename() {
        let dir = unique_temp_dir("gait_form_value");
        let app = test_app(&dir).await;

        let response = app
            .oneshot(multipart_request("video", None, b"walk"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "No video file provided");
        assert!(stored_files(&dir).is_empty());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn rejects_disallowed_extensions() {
        let dir = unique_temp_dir("gait_bad_ext");
        let app = test_app(&dir).await;

        let response = app
            .oneshot(multipart_request("video", Some("walk.txt"), b"data"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["error"], "Invalid file format");
        assert!(stored_files(&dir).is_empty());
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn stores_the_original_and_reports_a_failed_pass_as_null() {
        let dir = unique_temp_dir("gait_upload");
        let app = test_app(&dir).await;
        let payload = b"definitely not an mp4 bitstream";

        let response = app
            .oneshot(multipart_request("video", Some("walk.mp4"), payload))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = body_json(response).await;
        assert_eq!(body["message"], "Video Uploaded and Processed");
        assert!(body["processed_video"].is_null());

        let files = stored_files(&dir);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("_walk.mp4"));
        assert_eq!(std::fs::read(dir.join(&files[0])).unwrap(), payload);
        std::fs::remove_dir_all(dir).unwrap();
    }

    #[tokio::test]
    async fn accepts_uppercase_extensions() {
        let dir = unique_temp_dir("gait_upper_ext");
        let app = test_app(&dir).await;

        let response = app
            .oneshot(multipart_request("video", Some("WALK.MP4"), b"data"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let files = stored_files(&dir);
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("_WALK.MP4"));
        std::fs::remove_dir_all(dir).unwrap();
    }
}
