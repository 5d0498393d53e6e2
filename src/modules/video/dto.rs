use serde::Serialize;
use utoipa::ToSchema;

/// Success body for an upload; `processed_video` is `null` when the
/// grayscale pass failed.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadVideoResponse {
    pub message: String,
    pub processed_video: Option<String>,
}
