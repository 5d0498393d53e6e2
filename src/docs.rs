use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::index,
        crate::modules::video::handler::upload_video,
    ),
    components(
        schemas(
            crate::modules::video::dto::UploadVideoResponse,
            crate::common::response::ErrorBody,
        )
    ),
    tags(
        (name = "Health", description = "Service liveness"),
        (name = "Video", description = "Video upload and grayscale processing")
    )
)]
pub struct ApiDoc;
