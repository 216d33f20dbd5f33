use crate::application::error::ApplicationError;
use axum::{
    extract::{DefaultBodyLimit, Json, Multipart, State},
    http::{header, HeaderName, Method},
    response::IntoResponse,
    routing::post,
    Router,
};
use serde::Deserialize;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::application::upload_service::UploadService;
use crate::domain::image::SourceImage;
use crate::domain::passage_analysis::PassageAnalysis;
use super::data_url::source_image_from_data_url;

const IMAGE_FIELD: &str = "image";
const DEFAULT_FILENAME: &str = "image";

#[derive(Clone)]
pub struct AppState {
    pub upload_service: Arc<UploadService>,
}

#[derive(Deserialize, Debug)]
pub struct DataUrlParams {
    pub data_url: String,
    pub filename: Option<String>,
}

pub fn router(state: Arc<AppState>, max_upload_bytes: usize, static_dir: Option<PathBuf>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]);

    let mut app = Router::new()
        .route("/api/scale", post(scale_image_handler))
        .route("/api/submit", post(submit_image_handler))
        .route("/api/submit-data-url", post(submit_data_url_handler));
    if let Some(dir) = static_dir {
        app = app.fallback_service(ServeDir::new(dir));
    }

    app.layer(DefaultBodyLimit::max(max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// 縮小した JPEG をそのまま返す (プレビュー用)
pub async fn scale_image_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<impl IntoResponse, ApplicationError> {
    let source = read_image_field(&mut multipart)
        .await?
        .ok_or(ApplicationError::NoImageSelected)?;
    let scaled = state.upload_service.scale_image(source).await?;

    let headers = [
        (header::CONTENT_TYPE, scaled.media_type().to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("inline; filename=\"{}\"", header_safe_filename(&scaled.filename)),
        ),
        (HeaderName::from_static("x-image-width"), scaled.width.to_string()),
        (HeaderName::from_static("x-image-height"), scaled.height.to_string()),
        (
            HeaderName::from_static("x-last-modified-ms"),
            scaled.last_modified_millis().to_string(),
        ),
    ];
    Ok((headers, scaled.data))
}

pub async fn submit_image_handler(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> Result<Json<PassageAnalysis>, ApplicationError> {
    let source = read_image_field(&mut multipart).await?;
    let analysis = state.upload_service.submit(source).await?;
    Ok(Json(analysis))
}

pub async fn submit_data_url_handler(
    State(state): State<Arc<AppState>>,
    Json(params): Json<DataUrlParams>,
) -> Result<Json<PassageAnalysis>, ApplicationError> {
    let filename = params.filename.unwrap_or_else(|| DEFAULT_FILENAME.to_string());
    let source = source_image_from_data_url(&params.data_url, &filename)
        .map_err(|e| ApplicationError::InvalidRequest(e.to_string()))?;
    let analysis = state.upload_service.submit(Some(source)).await?;
    Ok(Json(analysis))
}

// "image" フィールドだけを読む。空のファイルは未選択扱い
async fn read_image_field(multipart: &mut Multipart) -> Result<Option<SourceImage>, ApplicationError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApplicationError::InvalidRequest(format!("Multipart error: {}", e)))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let filename = field.file_name().unwrap_or(DEFAULT_FILENAME).to_string();
        let media_type = field.content_type().map(str::to_string);
        if let Some(media_type) = &media_type {
            if !is_accepted_media_type(media_type) {
                return Err(ApplicationError::InvalidRequest(format!(
                    "Only image files are accepted, got {}",
                    media_type
                )));
            }
        }

        let data = field
            .bytes()
            .await
            .map_err(|e| ApplicationError::InvalidRequest(format!("Failed to read bytes from multipart field: {}", e)))?;
        if data.is_empty() {
            return Ok(None);
        }
        return Ok(Some(SourceImage::new(data.to_vec(), media_type, filename)));
    }
    Ok(None)
}

fn is_accepted_media_type(media_type: &str) -> bool {
    let media_type = media_type.to_ascii_lowercase();
    media_type.starts_with("image/") || media_type == "application/octet-stream"
}

fn header_safe_filename(filename: &str) -> String {
    filename
        .chars()
        .map(|c| {
            if (c.is_ascii_graphic() && c != '"' && c != '\\') || c == ' ' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::process_image_client_trait::MockProcessImageClient;
    use crate::domain::scale_config::ScaleConfig;
    use crate::infrastructure::error::InfrastructureError;
    use crate::infrastructure::image_scaler::DefaultImageScaler;
    use crate::test_support::{png_bytes, sample_analysis};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    const BOUNDARY: &str = "english-helper-boundary";

    fn app_with(client: MockProcessImageClient, max_upload_bytes: usize, static_dir: Option<PathBuf>) -> Router {
        let service = UploadService::new(
            Arc::new(DefaultImageScaler::new()),
            Arc::new(client),
            ScaleConfig::new(200, 200, 0.8).unwrap(),
        );
        let state = Arc::new(AppState { upload_service: Arc::new(service) });
        router(state, max_upload_bytes, static_dir)
    }

    fn app(client: MockProcessImageClient) -> Router {
        app_with(client, 10 * 1024 * 1024, None)
    }

    fn multipart_request(uri: &str, field: &str, content_type: &str, data: &[u8]) -> Request<Body> {
        let mut body = Vec::new();
        body.extend_from_slice(
            format!(
                "--{}\r\nContent-Disposition: form-data; name=\"{}\"; filename=\"page.png\"\r\nContent-Type: {}\r\n\r\n",
                BOUNDARY, field, content_type
            )
            .as_bytes(),
        );
        body.extend_from_slice(data);
        body.extend_from_slice(format!("\r\n--{}--\r\n", BOUNDARY).as_bytes());

        Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", format!("multipart/form-data; boundary={}", BOUNDARY))
            .body(Body::from(body))
            .unwrap()
    }

    async fn json_body(response: axum::response::Response) -> serde_json::Value {
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_scale_route_returns_jpeg() {
        let response = app(MockProcessImageClient::new())
            .oneshot(multipart_request("/api/scale", "image", "image/png", &png_bytes(400, 100)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers()["content-type"], "image/jpeg");
        assert_eq!(response.headers()["x-image-width"], "200");
        assert_eq!(response.headers()["x-image-height"], "50");
        assert_eq!(
            response.headers()["content-disposition"],
            "inline; filename=\"page.png\""
        );

        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        let img = image::load_from_memory(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (200, 50));
    }

    #[tokio::test]
    async fn test_scale_route_rejects_corrupt_image() {
        let response = app(MockProcessImageClient::new())
            .oneshot(multipart_request("/api/scale", "image", "image/png", b"not an image"))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(json_body(response).await["error"], "Error processing image");
    }

    #[tokio::test]
    async fn test_scale_route_rejects_non_image_content_type() {
        let response = app(MockProcessImageClient::new())
            .oneshot(multipart_request("/api/scale", "image", "text/plain", b"hello"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_submit_route_returns_analysis() {
        let mut client = MockProcessImageClient::new();
        client
            .expect_process_image()
            .withf(|image| image.filename == "page.png" && image.width == 200)
            .times(1)
            .returning(|_| Ok(sample_analysis()));

        let response = app(client)
            .oneshot(multipart_request("/api/submit", "image", "image/png", &png_bytes(400, 300)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = json_body(response).await;
        assert_eq!(body["vietnamese_translation"], sample_analysis().vietnamese_translation);
        assert_eq!(body["new_words"][0]["word"], "live");
    }

    #[tokio::test]
    async fn test_submit_route_without_image_field() {
        let mut client = MockProcessImageClient::new();
        client.expect_process_image().times(0);

        let response = app(client)
            .oneshot(multipart_request("/api/submit", "attachment", "image/png", &png_bytes(4, 4)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(json_body(response).await["error"], "Please select an image first");
    }

    #[tokio::test]
    async fn test_submit_route_maps_api_failure_to_bad_gateway() {
        let mut client = MockProcessImageClient::new();
        client
            .expect_process_image()
            .returning(|_| Err(InfrastructureError::ExternalApiError("No image provided".to_string())));

        let response = app(client)
            .oneshot(multipart_request("/api/submit", "image", "image/png", &png_bytes(10, 10)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
        assert_eq!(
            json_body(response).await["error"],
            "An error occurred while processing the image"
        );
    }

    #[tokio::test]
    async fn test_submit_data_url_route() {
        let mut client = MockProcessImageClient::new();
        client
            .expect_process_image()
            .withf(|image| image.filename == "scan.png" && (image.width, image.height) == (8, 6))
            .times(1)
            .returning(|_| Ok(sample_analysis()));

        let payload = serde_json::json!({
            "data_url": format!("data:image/png;base64,{}", base64::encode(png_bytes(8, 6))),
            "filename": "scan.png",
        });
        let request = Request::builder()
            .method("POST")
            .uri("/api/submit-data-url")
            .header("content-type", "application/json")
            .body(Body::from(payload.to_string()))
            .unwrap();

        let response = app(client).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["complete_passage"], sample_analysis().complete_passage);
    }

    #[tokio::test]
    async fn test_submit_data_url_route_rejects_bad_url() {
        let request = Request::builder()
            .method("POST")
            .uri("/api/submit-data-url")
            .header("content-type", "application/json")
            .body(Body::from(r#"{"data_url": "https://example.com/a.png"}"#))
            .unwrap();

        let response = app(MockProcessImageClient::new()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_upload_over_body_limit_is_rejected() {
        let response = app_with(MockProcessImageClient::new(), 1024, None)
            .oneshot(multipart_request("/api/scale", "image", "image/png", &vec![7u8; 8 * 1024]))
            .await
            .unwrap();
        assert!(response.status().is_client_error());
    }

    #[tokio::test]
    async fn test_static_fallback_serves_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>English Helper</h1>").unwrap();

        let request = Request::builder().uri("/index.html").body(Body::empty()).unwrap();
        let response = app_with(MockProcessImageClient::new(), 1024, Some(dir.path().to_path_buf()))
            .oneshot(request)
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
        assert_eq!(&bytes[..], b"<h1>English Helper</h1>");
    }

    #[test]
    fn test_header_safe_filename() {
        assert_eq!(header_safe_filename("page 1.png"), "page 1.png");
        assert_eq!(header_safe_filename("bài \"1\".png"), "b_i _1_.png");
    }

    #[test]
    fn test_accepted_media_types() {
        assert!(is_accepted_media_type("image/heic"));
        assert!(is_accepted_media_type("IMAGE/PNG"));
        assert!(is_accepted_media_type("application/octet-stream"));
        assert!(!is_accepted_media_type("text/plain"));
    }
}
