//! # API REST
//!
//! REST API for the file store.
//!
//! Handles:
//! - HTTP endpoints with axum
//! - OpenAPI/Swagger documentation
//! - REST-specific concerns (JSON bodies, status codes, CORS, request tracing)
//!
//! Storage logic lives in `filestore-core`; wire types and the health check in `api-shared`.

#![warn(rust_2018_idioms)]

pub mod error;

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path as AxumPath, State,
    },
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    CreateFileReq, CreateFileRes, DeleteFileRes, ErrorRes, FileEntry, HealthRes, HealthService,
    HealthState, ListFilesRes, ReadFileRes, StorageStatus,
};
use filestore_core::{CoreConfig, FileStorageService};

pub use error::{ApiError, Operation};

/// Application state shared across REST API handlers
///
/// Holds the storage and health services, both built from the same `CoreConfig`.
#[derive(Clone)]
pub struct AppState {
    storage: FileStorageService,
    health: HealthService,
}

impl AppState {
    pub fn new(cfg: Arc<CoreConfig>) -> Self {
        Self {
            storage: FileStorageService::new(cfg.clone()),
            health: HealthService::new(cfg),
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(health, list_files, create_file, read_file, delete_file),
    components(schemas(
        HealthRes,
        HealthState,
        StorageStatus,
        ListFilesRes,
        FileEntry,
        CreateFileReq,
        CreateFileRes,
        ReadFileRes,
        DeleteFileRes,
        ErrorRes,
    ))
)]
pub struct ApiDoc;

/// Builds the REST router.
///
/// Every route answers with and without a trailing slash.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/health/", get(health))
        .route("/files", get(list_files).post(create_file))
        .route("/files/", get(list_files).post(create_file))
        .route("/files/:filename", get(read_file).delete(delete_file))
        .route("/files/:filename/", get(read_file).delete(delete_file))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(
            TraceLayer::new_for_http()
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

#[utoipa::path(
    get,
    path = "/health/",
    responses(
        (status = 200, description = "Storage is usable or not yet provisioned", body = HealthRes),
        (status = 500, description = "Storage check failed", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Checks the storage root with a write/delete of a sentinel file.
///
/// # Returns
/// * `200` with the report when healthy
/// * `500` with the report (including `error`) when unhealthy
#[axum::debug_handler]
async fn health(State(state): State<AppState>) -> (StatusCode, Json<HealthRes>) {
    let res = state.health.check_health();
    let status = if res.is_healthy() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    };
    (status, Json(res))
}

#[utoipa::path(
    get,
    path = "/files/",
    responses(
        (status = 200, description = "Files under the storage root, newest first", body = ListFilesRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// List all files in the storage directory
///
/// Creates the storage directory on first use and returns an empty listing.
#[axum::debug_handler]
async fn list_files(State(state): State<AppState>) -> Result<Json<ListFilesRes>, ApiError> {
    let files = state
        .storage
        .list()
        .map_err(|e| ApiError::from_files(Operation::List, e))?;

    Ok(Json(ListFilesRes {
        files: files.into_iter().map(FileEntry::from).collect(),
    }))
}

#[utoipa::path(
    post,
    path = "/files/",
    request_body = CreateFileReq,
    responses(
        (status = 201, description = "File written", body = CreateFileRes),
        (status = 400, description = "Missing or invalid filename", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Create a new file
///
/// Writes `content` (default empty) to `filename`, replacing any existing file of that name.
///
/// # Errors
/// Returns `400 Bad Request` if the filename is missing or rejected by sanitisation, and
/// `500 Internal Server Error` if the write fails.
#[axum::debug_handler]
async fn create_file(
    State(state): State<AppState>,
    payload: Result<Json<CreateFileReq>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateFileRes>), ApiError> {
    let Json(req) = payload?;
    let content = req.content.unwrap_or_default();

    let filename = state
        .storage
        .create(req.filename.as_deref(), &content)
        .map_err(|e| ApiError::from_files(Operation::Create, e))?;

    Ok((
        StatusCode::CREATED,
        Json(CreateFileRes {
            message: format!("File \"{}\" created successfully", filename),
            filename: filename.to_string(),
        }),
    ))
}

#[utoipa::path(
    get,
    path = "/files/{filename}/",
    params(("filename" = String, Path, description = "Name of the file")),
    responses(
        (status = 200, description = "File content", body = ReadFileRes),
        (status = 400, description = "Invalid filename or binary content", body = ErrorRes),
        (status = 404, description = "File not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Get file content as UTF-8 text
#[axum::debug_handler]
async fn read_file(
    State(state): State<AppState>,
    path: Result<AxumPath<String>, PathRejection>,
) -> Result<Json<ReadFileRes>, ApiError> {
    let AxumPath(filename) = path?;

    let content = state
        .storage
        .read(&filename)
        .map_err(|e| ApiError::from_files(Operation::Read, e))?;

    Ok(Json(ReadFileRes { filename, content }))
}

#[utoipa::path(
    delete,
    path = "/files/{filename}/",
    params(("filename" = String, Path, description = "Name of the file")),
    responses(
        (status = 200, description = "File deleted", body = DeleteFileRes),
        (status = 400, description = "Invalid filename", body = ErrorRes),
        (status = 404, description = "File not found", body = ErrorRes),
        (status = 500, description = "Internal server error", body = ErrorRes)
    )
)]
/// Delete a file
#[axum::debug_handler]
async fn delete_file(
    State(state): State<AppState>,
    path: Result<AxumPath<String>, PathRejection>,
) -> Result<Json<DeleteFileRes>, ApiError> {
    let AxumPath(filename) = path?;

    let filename = state
        .storage
        .delete(&filename)
        .map_err(|e| ApiError::from_files(Operation::Delete, e))?;

    Ok(Json(DeleteFileRes {
        message: format!("File \"{}\" deleted successfully", filename),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{to_bytes, Body};
    use axum::http::{Method, Request};
    use serde_json::{json, Value};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn app_at(root: &Path) -> Router {
        let cfg = CoreConfig::new(root.to_path_buf(), "pod-a", "node-a").unwrap();
        router(AppState::new(Arc::new(cfg)))
    }

    /// Router over `<temp>/storage`, which does not exist until first use.
    fn fresh_app() -> (TempDir, PathBuf, Router) {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("storage");
        let app = app_at(&root);
        (temp, root, app)
    }

    async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = app.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, value)
    }

    #[tokio::test]
    async fn list_on_fresh_root_is_empty_and_creates_root() {
        let (_temp, root, app) = fresh_app();

        let (status, body) = send(&app, Method::GET, "/files/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "files": [] }));
        assert!(root.is_dir());
    }

    #[tokio::test]
    async fn create_then_read() {
        let (_temp, _root, app) = fresh_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/files/",
            Some(json!({ "filename": "notes.txt", "content": "hello" })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["filename"], "notes.txt");
        assert_eq!(body["message"], "File \"notes.txt\" created successfully");

        let (status, body) = send(&app, Method::GET, "/files/notes.txt/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "filename": "notes.txt", "content": "hello" }));
    }

    #[tokio::test]
    async fn create_defaults_content_to_empty() {
        let (_temp, root, app) = fresh_app();

        let (status, _) = send(&app, Method::POST, "/files", Some(json!({ "filename": "empty" }))).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(fs::read_to_string(root.join("empty")).unwrap(), "");
    }

    #[tokio::test]
    async fn create_rejects_traversal() {
        let (temp, root, app) = fresh_app();

        let (status, body) = send(
            &app,
            Method::POST,
            "/files/",
            Some(json!({ "filename": "../../etc/passwd", "content": "x" })),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Invalid filename" }));
        assert!(!root.exists());
        assert!(!temp.path().join("passwd").exists());
    }

    #[tokio::test]
    async fn create_rejects_hidden_file() {
        let (_temp, _root, app) = fresh_app();

        let (status, body) =
            send(&app, Method::POST, "/files/", Some(json!({ "filename": ".env" }))).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid filename");
    }

    #[tokio::test]
    async fn create_requires_filename() {
        let (_temp, _root, app) = fresh_app();

        let (status, body) =
            send(&app, Method::POST, "/files/", Some(json!({ "content": "orphan" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body, json!({ "error": "Filename is required" }));

        let (status, _) =
            send(&app, Method::POST, "/files/", Some(json!({ "filename": "" }))).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn malformed_body_is_json_error() {
        let (_temp, _root, app) = fresh_app();
        let request = Request::builder()
            .method(Method::POST)
            .uri("/files/")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let response = app.oneshot(request).await.unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn read_missing_is_not_found() {
        let (_temp, _root, app) = fresh_app();

        let (status, body) = send(&app, Method::GET, "/files/absent.txt/", None).await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "File \"absent.txt\" not found" }));
    }

    #[tokio::test]
    async fn read_encoded_traversal_is_rejected() {
        let (_temp, _root, app) = fresh_app();

        let (status, body) = send(&app, Method::GET, "/files/..%2F..%2Fetc%2Fpasswd/", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid filename");
    }

    #[tokio::test]
    async fn read_binary_is_bad_request() {
        let (_temp, root, app) = fresh_app();
        fs::create_dir_all(&root).unwrap();
        fs::write(root.join("blob.bin"), [0xFF, 0xFE, 0x00, 0x80]).unwrap();

        let (status, body) = send(&app, Method::GET, "/files/blob.bin/", None).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(
            body["error"],
            "File contains binary data and cannot be displayed as text"
        );
    }

    #[tokio::test]
    async fn delete_then_read_is_not_found() {
        let (_temp, root, app) = fresh_app();
        send(&app, Method::POST, "/files/", Some(json!({ "filename": "a.txt", "content": "a" }))).await;

        let (status, body) = send(&app, Method::DELETE, "/files/a.txt/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!({ "message": "File \"a.txt\" deleted successfully" }));
        assert!(!root.join("a.txt").exists());

        let (status, _) = send(&app, Method::GET, "/files/a.txt/", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (status, _) = send(&app, Method::DELETE, "/files/a.txt", None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn list_reports_created_files() {
        let (_temp, _root, app) = fresh_app();
        send(&app, Method::POST, "/files/", Some(json!({ "filename": "data.json", "content": "{}" }))).await;

        let (status, body) = send(&app, Method::GET, "/files", None).await;

        assert_eq!(status, StatusCode::OK);
        let files = body["files"].as_array().unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0]["name"], "data.json");
        assert_eq!(files[0]["size"], 2);
        assert_eq!(files[0]["mime_type"], "application/json");
        assert!(files[0]["modified"].as_str().is_some());
    }

    #[tokio::test]
    async fn storage_failure_is_server_error() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("storage");
        fs::write(&root, "not a directory").unwrap();
        let app = app_at(&root);

        let (status, body) = send(&app, Method::GET, "/files/", None).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Failed to list files: "));

        let (status, body) =
            send(&app, Method::POST, "/files/", Some(json!({ "filename": "a.txt" }))).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body["error"].as_str().unwrap().starts_with("Failed to create file: "));
    }

    #[tokio::test]
    async fn health_reports_accessible_storage() {
        let temp = TempDir::new().unwrap();
        let app = app_at(temp.path());

        let (status, body) = send(&app, Method::GET, "/health/", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage_status"], "accessible");
        assert_eq!(body["pod_name"], "pod-a");
        assert_eq!(body["node_name"], "node-a");
        assert!(body.get("error").is_none());
    }

    #[tokio::test]
    async fn health_reports_missing_storage() {
        let (_temp, _root, app) = fresh_app();

        let (status, body) = send(&app, Method::GET, "/health", None).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["storage_status"], "directory_not_found");
    }

    #[tokio::test]
    async fn health_reports_unwritable_storage() {
        let temp = TempDir::new().unwrap();
        let root = temp.path().join("storage");
        fs::write(&root, "not a directory").unwrap();
        let app = app_at(&root);

        let (status, body) = send(&app, Method::GET, "/health/", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "unhealthy");
        assert!(body["error"].as_str().is_some_and(|e| !e.is_empty()));
    }

    #[tokio::test]
    async fn health_reports_failed_write_in_existing_root() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join(api_shared::health::sentinel_filename(0))).unwrap();
        let app = app_at(temp.path());

        let (status, body) = send(&app, Method::GET, "/health/", None).await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], "unhealthy");
        assert!(body.get("storage_status").is_none());

        // The next check uses a fresh sentinel and succeeds.
        let (status, body) = send(&app, Method::GET, "/health/", None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["storage_status"], "accessible");
    }

    #[tokio::test]
    async fn openapi_document_lists_file_routes() {
        let (_temp, _root, app) = fresh_app();

        let (status, body) = send(&app, Method::GET, "/api-docs/openapi.json", None).await;

        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/files/"].is_object());
        assert!(body["paths"]["/files/{filename}/"].is_object());
        assert!(body["paths"]["/health/"].is_object());
    }
}
