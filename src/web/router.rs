//! Router configuration for the web layer.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post},
    Router,
};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::handlers::{
    add_file_form, delete_file, download_file, index, list_files, skip_upload, upload_file,
    upload_file_force, AppState,
};

/// Static asset mounts served from the template directory.
pub const STATIC_MOUNTS: [&str; 4] = ["css", "js", "images", "files"];

/// Create the main router.
pub fn create_router(app_state: Arc<AppState>) -> Router {
    // The size guard is the only upload limit.
    let upload_routes = Router::new()
        .route("/upload", post(upload_file).fallback(skip_upload))
        .route("/upload/f", post(upload_file_force).fallback(skip_upload))
        .layer(DefaultBodyLimit::disable());

    Router::new()
        .route("/", get(index))
        .route("/filelist", get(index))
        .route("/addfile", get(add_file_form))
        .route("/download", get(download_file))
        .route("/rmfile", get(delete_file).post(delete_file))
        .route("/api/files", get(list_files))
        .merge(upload_routes)
        .layer(ServiceBuilder::new().layer(TraceLayer::new_for_http()))
        .with_state(app_state)
}

/// Create a health check router.
pub fn create_health_router() -> Router {
    Router::new().route("/health", get(health_check))
}

/// Health check handler.
async fn health_check() -> &'static str {
    "OK"
}

/// Create the static asset router, or `None` if `template_path` is not a
/// directory.
pub fn create_static_router(template_path: &str) -> Option<Router> {
    let root = Path::new(template_path);
    if !root.is_dir() {
        return None;
    }

    let router = STATIC_MOUNTS.iter().fold(Router::new(), |router, mount| {
        router.nest_service(&format!("/{mount}"), ServeDir::new(root.join(mount)))
    });

    Some(router)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthGate;
    use crate::file::{FileStore, SizeGuard};
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tempfile::TempDir;
    use tower::ServiceExt;

    fn test_state(dir: &TempDir) -> Arc<AppState> {
        let store = FileStore::new(dir.path()).unwrap();
        Arc::new(AppState::new(store, AuthGate::new("admin"), SizeGuard::new(1024)))
    }

    #[tokio::test]
    async fn test_health_check() {
        let response = create_health_router()
            .oneshot(Request::get("/health").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"OK");
    }

    #[tokio::test]
    async fn test_get_upload_redirects_without_storing() {
        let dir = TempDir::new().unwrap();
        let router = create_router(test_state(&dir));

        let response = router
            .oneshot(Request::get("/upload").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::FOUND);
        assert_eq!(response.headers()["location"], "/");
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_static_router_requires_directory() {
        assert!(create_static_router("/nonexistent/template").is_none());

        let dir = TempDir::new().unwrap();
        assert!(create_static_router(dir.path().to_str().unwrap()).is_some());
    }

    #[tokio::test]
    async fn test_static_router_serves_assets() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("css")).unwrap();
        std::fs::write(dir.path().join("css").join("style.css"), "body{}").unwrap();

        let router = create_static_router(dir.path().to_str().unwrap()).unwrap();
        let response = router
            .oneshot(Request::get("/css/style.css").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(&body[..], b"body{}");
    }
}
