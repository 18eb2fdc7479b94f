//! File handlers for the web layer.

use axum::{
    body::Body,
    extract::{Multipart, Query, State},
    http::{header, HeaderName, HeaderValue},
    response::{IntoResponse, Response},
};
use axum_extra::extract::cookie::CookieJar;
use std::sync::Arc;
use tokio_util::io::ReaderStream;

use crate::file::{CollisionPolicy, DeleteOutcome, FileService, Upload};
use crate::web::error::{found, WebError, LISTING_PATH};
use crate::web::handlers::{AppState, FileQuery};
use crate::web::middleware::Session;
use crate::GodwError;

/// Multipart field carrying the upload.
pub const UPLOAD_FIELD: &str = "file";

/// Response header carrying the stored name when it differs from the
/// requested one (percent-encoded).
pub const STORED_NAME_HEADER: HeaderName = HeaderName::from_static("x-godw-stored-name");

/// `Content-Disposition: attachment` value for a stored file name.
///
/// Names that are plain quotable ASCII are sent as-is. Anything else gets
/// an ASCII fallback in `filename` (control characters dropped, quotes,
/// backslashes and non-ASCII replaced by `_`) plus the exact name in the
/// RFC 5987 `filename*` parameter.
fn content_disposition_header(filename: &str) -> String {
    let quotable = |c: char| c.is_ascii() && !c.is_ascii_control() && c != '"' && c != '\\';

    if filename.chars().all(quotable) {
        return format!("attachment; filename=\"{filename}\"");
    }

    let fallback: String = filename
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| if quotable(c) { c } else { '_' })
        .collect();

    format!(
        "attachment; filename=\"{fallback}\"; filename*=UTF-8''{}",
        urlencoding::encode(filename)
    )
}

/// POST /upload - Store an upload, suffixing the name on collision.
///
/// Request body: multipart/form-data with a "file" field.
pub async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, WebError> {
    store_upload(&state, multipart, CollisionPolicy::AutoSuffix).await
}

/// POST /upload/f - Store an upload, replacing any file of the same name.
pub async fn upload_file_force(
    State(state): State<Arc<AppState>>,
    multipart: Multipart,
) -> Result<Response, WebError> {
    store_upload(&state, multipart, CollisionPolicy::Overwrite).await
}

/// Any other verb on the upload routes: redirect without storing anything.
pub async fn skip_upload() -> Response {
    found(LISTING_PATH)
}

async fn store_upload(
    state: &AppState,
    mut multipart: Multipart,
    policy: CollisionPolicy,
) -> Result<Response, WebError> {
    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::warn!(error = %e, "failed to read multipart field");
        WebError::bad_request("Invalid multipart data")
    })? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let name = field.file_name().unwrap_or_default().to_string();
        let declared_size = field
            .headers()
            .get(header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.trim().parse::<u64>().ok());

        let upload = Upload::new(name, field).with_declared_size(declared_size);
        let stored = FileService::new(&state.store, state.guard)
            .upload(upload, policy)
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "upload rejected");
                WebError::from(e)
            })?;

        let mut response = found(LISTING_PATH);
        if stored.renamed() {
            let encoded = urlencoding::encode(&stored.name);
            if let Ok(value) = HeaderValue::from_str(&encoded) {
                response.headers_mut().insert(STORED_NAME_HEADER, value);
            }
        }
        return Ok(response);
    }

    Err(WebError::bad_request("No file provided"))
}

/// GET /download?f=name - Stream a stored file.
pub async fn download_file(
    State(state): State<Arc<AppState>>,
    Query(query): Query<FileQuery>,
) -> Result<Response, WebError> {
    let name = query.f.trim();
    let download = state.store.open(name).await?;

    tracing::debug!(name, size = download.len, "streaming download");

    // The handle is released when the body stream is dropped, including
    // when the client disconnects mid-transfer.
    let body = Body::from_stream(ReaderStream::new(download.file));

    Response::builder()
        .header(header::CONTENT_TYPE, "application/octet-stream")
        .header(header::CONTENT_DISPOSITION, content_disposition_header(name))
        .header(header::CONTENT_LENGTH, download.len)
        .body(body)
        .map_err(|e| {
            tracing::error!(error = %e, "failed to build response");
            WebError::internal("Failed to build response")
        })
}

/// GET|POST /rmfile?f=name - Delete a file, admin only.
///
/// Every outcome redirects to the listing; removal failures are logged.
pub async fn delete_file(
    State(state): State<Arc<AppState>>,
    Session(access): Session,
    jar: CookieJar,
    Query(query): Query<FileQuery>,
) -> Result<Response, WebError> {
    if !access.capability.is_admin() {
        return Err(GodwError::Unauthorized(format!("delete [{}]", query.f.trim())).into());
    }

    let service = FileService::new(&state.store, state.guard);
    match service.delete(&query.f).await {
        Ok(DeleteOutcome::Removed) => {}
        Ok(DeleteOutcome::Skipped) => {
            tracing::debug!(name = query.f.trim(), "nothing to delete");
        }
        Err(e) => {
            tracing::warn!(name = query.f.trim(), error = %e, "failed to delete file");
        }
    }

    Ok((access.apply(jar), found(LISTING_PATH)).into_response())
}
