//! Listing handlers.

use axum::{
    extract::{Query, State},
    response::Html,
    Json,
};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::file::StoredFile;
use crate::web::error::WebError;
use crate::web::handlers::AppState;
use crate::web::middleware::Session;
use crate::web::view::{render_listing, render_upload_form, ListingView};
use crate::GodwError;

/// Query parameter naming a file, or a filter substring on the listing.
#[derive(Debug, Default, Deserialize)]
pub struct FileQuery {
    /// File name or filter.
    #[serde(default)]
    pub f: String,
}

/// JSON listing body.
#[derive(Debug, Serialize)]
pub struct ListingResponse {
    /// Whether the caller has admin capability.
    pub admin: bool,
    /// Files in the store.
    pub files: Vec<StoredFile>,
}

/// GET / - HTML listing.
///
/// A query key equal to the admin identity issues the session cookie.
pub async fn index(
    State(state): State<Arc<AppState>>,
    Session(access): Session,
    jar: CookieJar,
    Query(query): Query<FileQuery>,
) -> Result<(CookieJar, Html<String>), WebError> {
    let files = state.catalog.list(Some(&query.f)).await?;

    let html = render_listing(&ListingView {
        files: &files,
        admin: access.capability.is_admin(),
        filter: query.f.trim(),
        timezone: &state.timezone,
    });

    Ok((access.apply(jar), Html(html)))
}

/// GET /api/files - JSON listing.
pub async fn list_files(
    State(state): State<Arc<AppState>>,
    Session(access): Session,
    jar: CookieJar,
    Query(query): Query<FileQuery>,
) -> Result<(CookieJar, Json<ListingResponse>), WebError> {
    let files = state.catalog.list(Some(&query.f)).await?;

    Ok((
        access.apply(jar),
        Json(ListingResponse {
            admin: access.capability.is_admin(),
            files,
        }),
    ))
}

/// GET /addfile - Upload form, admin only.
pub async fn add_file_form(
    Session(access): Session,
    jar: CookieJar,
) -> Result<(CookieJar, Html<String>), WebError> {
    if !access.capability.is_admin() {
        return Err(GodwError::Unauthorized("upload form".to_string()).into());
    }

    Ok((access.apply(jar), Html(render_upload_form())))
}
