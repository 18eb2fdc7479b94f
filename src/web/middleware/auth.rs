//! Session capability extractor.

use axum::{
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use axum_extra::extract::cookie::CookieJar;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;

use crate::auth::Access;
use crate::web::handlers::AppState;

/// Extractor evaluating the request's session against the [`crate::auth::AuthGate`].
///
/// Never rejects: requests without credentials are simply `Guest`.
#[derive(Debug, Clone)]
pub struct Session(pub Access);

impl FromRequestParts<Arc<AppState>> for Session {
    type Rejection = Infallible;

    fn from_request_parts<'life0, 'life1, 'async_trait>(
        parts: &'life0 mut Parts,
        state: &'life1 Arc<AppState>,
    ) -> std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self, Self::Rejection>> + Send + 'async_trait>,
    >
    where
        'life0: 'async_trait,
        'life1: 'async_trait,
        Self: 'async_trait,
    {
        Box::pin(async move {
            let jar = CookieJar::from_headers(&parts.headers);
            let query = Query::<HashMap<String, String>>::try_from_uri(&parts.uri)
                .map(|Query(q)| q)
                .unwrap_or_default();

            Ok(Session(state.gate.evaluate(&jar, &query)))
        })
    }
}
