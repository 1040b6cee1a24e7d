//! The HTTP layer: validation middleware, response post-processing, handlers.

pub mod handlers;
pub mod models;

use crate::auth::rfc_1123_date;
use crate::errors::Error;
use crate::validators::{run_services_validators, RequestContext};
use crate::AppState;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{header, HeaderValue, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use chrono::Utc;

/// Buffer the request and run the full validator chain before the handler.
///
/// The registry lock is held only for the validation pass; handlers acquire
/// it again themselves.
pub async fn validate_request(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return Error::Internal(anyhow::Error::new(err).context("buffering request body"))
                .into_response()
        }
    };

    {
        let databases = state.registry.read().await;
        let ctx = RequestContext {
            headers: &parts.headers,
            body: &bytes,
            method: &parts.method,
            path: parts.uri.path(),
            now: Utc::now(),
        };
        if let Err(err) = run_services_validators(&ctx, &databases) {
            return err.into_response();
        }
    }

    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

/// Decorate every outgoing response the way the emulated frontend does:
/// `Connection: keep-alive`, `Server: nginx`, a fresh `Date`, and a JSON
/// content type for non-empty bodies outside the internal-error path.
///
/// Responses that already carry a `Connection` header (the two abrupt
/// Content-Length rejections) pass through untouched.
pub async fn finalize_response(request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    if response.headers().contains_key(header::CONNECTION) {
        return response;
    }

    let (mut parts, body) = response.into_parts();
    let bytes = match to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(err) => {
            return Error::Internal(anyhow::Error::new(err).context("buffering response body"))
                .into_response()
        }
    };

    parts
        .headers
        .insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    parts
        .headers
        .insert(header::SERVER, HeaderValue::from_static("nginx"));
    if let Ok(date) = HeaderValue::from_str(&rfc_1123_date()) {
        parts.headers.insert(header::DATE, date);
    }
    if bytes.is_empty() {
        parts.headers.remove(header::CONTENT_TYPE);
    } else if parts.status != StatusCode::INTERNAL_SERVER_ERROR {
        parts.headers.insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
    }

    Response::from_parts(parts, Body::from(bytes))
}
