//! Endpoint handlers.
//!
//! Handlers run after the validator chain, so the body is known-good JSON
//! and a database is known to match. They re-match the database under their
//! own lock acquisition; the helpers below fail closed if the registry
//! changed in between.

pub mod duplicates;
pub mod summaries;
pub mod targets;

use crate::auth::directory::position_matching_server_keys;
use crate::database::VuforiaDatabase;
use crate::errors::{Error, Result};
use axum::http::{HeaderMap, Method, StatusCode, Uri};

pub async fn health() -> StatusCode {
    StatusCode::OK
}

pub(crate) fn require_database<'a>(
    databases: &'a [VuforiaDatabase],
    headers: &HeaderMap,
    body: &[u8],
    method: &Method,
    uri: &Uri,
) -> Result<&'a VuforiaDatabase> {
    let index = require_database_index(databases, headers, body, method, uri)?;
    Ok(&databases[index])
}

pub(crate) fn require_database_index(
    databases: &[VuforiaDatabase],
    headers: &HeaderMap,
    body: &[u8],
    method: &Method,
    uri: &Uri,
) -> Result<usize> {
    position_matching_server_keys(headers, body, method.as_str(), uri.path(), databases)
        .ok_or(Error::AuthenticationFailure)
}
