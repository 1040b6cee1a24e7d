//! Matching incoming requests to a database by their server credentials.

use crate::auth::signature::authorization_header;
use crate::database::VuforiaDatabase;
use axum::http::{header, HeaderMap};

/// Split an `Authorization` header value into access key and signature.
///
/// Returns `None` unless the value is exactly `VWS <access>:<signature>`.
fn parse_authorization(value: &str) -> Option<(&str, &str)> {
    let rest = value.strip_prefix("VWS ")?;
    rest.split_once(':')
}

/// Find the database whose server keys signed this request.
///
/// The expected header is recomputed for each database's credentials from
/// the request material and compared to the one sent. Any discrepancy,
/// missing header included, yields `None`; callers map that to the opaque
/// authentication failure.
pub fn database_matching_server_keys<'a>(
    headers: &HeaderMap,
    body: &[u8],
    method: &str,
    request_path: &str,
    databases: &'a [VuforiaDatabase],
) -> Option<&'a VuforiaDatabase> {
    let index = position_matching_server_keys(headers, body, method, request_path, databases)?;
    Some(&databases[index])
}

/// Index variant of [`database_matching_server_keys`], for callers that hold
/// a mutable collection and cannot keep a shared borrow.
pub fn position_matching_server_keys(
    headers: &HeaderMap,
    body: &[u8],
    method: &str,
    request_path: &str,
    databases: &[VuforiaDatabase],
) -> Option<usize> {
    let sent = headers.get(header::AUTHORIZATION)?.to_str().ok()?;
    let (access_key, _signature) = parse_authorization(sent)?;
    let date = headers
        .get(header::DATE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let content_type = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");

    databases.iter().position(|database| {
        if database.server_access_key != access_key {
            return false;
        }
        let expected = authorization_header(
            &database.server_access_key,
            &database.server_secret_key,
            method,
            body,
            content_type,
            date,
            request_path,
        );
        expected == sent
    })
}
