//! Body-shape checks: bodies only where allowed, and valid JSON objects.

use crate::errors::{Error, Result};
use crate::validators::RequestContext;
use axum::http::Method;
use serde_json::{Map, Value};

/// GET and DELETE requests take no body at all.
pub fn validate_body_allowed(ctx: &RequestContext<'_>) -> Result<()> {
    if !ctx.body.is_empty() && matches!(*ctx.method, Method::GET | Method::DELETE) {
        return Err(Error::UnnecessaryRequestBody);
    }
    Ok(())
}

/// Parse the body of a POST/PUT request as a JSON object.
///
/// Returns `None` for methods without a body. Anything that is not a
/// syntactically valid JSON object, an empty body included, is a generic
/// failure.
pub fn parse_object(ctx: &RequestContext<'_>) -> Result<Option<Map<String, Value>>> {
    if !matches!(*ctx.method, Method::POST | Method::PUT) {
        return Ok(None);
    }
    let value: Value = serde_json::from_slice(ctx.body).map_err(|_| Error::Fail)?;
    match value {
        Value::Object(map) => Ok(Some(map)),
        _ => Err(Error::Fail),
    }
}
