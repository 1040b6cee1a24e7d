//! `Content-Length` header checks.
//!
//! These run before everything else, authentication included. A missing
//! header passes all three stages.

use crate::errors::{Error, Result};
use crate::validators::RequestContext;
use axum::http::header;

fn declared_length(ctx: &RequestContext<'_>) -> Option<Result<i64>> {
    let value = ctx.headers.get(header::CONTENT_LENGTH)?;
    let parsed = value
        .to_str()
        .ok()
        .and_then(|v| v.parse::<i64>().ok())
        .ok_or(Error::ContentLengthHeaderNotInt);
    Some(parsed)
}

pub fn validate_header_is_int(ctx: &RequestContext<'_>) -> Result<()> {
    match declared_length(ctx) {
        Some(Err(err)) => Err(err),
        _ => Ok(()),
    }
}

/// The header must not claim more bytes than were actually sent.
pub fn validate_header_not_too_large(ctx: &RequestContext<'_>) -> Result<()> {
    match declared_length(ctx) {
        Some(Ok(declared)) if declared > ctx.body.len() as i64 => {
            Err(Error::ContentLengthHeaderTooLarge)
        }
        _ => Ok(()),
    }
}

/// An understated header surfaces as an authentication failure. The emulated
/// service truncates the body to the declared length before verifying the
/// signature, so the signature check is what actually fails there.
pub fn validate_header_not_too_small(ctx: &RequestContext<'_>) -> Result<()> {
    match declared_length(ctx) {
        Some(Ok(declared)) if declared < ctx.body.len() as i64 => {
            Err(Error::AuthenticationFailure)
        }
        _ => Ok(()),
    }
}
