//! `Date` header checks: presence, format, clock skew.

use crate::errors::{Error, Result};
use crate::validators::RequestContext;
use axum::http::header;
use chrono::{DateTime, Duration};

/// Maximum tolerated difference between the request `Date` and server time.
const MAX_SKEW_MINUTES: i64 = 5;

pub fn validate_date_header(ctx: &RequestContext<'_>) -> Result<()> {
    let value = ctx
        .headers
        .get(header::DATE)
        .and_then(|v| v.to_str().ok())
        .ok_or(Error::Fail)?;
    let date = DateTime::parse_from_rfc2822(value).map_err(|_| Error::Fail)?;

    let skew = ctx.now.signed_duration_since(date.with_timezone(&chrono::Utc));
    if skew.abs() > Duration::minutes(MAX_SKEW_MINUTES) {
        return Err(Error::RequestTimeTooSkewed);
    }
    Ok(())
}
