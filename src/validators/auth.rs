//! Authentication stage: match the request to a database by signature.

use crate::auth::database_matching_server_keys;
use crate::database::VuforiaDatabase;
use crate::errors::{Error, Result};
use crate::validators::RequestContext;

/// Verify the `Authorization` header against every database's server keys.
///
/// All failure modes collapse into the same opaque error so callers cannot
/// probe which part of the header was wrong.
pub fn validate_authorization<'a>(
    ctx: &RequestContext<'_>,
    databases: &'a [VuforiaDatabase],
) -> Result<&'a VuforiaDatabase> {
    database_matching_server_keys(
        ctx.headers,
        ctx.body,
        ctx.method.as_str(),
        ctx.path,
        databases,
    )
    .ok_or(Error::AuthenticationFailure)
}
