//! The ordered request-validation chain.
//!
//! Every request to the target management surface runs through
//! [`run_services_validators`] before its handler executes. The order of the
//! stages is part of the emulated contract: a request failing several checks
//! at once must report the error of the earliest stage.

pub mod auth;
pub mod content_length;
pub mod date;
pub mod fields;
pub mod image;
pub mod json;
pub mod target;

use crate::database::VuforiaDatabase;
use crate::errors::Result;
use axum::http::{HeaderMap, Method};
use chrono::{DateTime, Utc};

/// Everything a validator may look at, borrowed from the buffered request.
pub struct RequestContext<'a> {
    pub headers: &'a HeaderMap,
    pub body: &'a [u8],
    pub method: &'a Method,
    pub path: &'a str,
    pub now: DateTime<Utc>,
}

impl RequestContext<'_> {
    /// The target id segment of the request path, if the path has one
    /// (`/targets/{id}`, `/summary/{id}`, `/duplicates/{id}`).
    pub fn path_target_id(&self) -> Option<&str> {
        let mut segments = self.path.trim_start_matches('/').splitn(3, '/');
        let first = segments.next()?;
        let second = segments.next()?;
        if segments.next().is_some() || second.is_empty() {
            return None;
        }
        matches!(first, "targets" | "summary" | "duplicates").then_some(second)
    }
}

/// Run the full chain. Returns on the first failing stage.
pub fn run_services_validators(
    ctx: &RequestContext<'_>,
    databases: &[VuforiaDatabase],
) -> Result<()> {
    content_length::validate_header_is_int(ctx)?;
    content_length::validate_header_not_too_large(ctx)?;
    content_length::validate_header_not_too_small(ctx)?;

    let database = auth::validate_authorization(ctx, databases)?;

    date::validate_date_header(ctx)?;

    json::validate_body_allowed(ctx)?;
    let body_json = json::parse_object(ctx)?;
    if let Some(object) = &body_json {
        fields::validate_keys(ctx, object)?;
        fields::validate_width(object)?;
        fields::validate_name(object)?;
        fields::validate_active_flag(object)?;
        image::validate_image(object)?;
        fields::validate_application_metadata(object)?;
    }

    target::validate_target_id_exists(ctx, database)?;
    target::validate_project_state(ctx, database)?;
    target::validate_name_not_taken(ctx, body_json.as_ref(), database)?;

    Ok(())
}
