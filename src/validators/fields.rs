//! Field-level checks on the parsed request body.

use crate::errors::{Error, Result};
use crate::validators::RequestContext;
use axum::http::Method;
use base64::prelude::{Engine, BASE64_STANDARD};
use serde_json::{Map, Value};

const ALLOWED_KEYS: [&str; 5] = [
    "name",
    "width",
    "image",
    "active_flag",
    "application_metadata",
];
const MANDATORY_CREATE_KEYS: [&str; 3] = ["name", "width", "image"];

/// Decoded application metadata may be at most 1 MiB.
const MAX_METADATA_BYTES: usize = 1024 * 1024;

/// Creation requires name, width and image; update requires nothing. Keys
/// outside the allowed five are rejected for both.
pub fn validate_keys(ctx: &RequestContext<'_>, object: &Map<String, Value>) -> Result<()> {
    if object.keys().any(|k| !ALLOWED_KEYS.contains(&k.as_str())) {
        return Err(Error::Fail);
    }
    if *ctx.method == Method::POST
        && MANDATORY_CREATE_KEYS
            .iter()
            .any(|k| !object.contains_key(*k))
    {
        return Err(Error::Fail);
    }
    Ok(())
}

pub fn validate_width(object: &Map<String, Value>) -> Result<()> {
    match object.get("width") {
        None => Ok(()),
        Some(value) => match value.as_f64() {
            Some(width) if width > 0.0 => Ok(()),
            _ => Err(Error::Fail),
        },
    }
}

pub fn validate_name(object: &Map<String, Value>) -> Result<()> {
    match object.get("name") {
        None => Ok(()),
        Some(value) => match value.as_str() {
            Some(name) if (1..=64).contains(&name.chars().count()) => Ok(()),
            _ => Err(Error::Fail),
        },
    }
}

pub fn validate_active_flag(object: &Map<String, Value>) -> Result<()> {
    match object.get("active_flag") {
        None => Ok(()),
        Some(Value::Bool(_)) | Some(Value::Null) => Ok(()),
        Some(_) => Err(Error::Fail),
    }
}

pub fn validate_application_metadata(object: &Map<String, Value>) -> Result<()> {
    let value = match object.get("application_metadata") {
        None => return Ok(()),
        Some(value) => value,
    };
    let encoded = value.as_str().ok_or(Error::Fail)?;
    let decoded = BASE64_STANDARD.decode(encoded).map_err(|_| Error::Fail)?;
    if decoded.len() > MAX_METADATA_BYTES {
        return Err(Error::MetadataTooLarge);
    }
    Ok(())
}
