//! Duplicate detection.
//!
//! The emulated service calls two targets duplicates when their images are
//! pixel-identical, not perceptually similar. Comparing canonical pixels
//! rather than raw bytes means a PNG and a lossless re-encode of the same
//! image still match, while metadata differences in the container do not
//! break equality.

use super::require_database;
use crate::api::models::targets::DuplicatesResponse;
use crate::database::VuforiaDatabase;
use crate::errors::{Error, Result, ResultCode};
use crate::target::{Target, TargetStatus};
use crate::types::{transaction_id, TargetId};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, Uri},
    Json,
};
use bytes::Bytes;
use chrono::Utc;
use std::time::Duration;

/// Decode to RGBA and return dimensions plus raw pixels. Undecodable stored
/// images simply never match anything.
fn canonical_pixels(image_bytes: &[u8]) -> Option<(u32, u32, Vec<u8>)> {
    let decoded = image::load_from_memory(image_bytes).ok()?;
    let rgba = decoded.to_rgba8();
    Some((rgba.width(), rgba.height(), rgba.into_raw()))
}

fn find_duplicates(
    target: &Target,
    database: &VuforiaDatabase,
    now: chrono::DateTime<Utc>,
    processing_duration: Duration,
    processed_status: TargetStatus,
) -> Vec<TargetId> {
    let own_pixels = canonical_pixels(&target.image);
    let own_status = target.effective_status(now, processing_duration, processed_status);
    if own_pixels.is_none() || own_status == TargetStatus::Failed {
        return Vec::new();
    }

    database
        .not_deleted_targets()
        .filter(|candidate| candidate.target_id != target.target_id)
        .filter(|candidate| candidate.active_flag)
        .filter(|candidate| {
            let status = candidate.effective_status(now, processing_duration, processed_status);
            status != TargetStatus::Processing && status != TargetStatus::Failed
        })
        .filter(|candidate| canonical_pixels(&candidate.image) == own_pixels)
        .map(|candidate| candidate.target_id.clone())
        .collect()
}

/// `GET /duplicates/{target_id}`
pub async fn duplicates(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DuplicatesResponse>> {
    let now = Utc::now();
    let databases = state.registry.read().await;
    let database = require_database(&databases, &headers, &body, &method, &uri)?;
    let target = database
        .find_target(&TargetId::from(target_id))
        .ok_or(Error::UnknownTarget)?;

    let similar_targets = find_duplicates(
        target,
        database,
        now,
        state.config.processing_duration,
        state.config.processed_target_status,
    );
    let response = DuplicatesResponse {
        transaction_id: transaction_id(),
        result_code: ResultCode::Success,
        similar_targets,
    };
    Ok(Json(response))
}
