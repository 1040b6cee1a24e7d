//! Database and target summary endpoints.

use super::require_database;
use crate::api::models::targets::{DatabaseSummaryResponse, TargetSummaryResponse};
use crate::errors::{Error, Result, ResultCode};
use crate::types::{transaction_id, TargetId};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, Uri},
    Json,
};
use bytes::Bytes;
use chrono::Utc;

/// `GET /summary`
///
/// Counts are derived from effective statuses at request time, so a target
/// crossing its processing window moves buckets without any write.
pub async fn database_summary(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DatabaseSummaryResponse>> {
    let now = Utc::now();
    let databases = state.registry.read().await;
    let database = require_database(&databases, &headers, &body, &method, &uri)?;

    let duration = state.config.processing_duration;
    let processed = state.config.processed_target_status;
    let response = DatabaseSummaryResponse {
        result_code: ResultCode::Success,
        transaction_id: transaction_id(),
        name: database.database_name.clone(),
        active_images: database.active_count(now, duration, processed),
        inactive_images: database.inactive_count(now, duration, processed),
        failed_images: database.failed_count(now, duration, processed),
        target_quota: database.target_quota,
        total_recos: database.total_recos,
        current_month_recos: database.current_month_recos,
        previous_month_recos: database.previous_month_recos,
        processing_images: database.processing_count(now, duration, processed),
        reco_threshold: database.reco_threshold,
        request_quota: database.request_quota,
        // The emulated service reports zero here no matter how many requests
        // were made.
        request_usage: 0,
    };
    Ok(Json(response))
}

/// `GET /summary/{target_id}`
pub async fn target_summary(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<TargetSummaryResponse>> {
    let now = Utc::now();
    let databases = state.registry.read().await;
    let database = require_database(&databases, &headers, &body, &method, &uri)?;
    let target = database
        .find_target(&TargetId::from(target_id))
        .ok_or(Error::UnknownTarget)?;

    let status = target.effective_status(
        now,
        state.config.processing_duration,
        state.config.processed_target_status,
    );
    let response = TargetSummaryResponse {
        status: status.as_str(),
        transaction_id: transaction_id(),
        result_code: ResultCode::Success,
        database_name: database.database_name.clone(),
        target_name: target.name.clone(),
        upload_date: target.upload_date.format("%Y-%m-%d").to_string(),
        active_flag: target.active_flag,
        tracking_rating: target.tracking_rating,
        total_recos: 0,
        current_month_recos: 0,
        previous_month_recos: 0,
    };
    Ok(Json(response))
}
