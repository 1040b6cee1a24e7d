//! Target CRUD endpoints.

use super::{require_database, require_database_index};
use crate::api::models::targets::{
    AddTargetRequest, AddTargetResponse, DeleteTargetResponse, GetTargetResponse,
    ListTargetsResponse, TargetRecord, UpdateTargetRequest, UpdateTargetResponse,
};
use crate::errors::{Error, Result, ResultCode};
use crate::target::{Target, TargetStatus, RECO_RATING};
use crate::types::{transaction_id, TargetId};
use crate::AppState;
use axum::{
    extract::{Path, State},
    http::{HeaderMap, Method, StatusCode, Uri},
    Json,
};
use base64::prelude::{Engine, BASE64_STANDARD};
use bytes::Bytes;
use chrono::Utc;

/// `POST /targets`
pub async fn add_target(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<(StatusCode, Json<AddTargetResponse>)> {
    let now = Utc::now();
    let mut databases = state.registry.write().await;
    let index = require_database_index(&databases, &headers, &body, &method, &uri)?;

    let request: AddTargetRequest = serde_json::from_slice(&body).map_err(|_| Error::Fail)?;
    // The validator chain checked uniqueness under an earlier read guard; a
    // concurrent add may have taken the name since. Re-check under the write
    // guard that covers the insert.
    if databases[index]
        .not_deleted_targets()
        .any(|t| t.name == request.name)
    {
        return Err(Error::TargetNameExist);
    }
    let image = BASE64_STANDARD.decode(&request.image).map_err(|_| Error::Fail)?;
    let target = Target::new(
        request.name,
        request.width,
        image,
        request.active_flag.unwrap_or(true),
        request.application_metadata,
        now,
    );
    let target_id = target.target_id.clone();
    tracing::debug!(%target_id, database_name = %databases[index].database_name, "Adding target");
    databases[index].targets.push(target);

    let response = AddTargetResponse {
        transaction_id: transaction_id(),
        result_code: ResultCode::TargetCreated,
        target_id,
    };
    Ok((StatusCode::CREATED, Json(response)))
}

/// `GET /targets/{target_id}`
pub async fn get_target(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<GetTargetResponse>> {
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
    let response = GetTargetResponse {
        result_code: ResultCode::Success,
        transaction_id: transaction_id(),
        target_record: TargetRecord {
            target_id: target.target_id.clone(),
            active_flag: target.active_flag,
            name: target.name.clone(),
            width: target.width,
            tracking_rating: target.tracking_rating,
            reco_rating: RECO_RATING,
        },
        status: status.as_str(),
    };
    Ok(Json(response))
}

/// `GET /targets`
pub async fn target_list(
    State(state): State<AppState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<ListTargetsResponse>> {
    let databases = state.registry.read().await;
    let database = require_database(&databases, &headers, &body, &method, &uri)?;
    let results = database
        .not_deleted_targets()
        .map(|t| t.target_id.clone())
        .collect();
    let response = ListTargetsResponse {
        transaction_id: transaction_id(),
        result_code: ResultCode::Success,
        results,
    };
    Ok(Json(response))
}

/// `DELETE /targets/{target_id}`
pub async fn delete_target(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<DeleteTargetResponse>> {
    let now = Utc::now();
    let mut databases = state.registry.write().await;
    let index = require_database_index(&databases, &headers, &body, &method, &uri)?;
    let target = databases[index]
        .find_target_mut(&TargetId::from(target_id))
        .ok_or(Error::UnknownTarget)?;

    let status = target.effective_status(
        now,
        state.config.processing_duration,
        state.config.processed_target_status,
    );
    if status == TargetStatus::Processing {
        return Err(Error::TargetStatusProcessing);
    }
    tracing::debug!(target_id = %target.target_id, "Deleting target");
    target.delete_date = Some(now);

    let response = DeleteTargetResponse {
        transaction_id: transaction_id(),
        result_code: ResultCode::Success,
    };
    Ok(Json(response))
}

/// `PUT /targets/{target_id}`
pub async fn update_target(
    State(state): State<AppState>,
    Path(target_id): Path<String>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<UpdateTargetResponse>> {
    let now = Utc::now();
    let mut databases = state.registry.write().await;
    let index = require_database_index(&databases, &headers, &body, &method, &uri)?;
    let database = &mut databases[index];
    let target_key = TargetId::from(target_id.as_str());

    let status = database
        .find_target(&target_key)
        .ok_or(Error::UnknownTarget)?
        .effective_status(
            now,
            state.config.processing_duration,
            state.config.processed_target_status,
        );
    if status != TargetStatus::Success {
        return Err(Error::TargetStatusNotSuccess);
    }

    let request: UpdateTargetRequest = serde_json::from_slice(&body).map_err(|_| Error::Fail)?;
    // An explicit null is distinguishable from an absent key and rejected.
    let active_flag = match request.active_flag {
        None => None,
        Some(None) => return Err(Error::Fail),
        Some(Some(flag)) => Some(flag),
    };
    let application_metadata = match request.application_metadata {
        None => None,
        Some(None) => return Err(Error::Fail),
        Some(Some(metadata)) => Some(metadata),
    };
    // Uniqueness was checked under an earlier read guard; re-check under the
    // write guard that covers the rename.
    if let Some(name) = &request.name {
        let clash = database
            .not_deleted_targets()
            .any(|t| t.name == *name && t.target_id.as_str() != target_id);
        if clash {
            return Err(Error::TargetNameExist);
        }
    }

    let target = database
        .find_target_mut(&target_key)
        .ok_or(Error::UnknownTarget)?;
    if let Some(name) = request.name {
        target.name = name;
    }
    if let Some(width) = request.width {
        target.width = width;
    }
    if let Some(image) = request.image {
        target.image = BASE64_STANDARD.decode(&image).map_err(|_| Error::Fail)?;
    }
    if let Some(flag) = active_flag {
        target.active_flag = flag;
    }
    if let Some(metadata) = application_metadata {
        target.application_metadata = Some(metadata);
    }
    // The update sends the target back through processing.
    target.touch(now);
    tracing::debug!(target_id = %target.target_id, "Updated target");

    let response = UpdateTargetResponse {
        result_code: ResultCode::Success,
        transaction_id: transaction_id(),
    };
    Ok(Json(response))
}
