//! Request and response bodies for the target management endpoints.
//!
//! Clients of the emulated service compare bodies byte for byte, so key
//! order matters. serde emits object keys in declaration order; the field
//! order of every struct here is part of the wire contract. Do not reorder.

use crate::errors::ResultCode;
use crate::types::TargetId;
use serde::{Deserialize, Serialize};

/// Body of `POST /targets`, after the validator chain has vetted it.
#[derive(Debug, Deserialize)]
pub struct AddTargetRequest {
    pub name: String,
    pub width: f64,
    pub image: String,
    pub active_flag: Option<bool>,
    pub application_metadata: Option<String>,
}

/// Body of `PUT /targets/{id}`. All fields optional; serde distinguishes an
/// absent key from an explicit `null` via the double option.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTargetRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub width: Option<f64>,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub active_flag: Option<Option<bool>>,
    #[serde(default, deserialize_with = "deserialize_some")]
    pub application_metadata: Option<Option<String>>,
}

/// Wrap a present value (even `null`) in `Some`, so absent and null keys are
/// distinguishable.
fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: serde::Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct AddTargetResponse {
    pub transaction_id: String,
    pub result_code: ResultCode,
    pub target_id: TargetId,
}

#[derive(Debug, Serialize)]
pub struct TargetRecord {
    pub target_id: TargetId,
    pub active_flag: bool,
    pub name: String,
    pub width: f64,
    pub tracking_rating: i32,
    pub reco_rating: i32,
}

#[derive(Debug, Serialize)]
pub struct GetTargetResponse {
    pub result_code: ResultCode,
    pub transaction_id: String,
    pub target_record: TargetRecord,
    pub status: &'static str,
}

/// Shared by delete (transaction_id first) per the emulated service.
#[derive(Debug, Serialize)]
pub struct DeleteTargetResponse {
    pub transaction_id: String,
    pub result_code: ResultCode,
}

#[derive(Debug, Serialize)]
pub struct UpdateTargetResponse {
    pub result_code: ResultCode,
    pub transaction_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListTargetsResponse {
    pub transaction_id: String,
    pub result_code: ResultCode,
    pub results: Vec<TargetId>,
}

#[derive(Debug, Serialize)]
pub struct DuplicatesResponse {
    pub transaction_id: String,
    pub result_code: ResultCode,
    pub similar_targets: Vec<TargetId>,
}

#[derive(Debug, Serialize)]
pub struct DatabaseSummaryResponse {
    pub result_code: ResultCode,
    pub transaction_id: String,
    pub name: String,
    pub active_images: u64,
    pub inactive_images: u64,
    pub failed_images: u64,
    pub target_quota: u64,
    pub total_recos: u64,
    pub current_month_recos: u64,
    pub previous_month_recos: u64,
    pub processing_images: u64,
    pub reco_threshold: u64,
    pub request_quota: u64,
    pub request_usage: u64,
}

#[derive(Debug, Serialize)]
pub struct TargetSummaryResponse {
    pub status: &'static str,
    pub transaction_id: String,
    pub result_code: ResultCode,
    pub database_name: String,
    pub target_name: String,
    pub upload_date: String,
    pub active_flag: bool,
    pub tracking_rating: i32,
    pub total_recos: u64,
    pub current_month_recos: u64,
    pub previous_month_recos: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::transaction_id;

    #[test]
    fn add_response_key_order_is_fixed() {
        let response = AddTargetResponse {
            transaction_id: "t".to_string(),
            result_code: ResultCode::TargetCreated,
            target_id: TargetId::from("abc"),
        };
        assert_eq!(
            serde_json::to_string(&response).unwrap(),
            r#"{"transaction_id":"t","result_code":"TargetCreated","target_id":"abc"}"#
        );
    }

    #[test]
    fn update_and_delete_key_orders_differ() {
        let update = UpdateTargetResponse {
            result_code: ResultCode::Success,
            transaction_id: "t".to_string(),
        };
        assert!(serde_json::to_string(&update)
            .unwrap()
            .starts_with(r#"{"result_code""#));

        let delete = DeleteTargetResponse {
            transaction_id: "t".to_string(),
            result_code: ResultCode::Success,
        };
        assert!(serde_json::to_string(&delete)
            .unwrap()
            .starts_with(r#"{"transaction_id""#));
    }

    #[test]
    fn update_request_distinguishes_null_from_absent() {
        let absent: UpdateTargetRequest = serde_json::from_str("{}").unwrap();
        assert!(absent.active_flag.is_none());
        assert!(absent.application_metadata.is_none());

        let null: UpdateTargetRequest =
            serde_json::from_str(r#"{"active_flag":null,"application_metadata":null}"#).unwrap();
        assert_eq!(null.active_flag, Some(None));
        assert_eq!(null.application_metadata, Some(None));

        let set: UpdateTargetRequest = serde_json::from_str(r#"{"active_flag":false}"#).unwrap();
        assert_eq!(set.active_flag, Some(Some(false)));
    }

    #[test]
    fn transaction_ids_serialize_transparently() {
        let response = ListTargetsResponse {
            transaction_id: transaction_id(),
            result_code: ResultCode::Success,
            results: vec![TargetId::from("a"), TargetId::from("b")],
        };
        let text = serde_json::to_string(&response).unwrap();
        assert!(text.ends_with(r#""results":["a","b"]}"#));
    }
}
