//! Databases: named credential sets owning a collection of targets.

use crate::target::{Target, TargetStatus};
use crate::types::TargetId;
use bon::Builder;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::time::Duration;

/// Whether a database accepts mutating requests.
///
/// Suspended projects behave exactly like inactive ones on this API surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatabaseState {
    Working,
    Inactive,
    Suspended,
}

impl DatabaseState {
    pub fn accepts_requests(self) -> bool {
        matches!(self, DatabaseState::Working)
    }
}

#[derive(Debug, Clone, Builder)]
#[builder(on(String, into))]
pub struct VuforiaDatabase {
    pub database_name: String,
    pub server_access_key: String,
    pub server_secret_key: String,
    /// Client keys are part of the credential model even though the query
    /// endpoint that uses them is not served here.
    pub client_access_key: String,
    pub client_secret_key: String,
    #[builder(default = DatabaseState::Working)]
    pub state: DatabaseState,
    #[builder(default = 1000)]
    pub target_quota: u64,
    #[builder(default = 100_000)]
    pub request_quota: u64,
    #[builder(default = 1000)]
    pub reco_threshold: u64,
    /// Recognition counters are display-only here; the endpoints that would
    /// advance them belong to the query surface, which is not served.
    #[builder(default)]
    pub total_recos: u64,
    #[builder(default)]
    pub current_month_recos: u64,
    #[builder(default)]
    pub previous_month_recos: u64,
    #[builder(default)]
    pub targets: Vec<Target>,
}

impl VuforiaDatabase {
    /// Targets that have not been soft-deleted. Deleted targets are invisible
    /// on every endpoint.
    pub fn not_deleted_targets(&self) -> impl Iterator<Item = &Target> {
        self.targets.iter().filter(|t| !t.is_deleted())
    }

    pub fn find_target(&self, target_id: &TargetId) -> Option<&Target> {
        self.not_deleted_targets().find(|t| &t.target_id == target_id)
    }

    pub fn find_target_mut(&mut self, target_id: &TargetId) -> Option<&mut Target> {
        self.targets
            .iter_mut()
            .filter(|t| !t.is_deleted())
            .find(|t| &t.target_id == target_id)
    }

    /// Count not-deleted targets whose effective status and active flag match
    /// the given summary bucket.
    fn count_where(
        &self,
        now: DateTime<Utc>,
        processing_duration: Duration,
        processed_status: TargetStatus,
        predicate: impl Fn(TargetStatus, bool) -> bool,
    ) -> u64 {
        self.not_deleted_targets()
            .filter(|t| {
                predicate(
                    t.effective_status(now, processing_duration, processed_status),
                    t.active_flag,
                )
            })
            .count() as u64
    }

    pub fn active_count(
        &self,
        now: DateTime<Utc>,
        processing_duration: Duration,
        processed_status: TargetStatus,
    ) -> u64 {
        self.count_where(now, processing_duration, processed_status, |status, active| {
            status == TargetStatus::Success && active
        })
    }

    pub fn inactive_count(
        &self,
        now: DateTime<Utc>,
        processing_duration: Duration,
        processed_status: TargetStatus,
    ) -> u64 {
        self.count_where(now, processing_duration, processed_status, |status, active| {
            status == TargetStatus::Success && !active
        })
    }

    pub fn failed_count(
        &self,
        now: DateTime<Utc>,
        processing_duration: Duration,
        processed_status: TargetStatus,
    ) -> u64 {
        self.count_where(now, processing_duration, processed_status, |status, _| {
            status == TargetStatus::Failed
        })
    }

    pub fn processing_count(
        &self,
        now: DateTime<Utc>,
        processing_duration: Duration,
        processed_status: TargetStatus,
    ) -> u64 {
        self.count_where(now, processing_duration, processed_status, |status, _| {
            status == TargetStatus::Processing
        })
    }
}
