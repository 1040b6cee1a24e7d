//! Targets and their lazy processing lifecycle.
//!
//! A target never has a status field that a background job flips. Instead it
//! records when it was last modified, and [`Target::effective_status`]
//! derives the current status from that timestamp on demand. Updating a
//! target resets the timestamp, so it re-enters processing.

use crate::types::TargetId;
use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;

/// The fixed recognition rating reported for every target.
pub const RECO_RATING: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetStatus {
    Processing,
    Success,
    Failed,
}

impl TargetStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            TargetStatus::Processing => "processing",
            TargetStatus::Success => "success",
            TargetStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TargetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone)]
pub struct Target {
    pub target_id: TargetId,
    pub name: String,
    pub width: f64,
    pub image: Vec<u8>,
    pub active_flag: bool,
    pub application_metadata: Option<String>,
    /// Drawn once at creation; the emulated service never recomputes it.
    pub tracking_rating: i32,
    pub upload_date: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub delete_date: Option<DateTime<Utc>>,
}

impl Target {
    pub fn new(
        name: String,
        width: f64,
        image: Vec<u8>,
        active_flag: bool,
        application_metadata: Option<String>,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            target_id: TargetId::random(),
            name,
            width,
            image,
            active_flag,
            application_metadata,
            tracking_rating: rand::thread_rng().gen_range(0..=5),
            upload_date: now,
            last_modified: now,
            delete_date: None,
        }
    }

    /// The status an observer sees at `now`: processing until the configured
    /// duration has elapsed since the last modification, then the terminal
    /// status (success unless the harness configured failure).
    pub fn effective_status(
        &self,
        now: DateTime<Utc>,
        processing_duration: Duration,
        processed_status: TargetStatus,
    ) -> TargetStatus {
        let elapsed = now.signed_duration_since(self.last_modified);
        match elapsed.to_std() {
            Ok(elapsed) if elapsed >= processing_duration => processed_status,
            _ => TargetStatus::Processing,
        }
    }

    pub fn is_deleted(&self) -> bool {
        self.delete_date.is_some()
    }

    /// Record a modification, sending the target back into processing.
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.last_modified = now;
    }
}
