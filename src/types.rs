//! Small shared identifier types.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier of a target, generated at creation time.
///
/// The emulated service hands out 32-character lowercase hex strings; we use
/// the simple (non-hyphenated) form of a random UUID, which matches.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TargetId(String);

impl TargetId {
    pub fn random() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TargetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for TargetId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl From<&str> for TargetId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// A fresh transaction id for a response body.
///
/// Every response carries one; the emulated service never reuses them, so a
/// random hex string per call is all that is required.
pub fn transaction_id() -> String {
    Uuid::new_v4().simple().to_string()
}
