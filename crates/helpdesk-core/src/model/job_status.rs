// ── Background job status ──

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Progress of an asynchronous bulk operation (`create_many`,
/// `update_many`, `destroy_many`).
///
/// The id is an opaque token, not a number. Job statuses change on every
/// poll and are never cached.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<u64>,
    /// `queued`, `working`, `failed`, `completed` or `killed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl JobStatus {
    pub fn is_finished(&self) -> bool {
        matches!(
            self.status.as_deref(),
            Some("completed" | "failed" | "killed")
        )
    }
}
