//! The state-change event delivered to live observers.

use serde::{Deserialize, Serialize};
use swapbench_core::types::DbId;
use swapbench_core::ItemState;

/// One work-item state transition, delivered best-effort to subscribers.
///
/// Ephemeral: notifications are never persisted, and subscribing after a
/// transition happened does not replay it. Consumers reconstructing
/// per-item history must index by `item_id` -- no ordering is guaranteed
/// across different items.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RunNotification {
    pub run_id: DbId,
    pub item_id: DbId,
    pub case_id: String,
    pub tool_id: String,
    pub state: ItemState,
    /// Set from the `evaluating` transition onwards.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub artifact_uri: Option<String>,
    /// Set only on the `scored` transition.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<serde_json::Value>,
}

impl RunNotification {
    /// A state-only notification (no artifact, no score yet).
    pub fn state_change(
        run_id: DbId,
        item_id: DbId,
        case_id: impl Into<String>,
        tool_id: impl Into<String>,
        state: ItemState,
    ) -> Self {
        Self {
            run_id,
            item_id,
            case_id: case_id.into(),
            tool_id: tool_id.into(),
            state,
            artifact_uri: None,
            score: None,
        }
    }

    /// Attach the artifact URI (available from `evaluating` on).
    pub fn with_artifact(mut self, uri: impl Into<String>) -> Self {
        self.artifact_uri = Some(uri.into());
        self
    }

    /// Attach the final score (available on `scored` only).
    pub fn with_score(mut self, score: serde_json::Value) -> Self {
        self.score = Some(score);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_only_event_omits_optional_fields() {
        let event =
            RunNotification::state_change(1, 10, "tc_01", "faceswap", ItemState::Generating);
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["state"], "generating");
        assert!(json.get("artifact_uri").is_none());
        assert!(json.get("score").is_none());
    }

    #[test]
    fn scored_event_carries_uri_and_score() {
        let event = RunNotification::state_change(1, 10, "tc_01", "faceswap", ItemState::Scored)
            .with_artifact("/runs/1/faceswap/tc_01.png")
            .with_score(serde_json::json!({"similarity": 0.87}));
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["artifact_uri"], "/runs/1/faceswap/tc_01.png");
        assert_eq!(json["score"]["similarity"], 0.87);
    }
}
