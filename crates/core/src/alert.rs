//! Alert and alert-response state machines.
//!
//! Statuses are persisted as TEXT; these enums are the single source of
//! truth for the legal values and the legal transitions between them.

use serde::{Deserialize, Serialize};

/// Kind of emergency report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertType {
    Distress,
    Text,
    Voice,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Distress => "distress",
            AlertType::Text => "text",
            AlertType::Voice => "voice",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "distress" => Some(AlertType::Distress),
            "text" => Some(AlertType::Text),
            "voice" => Some(AlertType::Voice),
            _ => None,
        }
    }
}

/// Lifecycle status of an alert.
///
/// Status only ever advances `pending -> responded -> resolved`; there is
/// no regression and no other path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AlertStatus {
    Pending,
    Responded,
    Resolved,
}

impl AlertStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertStatus::Pending => "pending",
            AlertStatus::Responded => "responded",
            AlertStatus::Resolved => "resolved",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(AlertStatus::Pending),
            "responded" => Some(AlertStatus::Responded),
            "resolved" => Some(AlertStatus::Resolved),
            _ => None,
        }
    }

    /// Whether the state machine permits moving from `self` to `next`.
    pub fn can_transition_to(&self, next: AlertStatus) -> bool {
        matches!(
            (self, next),
            (AlertStatus::Pending, AlertStatus::Responded)
                | (AlertStatus::Responded, AlertStatus::Resolved)
        )
    }
}

/// Sub-status of an officer's response to an alert.
///
/// At most one response per alert may exist with a sub-status other than
/// `cancelled`; the claim protocol enforces this.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseStatus {
    EnRoute,
    Arrived,
    Resolved,
    Cancelled,
}

impl ResponseStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResponseStatus::EnRoute => "en_route",
            ResponseStatus::Arrived => "arrived",
            ResponseStatus::Resolved => "resolved",
            ResponseStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "en_route" => Some(ResponseStatus::EnRoute),
            "arrived" => Some(ResponseStatus::Arrived),
            "resolved" => Some(ResponseStatus::Resolved),
            "cancelled" => Some(ResponseStatus::Cancelled),
            _ => None,
        }
    }
}

/// Transcription progress for voice alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptionStatus {
    None,
    Pending,
    Completed,
    Failed,
}

impl TranscriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TranscriptionStatus::None => "none",
            TranscriptionStatus::Pending => "pending",
            TranscriptionStatus::Completed => "completed",
            TranscriptionStatus::Failed => "failed",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "none" => Some(TranscriptionStatus::None),
            "pending" => Some(TranscriptionStatus::Pending),
            "completed" => Some(TranscriptionStatus::Completed),
            "failed" => Some(TranscriptionStatus::Failed),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alert_status_only_advances_forward() {
        assert!(AlertStatus::Pending.can_transition_to(AlertStatus::Responded));
        assert!(AlertStatus::Responded.can_transition_to(AlertStatus::Resolved));

        // No skipping, no regression, no self-loops.
        assert!(!AlertStatus::Pending.can_transition_to(AlertStatus::Resolved));
        assert!(!AlertStatus::Responded.can_transition_to(AlertStatus::Pending));
        assert!(!AlertStatus::Resolved.can_transition_to(AlertStatus::Pending));
        assert!(!AlertStatus::Resolved.can_transition_to(AlertStatus::Responded));
        assert!(!AlertStatus::Pending.can_transition_to(AlertStatus::Pending));
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            AlertStatus::Pending,
            AlertStatus::Responded,
            AlertStatus::Resolved,
        ] {
            assert_eq!(AlertStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(AlertStatus::parse("escalated"), None);
    }

    #[test]
    fn response_status_strings_round_trip() {
        for status in [
            ResponseStatus::EnRoute,
            ResponseStatus::Arrived,
            ResponseStatus::Resolved,
            ResponseStatus::Cancelled,
        ] {
            assert_eq!(ResponseStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn alert_type_and_transcription_round_trip() {
        for t in [AlertType::Distress, AlertType::Text, AlertType::Voice] {
            assert_eq!(AlertType::parse(t.as_str()), Some(t));
        }
        for t in [
            TranscriptionStatus::None,
            TranscriptionStatus::Pending,
            TranscriptionStatus::Completed,
            TranscriptionStatus::Failed,
        ] {
            assert_eq!(TranscriptionStatus::parse(t.as_str()), Some(t));
        }
    }
}
