//! Safe-walk session state machine.

use serde::{Deserialize, Serialize};

/// Lifecycle status of a safe-walk session.
///
/// `active` is the only non-terminal state. Every transition (check-in,
/// end, panic, timer expiry) requires the session to currently be active,
/// so a session reaches exactly one terminal state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Active,
    Completed,
    EmergencyTriggered,
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SessionStatus::Active => "active",
            SessionStatus::Completed => "completed",
            SessionStatus::EmergencyTriggered => "emergency_triggered",
            SessionStatus::Cancelled => "cancelled",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "active" => Some(SessionStatus::Active),
            "completed" => Some(SessionStatus::Completed),
            "emergency_triggered" => Some(SessionStatus::EmergencyTriggered),
            "cancelled" => Some(SessionStatus::Cancelled),
            _ => None,
        }
    }

    /// Terminal statuses accept no further mutation.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, SessionStatus::Active)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_active_is_non_terminal() {
        assert!(!SessionStatus::Active.is_terminal());
        assert!(SessionStatus::Completed.is_terminal());
        assert!(SessionStatus::EmergencyTriggered.is_terminal());
        assert!(SessionStatus::Cancelled.is_terminal());
    }

    #[test]
    fn status_strings_round_trip() {
        for status in [
            SessionStatus::Active,
            SessionStatus::Completed,
            SessionStatus::EmergencyTriggered,
            SessionStatus::Cancelled,
        ] {
            assert_eq!(SessionStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(SessionStatus::parse("paused"), None);
    }
}
