use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Roles
// ---------------------------------------------------------------------------

/// Portal account role. Checks are exact: an admin does not implicitly
/// satisfy a resident or family check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Resident,
    Family,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Resident => "resident",
            Self::Family => "family",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Service requests
// ---------------------------------------------------------------------------

/// Category of a help/service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestCategory {
    Cleaning,
    Repair,
    Delivery,
    It,
    Transportation,
    Other,
}

/// Urgency tier of a service request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestUrgency {
    Low,
    Normal,
    Urgent,
}

/// Service request lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    Pending,
    InProgress,
    Completed,
    Cancelled,
}

impl RequestStatus {
    /// Whether `next` is a legal transition from the current status.
    /// Completed and cancelled are terminal.
    pub fn can_become(self, next: RequestStatus) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::InProgress)
                | (Self::InProgress, Self::Completed)
                | (Self::Pending, Self::Cancelled)
                | (Self::InProgress, Self::Cancelled)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Completed | Self::Cancelled)
    }
}

// ---------------------------------------------------------------------------
// Emergency calls
// ---------------------------------------------------------------------------

/// Emergency call status. `Processing` is a display-only value set by the
/// UI while staff are en route; the data layer only ever transitions
/// unresolved -> resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EmergencyStatus {
    Unresolved,
    Processing,
    Resolved,
}

impl Default for EmergencyStatus {
    fn default() -> Self {
        Self::Unresolved
    }
}

// ---------------------------------------------------------------------------
// Reservations
// ---------------------------------------------------------------------------

/// Facility reservation lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReservationStatus {
    Pending,
    Approved,
    Rejected,
    Cancelled,
}

impl ReservationStatus {
    /// Whether a reservation in this status occupies its time slot for the
    /// purpose of the overlap invariant.
    pub fn blocks_slot(self) -> bool {
        matches!(self, Self::Pending | Self::Approved)
    }
}

// ---------------------------------------------------------------------------
// Admission applications
// ---------------------------------------------------------------------------

/// Admission application lifecycle. Approved and rejected are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Rejected,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_transitions() {
        assert!(RequestStatus::Pending.can_become(RequestStatus::InProgress));
        assert!(RequestStatus::InProgress.can_become(RequestStatus::Completed));
        assert!(RequestStatus::Pending.can_become(RequestStatus::Cancelled));
        assert!(!RequestStatus::Pending.can_become(RequestStatus::Completed));
        assert!(!RequestStatus::Completed.can_become(RequestStatus::Cancelled));
        assert!(!RequestStatus::Cancelled.can_become(RequestStatus::InProgress));
    }

    #[test]
    fn blocking_reservation_statuses() {
        assert!(ReservationStatus::Pending.blocks_slot());
        assert!(ReservationStatus::Approved.blocks_slot());
        assert!(!ReservationStatus::Rejected.blocks_slot());
        assert!(!ReservationStatus::Cancelled.blocks_slot());
    }

    #[test]
    fn role_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
        assert_eq!(
            serde_json::to_string(&RequestStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
    }
}
