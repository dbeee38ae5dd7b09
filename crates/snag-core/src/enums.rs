//! Status, priority, and role enums for Snagtrack.
//!
//! All enums use the original wire format via
//! `#[serde(rename_all = "SCREAMING_SNAKE_CASE")]` and are stored as TEXT in
//! SQL using `as_str()`. Defect status deliberately carries **no** transition
//! graph: any authorized update may set any status.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Role assigned to a user account.
///
/// `Manager` has full control, `Engineer` operational control, `Observer` is
/// read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Manager,
    Engineer,
    Observer,
}

impl Role {
    /// Return the string representation used in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Manager => "MANAGER",
            Self::Engineer => "ENGINEER",
            Self::Observer => "OBSERVER",
        }
    }

    /// Whether the role participates in day-to-day site/defect work.
    #[must_use]
    pub const fn is_staff(self) -> bool {
        matches!(self, Self::Manager | Self::Engineer)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DefectStatus
// ---------------------------------------------------------------------------

/// Status of a defect.
///
/// There is no enforced state machine: the update operation may set any of
/// the five values regardless of the current one. This mirrors the tracked
/// workflow on real sites, where a defect can be cancelled or reopened at
/// any point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefectStatus {
    New,
    InProgress,
    UnderReview,
    Closed,
    Cancelled,
}

impl DefectStatus {
    /// All statuses, in report ordering.
    pub const ALL: [Self; 5] = [
        Self::New,
        Self::InProgress,
        Self::UnderReview,
        Self::Closed,
        Self::Cancelled,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::New => "NEW",
            Self::InProgress => "IN_PROGRESS",
            Self::UnderReview => "UNDER_REVIEW",
            Self::Closed => "CLOSED",
            Self::Cancelled => "CANCELLED",
        }
    }
}

impl fmt::Display for DefectStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// DefectPriority
// ---------------------------------------------------------------------------

/// Priority of a defect. New defects default to `Medium`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DefectPriority {
    Low,
    #[default]
    Medium,
    High,
    Critical,
}

impl DefectPriority {
    /// All priorities, in report ordering.
    pub const ALL: [Self; 4] = [Self::Low, Self::Medium, Self::High, Self::Critical];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Low => "LOW",
            Self::Medium => "MEDIUM",
            Self::High => "HIGH",
            Self::Critical => "CRITICAL",
        }
    }
}

impl fmt::Display for DefectPriority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! test_serde_roundtrip {
        ($name:ident, $ty:ty, $variant:expr, $expected_str:expr) => {
            #[test]
            fn $name() {
                let val = $variant;
                let json = serde_json::to_string(&val).unwrap();
                assert_eq!(json, format!("\"{}\"", $expected_str));
                let recovered: $ty = serde_json::from_str(&json).unwrap();
                assert_eq!(recovered, val);
            }
        };
    }

    test_serde_roundtrip!(role_manager, Role, Role::Manager, "MANAGER");
    test_serde_roundtrip!(role_engineer, Role, Role::Engineer, "ENGINEER");
    test_serde_roundtrip!(role_observer, Role, Role::Observer, "OBSERVER");

    test_serde_roundtrip!(status_new, DefectStatus, DefectStatus::New, "NEW");
    test_serde_roundtrip!(
        status_in_progress,
        DefectStatus,
        DefectStatus::InProgress,
        "IN_PROGRESS"
    );
    test_serde_roundtrip!(
        status_under_review,
        DefectStatus,
        DefectStatus::UnderReview,
        "UNDER_REVIEW"
    );
    test_serde_roundtrip!(status_closed, DefectStatus, DefectStatus::Closed, "CLOSED");
    test_serde_roundtrip!(
        status_cancelled,
        DefectStatus,
        DefectStatus::Cancelled,
        "CANCELLED"
    );

    test_serde_roundtrip!(priority_low, DefectPriority, DefectPriority::Low, "LOW");
    test_serde_roundtrip!(
        priority_critical,
        DefectPriority,
        DefectPriority::Critical,
        "CRITICAL"
    );

    #[test]
    fn default_priority_is_medium() {
        assert_eq!(DefectPriority::default(), DefectPriority::Medium);
    }

    #[test]
    fn staff_roles() {
        assert!(Role::Manager.is_staff());
        assert!(Role::Engineer.is_staff());
        assert!(!Role::Observer.is_staff());
    }

    #[test]
    fn display_matches_as_str() {
        assert_eq!(format!("{}", Role::Manager), "MANAGER");
        assert_eq!(format!("{}", DefectStatus::UnderReview), "UNDER_REVIEW");
        assert_eq!(format!("{}", DefectPriority::Critical), "CRITICAL");
    }
}
