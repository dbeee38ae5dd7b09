//! API response types.
//!
//! Joined rows returned by list/detail endpoints and the report aggregate.
//! Entities are flattened so the wire shape stays the flat JSON object the
//! web client binds to, with related names and counts alongside.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::entities::{Attachment, Comment, Defect, Project, Site};
use crate::enums::{DefectPriority, DefectStatus, Role};

/// Minimal reference to a user, embedded in rows (never the full account).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserRef {
    pub name: Option<String>,
    pub email: String,
}

/// Public view of a user account, for listings and the login response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserPublic {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

/// A site with its defect count, embedded in project listings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteSummary {
    #[serde(flatten)]
    pub site: Site,
    pub defect_count: i64,
}

/// A project with its sites and counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ProjectSummary {
    #[serde(flatten)]
    pub project: Project,
    pub sites: Vec<SiteSummary>,
    pub site_count: i64,
}

/// A defect row as returned by list endpoints: the defect plus owning
/// site/project names, creator/assignee references, and child counts.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefectRow {
    #[serde(flatten)]
    pub defect: Defect,
    pub site_name: String,
    pub project_id: String,
    pub project_name: String,
    pub creator: UserRef,
    pub assignee: Option<UserRef>,
    pub comment_count: i64,
    pub attachment_count: i64,
}

/// A comment with its author reference.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CommentRow {
    #[serde(flatten)]
    pub comment: Comment,
    pub author: UserRef,
}

/// Full defect detail: the row plus comments (oldest first) and attachments.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DefectDetail {
    #[serde(flatten)]
    pub row: DefectRow,
    pub comments: Vec<CommentRow>,
    pub attachments: Vec<Attachment>,
}

/// A site with its project and defects.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteDetail {
    #[serde(flatten)]
    pub site: Site,
    pub project: Project,
    pub defects: Vec<DefectRow>,
    pub defect_count: i64,
}

/// Per-status defect count in a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct StatusCount {
    pub status: DefectStatus,
    pub count: i64,
}

/// Per-priority defect count in a report.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct PriorityCount {
    pub priority: DefectPriority,
    pub count: i64,
}

/// Per-site defect count in a report, with the latest defect timestamp.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SiteCount {
    pub site_id: String,
    pub site_name: String,
    pub project_name: String,
    pub count: i64,
    pub latest_created_at: DateTime<Utc>,
}

/// Read-only defect report over an optional project filter and date range.
///
/// Invariant: `total_defects` equals the sum of `status_stats` counts (and of
/// `priority_stats` counts) for any filter combination.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub total_defects: i64,
    pub defects: Vec<DefectRow>,
    pub status_stats: Vec<StatusCount>,
    pub priority_stats: Vec<PriorityCount>,
    pub site_stats: Vec<SiteCount>,
    pub generated_at: DateTime<Utc>,
}

impl Report {
    /// Sum of the per-status group counts, for the report invariant.
    #[must_use]
    pub fn status_total(&self) -> i64 {
        self.status_stats.iter().map(|s| s.count).sum()
    }
}
