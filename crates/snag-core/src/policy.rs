//! Role-based access policy.
//!
//! Every mutation is gated here, after authentication and before any SQL.
//! Read operations are open to any authenticated identity and have no entry.
//!
//! Two asymmetries are carried over from the tracked workflow on purpose and
//! must not be normalized:
//! - site update allows MANAGER or ENGINEER, site *delete* is MANAGER only;
//! - defect update additionally opens up to the current assignee, whatever
//!   their role.

use crate::enums::Role;
use crate::identity::Identity;

/// A mutating action subject to the role policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    CreateProject,
    UpdateProject,
    DeleteProject,
    CreateSite,
    UpdateSite,
    DeleteSite,
    CreateDefect,
    DeleteDefect,
    CreateComment,
}

/// Whether `role` may perform `action`.
///
/// Defect *updates* are not decided here; use [`can_update_defect`], which
/// also consults the assignee.
#[must_use]
pub const fn allows(role: Role, action: Action) -> bool {
    match action {
        Action::CreateProject
        | Action::UpdateProject
        | Action::DeleteProject
        | Action::DeleteSite => matches!(role, Role::Manager),
        Action::CreateSite | Action::UpdateSite | Action::CreateDefect | Action::DeleteDefect => {
            role.is_staff()
        }
        Action::CreateComment => true,
    }
}

/// Whether `identity` may update a defect currently assigned to
/// `assignee_id`.
///
/// Managers and engineers always may; anyone else only when they are the
/// current assignee.
#[must_use]
pub fn can_update_defect(identity: &Identity, assignee_id: Option<&str>) -> bool {
    identity.role.is_staff() || assignee_id == Some(identity.user_id.as_str())
}
