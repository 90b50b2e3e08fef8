//! Visibility check flags.

use serde::{Deserialize, Serialize};

/// One configurable predicate of a visibility check.
///
/// Each flag enables a single check which may cause the menu entry to be
/// hidden or deactivated. The set a check is configured with is unordered;
/// the checks themselves always run in a fixed sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CheckFlag {
    /// Caller must hold the editor role.
    RoleEditor,
    /// Caller must hold the workplace-user role.
    RoleWorkplaceUser,
    /// The current project must not be the online project.
    NotOnline,
    /// Files in unchanged state are excluded.
    NotUnchangedFile,
    /// New (never published) resources deactivate the entry.
    NotNew,
    /// The resource must be inside the current project.
    InProject,
    /// Caller must hold write permission on the resource.
    WritePermission,
    /// Deleted resources deactivate the entry.
    NotDeleted,
    /// The resource must be in deleted state.
    Deleted,
}

impl CheckFlag {
    /// Returns the wire representation used in API payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::RoleEditor => "role-editor",
            Self::RoleWorkplaceUser => "role-workplace-user",
            Self::NotOnline => "not-online",
            Self::NotUnchangedFile => "not-unchanged-file",
            Self::NotNew => "not-new",
            Self::InProject => "in-project",
            Self::WritePermission => "write-permission",
            Self::NotDeleted => "not-deleted",
            Self::Deleted => "deleted",
        }
    }
}
