//! Visibility evaluation for context-menu entries.
//!
//! A [`VisibilityCheck`] is configured with a set of [`CheckFlag`]s. Each
//! flag enables one predicate over the caller's context and the resource;
//! the first predicate that fires decides the verdict. Predicates run in a
//! fixed order regardless of how the flag set was built.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};

use crate::menu::flags::CheckFlag;
use crate::models::account::{has_role, Role};
use crate::models::resource::Resource;

/// Why an entry is shown but disabled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum InactiveReason {
    /// The resource is new and has never been published.
    NewUnchanged,
    /// The caller holds no write permission, or the resource is locked
    /// by another user.
    NoWritePermission,
    /// The resource is marked as deleted.
    Deleted,
}

impl InactiveReason {
    /// Machine-readable code surfaced to API clients.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::NewUnchanged => "new-unchanged",
            Self::NoWritePermission => "no-write-permission",
            Self::Deleted => "deleted",
        }
    }

    /// Human-readable explanation for the workplace UI title tip.
    #[must_use]
    pub const fn message(self) -> &'static str {
        match self {
            Self::NewUnchanged => "Resource is new and unpublished",
            Self::NoWritePermission => "No write permission on this resource",
            Self::Deleted => "Resource is marked as deleted",
        }
    }
}

/// Verdict of a visibility check for one menu entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    /// Entry is shown and enabled.
    Active,
    /// Entry is shown greyed out, with the reason attached.
    Inactive(InactiveReason),
    /// Entry is not shown at all.
    Hidden,
}

impl Visibility {
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Active)
    }

    #[must_use]
    pub const fn is_hidden(self) -> bool {
        matches!(self, Self::Hidden)
    }

    /// The wire label without the attached reason.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Inactive(_) => "inactive",
            Self::Hidden => "hidden",
        }
    }

    /// The attached reason, if any.
    #[must_use]
    pub const fn reason(self) -> Option<InactiveReason> {
        match self {
            Self::Inactive(reason) => Some(reason),
            _ => None,
        }
    }
}

/// The prefetched facts the predicates consume.
///
/// Handlers resolve roles, project membership and permissions up front so
/// the evaluation itself stays a pure function. `write_permission` is `None`
/// when the permission lookup itself failed; the check maps that to a
/// hidden entry rather than propagating the error.
#[derive(Debug, Clone)]
pub struct EvalContext {
    pub username: String,
    pub roles: HashSet<Role>,
    /// Whether the current project is the online project.
    pub online_project: bool,
    /// Whether the resource belongs to the current project.
    pub inside_project: bool,
    /// Whether the resource is locked for publishing.
    pub locked_for_publishing: bool,
    /// Outcome of the write-permission lookup; `None` means it failed.
    pub write_permission: Option<bool>,
}

/// Standard visibility check configured from a set of flags.
#[derive(Debug, Clone)]
pub struct VisibilityCheck {
    flags: HashSet<CheckFlag>,
}

impl VisibilityCheck {
    /// Creates a new check from the given flags.
    ///
    /// The order of the flags does not matter; the checks corresponding to
    /// the flags are performed in a fixed order.
    #[must_use]
    pub fn new(flags: &[CheckFlag]) -> Self {
        Self {
            flags: flags.iter().copied().collect(),
        }
    }

    /// Whether this check was configured with the given flag.
    #[must_use]
    pub fn flag(&self, flag: CheckFlag) -> bool {
        self.flags.contains(&flag)
    }

    /// Evaluates the configured predicates against the context and
    /// resource. The first predicate that fires decides the verdict.
    #[must_use]
    pub fn evaluate(&self, ctx: &EvalContext, resource: &Resource) -> Visibility {
        if self.flag(CheckFlag::RoleEditor) && !has_role(&ctx.roles, Role::Editor) {
            return Visibility::Hidden;
        }

        if self.flag(CheckFlag::RoleWorkplaceUser) && !has_role(&ctx.roles, Role::WorkplaceUser) {
            return Visibility::Hidden;
        }

        if self.flag(CheckFlag::NotOnline) && ctx.online_project {
            return Visibility::Hidden;
        }

        if self.flag(CheckFlag::NotUnchangedFile)
            && resource.is_file()
            && resource.state.is_unchanged()
        {
            return Visibility::Hidden;
        }

        if self.flag(CheckFlag::NotNew) && resource.state.is_new() {
            return Visibility::Inactive(InactiveReason::NewUnchanged);
        }

        if self.flag(CheckFlag::InProject) && !ctx.inside_project && !ctx.locked_for_publishing {
            return Visibility::Hidden;
        }

        if self.flag(CheckFlag::WritePermission) {
            // A failed permission lookup hides the entry completely
            let Some(can_write) = ctx.write_permission else {
                return Visibility::Hidden;
            };

            if !resource.is_editable_by(&ctx.username) || !can_write {
                return Visibility::Inactive(InactiveReason::NoWritePermission);
            }
        }

        if self.flag(CheckFlag::NotDeleted) && resource.state.is_deleted() {
            return Visibility::Inactive(InactiveReason::Deleted);
        }

        if self.flag(CheckFlag::Deleted) && !resource.state.is_deleted() {
            return Visibility::Hidden;
        }

        Visibility::Active
    }
}

/// Default visibility check for edit-like operations on resources.
pub static DEFAULT_CHECK: Lazy<VisibilityCheck> = Lazy::new(|| {
    VisibilityCheck::new(&[
        CheckFlag::RoleEditor,
        CheckFlag::NotOnline,
        CheckFlag::NotDeleted,
        CheckFlag::WritePermission,
    ])
});

/// Visibility check for the undo-changes entry.
pub static UNDO_CHECK: Lazy<VisibilityCheck> = Lazy::new(|| {
    VisibilityCheck::new(&[
        CheckFlag::NotUnchangedFile,
        CheckFlag::NotNew,
        CheckFlag::RoleEditor,
        CheckFlag::NotOnline,
        CheckFlag::NotDeleted,
        CheckFlag::WritePermission,
    ])
});

/// Visibility check for the undelete entry.
pub static UNDELETE_CHECK: Lazy<VisibilityCheck> = Lazy::new(|| {
    VisibilityCheck::new(&[
        CheckFlag::RoleEditor,
        CheckFlag::NotOnline,
        CheckFlag::Deleted,
        CheckFlag::WritePermission,
    ])
});
