//! Context-menu module.
//!
//! Decides whether a menu entry for a repository resource is shown,
//! shown-but-disabled, or hidden.

pub mod flags;
pub mod items;
pub mod visibility;

pub use flags::CheckFlag;
pub use items::{menu_items, MenuItem};
pub use visibility::{
    EvalContext, InactiveReason, Visibility, VisibilityCheck, DEFAULT_CHECK, UNDELETE_CHECK,
    UNDO_CHECK,
};
