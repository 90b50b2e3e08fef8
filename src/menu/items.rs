//! Static context-menu registry.
//!
//! Binds menu entry ids and titles to their visibility checks.

use once_cell::sync::Lazy;

use crate::menu::visibility::{VisibilityCheck, DEFAULT_CHECK, UNDELETE_CHECK, UNDO_CHECK};

/// One entry of the resource context menu.
pub struct MenuItem {
    /// Stable identifier used by API clients.
    pub id: &'static str,
    /// Display title for the workplace UI.
    pub title: &'static str,
    /// The visibility check deciding whether this entry is shown.
    pub check: &'static VisibilityCheck,
}

static MENU_ITEMS: Lazy<Vec<MenuItem>> = Lazy::new(|| {
    vec![
        MenuItem {
            id: "edit",
            title: "Edit",
            check: Lazy::force(&DEFAULT_CHECK),
        },
        MenuItem {
            id: "rename",
            title: "Rename",
            check: Lazy::force(&DEFAULT_CHECK),
        },
        MenuItem {
            id: "delete",
            title: "Delete",
            check: Lazy::force(&DEFAULT_CHECK),
        },
        MenuItem {
            id: "undo-changes",
            title: "Undo changes",
            check: Lazy::force(&UNDO_CHECK),
        },
        MenuItem {
            id: "undelete",
            title: "Undelete",
            check: Lazy::force(&UNDELETE_CHECK),
        },
    ]
});

/// Returns the registered context-menu entries in display order.
#[must_use]
pub fn menu_items() -> &'static [MenuItem] {
    &MENU_ITEMS
}
