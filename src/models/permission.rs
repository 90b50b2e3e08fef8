//! Permission model module.
//!
//! Access-control entries grant or deny permission bits to principals.
//! A principal is either a user (`user:<name>`) or a role (`role:<name>`).

use std::collections::HashSet;

use sqlx::FromRow;

use crate::error::AppResult;
use crate::models::account::Role;

/// Permission to read a resource.
pub const PERM_READ: i32 = 1;
/// Permission to write (modify) a resource.
pub const PERM_WRITE: i32 = 2;
/// Permission to view a resource in the workplace.
pub const PERM_VIEW: i32 = 4;
/// Permission to change a resource's access control.
pub const PERM_CONTROL: i32 = 8;
/// Permission to directly publish a resource.
pub const PERM_PUBLISH: i32 = 16;

/// One access-control entry attached to a resource.
#[derive(Debug, Clone, FromRow)]
pub struct AccessControlEntry {
    pub principal: String,
    pub allowed: i32,
    pub denied: i32,
}

/// Aggregated permission bits for one principal set.
///
/// Denials win over grants.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PermissionSet {
    pub allowed: i32,
    pub denied: i32,
}

impl PermissionSet {
    /// Folds another entry into this set.
    pub fn merge(&mut self, allowed: i32, denied: i32) {
        self.allowed |= allowed;
        self.denied |= denied;
    }

    /// Effective permission bits after applying denials.
    #[must_use]
    pub const fn effective(self) -> i32 {
        self.allowed & !self.denied
    }

    /// Whether all bits in `mask` are effectively granted.
    #[must_use]
    pub const fn grants(self, mask: i32) -> bool {
        self.effective() & mask == mask
    }
}

/// Builds the principal names matching a user and its roles.
#[must_use]
pub fn principal_names(username: &str, roles: &HashSet<Role>) -> Vec<String> {
    let mut principals = Vec::with_capacity(roles.len() + 1);
    principals.push(format!("user:{username}"));
    for role in roles {
        principals.push(format!("role:{}", role.as_str()));
    }
    principals
}

/// Permission repository for database operations.
pub struct PermissionRepository;

impl PermissionRepository {
    /// Computes the effective permission set a user holds on a resource.
    pub async fn effective_permissions(
        pool: &sqlx::PgPool,
        resource_id: i64,
        username: &str,
        roles: &HashSet<Role>,
    ) -> AppResult<PermissionSet> {
        let principals = principal_names(username, roles);

        let entries = sqlx::query_as::<_, AccessControlEntry>(
            r"
            SELECT principal, allowed, denied
            FROM resource_permissions
            WHERE resource_id = $1 AND principal = ANY($2)
            ",
        )
        .bind(resource_id)
        .bind(&principals)
        .fetch_all(pool)
        .await?;

        let mut set = PermissionSet::default();
        for entry in entries {
            set.merge(entry.allowed, entry.denied);
        }

        Ok(set)
    }

    /// Whether the user may write the resource.
    ///
    /// Callers that feed the menu evaluation treat an error from this
    /// lookup as "permission unknown", which hides the entry.
    pub async fn can_write(
        pool: &sqlx::PgPool,
        resource_id: i64,
        username: &str,
        roles: &HashSet<Role>,
    ) -> AppResult<bool> {
        let set = Self::effective_permissions(pool, resource_id, username, roles).await?;
        Ok(set.grants(PERM_WRITE))
    }
}
