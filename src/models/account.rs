//! Account model module.
//!
//! Contains workplace roles and the repository resolving a user to its roles.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};

/// Workplace role of a user.
///
/// Roles are hierarchical: administrators hold every editor capability and
/// editors hold every workplace-user capability. [`Role::implies`] encodes
/// that chain so checks against a lower role accept holders of a higher one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Role {
    Administrator,
    Editor,
    WorkplaceUser,
}

impl Role {
    /// Returns the canonical database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Administrator => "administrator",
            Self::Editor => "editor",
            Self::WorkplaceUser => "workplace-user",
        }
    }

    /// Rank within the role hierarchy, highest first.
    const fn rank(self) -> u8 {
        match self {
            Self::Administrator => 2,
            Self::Editor => 1,
            Self::WorkplaceUser => 0,
        }
    }

    /// Whether holding `self` grants the capabilities of `other`.
    #[must_use]
    pub const fn implies(self, other: Self) -> bool {
        self.rank() >= other.rank()
    }
}

impl std::str::FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "administrator" => Ok(Self::Administrator),
            "editor" => Ok(Self::Editor),
            "workplace-user" => Ok(Self::WorkplaceUser),
            other => Err(AppError::Internal(format!("Unknown role '{other}'"))),
        }
    }
}

/// Whether any of the held roles grants the given role.
#[must_use]
pub fn has_role(roles: &HashSet<Role>, role: Role) -> bool {
    roles.iter().any(|held| held.implies(role))
}

/// Account repository for database operations.
pub struct AccountRepository;

impl AccountRepository {
    /// Resolves a username to its set of roles.
    ///
    /// Unknown or deactivated users resolve to the empty set, which makes
    /// every role-gated menu entry invisible for them.
    pub async fn find_roles(pool: &sqlx::PgPool, username: &str) -> AppResult<HashSet<Role>> {
        let names = sqlx::query_scalar::<_, String>(
            r"
            SELECT ur.role
            FROM user_roles ur
            JOIN users u ON u.id = ur.user_id
            WHERE u.username = $1 AND u.is_active
            ",
        )
        .bind(username)
        .fetch_all(pool)
        .await?;

        let mut roles = HashSet::with_capacity(names.len());
        for name in names {
            match name.parse::<Role>() {
                Ok(role) => {
                    roles.insert(role);
                }
                Err(_) => {
                    // Unknown role rows are skipped rather than failing the lookup
                    tracing::warn!(username = %username, role = %name, "Skipping unknown role");
                }
            }
        }

        Ok(roles)
    }
}
