//! Resource model module.
//!
//! Contains the repository resource entity and its database repository.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::{AppError, AppResult};

/// Publication state of a repository resource.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceState {
    /// Identical to the published copy.
    Unchanged,
    /// Modified since it was last published.
    Changed,
    /// Created but never published.
    New,
    /// Marked for deletion but not yet published.
    Deleted,
}

impl ResourceState {
    /// Returns the canonical database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Unchanged => "unchanged",
            Self::Changed => "changed",
            Self::New => "new",
            Self::Deleted => "deleted",
        }
    }

    #[must_use]
    pub const fn is_unchanged(self) -> bool {
        matches!(self, Self::Unchanged)
    }

    #[must_use]
    pub const fn is_new(self) -> bool {
        matches!(self, Self::New)
    }

    #[must_use]
    pub const fn is_deleted(self) -> bool {
        matches!(self, Self::Deleted)
    }
}

impl std::str::FromStr for ResourceState {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "unchanged" => Ok(Self::Unchanged),
            "changed" => Ok(Self::Changed),
            "new" => Ok(Self::New),
            "deleted" => Ok(Self::Deleted),
            other => Err(AppError::Internal(format!(
                "Unknown resource state '{other}'"
            ))),
        }
    }
}

/// Whether a resource is a file or a folder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    File,
    Folder,
}

impl ResourceKind {
    /// Returns the canonical database representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }

    #[must_use]
    pub const fn is_file(self) -> bool {
        matches!(self, Self::File)
    }
}

impl std::str::FromStr for ResourceKind {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "file" => Ok(Self::File),
            "folder" => Ok(Self::Folder),
            other => Err(AppError::Internal(format!(
                "Unknown resource kind '{other}'"
            ))),
        }
    }
}

/// Raw database row for a resource. State and kind are stored as text
/// and converted to their typed forms in [`Resource`].
#[derive(Debug, Clone, FromRow)]
pub struct ResourceRow {
    pub id: i64,
    pub path: String,
    pub kind: String,
    pub state: String,
    pub project_id: i64,
    pub locked_by: Option<String>,
    pub locked_for_publishing: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A repository resource as seen by the workplace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Resource {
    pub id: i64,
    pub path: String,
    pub kind: ResourceKind,
    pub state: ResourceState,
    pub project_id: i64,
    pub locked_by: Option<String>,
    pub locked_for_publishing: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Resource {
    #[must_use]
    pub const fn is_file(&self) -> bool {
        self.kind.is_file()
    }

    /// A resource is editable by a user when nobody else holds its lock.
    #[must_use]
    pub fn is_editable_by(&self, username: &str) -> bool {
        self.locked_by
            .as_deref()
            .is_none_or(|owner| owner == username)
    }
}

impl TryFrom<ResourceRow> for Resource {
    type Error = AppError;

    fn try_from(row: ResourceRow) -> Result<Self, Self::Error> {
        Ok(Self {
            id: row.id,
            path: row.path,
            kind: row.kind.parse()?,
            state: row.state.parse()?,
            project_id: row.project_id,
            locked_by: row.locked_by,
            locked_for_publishing: row.locked_for_publishing,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

/// Resource repository for database operations.
pub struct ResourceRepository;

impl ResourceRepository {
    /// Finds a resource by its absolute repository path.
    pub async fn find_by_path(pool: &sqlx::PgPool, path: &str) -> AppResult<Option<Resource>> {
        let row = sqlx::query_as::<_, ResourceRow>(
            r"
            SELECT id, path, kind, state, project_id, locked_by,
                   locked_for_publishing, created_at, updated_at
            FROM resources
            WHERE path = $1
            LIMIT 1
            ",
        )
        .bind(path)
        .fetch_optional(pool)
        .await?;

        row.map(Resource::try_from).transpose()
    }
}
