//! Project model module.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::error::AppResult;

/// A workplace project. Exactly one project is the online (published)
/// project; all editing happens in offline projects.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Project {
    pub id: i64,
    pub name: String,
    pub is_online: bool,
}

/// Project repository for database operations.
pub struct ProjectRepository;

impl ProjectRepository {
    /// Finds a project by its unique name.
    pub async fn find_by_name(pool: &sqlx::PgPool, name: &str) -> AppResult<Option<Project>> {
        let project = sqlx::query_as::<_, Project>(
            r"
            SELECT id, name, is_online
            FROM projects
            WHERE name = $1
            LIMIT 1
            ",
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(project)
    }
}
