//! Request/response schema module.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::AppError;
use crate::menu::{MenuItem, Visibility};

/// Maximum accepted length for a repository path.
pub const RESOURCE_PATH_MAX_LEN: usize = 1024;

/// Context-menu evaluation request.
///
/// Uses validator for validation rules; the path shape itself is checked
/// by [`validate_resource_path`].
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct MenuRequest {
    /// Absolute repository path of the resource (required)
    #[validate(length(min = 1, message = "Resource path is required"))]
    pub path: String,

    /// Project to evaluate against (optional, defaults to the configured
    /// default project)
    #[validate(length(max = 128, message = "Project name must be at most 128 characters"))]
    #[serde(default)]
    pub project: Option<String>,
}

/// One evaluated entry in a context-menu response.
///
/// Also serves as the Redis cache value (MessagePack encoded).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MenuEntryView {
    pub id: String,
    pub title: String,
    pub visibility: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl MenuEntryView {
    /// Builds the view for one registry entry and its verdict.
    #[must_use]
    pub fn new(item: &MenuItem, visibility: Visibility) -> Self {
        Self {
            id: item.id.to_string(),
            title: item.title.to_string(),
            visibility: visibility.label().to_string(),
            reason: visibility.reason().map(|r| r.code().to_string()),
        }
    }
}

/// Context-menu evaluation response.
#[derive(Debug, Serialize)]
pub struct MenuResponse {
    pub path: String,
    pub project: String,
    pub entries: Vec<MenuEntryView>,
}

/// Validates an absolute repository resource path.
///
/// # Validation Rules
///
/// - Must start with `/`
/// - Must not contain `..` segments or backslashes
/// - Must be at most [`RESOURCE_PATH_MAX_LEN`] characters long
/// - Must not contain control characters
pub fn validate_resource_path(path: &str) -> Result<(), AppError> {
    if !path.starts_with('/') {
        return Err(AppError::BadRequest(
            "path must be absolute (start with '/')".to_string(),
        ));
    }

    if path.len() > RESOURCE_PATH_MAX_LEN {
        return Err(AppError::BadRequest(format!(
            "path must be at most {RESOURCE_PATH_MAX_LEN} characters long"
        )));
    }

    if path.contains('\\') {
        return Err(AppError::BadRequest(
            "path must not contain backslashes".to_string(),
        ));
    }

    if path.split('/').any(|segment| segment == "..") {
        return Err(AppError::BadRequest(
            "path must not contain '..' segments".to_string(),
        ));
    }

    if path.chars().any(char::is_control) {
        return Err(AppError::BadRequest(
            "path must not contain control characters".to_string(),
        ));
    }

    Ok(())
}
