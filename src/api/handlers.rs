//! HTTP request handler module.

use askama::Template;
use axum::{
    extract::{Extension, Path, State},
    response::{Html, IntoResponse, Response},
    Json,
};
use axum_extra::extract::CookieJar;
use cookie::Cookie;
use deadpool_redis::redis::AsyncCommands;
use once_cell::sync::Lazy;
use validator::Validate;

use crate::api::middlewares::AuthUser;
use crate::api::schemas::{validate_resource_path, MenuEntryView, MenuRequest, MenuResponse};
use crate::api::state::AppState;
use crate::config::APP_CONFIG;
use crate::error::{AppError, AppResult, ValidationErrorExt};
use crate::menu::{menu_items, EvalContext};
use crate::models::{
    AccountRepository, PermissionRepository, Project, ProjectRepository, Resource,
    ResourceRepository,
};
use crate::module::ModuleDescriptor;
use crate::utils::{gen_token, menu_cache_key};

/// Index page template.
#[derive(Template)]
#[template(path = "index.html")]
struct IndexTemplate {}

/// Explorer menu page template.
#[derive(Template)]
#[template(path = "menu.html")]
struct MenuTemplate {
    path: String,
    project: String,
    entries: Vec<TemplateMenuEntry>,
}

/// Menu entry data for template rendering.
#[derive(Clone)]
struct TemplateMenuEntry {
    pub title: String,
    pub visibility: String,
    pub reason: String,
}

impl From<&MenuEntryView> for TemplateMenuEntry {
    fn from(entry: &MenuEntryView) -> Self {
        Self {
            title: entry.title.clone(),
            visibility: entry.visibility.clone(),
            reason: entry.reason.clone().unwrap_or_default(),
        }
    }
}

/// Pre-rendered index page HTML (static content).
static INDEX_HTML: Lazy<String> = Lazy::new(|| {
    IndexTemplate {}
        .render()
        .expect("Failed to render index template")
});

/// Main page handler.
///
/// Renders the main page and generates a guest token.
///
/// # Route
///
/// `GET /`
pub async fn index_handler(jar: CookieJar) -> AppResult<impl IntoResponse> {
    let token = gen_token("guest")?;

    let mut cookie_builder = Cookie::build(("token", token))
        .path("/")
        .http_only(true)
        .same_site(cookie::SameSite::Lax);

    // Enable Secure flag in production (HTTPS only)
    if APP_CONFIG.is_production {
        cookie_builder = cookie_builder.secure(true);
    }

    let updated_jar = jar.add(cookie_builder.build());
    Ok((updated_jar, Html(INDEX_HTML.as_str())))
}

/// Context-menu evaluation handler.
///
/// Evaluates every registered menu entry for the authenticated user
/// against the requested resource and project.
///
/// # Route
///
/// `POST /v1/menu`
pub async fn context_menu_handler(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Json(req_body): Json<MenuRequest>,
) -> AppResult<Json<MenuResponse>> {
    req_body.validate().map_err(|e| e.to_validation_error())?;

    let project_name = req_body
        .project
        .as_deref()
        .unwrap_or(&APP_CONFIG.default_project);

    let response = evaluate_menu(&state, &claims.sub, project_name, &req_body.path).await?;
    Ok(Json(response))
}

/// Module descriptor handler.
///
/// Returns the module descriptor loaded at startup as JSON.
///
/// # Route
///
/// `GET /v1/module`
pub async fn module_handler(
    State(state): State<AppState>,
) -> AppResult<Json<ModuleDescriptor>> {
    state
        .module
        .as_deref()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No module descriptor loaded".to_string()))
}

/// Explorer page handler.
///
/// Renders the context menu for a resource as an HTML page.
///
/// # Route
///
/// `GET /explorer/{*path}`
pub async fn explorer_handler(
    State(state): State<AppState>,
    Extension(AuthUser(claims)): Extension<AuthUser>,
    Path(path): Path<String>,
) -> AppResult<Response> {
    // The wildcard segment arrives without its leading slash
    let full_path = format!("/{path}");

    let menu = evaluate_menu(&state, &claims.sub, &APP_CONFIG.default_project, &full_path).await?;

    let template = MenuTemplate {
        path: menu.path,
        project: menu.project,
        entries: menu.entries.iter().map(TemplateMenuEntry::from).collect(),
    };

    let html = template.render()?;
    Ok(Html(html).into_response())
}

/// Evaluates all registered menu entries for one user and resource.
///
/// # Process
///
/// 1. Validate the resource path
/// 2. Resolve the project and the resource
/// 3. Serve from cache when a previous evaluation is still fresh
/// 4. Resolve roles and write permission, build the evaluation context
/// 5. Run every registry entry through its visibility check
/// 6. Cache the result (MessagePack format for speed)
async fn evaluate_menu(
    state: &AppState,
    username: &str,
    project_name: &str,
    path: &str,
) -> AppResult<MenuResponse> {
    validate_resource_path(path)?;

    let project = ProjectRepository::find_by_name(&state.db, project_name)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Project '{project_name}' not found")))?;

    let resource = ResourceRepository::find_by_path(&state.db, path)
        .await?
        .ok_or_else(|| AppError::NotFound("Resource not found".to_string()))?;

    // The key includes the resource timestamp, so edits invalidate naturally
    let cache_key = menu_cache_key(
        username,
        project_name,
        path,
        resource.updated_at.timestamp(),
    );

    let mut conn = state
        .cache
        .get()
        .await
        .map_err(|e| AppError::Internal(format!("Redis connection error: {e}")))?;

    if let Ok(cached_val) = conn.get::<_, Vec<u8>>(&cache_key).await {
        if let Ok(entries) = rmp_serde::from_slice::<Vec<MenuEntryView>>(&cached_val) {
            return Ok(MenuResponse {
                path: path.to_string(),
                project: project.name,
                entries,
            });
        }
    }

    let ctx = build_eval_context(state, username, &project, &resource).await?;

    let entries: Vec<MenuEntryView> = menu_items()
        .iter()
        .map(|item| MenuEntryView::new(item, item.check.evaluate(&ctx, &resource)))
        .collect();

    match rmp_serde::to_vec(&entries) {
        Ok(data) => {
            let cache_result: Result<(), deadpool_redis::redis::RedisError> = conn
                .set_ex(&cache_key, data, APP_CONFIG.cache_ttl_secs)
                .await;

            if let Err(e) = cache_result {
                tracing::error!(
                    cache_key = %cache_key,
                    error = %e,
                    "Failed to cache menu evaluation - DB load may increase"
                );
            }
        }
        Err(e) => {
            tracing::error!(
                cache_key = %cache_key,
                error = %e,
                "Failed to serialize menu evaluation for cache"
            );
        }
    }

    Ok(MenuResponse {
        path: path.to_string(),
        project: project.name,
        entries,
    })
}

/// Resolves the per-request facts the visibility checks consume.
///
/// A failed permission lookup is logged and recorded as `None`; the
/// checks hide permission-gated entries in that case instead of
/// failing the whole request.
async fn build_eval_context(
    state: &AppState,
    username: &str,
    project: &Project,
    resource: &Resource,
) -> AppResult<EvalContext> {
    let roles = AccountRepository::find_roles(&state.db, username).await?;

    let write_permission =
        match PermissionRepository::can_write(&state.db, resource.id, username, &roles).await {
            Ok(granted) => Some(granted),
            Err(e) => {
                tracing::warn!(
                    username = %username,
                    resource = %resource.path,
                    error = %e,
                    "Permission lookup failed, hiding permission-gated entries"
                );
                None
            }
        };

    Ok(EvalContext {
        username: username.to_string(),
        roles,
        online_project: project.is_online,
        inside_project: resource.project_id == project.id,
        locked_for_publishing: resource.locked_for_publishing,
        write_permission,
    })
}

/// Health check response.
#[derive(serde::Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
}

/// Liveness probe handler.
///
/// Returns OK if the server is running. Used for Kubernetes liveness probe.
///
/// # Route
///
/// `GET /health`
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Readiness check response.
#[derive(serde::Serialize)]
pub struct ReadinessResponse {
    pub status: &'static str,
    pub database: &'static str,
    pub cache: &'static str,
}

/// Readiness probe handler.
///
/// Checks database and cache connectivity. Used for Kubernetes readiness probe.
///
/// # Route
///
/// `GET /ready`
pub async fn readiness_handler(
    State(state): State<AppState>,
) -> Result<Json<ReadinessResponse>, (axum::http::StatusCode, Json<ReadinessResponse>)> {
    // Check database connection
    let db_ok = sqlx::query("SELECT 1").fetch_one(&state.db).await.is_ok();

    // Check Redis connection
    let cache_ok = state.cache.get().await.is_ok();

    let response = ReadinessResponse {
        status: if db_ok && cache_ok { "ok" } else { "degraded" },
        database: if db_ok { "connected" } else { "disconnected" },
        cache: if cache_ok {
            "connected"
        } else {
            "disconnected"
        },
    };

    if db_ok && cache_ok {
        Ok(Json(response))
    } else {
        Err((axum::http::StatusCode::SERVICE_UNAVAILABLE, Json(response)))
    }
}
