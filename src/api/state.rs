//! Application state module.
//!
//! Contains shared state for database, cache and module metadata.

use std::sync::Arc;

use deadpool_redis::Pool as RedisPool;
use sqlx::PgPool;

use crate::module::ModuleDescriptor;

/// Shared application state.
///
/// This struct holds references to shared resources like database
/// and cache connections that handlers need access to.
#[derive(Clone)]
pub struct AppState {
    /// `PostgreSQL` connection pool
    pub db: PgPool,
    /// Redis connection pool
    pub cache: RedisPool,
    /// Module-export descriptor, when one was configured
    pub module: Option<Arc<ModuleDescriptor>>,
}

impl AppState {
    /// Creates a new `AppState` instance.
    #[must_use]
    pub const fn new(db: PgPool, cache: RedisPool, module: Option<Arc<ModuleDescriptor>>) -> Self {
        Self { db, cache, module }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // AppState requires live DB/Redis connections, so only the struct
    // properties themselves are tested here

    #[test]
    fn test_app_state_is_clone() {
        fn assert_clone<T: Clone>() {}
        assert_clone::<AppState>();
    }

    #[test]
    fn test_app_state_struct_size() {
        let size = std::mem::size_of::<AppState>();
        // Pools and the descriptor are Arc based, so the state stays small
        assert!(size > 0);
        assert!(size < 256);
    }
}
