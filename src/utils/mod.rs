//! Utility module.

pub mod cache_key;
pub mod jwt;

pub use cache_key::menu_cache_key;
pub use jwt::{gen_token, parse_token, Claims};
