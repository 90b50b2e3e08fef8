//! Model module.
//!
//! Contains domain entities and repository pattern for data access.

pub mod account;
pub mod permission;
pub mod project;
pub mod resource;

pub use account::*;
pub use permission::*;
pub use project::*;
pub use resource::*;
