//! Workplace context-menu service.
//!
//! Evaluates which context-menu entries are shown, disabled or hidden for
//! a repository resource, based on the requesting user's roles, the active
//! project and the resource's state and permissions. Also serves the
//! module descriptor the workplace exports.

pub mod api;
pub mod config;
pub mod error;
pub mod menu;
pub mod models;
pub mod module;
pub mod utils;
