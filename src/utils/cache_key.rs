//! Cache key derivation module.

use xxhash_rust::xxh3::xxh3_128;

/// Derives the Redis key for a cached menu evaluation.
///
/// The key covers the caller, the current project, the resource path and
/// the resource's last-modified timestamp, so any edit to the resource
/// naturally invalidates the cached verdicts.
#[must_use]
pub fn menu_cache_key(username: &str, project: &str, path: &str, updated_at: i64) -> String {
    let input = format!("{username}:{project}:{path}:{updated_at}");
    format!("menu:{:032x}", xxh3_128(input.as_bytes()))
}
