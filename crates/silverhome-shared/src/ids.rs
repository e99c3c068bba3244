//! Record identifier generation.
//!
//! Identifiers are opaque strings of the form `prefix-<uuid>`. The prefix
//! keeps documents human-readable; the UUID makes rapid successive creation
//! collision-free, which a clock-based suffix is not.

use uuid::Uuid;

/// Generate a fresh identifier with the given collection prefix,
/// e.g. `req-67e55044f81d4fae8b1fd0a665f1e6f3`.
pub fn new_id(prefix: &str) -> String {
    format!("{prefix}-{}", Uuid::new_v4().simple())
}
