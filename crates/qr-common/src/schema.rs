//! Schema versioning for JSON exports.

/// Current schema version for replay export files.
///
/// Follows semver: breaking field changes bump MAJOR, additive optional
/// fields bump MINOR.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Check whether an export written under `version` can still be loaded.
/// Only the major component matters.
pub fn is_compatible(version: &str) -> bool {
    major_of(version) == major_of(SCHEMA_VERSION)
}

fn major_of(version: &str) -> u32 {
    version
        .split('.')
        .next()
        .and_then(|s| s.parse::<u32>().ok())
        .unwrap_or(0)
}
