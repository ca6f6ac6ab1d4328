//! Schema versioning and compatibility.

/// Current schema version for run manifests and sweep exports.
///
/// Follows semver: MAJOR.MINOR.PATCH
/// - MAJOR: Breaking changes (field removals, type changes)
/// - MINOR: Additive changes (new optional fields)
/// - PATCH: Bug fixes, documentation
///
/// Threshold cards carry no version field; their field names are fixed.
pub const SCHEMA_VERSION: &str = "1.0.0";

/// Check if a schema version is compatible with current.
pub fn is_compatible(version: &str) -> bool {
    let current_major = major(SCHEMA_VERSION);
    let other_major = major(version);
    current_major.is_some() && current_major == other_major
}

fn major(version: &str) -> Option<u32> {
    version.split('.').next()?.parse().ok()
}
