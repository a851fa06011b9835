//! Detection of minikube releases whose Docker daemon breaks BuildKit.
//!
//! See <https://github.com/kubernetes/minikube/issues/4143>. It is hard to
//! tell from the upstream issue exactly when this was fixed; 1.8.0 is the
//! newest release known to still need the legacy builder.

use semver::Version;
use tracing::debug;

/// Newest minikube release whose Docker daemon cannot serve BuildKit builds.
///
/// Versions less than or equal to this one are flagged.
pub const MIN_BUILDKIT_MINIKUBE_VERSION: Version = Version::new(1, 8, 0);

/// Parses a version string leniently.
///
/// Surrounding whitespace and any leading non-numeric prefix (such as `v`)
/// are dropped, and missing minor or patch components are filled with zero,
/// so `v1.8` parses as `1.8.0`.
///
/// # Errors
///
/// Returns the underlying `semver` error when the remaining text is still not
/// a valid version.
pub fn parse_tolerant(raw: &str) -> Result<Version, semver::Error> {
    let trimmed = raw.trim().trim_start_matches(|c: char| !c.is_ascii_digit());

    let suffix_start = trimmed.find(['-', '+']).unwrap_or(trimmed.len());
    let (core, suffix) = trimmed.split_at(suffix_start);

    let padding = match core.matches('.').count() {
        0 => ".0.0",
        1 => ".0",
        _ => "",
    };

    Version::parse(&format!("{core}{padding}{suffix}"))
}

/// Returns whether a runtime reporting `raw` has the BuildKit defect.
///
/// This check is best effort: a version that cannot be parsed is logged at
/// debug level and treated as not affected.
#[must_use]
pub fn is_old_runtime(raw: &str) -> bool {
    match parse_tolerant(raw) {
        Ok(version) => MIN_BUILDKIT_MINIKUBE_VERSION >= version,
        Err(e) => {
            debug!(version = raw, error = %e, "parsing minikube version");
            false
        }
    }
}
