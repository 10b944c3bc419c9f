//! Build metadata generated by the build script.

include!(concat!(env!("OUT_DIR"), "/version.rs"));

/// Build time string from the build script (UTC)
pub fn build_time() -> &'static str {
    BUILD_TIME
}

/// Short git hash captured by the build script, `unknown` outside a checkout
pub fn git_hash() -> &'static str {
    GIT_HASH
}

/// Crate version with build identification, e.g. `0.1.0 (a1b2c3d)`
pub fn version_line() -> String {
    format!("{} ({})", env!("CARGO_PKG_VERSION"), git_hash())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_line_names_build() {
        let line = version_line();
        assert!(line.starts_with(env!("CARGO_PKG_VERSION")), "got: {line}");
        assert!(line.ends_with(&format!("({})", git_hash())), "got: {line}");
        assert!(!git_hash().is_empty());
    }

    #[test]
    fn test_build_time_is_utc_timestamp() {
        assert!(build_time().ends_with(" UTC"), "got: {}", build_time());
    }
}
