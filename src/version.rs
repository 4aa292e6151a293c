//! Build and git metadata, embedded at compile time.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA (short) at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Full version string for startup logs: `{version}+{branch}.{sha}`, with a
/// `.dirty` suffix when the working tree had uncommitted changes at build
/// time (e.g. `0.3.0+main.abc1234`).
pub fn version_string() -> String {
    let sha = &GIT_SHA[..GIT_SHA.len().min(7)];
    let mut version = format!("{PKG_VERSION}+{GIT_BRANCH}.{sha}");
    if option_env!("VERGEN_GIT_DIRTY") == Some("true") {
        version.push_str(".dirty");
    }
    version
}
