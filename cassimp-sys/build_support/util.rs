use std::path::PathBuf;

/// Surfaces a message in cargo's output without failing the build.
pub fn warn(message: impl AsRef<str>) {
    println!("cargo:warning={}", message.as_ref());
}

/// Joins include paths with the host's separator for `cargo:include_paths`.
pub fn join_paths_for_env(paths: &[PathBuf]) -> Option<String> {
    if paths.is_empty() {
        return None;
    }
    std::env::join_paths(paths)
        .ok()
        .map(|v| v.to_string_lossy().into_owned())
}
