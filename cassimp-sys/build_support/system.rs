use std::path::PathBuf;

use crate::build_support::{
    config::BuildConfig,
    plan::{BuildMethod, BuildPlan, LinkKind},
    util,
    version::AssimpVersion,
};

pub fn probe_vcpkg(cfg: &BuildConfig, link_kind: LinkKind) -> BuildPlan {
    let mut vcpkg_cfg = vcpkg::Config::new();
    vcpkg_cfg.emit_includes(true);

    // Match Rust's CRT choice unless the user picked a triplet.
    if (cfg.use_static_crt() || matches!(link_kind, LinkKind::Static))
        && std::env::var("VCPKGRS_TRIPLET").is_err()
    {
        if let Some(triplet) = default_vcpkg_static_triplet(&cfg.target) {
            vcpkg_cfg.target_triplet(triplet);
        }
    }

    let lib = vcpkg_cfg.find_package("assimp").unwrap_or_else(|e| {
        panic!(
            "system linking (vcpkg) failed: {e}\n\
             Hint: install assimp via vcpkg and set VCPKG_ROOT.\n\
             If you're using `crt-static`, prefer a `*-windows-static` triplet (e.g. `x64-windows-static`)."
        )
    });

    let include_dirs = lib.include_paths.to_vec();
    if include_dirs.is_empty() {
        util::warn("vcpkg returned no include paths for assimp; bindgen may fail");
    }

    BuildPlan {
        include_dirs,
        link_kind,
        link_lib: None, // vcpkg emits all rustc link flags
        link_search: Vec::new(),
        method: BuildMethod::System,
        reported_version: None,
    }
}

pub fn probe_pkg_config(link_kind: LinkKind) -> BuildPlan {
    let lib = pkg_config::Config::new()
        .statik(matches!(link_kind, LinkKind::Static))
        .probe("assimp")
        .unwrap_or_else(|e| {
            panic!(
                "system linking (pkg-config) failed: {e}\n\
                 Hint: install assimp (`apt install libassimp-dev`, `brew install assimp`) \
                 and ensure pkg-config can find assimp.pc."
            )
        });

    let mut include_dirs = lib.include_paths.clone();
    if include_dirs.is_empty() {
        // pkg-config omits default system include dirs; revision.h still lives there.
        util::warn("pkg-config returned no include paths for assimp; using common include roots");
        include_dirs = common_include_roots();
    }

    BuildPlan {
        include_dirs,
        link_kind,
        link_lib: None, // pkg-config emits all rustc link flags
        link_search: Vec::new(),
        method: BuildMethod::System,
        reported_version: AssimpVersion::parse(&lib.version),
    }
}

fn default_vcpkg_static_triplet(target: &str) -> Option<&'static str> {
    if target.starts_with("x86_64-") {
        Some("x64-windows-static")
    } else if target.starts_with("i686-") {
        Some("x86-windows-static")
    } else if target.starts_with("aarch64-") {
        Some("arm64-windows-static")
    } else {
        None
    }
}

fn common_include_roots() -> Vec<PathBuf> {
    [
        "/usr/include",
        "/usr/local/include",
        "/opt/homebrew/include",
        "/opt/local/include",
    ]
    .iter()
    .map(PathBuf::from)
    .filter(|p| p.join("assimp").exists())
    .collect()
}

