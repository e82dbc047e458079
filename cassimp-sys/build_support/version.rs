use std::path::PathBuf;

pub use crate::build_support::assimp_version::{AssimpVersion, MAJOR_CEILING, MIN_SUPPORTED};
use crate::build_support::{config::BuildConfig, plan::BuildPlan, util};

/// Determines the header version and fails the build when it is outside the
/// supported range. Headers win over the pkg-config report because bindgen
/// reads the headers.
pub fn require_supported(plan: &BuildPlan) -> AssimpVersion {
    let from_headers = read_revision_header(&plan.include_dirs);

    if let (Some(headers), Some(reported)) = (from_headers, plan.reported_version) {
        if (headers.major, headers.minor) != (reported.major, reported.minor) {
            panic!(
                "Assimp headers ({headers}) do not match the library reported by the discovery tool ({reported}).\n\
                 Hint: the include path and the linked library come from different installations; \
                 fix PKG_CONFIG_PATH or set CASSIMP_INCLUDE_DIR / CASSIMP_LIB_DIR explicitly."
            );
        }
    }

    let Some(version) = from_headers.or(plan.reported_version) else {
        panic!(
            "could not determine the Assimp version (no assimp/revision.h under {:?} and no pkg-config version).\n\
             Hint: install the Assimp development headers; the declaration surface is pinned to Assimp >= {}.{}, < {}.",
            plan.include_dirs, MIN_SUPPORTED.0, MIN_SUPPORTED.1, MAJOR_CEILING
        );
    };

    if !version.is_supported() {
        panic!(
            "unsupported Assimp version {version}. The declaration surface is pinned to Assimp >= {}.{}, < {}.\n\
             Hint: install a supported Assimp and make sure pkg-config / vcpkg / CASSIMP_INCLUDE_DIR finds it first.",
            MIN_SUPPORTED.0, MIN_SUPPORTED.1, MAJOR_CEILING
        );
    }

    version
}

/// Writes `assimp_version.rs` for `include!` from the crate.
pub fn write_version_file(cfg: &BuildConfig, version: AssimpVersion) {
    let contents = format!(
        "/// Version of the Assimp headers the bindings were generated from.\n\
         pub const HEADER_VERSION: (u32, u32, u32) = ({}, {}, {});\n",
        version.major, version.minor, version.patch
    );
    let path = cfg.out_dir.join("assimp_version.rs");
    std::fs::write(&path, contents)
        .unwrap_or_else(|e| panic!("failed to write {}: {e}", path.display()));

    if cfg.verbose {
        util::warn(format!("Assimp header version: {version}"));
    }
}

fn read_revision_header(include_dirs: &[PathBuf]) -> Option<AssimpVersion> {
    include_dirs.iter().find_map(|dir| {
        let contents = std::fs::read_to_string(dir.join("assimp").join("revision.h")).ok()?;
        AssimpVersion::from_revision_header(&contents)
    })
}
