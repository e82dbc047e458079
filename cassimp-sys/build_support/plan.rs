use std::path::PathBuf;

use crate::build_support::{config::BuildConfig, system, util, version::AssimpVersion};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkKind {
    Static,
    Dynamic,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BuildMethod {
    /// Paths supplied through `CASSIMP_INCLUDE_DIR` / `CASSIMP_LIB_DIR`.
    Manual,
    /// pkg-config on Unix-like hosts, vcpkg on MSVC.
    System,
}

#[derive(Clone, Debug)]
pub struct BuildPlan {
    pub include_dirs: Vec<PathBuf>,
    pub link_kind: LinkKind,
    /// `None` when the discovery tool already emitted the link flags.
    pub link_lib: Option<String>,
    pub link_search: Vec<PathBuf>,
    pub method: BuildMethod,
    /// Version reported by the discovery tool, if any.
    pub reported_version: Option<AssimpVersion>,
}

impl BuildPlan {
    pub fn emit_link(&self, cfg: &BuildConfig) {
        for p in &self.link_search {
            println!("cargo:rustc-link-search=native={}", p.display());
        }
        if let Some(lib) = &self.link_lib {
            match self.link_kind {
                LinkKind::Static => println!("cargo:rustc-link-lib=static={}", lib),
                LinkKind::Dynamic => println!("cargo:rustc-link-lib={}", lib),
            }
        }

        // DEP_ASSIMP_INCLUDE / DEP_ASSIMP_INCLUDE_PATHS for dependent build scripts
        if let Some(first) = self.include_dirs.first() {
            println!("cargo:include={}", first.display());
        }
        if let Some(joined) = util::join_paths_for_env(&self.include_dirs) {
            println!("cargo:include_paths={}", joined);
        }

        if cfg.verbose {
            util::warn(format!(
                "Assimp plan: method={:?} link_kind={:?} lib={:?}",
                self.method, self.link_kind, self.link_lib
            ));
            for p in &self.include_dirs {
                util::warn(format!("Assimp include: {}", p.display()));
            }
            for p in &self.link_search {
                util::warn(format!("Assimp link search: {}", p.display()));
            }
        }
    }
}

pub fn resolve(cfg: &BuildConfig) -> BuildPlan {
    let link_kind = if cfg.static_link {
        LinkKind::Static
    } else {
        LinkKind::Dynamic
    };

    if let Some(manual) = &cfg.manual {
        return BuildPlan {
            include_dirs: vec![manual.include_dir.clone()],
            link_kind,
            link_lib: Some(manual.lib_name.clone()),
            link_search: vec![manual.lib_dir.clone()],
            method: BuildMethod::Manual,
            reported_version: None,
        };
    }

    if cfg.is_mobile() {
        panic!(
            "no system discovery is available for target `{}`.\n\
             Hint: cross-build Assimp for this target and set CASSIMP_INCLUDE_DIR and CASSIMP_LIB_DIR.",
            cfg.target
        );
    }

    if cfg.is_windows() && cfg.is_msvc() {
        system::probe_vcpkg(cfg, link_kind)
    } else {
        system::probe_pkg_config(link_kind)
    }
}
