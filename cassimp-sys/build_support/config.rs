use std::{env, path::PathBuf};

#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub manifest_dir: PathBuf,
    pub out_dir: PathBuf,
    pub target: String,
    pub target_os: String,
    pub target_env: String,
    pub target_features: String,
    pub verbose: bool,
    pub static_link: bool,
    /// `CASSIMP_INCLUDE_DIR` / `CASSIMP_LIB_DIR` override.
    pub manual: Option<ManualPaths>,
}

#[derive(Clone, Debug)]
pub struct ManualPaths {
    pub include_dir: PathBuf,
    pub lib_dir: PathBuf,
    pub lib_name: String,
}

impl BuildConfig {
    pub fn new() -> Self {
        let manual = match (env::var("CASSIMP_INCLUDE_DIR"), env::var("CASSIMP_LIB_DIR")) {
            (Ok(include), Ok(lib)) if !include.is_empty() && !lib.is_empty() => {
                Some(ManualPaths {
                    include_dir: PathBuf::from(include),
                    lib_dir: PathBuf::from(lib),
                    lib_name: env::var("CASSIMP_LIB_NAME")
                        .ok()
                        .filter(|v| !v.is_empty())
                        .unwrap_or_else(|| "assimp".to_string()),
                })
            }
            (Ok(_), Err(_)) | (Err(_), Ok(_)) => panic!(
                "CASSIMP_INCLUDE_DIR and CASSIMP_LIB_DIR must be set together.\n\
                 Hint: point both at the same Assimp installation, or unset both to use system discovery."
            ),
            _ => None,
        };

        Self {
            manifest_dir: PathBuf::from(required_env("CARGO_MANIFEST_DIR")),
            out_dir: PathBuf::from(required_env("OUT_DIR")),
            target: env::var("TARGET").unwrap_or_default(),
            target_os: env::var("CARGO_CFG_TARGET_OS").unwrap_or_default(),
            target_env: env::var("CARGO_CFG_TARGET_ENV").unwrap_or_default(),
            target_features: env::var("CARGO_CFG_TARGET_FEATURE").unwrap_or_default(),
            verbose: env::var("CASSIMP_VERBOSE").is_ok(),
            static_link: cfg!(feature = "static-link"),
            manual,
        }
    }

    pub fn is_windows(&self) -> bool {
        self.target_os == "windows"
    }

    pub fn is_apple(&self) -> bool {
        matches!(self.target_os.as_str(), "macos" | "ios" | "tvos" | "watchos" | "visionos")
    }

    pub fn is_mobile(&self) -> bool {
        matches!(self.target_os.as_str(), "ios" | "android" | "tvos" | "watchos" | "visionos")
    }

    pub fn is_msvc(&self) -> bool {
        self.target_env == "msvc"
    }

    pub fn use_static_crt(&self) -> bool {
        self.is_windows()
            && self.is_msvc()
            && self
                .target_features
                .split(',')
                .any(|f| f.trim() == "crt-static")
    }

    pub fn emit_rerun_triggers(&self) {
        println!("cargo:rerun-if-changed=build.rs");
        println!("cargo:rerun-if-changed=build_support");
        println!("cargo:rerun-if-changed=wrapper.h");

        // Manual discovery
        println!("cargo:rerun-if-env-changed=CASSIMP_INCLUDE_DIR");
        println!("cargo:rerun-if-env-changed=CASSIMP_LIB_DIR");
        println!("cargo:rerun-if-env-changed=CASSIMP_LIB_NAME");
        println!("cargo:rerun-if-env-changed=CASSIMP_VERBOSE");

        // System discovery knobs (pkg-config/vcpkg)
        println!("cargo:rerun-if-env-changed=PKG_CONFIG");
        println!("cargo:rerun-if-env-changed=PKG_CONFIG_PATH");
        println!("cargo:rerun-if-env-changed=PKG_CONFIG_LIBDIR");
        println!("cargo:rerun-if-env-changed=PKG_CONFIG_SYSROOT_DIR");
        println!("cargo:rerun-if-env-changed=VCPKG_ROOT");
        println!("cargo:rerun-if-env-changed=VCPKG_INSTALLATION_ROOT");
        println!("cargo:rerun-if-env-changed=VCPKG_INSTALLED_DIR");
        println!("cargo:rerun-if-env-changed=VCPKGRS_TRIPLET");
        println!("cargo:rerun-if-env-changed=VCPKGRS_DYNAMIC");

        // bindgen / libclang
        println!("cargo:rerun-if-env-changed=LIBCLANG_PATH");
        println!("cargo:rerun-if-env-changed=BINDGEN_EXTRA_CLANG_ARGS");
    }
}

fn required_env(name: &str) -> String {
    env::var(name).unwrap_or_else(|_| panic!("cargo did not set {name} for the build script"))
}
