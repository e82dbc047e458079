use std::path::PathBuf;

use crate::build_support::{config::BuildConfig, plan::BuildPlan};

pub fn run(cfg: &BuildConfig, plan: &BuildPlan) {
    let wrapper_h = cfg.manifest_dir.join("wrapper.h");
    let include_dirs = ensure_config_h(cfg, &plan.include_dirs);

    let mut builder = bindgen::Builder::default()
        .header(wrapper_h.to_string_lossy())
        .parse_callbacks(Box::new(bindgen::CargoCallbacks::new()));

    for dir in &include_dirs {
        builder = builder.clang_arg(format!("-I{}", dir.display()));
    }

    builder = builder
        .allowlist_function("ai.*")
        .allowlist_type("ai.*")
        .allowlist_var("ai.*")
        .allowlist_var("AI_.*")
        .allowlist_var("ASSIMP_CFLAGS_.*")
        .derive_default(true)
        .derive_debug(true)
        .derive_copy(true)
        .derive_partialeq(true)
        .prepend_enum_name(false)
        .layout_tests(false)
        // Every C enum becomes `pub mod aiFoo { pub type Type; pub const ...; }`
        // so a whole enum is re-exported through one name.
        .default_enum_style(bindgen::EnumVariation::ModuleConsts)
        // Only values produced by Assimp itself are matched on.
        .rustified_enum("aiReturn")
        .rustified_enum("aiOrigin");

    let bindings = builder.generate().unwrap_or_else(|e| {
        panic!(
            "unable to generate Assimp bindings: {e}\n\
             Hint: bindgen needs libclang (set LIBCLANG_PATH) and the Assimp headers under {:?}.",
            include_dirs
        )
    });

    let out_file = cfg.out_dir.join("bindings.rs");
    bindings
        .write_to_file(&out_file)
        .unwrap_or_else(|e| panic!("couldn't write {}: {e}", out_file.display()));
}

/// Some packagers ship only `config.h.in`; bindgen needs a parsable `config.h`.
fn ensure_config_h(cfg: &BuildConfig, include_dirs: &[PathBuf]) -> Vec<PathBuf> {
    let has = |name: &str| {
        include_dirs
            .iter()
            .any(|d| d.join("assimp").join(name).exists())
    };
    if has("config.h") || !has("config.h.in") {
        return include_dirs.to_vec();
    }

    let out_include_root = cfg.out_dir.join("include");
    let out_assimp_dir = out_include_root.join("assimp");
    let out_config_h = out_assimp_dir.join("config.h");

    let template = include_dirs
        .iter()
        .find_map(|d| std::fs::read_to_string(d.join("assimp").join("config.h.in")).ok())
        .unwrap_or_default();
    // config.h.in only carries `#cmakedefine` switches on top of the AI_CONFIG_* keys.
    let generated: String = template
        .lines()
        .map(|line| {
            if line.trim_start().starts_with("#cmakedefine") {
                "\n".to_string()
            } else {
                format!("{line}\n")
            }
        })
        .collect();

    if std::fs::create_dir_all(&out_assimp_dir).is_err()
        || std::fs::write(&out_config_h, generated).is_err()
    {
        return include_dirs.to_vec();
    }

    let mut out = Vec::with_capacity(include_dirs.len() + 1);
    out.push(out_include_root);
    out.extend_from_slice(include_dirs);
    out
}
