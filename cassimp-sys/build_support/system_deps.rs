use crate::build_support::{config::BuildConfig, plan::BuildPlan, plan::LinkKind};

/// Assimp is C++; a static archive needs the C++ runtime from us.
/// Dynamic builds get it through the shared library's own dependencies.
pub fn emit(cfg: &BuildConfig, plan: &BuildPlan) {
    if plan.link_kind == LinkKind::Dynamic {
        return;
    }

    if cfg.is_windows() {
        if !cfg.is_msvc() {
            // MinGW
            println!("cargo:rustc-link-lib=stdc++");
        }
        return;
    }

    if cfg.is_apple() {
        println!("cargo:rustc-link-lib=c++");
        return;
    }

    // Linux/BSD
    println!("cargo:rustc-link-lib=stdc++");
}
