mod build_support;

use build_support::{bindings, config::BuildConfig, plan, system_deps, version};

fn main() {
    let cfg = BuildConfig::new();
    cfg.emit_rerun_triggers();

    let plan = plan::resolve(&cfg);

    // Refuse to generate a surface for headers outside the pinned range.
    let assimp_version = version::require_supported(&plan);
    version::write_version_file(&cfg, assimp_version);

    system_deps::emit(&cfg, &plan);
    plan.emit_link(&cfg);

    bindings::run(&cfg, &plan);
}
