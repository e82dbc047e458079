pub mod assimp_version;
pub mod bindings;
pub mod config;
pub mod plan;
pub mod system;
pub mod system_deps;
pub mod util;
pub mod version;
