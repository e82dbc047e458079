//! Version-pinned FFI surface of the Assimp C API.
//!
//! The build script discovers an installed Assimp (pkg-config, vcpkg, or
//! `CASSIMP_INCLUDE_DIR` / `CASSIMP_LIB_DIR`), refuses anything outside the
//! supported version range, and generates bindings from its headers.
//!
//! Nothing is re-exported wholesale: each declaration category lives in its
//! own module (see [`surface`]) behind a feature of the same name, and the
//! crate root re-exports exactly the enumerated names of the enabled
//! categories. For safe, idiomatic Rust bindings, use the `cassimp` crate.

#![allow(non_upper_case_globals)]
#![allow(non_camel_case_types)]
#![allow(non_snake_case)]
#![allow(clippy::all)]
#![allow(unpredictable_function_pointer_comparisons)]

mod bindings {
    #![allow(dead_code)]
    #![allow(unused_imports)]
    include!(concat!(env!("OUT_DIR"), "/bindings.rs"));
}

pub mod surface;

pub use surface::*;

include!(concat!(env!("OUT_DIR"), "/assimp_version.rs"));

/// Version information for this crate
pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Major, minor and git revision of the Assimp library loaded at run time.
#[cfg(feature = "introspection")]
pub fn linked_version() -> (u32, u32, u32) {
    unsafe {
        (
            aiGetVersionMajor(),
            aiGetVersionMinor(),
            aiGetVersionRevision(),
        )
    }
}

/// Whether the loaded library has the same major and minor version as the
/// headers the bindings were generated from.
///
/// A mismatch means a different shared library was picked up at run time than
/// the one the build was pinned to.
#[cfg(feature = "introspection")]
pub fn linked_version_matches_headers() -> bool {
    let (major, minor, _) = linked_version();
    (major, minor) == (HEADER_VERSION.0, HEADER_VERSION.1)
}

mod test;

#[cfg(any(feature = "type-extensions", feature = "mint"))]
pub mod types;
