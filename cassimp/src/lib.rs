//! # cassimp
//!
//! Safe Rust bindings over the version-pinned Assimp C API exposed by
//! [`cassimp-sys`](sys).
//!
//! A [`Scene`] owns the imported data; every view into it ([`Mesh`],
//! [`Node`], [`Material`], ...) borrows from the scene and is freed with it.
//! Vertex arrays are handed out as slices of the native memory where the
//! layout allows it.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use cassimp::{Importer, PostProcessSteps};
//!
//! # fn main() -> cassimp::Result<()> {
//! let scene = Importer::new()
//!     .read_file("model.fbx")
//!     .with_post_process(PostProcessSteps::TRIANGULATE | PostProcessSteps::FLIP_UVS)
//!     .import()?;
//!
//! for mesh in scene.meshes() {
//!     println!("{}: {} vertices", mesh.name(), mesh.num_vertices());
//! }
//! if let Some(root) = scene.root_node() {
//!     print!("{root}");
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Features
//!
//! - `mint`: conversions between the math types and `mint`
//! - `bytemuck`: byte views of vertex and index data
//! - `static-link`: link Assimp statically where the discovery tool allows it

#![deny(unsafe_op_in_unsafe_fn)]
#![warn(missing_docs)]

pub use cassimp_sys as sys;

pub use crate::{
    aabb::Aabb,
    animation::{AnimBehaviour, Animation, MeshAnim, MorphMeshAnim, NodeAnim, QuatKey, VectorKey},
    bone::{Bone, VertexWeight},
    camera::Camera,
    error::{Error, Result},
    exporter::{ExportBlob, ExportFormatDesc, Exporter, export_formats},
    importer::{ConfigValue, ImportBuilder, Importer, PropertyStore, import_properties},
    importer_desc::{ImporterDesc, ImporterFlags, import_formats, importer_descriptor},
    light::{Light, LightType},
    material::{
        MatKey, Material, MaterialProperty, PropertyValue, ShadingMode, TextureInfo, TextureType,
    },
    mesh::{AnimMesh, Face, Mesh, MorphingMethod, PrimitiveTypes},
    metadata::{Metadata, MetadataValue},
    node::Node,
    postprocess::PostProcessSteps,
    scene::{MemoryInfo, Scene, SceneFlags},
    texture::{Texel, Texture},
    types::*,
};

pub mod error;
pub mod importer;
pub mod importer_desc;
pub mod scene;
pub mod types;

pub mod animation;
pub mod camera;
pub mod light;
pub mod material;
pub mod mesh;
pub mod node;

pub mod aabb;
pub mod bone;
pub mod metadata;
pub mod texture;

pub mod exporter;
pub mod io;
pub mod logging;

pub mod math;
pub mod postprocess;

mod ffi;

/// Version and build information of the linked library
pub mod version {
    use bitflags::bitflags;

    use crate::{error::c_str_to_string_or_empty, sys};

    /// Version of this crate
    pub const CRATE_VERSION: &str = env!("CARGO_PKG_VERSION");

    bitflags! {
        /// `ASSIMP_CFLAGS_*` as returned by `aiGetCompileFlags`
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub struct CompileFlags: u32 {
            /// Built as a shared library
            const SHARED = sys::ASSIMP_CFLAGS_SHARED;
            /// Built against STLport
            const STLPORT = sys::ASSIMP_CFLAGS_STLPORT;
            /// Debug build
            const DEBUG = sys::ASSIMP_CFLAGS_DEBUG;
            /// Built without Boost
            const NOBOOST = sys::ASSIMP_CFLAGS_NOBOOST;
            /// Built without threading support
            const SINGLETHREADED = sys::ASSIMP_CFLAGS_SINGLETHREADED;
            /// `ai_real` is `double`
            const DOUBLE_SUPPORT = sys::ASSIMP_CFLAGS_DOUBLE_SUPPORT;
        }
    }

    /// Major version
    pub fn major() -> u32 {
        unsafe { sys::aiGetVersionMajor() }
    }

    /// Minor version
    pub fn minor() -> u32 {
        unsafe { sys::aiGetVersionMinor() }
    }

    /// Abbreviated git commit hash the library was built from
    pub fn revision() -> u32 {
        unsafe { sys::aiGetVersionRevision() }
    }

    /// Branch the library was built from; may be empty
    pub fn branch() -> String {
        c_str_to_string_or_empty(unsafe { sys::aiGetBranchName() })
    }

    /// Copyright and license notice
    pub fn legal_string() -> String {
        c_str_to_string_or_empty(unsafe { sys::aiGetLegalString() })
    }

    /// Build configuration
    pub fn compile_flags() -> CompileFlags {
        CompileFlags::from_bits_retain(unsafe { sys::aiGetCompileFlags() })
    }

    /// `"major.minor.revision"` with the revision in lowercase hex, since it
    /// is a git commit hash; e.g. `"5.4.8d2b1ab"`
    pub fn string() -> String {
        format!("{}.{}.{:x}", major(), minor(), revision())
    }

    /// Version of the headers the bindings were generated from
    pub fn header_version() -> (u32, u32, u32) {
        sys::HEADER_VERSION
    }
}

/// Whether an importer is registered for `extension` (`"obj"`, `".obj"` or
/// `"*.obj"`, any case)
pub fn can_import_file_extension(extension: &str) -> bool {
    importer_descriptor(extension).is_some()
}

/// Whether Assimp's own extension check accepts `extension`
pub fn is_extension_supported(extension: &str) -> bool {
    let ext = importer_desc::normalize_extension(extension);
    match std::ffi::CString::new(format!(".{ext}")) {
        Ok(ext) => unsafe { sys::aiIsExtensionSupported(ext.as_ptr()) == sys::AI_TRUE as sys::aiBool },
        Err(_) => false,
    }
}

/// Every extension some importer claims, sorted and without duplicates
pub fn import_file_extensions() -> Vec<String> {
    let mut extensions: Vec<String> = import_formats()
        .into_iter()
        .flat_map(|desc| desc.file_extensions)
        .map(|ext| ext.to_ascii_lowercase())
        .collect();
    extensions.sort();
    extensions.dedup();
    extensions
}

/// Every extension some exporter writes, sorted and without duplicates
pub fn export_file_extensions() -> Vec<String> {
    let mut extensions: Vec<String> = export_formats()
        .into_iter()
        .map(|desc| desc.file_extension.to_ascii_lowercase())
        .filter(|ext| !ext.is_empty())
        .collect();
    extensions.sort();
    extensions.dedup();
    extensions
}

/// Turn Assimp's debug-level log output on or off
pub fn enable_verbose_logging(enable: bool) {
    logging::set_verbose(enable);
}
