//! Owned scenes and the top-level accessors over them

use std::path::Path;
use std::ptr::NonNull;

use bitflags::bitflags;
use log::{debug, warn};

use crate::{
    animation::Animation,
    camera::Camera,
    error::{Error, Result},
    ffi::{self, PtrArray},
    importer::Importer,
    light::Light,
    material::Material,
    mesh::Mesh,
    metadata::Metadata,
    node::Node,
    postprocess::PostProcessSteps,
    sys,
    texture::Texture,
};

bitflags! {
    /// `AI_SCENE_FLAGS_*` as reported in `aiScene::mFlags`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct SceneFlags: u32 {
        /// Part of the data is missing (for example an animation-only file)
        const INCOMPLETE = sys::AI_SCENE_FLAGS_INCOMPLETE;
        /// The validation step ran without finding errors
        const VALIDATED = sys::AI_SCENE_FLAGS_VALIDATED;
        /// The validation step found non-fatal problems
        const VALIDATION_WARNING = sys::AI_SCENE_FLAGS_VALIDATION_WARNING;
        /// Vertices are shared between faces (`JOIN_IDENTICAL_VERTICES` ran)
        const NON_VERBOSE_FORMAT = sys::AI_SCENE_FLAGS_NON_VERBOSE_FORMAT;
        /// The scene is a terrain height map
        const TERRAIN = sys::AI_SCENE_FLAGS_TERRAIN;
        /// Meshes may be shared between nodes
        const ALLOW_SHARED = sys::AI_SCENE_FLAGS_ALLOW_SHARED;
    }
}

/// Bytes Assimp reports for each part of a scene (`aiGetMemoryRequirements`)
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct MemoryInfo {
    /// Embedded texture storage
    pub textures: u32,
    /// Material storage
    pub materials: u32,
    /// Mesh storage
    pub meshes: u32,
    /// Node storage
    pub nodes: u32,
    /// Animation storage
    pub animations: u32,
    /// Camera storage
    pub cameras: u32,
    /// Light storage
    pub lights: u32,
    /// Sum of all of the above
    pub total: u32,
}

impl From<sys::aiMemoryInfo> for MemoryInfo {
    fn from(info: sys::aiMemoryInfo) -> Self {
        Self {
            textures: info.textures,
            materials: info.materials,
            meshes: info.meshes,
            nodes: info.nodes,
            animations: info.animations,
            cameras: info.cameras,
            lights: info.lights,
            total: info.total,
        }
    }
}

/// Which native function frees the scene
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SceneOwner {
    /// Produced by an `aiImportFile*` call; freed with `aiReleaseImport`
    Import,
    /// Produced by `aiCopyScene`; freed with `aiFreeScene`
    Copy,
}

/// An imported scene.
///
/// Every view handed out ([`Mesh`], [`Node`], [`Material`], ...) borrows
/// from the scene and cannot outlive it. The native data is freed on drop.
pub struct Scene {
    ptr: NonNull<sys::aiScene>,
    owner: SceneOwner,
}

// Assimp never mutates a scene after the import call returns; all access
// through this type is read-only.
unsafe impl Send for Scene {}
unsafe impl Sync for Scene {}

impl Scene {
    /// Import a file with the given post-processing steps.
    ///
    /// ```rust,no_run
    /// use cassimp::{PostProcessSteps, Scene};
    ///
    /// # fn main() -> cassimp::Result<()> {
    /// let scene = Scene::from_file("model.obj", PostProcessSteps::TRIANGULATE)?;
    /// println!("{} meshes", scene.num_meshes());
    /// # Ok(())
    /// # }
    /// ```
    pub fn from_file<P: AsRef<Path>>(path: P, steps: PostProcessSteps) -> Result<Self> {
        Importer::new()
            .read_file(path)
            .with_post_process(steps)
            .import()
    }

    /// Import from a buffer. `hint` is a file extension such as `"obj"`
    /// that helps Assimp pick a loader.
    pub fn from_memory(data: &[u8], hint: Option<&str>, steps: PostProcessSteps) -> Result<Self> {
        let mut builder = Importer::new()
            .read_from_memory(data)
            .with_post_process(steps);
        if let Some(hint) = hint {
            builder = builder.with_hint(hint);
        }
        builder.import()
    }

    /// Take ownership of a scene returned by one of the import entry points.
    ///
    /// A null pointer becomes [`Error::ImportFailed`] with Assimp's last error
    /// message; an incomplete scene is released and reported as
    /// [`Error::ImportIncomplete`].
    ///
    /// # Safety
    /// `ptr` must be null or a scene returned by `aiImportFile*` that nothing
    /// else will release.
    pub(crate) unsafe fn from_import(ptr: *const sys::aiScene, source: &str) -> Result<Self> {
        let Some(ptr) = NonNull::new(ptr as *mut sys::aiScene) else {
            let err = Error::from_assimp();
            debug!("import of `{source}` failed: {err}");
            return Err(err);
        };
        let scene = Self {
            ptr,
            owner: SceneOwner::Import,
        };

        let flags = scene.flags();
        if flags.contains(SceneFlags::INCOMPLETE) {
            debug!("import of `{source}` returned an incomplete scene");
            // dropping releases it
            return Err(Error::ImportIncomplete {
                path: source.to_string(),
            });
        }
        if flags.contains(SceneFlags::VALIDATION_WARNING) {
            warn!("scene `{source}` imported with validation warnings");
        }
        debug!(
            "imported `{source}`: {} meshes, {} materials, {} animations",
            scene.num_meshes(),
            scene.num_materials(),
            scene.num_animations()
        );
        Ok(scene)
    }

    /// Wrap a scene produced by `aiCopyScene`.
    ///
    /// # Safety
    /// `ptr` must come from `aiCopyScene` and be owned by nothing else.
    pub(crate) unsafe fn from_copy(ptr: NonNull<sys::aiScene>) -> Self {
        Self {
            ptr,
            owner: SceneOwner::Copy,
        }
    }

    /// The underlying `aiScene`
    pub fn as_raw(&self) -> *const sys::aiScene {
        self.ptr.as_ptr()
    }

    fn raw(&self) -> &sys::aiScene {
        unsafe { self.ptr.as_ref() }
    }

    /// Scene flags
    pub fn flags(&self) -> SceneFlags {
        SceneFlags::from_bits_retain(self.raw().mFlags)
    }

    /// Run further post-processing on an imported scene.
    ///
    /// Consumes the scene. On failure Assimp has already freed it, so no
    /// scene is returned. Scenes made by [`crate::Exporter::copy_scene`] are
    /// rejected, because `aiApplyPostProcessing` only accepts imported ones.
    pub fn apply_post_processing(self, steps: PostProcessSteps) -> Result<Self> {
        if self.owner != SceneOwner::Import {
            return Err(Error::invalid_parameter(
                "post-processing can only be applied to imported scenes",
            ));
        }
        let steps = steps.validate()?;
        let result = unsafe { sys::aiApplyPostProcessing(self.ptr.as_ptr(), steps.as_raw()) };
        match NonNull::new(result as *mut sys::aiScene) {
            Some(ptr) => {
                // Assimp post-processes in place and returns the same scene.
                let owner = self.owner;
                std::mem::forget(self);
                Ok(Self { ptr, owner })
            }
            None => {
                std::mem::forget(self);
                Err(Error::from_assimp())
            }
        }
    }

    /// Memory used by each part of the scene
    pub fn memory_requirements(&self) -> MemoryInfo {
        let mut info = sys::aiMemoryInfo::default();
        unsafe { sys::aiGetMemoryRequirements(self.ptr.as_ptr(), &mut info) };
        MemoryInfo::from(info)
    }

    /// The root of the node hierarchy
    pub fn root_node(&self) -> Option<Node<'_>> {
        unsafe { ffi::deref(self.raw().mRootNode) }.map(Node::new)
    }

    /// Depth-first search for a node by name, starting at the root
    pub fn find_node(&self, name: &str) -> Option<Node<'_>> {
        self.root_node()?.find_node(name)
    }

    /// Scene-level metadata, if the importer provided any
    pub fn metadata(&self) -> Option<Metadata<'_>> {
        unsafe { ffi::deref(self.raw().mMetaData) }.map(Metadata::new)
    }

    /// The meshes `node` references, in the node's order
    pub fn meshes_for_node<'a>(&'a self, node: &Node<'a>) -> impl Iterator<Item = Mesh<'a>> + 'a {
        let indices = node.mesh_indices();
        indices.iter().filter_map(move |&i| self.mesh(i as usize))
    }

    /// Look up an embedded texture by the path a material refers to it with.
    ///
    /// Handles both `*N` index references and file names.
    pub fn embedded_texture(&self, path: &str) -> Option<Texture<'_>> {
        if let Some(index) = path.strip_prefix('*') {
            return self.texture(index.parse().ok()?);
        }
        let file = |p: &str| p.rsplit(['/', '\\']).next().unwrap_or_default().to_string();
        let wanted = file(path);
        self.textures()
            .find(|texture| file(&texture.filename()) == wanted)
    }
}

macro_rules! collection {
    (
        $has:ident, $num:ident, $get:ident, $iter:ident, $iter_raw:ident,
        $field:ident, $count:ident => $view:ident, $what:literal
    ) => {
        impl Scene {
            #[doc = concat!("Whether the scene contains any ", $what)]
            pub fn $has(&self) -> bool {
                self.$num() > 0
            }

            #[doc = concat!("Number of ", $what)]
            pub fn $num(&self) -> usize {
                if self.raw().$field.is_null() {
                    0
                } else {
                    self.raw().$count as usize
                }
            }

            #[doc = concat!("One of the ", $what, " by index")]
            pub fn $get(&self, index: usize) -> Option<$view<'_>> {
                self.$iter_raw().get(index).map($view::new)
            }

            #[doc = concat!("Iterate over all ", $what)]
            pub fn $iter(&self) -> impl ExactSizeIterator<Item = $view<'_>> + Clone + '_ {
                self.$iter_raw().map($view::new)
            }
        }
    };
}

impl Scene {
    fn meshes_raw(&self) -> PtrArray<'_, sys::aiMesh> {
        unsafe { PtrArray::new(self.raw().mMeshes, self.num_meshes()) }
    }

    fn materials_raw(&self) -> PtrArray<'_, sys::aiMaterial> {
        unsafe { PtrArray::new(self.raw().mMaterials, self.num_materials()) }
    }

    fn animations_raw(&self) -> PtrArray<'_, sys::aiAnimation> {
        unsafe { PtrArray::new(self.raw().mAnimations, self.num_animations()) }
    }

    fn textures_raw(&self) -> PtrArray<'_, sys::aiTexture> {
        unsafe { PtrArray::new(self.raw().mTextures, self.num_textures()) }
    }

    fn lights_raw(&self) -> PtrArray<'_, sys::aiLight> {
        unsafe { PtrArray::new(self.raw().mLights, self.num_lights()) }
    }

    fn cameras_raw(&self) -> PtrArray<'_, sys::aiCamera> {
        unsafe { PtrArray::new(self.raw().mCameras, self.num_cameras()) }
    }
}

collection!(has_meshes, num_meshes, mesh, meshes, meshes_raw, mMeshes, mNumMeshes => Mesh, "meshes");
collection!(has_materials, num_materials, material, materials, materials_raw, mMaterials, mNumMaterials => Material, "materials");
collection!(has_animations, num_animations, animation, animations, animations_raw, mAnimations, mNumAnimations => Animation, "animations");
collection!(has_textures, num_textures, texture, textures, textures_raw, mTextures, mNumTextures => Texture, "embedded textures");
collection!(has_lights, num_lights, light, lights, lights_raw, mLights, mNumLights => Light, "lights");
collection!(has_cameras, num_cameras, camera, cameras, cameras_raw, mCameras, mNumCameras => Camera, "cameras");

impl Drop for Scene {
    fn drop(&mut self) {
        match self.owner {
            SceneOwner::Import => unsafe { sys::aiReleaseImport(self.ptr.as_ptr()) },
            SceneOwner::Copy => unsafe { sys::aiFreeScene(self.ptr.as_ptr()) },
        }
    }
}

impl std::fmt::Debug for Scene {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Scene")
            .field("flags", &self.flags())
            .field("meshes", &self.num_meshes())
            .field("materials", &self.num_materials())
            .field("animations", &self.num_animations())
            .field("textures", &self.num_textures())
            .field("lights", &self.num_lights())
            .field("cameras", &self.num_cameras())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_OBJ: &[u8] = b"o tri\nv 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    #[test]
    fn flags_mirror_header_values() {
        assert_eq!(SceneFlags::INCOMPLETE.bits(), 0x1);
        assert_eq!(SceneFlags::VALIDATED.bits(), 0x2);
        assert_eq!(SceneFlags::VALIDATION_WARNING.bits(), 0x4);
        assert_eq!(SceneFlags::NON_VERBOSE_FORMAT.bits(), 0x8);
        assert_eq!(SceneFlags::TERRAIN.bits(), 0x10);
        assert_eq!(SceneFlags::ALLOW_SHARED.bits(), 0x20);
    }

    #[test]
    fn null_import_reports_assimp_error() {
        let err = unsafe { Scene::from_import(std::ptr::null(), "missing.obj") }.unwrap_err();
        assert!(matches!(err, Error::ImportFailed { .. }));
    }

    #[test]
    fn memory_import_exposes_collections() {
        let scene =
            Scene::from_memory(TRIANGLE_OBJ, Some("obj"), PostProcessSteps::empty()).unwrap();
        assert!(scene.has_meshes());
        assert_eq!(scene.meshes().len(), scene.num_meshes());
        assert!(scene.mesh(scene.num_meshes()).is_none());
        assert!(!scene.has_cameras());
        assert_eq!(scene.cameras().count(), 0);
        assert!(scene.memory_requirements().total > 0);
        assert!(scene.root_node().is_some());
    }

    #[test]
    fn copied_scene_rejects_post_processing() {
        let scene =
            Scene::from_memory(TRIANGLE_OBJ, Some("obj"), PostProcessSteps::empty()).unwrap();
        let copy = crate::Exporter::copy_scene(&scene).unwrap();
        let err = copy
            .apply_post_processing(PostProcessSteps::TRIANGULATE)
            .unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
    }

    #[test]
    fn post_processing_keeps_scene() {
        let scene =
            Scene::from_memory(TRIANGLE_OBJ, Some("obj"), PostProcessSteps::empty()).unwrap();
        let scene = scene
            .apply_post_processing(PostProcessSteps::GEN_SMOOTH_NORMALS)
            .unwrap();
        assert!(scene.mesh(0).unwrap().normals().is_some());
    }
}
