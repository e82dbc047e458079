//! Scene export to files, to memory blobs, and scene copies

use std::marker::PhantomData;
use std::path::Path;
use std::ptr::NonNull;
use std::sync::Arc;

use log::debug;

use crate::{
    error::{Error, Result, c_str_to_string_or_empty, path_to_str, to_cstring},
    io::{FileIo, FileSystem},
    postprocess::PostProcessSteps,
    scene::Scene,
    sys,
    types::ai_string_to_string,
};

/// Format ids of commonly available exporters
pub mod formats {
    /// Wavefront OBJ with a `.mtl` library
    pub const OBJ: &str = "obj";
    /// COLLADA
    pub const COLLADA: &str = "collada";
    /// Stanford PLY, text
    pub const PLY: &str = "ply";
    /// Stanford PLY, binary
    pub const PLY_BINARY: &str = "plyb";
    /// STL, text
    pub const STL: &str = "stl";
    /// STL, binary
    pub const STL_BINARY: &str = "stlb";
    /// glTF 2.0 JSON
    pub const GLTF2: &str = "gltf2";
    /// glTF 2.0 binary
    pub const GLB2: &str = "glb2";
    /// Assimp's binary dump
    pub const ASSBIN: &str = "assbin";
}

/// One exporter of the linked library
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFormatDesc {
    /// Id passed to the export functions, such as `"obj"`
    pub id: String,
    /// Human-readable name
    pub description: String,
    /// Extension of the primary output file, without the dot
    pub file_extension: String,
}

impl ExportFormatDesc {
    fn from_raw(desc: &sys::aiExportFormatDesc) -> Self {
        Self {
            id: c_str_to_string_or_empty(desc.id),
            description: c_str_to_string_or_empty(desc.description),
            file_extension: c_str_to_string_or_empty(desc.fileExtension),
        }
    }
}

/// Every exporter compiled into the library
pub fn export_formats() -> Vec<ExportFormatDesc> {
    let count = unsafe { sys::aiGetExportFormatCount() };
    let mut formats = Vec::with_capacity(count);
    for i in 0..count {
        let desc = unsafe { sys::aiGetExportFormatDescription(i) };
        if let Some(raw) = unsafe { desc.as_ref() } {
            formats.push(ExportFormatDesc::from_raw(raw));
            unsafe { sys::aiReleaseExportFormatDescription(desc) };
        }
    }
    formats
}

fn check_format(format_id: &str) -> Result<()> {
    if export_formats().iter().any(|f| f.id == format_id) {
        Ok(())
    } else {
        Err(Error::unsupported_format(format_id))
    }
}

/// The result of [`Exporter::export_to_blob`]: the primary file followed by
/// any auxiliary files (an OBJ's `.mtl`, a glTF's `.bin`).
pub struct ExportBlob {
    head: NonNull<sys::aiExportDataBlob>,
}

// The chain is immutable once returned and freed only on drop.
unsafe impl Send for ExportBlob {}
unsafe impl Sync for ExportBlob {}

impl ExportBlob {
    /// The primary file
    pub fn primary(&self) -> BlobFile<'_> {
        BlobFile::new(unsafe { self.head.as_ref() })
    }

    /// Bytes of the primary file
    pub fn data(&self) -> &[u8] {
        self.primary().data()
    }

    /// Every file in the chain, primary first
    pub fn iter(&self) -> BlobFiles<'_> {
        BlobFiles {
            next: Some(self.head),
            _marker: PhantomData,
        }
    }

    /// Number of files in the chain
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always false; a blob holds at least the primary file
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl Drop for ExportBlob {
    fn drop(&mut self) {
        // Frees the whole chain.
        unsafe { sys::aiReleaseExportBlob(self.head.as_ptr()) };
    }
}

impl std::fmt::Debug for ExportBlob {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a ExportBlob {
    type Item = BlobFile<'a>;
    type IntoIter = BlobFiles<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// One file of an [`ExportBlob`]
#[derive(Clone, Copy)]
pub struct BlobFile<'a> {
    raw: &'a sys::aiExportDataBlob,
}

impl<'a> BlobFile<'a> {
    fn new(raw: &'a sys::aiExportDataBlob) -> Self {
        Self { raw }
    }

    /// Empty for the primary file; the auxiliary file's name or extension
    /// otherwise
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.name)
    }

    /// File contents
    pub fn data(&self) -> &'a [u8] {
        unsafe { crate::ffi::slice(self.raw.data.cast::<u8>(), self.raw.size) }
    }
}

impl std::fmt::Debug for BlobFile<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BlobFile")
            .field("name", &self.name())
            .field("size", &self.raw.size)
            .finish()
    }
}

/// Iterator over the files of an [`ExportBlob`]
pub struct BlobFiles<'a> {
    next: Option<NonNull<sys::aiExportDataBlob>>,
    _marker: PhantomData<&'a sys::aiExportDataBlob>,
}

impl<'a> Iterator for BlobFiles<'a> {
    type Item = BlobFile<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current: &'a sys::aiExportDataBlob = unsafe { self.next?.as_ref() };
        self.next = NonNull::new(current.next);
        Some(BlobFile::new(current))
    }
}

/// Export entry points
///
/// ```rust,no_run
/// use cassimp::{Exporter, PostProcessSteps, Scene};
///
/// # fn main() -> cassimp::Result<()> {
/// let scene = Scene::from_file("model.fbx", PostProcessSteps::TRIANGULATE)?;
/// Exporter::export_to_file(&scene, "obj", "model.obj", PostProcessSteps::empty())?;
///
/// let blob = Exporter::export_to_blob(&scene, "ply", PostProcessSteps::empty())?;
/// println!("{} bytes", blob.data().len());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Exporter;

impl Exporter {
    /// Write `scene` to `path` with the exporter `format_id`, running
    /// `steps` on a copy of the scene first
    pub fn export_to_file<P: AsRef<Path>>(
        scene: &Scene,
        format_id: &str,
        path: P,
        steps: PostProcessSteps,
    ) -> Result<()> {
        Self::export(scene, format_id, path.as_ref(), steps, None)
    }

    /// Like [`Exporter::export_to_file`], but every file is written through
    /// `fs`
    pub fn export_to_file_system<P: AsRef<Path>>(
        scene: &Scene,
        format_id: &str,
        path: P,
        steps: PostProcessSteps,
        fs: Arc<dyn FileSystem>,
    ) -> Result<()> {
        Self::export(scene, format_id, path.as_ref(), steps, Some(fs))
    }

    fn export(
        scene: &Scene,
        format_id: &str,
        path: &Path,
        steps: PostProcessSteps,
        fs: Option<Arc<dyn FileSystem>>,
    ) -> Result<()> {
        let steps = steps.validate()?;
        check_format(format_id)?;
        let target = path_to_str(path)?;
        let c_format = to_cstring(format_id, "format id")?;
        let c_path = to_cstring(target, "path")?;
        debug!("exporting to `{target}` as {format_id}");

        let status = match fs {
            Some(fs) => {
                let mut io = FileIo::new(fs);
                unsafe {
                    sys::aiExportSceneEx(
                        scene.as_raw(),
                        c_format.as_ptr(),
                        c_path.as_ptr(),
                        io.as_mut_ptr(),
                        steps.as_raw(),
                    )
                }
            }
            None => unsafe {
                sys::aiExportScene(scene.as_raw(), c_format.as_ptr(), c_path.as_ptr(), steps.as_raw())
            },
        };
        match status {
            sys::aiReturn::aiReturn_SUCCESS => Ok(()),
            _ => Err(Error::export_failed(crate::error::last_error_string())),
        }
    }

    /// Export `scene` into memory
    pub fn export_to_blob(scene: &Scene, format_id: &str, steps: PostProcessSteps) -> Result<ExportBlob> {
        let steps = steps.validate()?;
        check_format(format_id)?;
        let c_format = to_cstring(format_id, "format id")?;
        debug!("exporting to memory as {format_id}");
        let blob = unsafe { sys::aiExportSceneToBlob(scene.as_raw(), c_format.as_ptr(), steps.as_raw()) };
        let head = NonNull::new(blob.cast_mut())
            .ok_or_else(|| Error::export_failed(crate::error::last_error_string()))?;
        Ok(ExportBlob { head })
    }

    /// Deep copy of `scene`, owned independently of the original
    pub fn copy_scene(scene: &Scene) -> Result<Scene> {
        let mut copy: *mut sys::aiScene = std::ptr::null_mut();
        unsafe { sys::aiCopyScene(scene.as_raw(), &mut copy) };
        let copy = NonNull::new(copy).ok_or(Error::NullPointer)?;
        Ok(unsafe { Scene::from_copy(copy) })
    }

    /// Whether an exporter with id `format_id` exists
    pub fn supports(format_id: &str) -> bool {
        check_format(format_id).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::MemoryFileSystem;

    const QUAD: &[u8] = b"v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\nf 1 2 3 4\n";

    fn quad() -> Scene {
        Scene::from_memory(QUAD, Some("obj"), PostProcessSteps::TRIANGULATE).unwrap()
    }

    #[test]
    fn format_list_includes_obj() {
        let all = export_formats();
        let obj = all.iter().find(|f| f.id == formats::OBJ).unwrap();
        assert_eq!(obj.file_extension, "obj");
        assert!(Exporter::supports(formats::PLY));
        assert!(!Exporter::supports("no-such-format"));
    }

    #[test]
    fn blob_chain_holds_obj_and_mtl() {
        let blob = Exporter::export_to_blob(&quad(), formats::OBJ, PostProcessSteps::empty()).unwrap();
        let text = String::from_utf8_lossy(blob.data());
        assert!(text.contains("v "));
        assert!(blob.len() >= 2);
        assert!(blob.iter().skip(1).any(|f| f.name().contains("mtl")));
    }

    #[test]
    fn unknown_format_is_unsupported() {
        let err = Exporter::export_to_blob(&quad(), "no-such-format", PostProcessSteps::empty()).unwrap_err();
        assert!(matches!(err, Error::UnsupportedFormat { .. }));
    }

    #[test]
    fn export_through_memory_file_system() {
        let fs = MemoryFileSystem::new();
        Exporter::export_to_file_system(
            &quad(),
            formats::PLY,
            "out.ply",
            PostProcessSteps::empty(),
            Arc::new(fs.clone()),
        )
        .unwrap();
        let data = fs.file("out.ply").unwrap();
        assert!(data.starts_with(b"ply"));
    }

    #[test]
    fn copies_outlive_the_original() {
        let original = quad();
        let copy = Exporter::copy_scene(&original).unwrap();
        drop(original);
        assert_eq!(copy.num_meshes(), 1);
        assert_eq!(copy.mesh(0).unwrap().num_faces(), 2);
    }
}
