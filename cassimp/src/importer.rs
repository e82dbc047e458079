//! Scene import with post-processing, importer properties and custom I/O

use std::ffi::CString;
use std::os::raw::c_char;
use std::path::{Path, PathBuf};
use std::ptr::NonNull;
use std::sync::Arc;

use log::{debug, trace};

use crate::{
    error::{Error, Result, path_to_str, to_cstring},
    io::{FileIo, FileSystem},
    postprocess::PostProcessSteps,
    scene::Scene,
    sys,
    types::{Matrix4x4, ToSys, ai_string_from_str},
};

/// Importer property keys, taken from the `AI_CONFIG_*` macros of `config.h`
pub mod import_properties {
    use crate::{ffi::header_str, sys};

    /// Log the time each import step takes (`bool`)
    pub const MEASURE_TIME: &str = header_str(sys::AI_CONFIG_GLOB_MEASURE_TIME);
    /// Do not generate dummy meshes for skeleton-only files (`bool`)
    pub const NO_SKELETON_MESHES: &str = header_str(sys::AI_CONFIG_IMPORT_NO_SKELETON_MESHES);
    /// Maximum bones per mesh for `SPLIT_BY_BONE_COUNT` (`int`)
    pub const SPLIT_BY_BONE_COUNT_MAX_BONES: &str = header_str(sys::AI_CONFIG_PP_SBBC_MAX_BONES);
    /// Smoothing angle for `CALC_TANGENT_SPACE`, in degrees (`float`)
    pub const TANGENT_MAX_SMOOTHING_ANGLE: &str = header_str(sys::AI_CONFIG_PP_CT_MAX_SMOOTHING_ANGLE);
    /// UV channel `CALC_TANGENT_SPACE` works on (`int`)
    pub const TANGENT_TEXTURE_CHANNEL: &str = header_str(sys::AI_CONFIG_PP_CT_TEXTURE_CHANNEL_INDEX);
    /// Smoothing angle for `GEN_SMOOTH_NORMALS`, in degrees (`float`)
    pub const MAX_SMOOTHING_ANGLE: &str = header_str(sys::AI_CONFIG_PP_GSN_MAX_SMOOTHING_ANGLE);
    /// Materials `REMOVE_REDUNDANT_MATERIALS` must keep (`string`)
    pub const REMOVE_REDUNDANT_MATERIALS_EXCLUDE: &str = header_str(sys::AI_CONFIG_PP_RRM_EXCLUDE_LIST);
    /// Keep the hierarchy in `PRE_TRANSFORM_VERTICES` (`bool`)
    pub const PRE_TRANSFORM_KEEP_HIERARCHY: &str = header_str(sys::AI_CONFIG_PP_PTV_KEEP_HIERARCHY);
    /// Normalize to the unit cube in `PRE_TRANSFORM_VERTICES` (`bool`)
    pub const PRE_TRANSFORM_NORMALIZE: &str = header_str(sys::AI_CONFIG_PP_PTV_NORMALIZE);
    /// Apply [`PRE_TRANSFORM_ROOT_TRANSFORMATION`] (`bool`)
    pub const PRE_TRANSFORM_ADD_ROOT_TRANSFORMATION: &str =
        header_str(sys::AI_CONFIG_PP_PTV_ADD_ROOT_TRANSFORMATION);
    /// Root transformation for `PRE_TRANSFORM_VERTICES` (`matrix`)
    pub const PRE_TRANSFORM_ROOT_TRANSFORMATION: &str =
        header_str(sys::AI_CONFIG_PP_PTV_ROOT_TRANSFORMATION);
    /// Remove degenerate faces instead of converting them (`bool`)
    pub const REMOVE_DEGENERATE_FACES: &str = header_str(sys::AI_CONFIG_PP_FD_REMOVE);
    /// Nodes `OPTIMIZE_GRAPH` must keep (`string`)
    pub const OPTIMIZE_GRAPH_EXCLUDE: &str = header_str(sys::AI_CONFIG_PP_OG_EXCLUDE_LIST);
    /// Triangle limit for `SPLIT_LARGE_MESHES` (`int`)
    pub const SPLIT_LARGE_MESHES_TRIANGLE_LIMIT: &str = header_str(sys::AI_CONFIG_PP_SLM_TRIANGLE_LIMIT);
    /// Vertex limit for `SPLIT_LARGE_MESHES` (`int`)
    pub const SPLIT_LARGE_MESHES_VERTEX_LIMIT: &str = header_str(sys::AI_CONFIG_PP_SLM_VERTEX_LIMIT);
    /// Weights per vertex for `LIMIT_BONE_WEIGHTS` (`int`)
    pub const LIMIT_BONE_WEIGHTS_MAX: &str = header_str(sys::AI_CONFIG_PP_LBW_MAX_WEIGHTS);
    /// Threshold for `DEBONE` (`float`)
    pub const DEBONE_THRESHOLD: &str = header_str(sys::AI_CONFIG_PP_DB_THRESHOLD);
    /// `DEBONE` only if every bone qualifies (`bool`)
    pub const DEBONE_ALL_OR_NONE: &str = header_str(sys::AI_CONFIG_PP_DB_ALL_OR_NONE);
    /// Cache size for `IMPROVE_CACHE_LOCALITY` (`int`)
    pub const CACHE_LOCALITY_CACHE_SIZE: &str = header_str(sys::AI_CONFIG_PP_ICL_PTCACHE_SIZE);
    /// Components for `REMOVE_COMPONENT`, as `aiComponent` bits (`int`)
    pub const REMOVE_VERTEX_COMPONENTS: &str = header_str(sys::AI_CONFIG_PP_RVC_FLAGS);
    /// Primitive types `SORT_BY_PTYPE` drops (`int`)
    pub const SORT_BY_PTYPE_REMOVE: &str = header_str(sys::AI_CONFIG_PP_SBP_REMOVE);
    /// Accuracy for `FIND_INVALID_DATA` on animation keys (`float`)
    pub const FIND_INVALID_DATA_ANIM_ACCURACY: &str = header_str(sys::AI_CONFIG_PP_FID_ANIM_ACCURACY);
    /// UV transforms `TRANSFORM_UV_COORDS` evaluates (`int`)
    pub const TRANSFORM_UV_EVALUATE: &str = header_str(sys::AI_CONFIG_PP_TUV_EVALUATE);
    /// Prefer speed over quality where loaders offer the choice (`bool`)
    pub const FAVOUR_SPEED: &str = header_str(sys::AI_CONFIG_FAVOUR_SPEED);
    /// FBX: read every geometry layer (`bool`)
    pub const FBX_READ_ALL_GEOMETRY_LAYERS: &str =
        header_str(sys::AI_CONFIG_IMPORT_FBX_READ_ALL_GEOMETRY_LAYERS);
    /// FBX: read unreferenced materials too (`bool`)
    pub const FBX_READ_ALL_MATERIALS: &str = header_str(sys::AI_CONFIG_IMPORT_FBX_READ_ALL_MATERIALS);
    /// FBX: read materials (`bool`)
    pub const FBX_READ_MATERIALS: &str = header_str(sys::AI_CONFIG_IMPORT_FBX_READ_MATERIALS);
    /// FBX: read embedded textures (`bool`)
    pub const FBX_READ_TEXTURES: &str = header_str(sys::AI_CONFIG_IMPORT_FBX_READ_TEXTURES);
    /// FBX: read cameras (`bool`)
    pub const FBX_READ_CAMERAS: &str = header_str(sys::AI_CONFIG_IMPORT_FBX_READ_CAMERAS);
    /// FBX: read lights (`bool`)
    pub const FBX_READ_LIGHTS: &str = header_str(sys::AI_CONFIG_IMPORT_FBX_READ_LIGHTS);
    /// FBX: read animations (`bool`)
    pub const FBX_READ_ANIMATIONS: &str = header_str(sys::AI_CONFIG_IMPORT_FBX_READ_ANIMATIONS);
    /// FBX: reject files that deviate from the format (`bool`)
    pub const FBX_STRICT_MODE: &str = header_str(sys::AI_CONFIG_IMPORT_FBX_STRICT_MODE);
    /// FBX: keep pivot nodes (`bool`)
    pub const FBX_PRESERVE_PIVOTS: &str = header_str(sys::AI_CONFIG_IMPORT_FBX_PRESERVE_PIVOTS);
    /// FBX: drop animation curves that never change (`bool`)
    pub const FBX_OPTIMIZE_EMPTY_ANIMATION_CURVES: &str =
        header_str(sys::AI_CONFIG_IMPORT_FBX_OPTIMIZE_EMPTY_ANIMATION_CURVES);
    /// Keyframe to import for formats with a single-frame view (`int`)
    pub const GLOBAL_KEYFRAME: &str = header_str(sys::AI_CONFIG_IMPORT_GLOBAL_KEYFRAME);
    /// MD3: load multi-part models (`bool`)
    pub const MD3_HANDLE_MULTIPART: &str = header_str(sys::AI_CONFIG_IMPORT_MD3_HANDLE_MULTIPART);
    /// MD3: skin to load (`string`)
    pub const MD3_SKIN_NAME: &str = header_str(sys::AI_CONFIG_IMPORT_MD3_SKIN_NAME);
    /// LWO: load a single layer (`int` or `string`)
    pub const LWO_ONE_LAYER_ONLY: &str = header_str(sys::AI_CONFIG_IMPORT_LWO_ONE_LAYER_ONLY);
    /// IFC: skip `IfcSpace` geometry (`bool`)
    pub const IFC_SKIP_SPACE_REPRESENTATIONS: &str =
        header_str(sys::AI_CONFIG_IMPORT_IFC_SKIP_SPACE_REPRESENTATIONS);
    /// IFC: use the loader's own triangulation (`bool`)
    pub const IFC_CUSTOM_TRIANGULATION: &str = header_str(sys::AI_CONFIG_IMPORT_IFC_CUSTOM_TRIANGULATION);
    /// Collada: ignore `<up_axis>` (`bool`)
    pub const COLLADA_IGNORE_UP_DIRECTION: &str =
        header_str(sys::AI_CONFIG_IMPORT_COLLADA_IGNORE_UP_DIRECTION);
    /// Uniform scale applied by `GLOBAL_SCALE` (`float`)
    pub const GLOBAL_SCALE_FACTOR: &str = header_str(sys::AI_CONFIG_GLOBAL_SCALE_FACTOR_KEY);
    /// X file export: write 64-bit floats (`bool`)
    pub const EXPORT_XFILE_64BIT: &str = header_str(sys::AI_CONFIG_EXPORT_XFILE_64BIT);
}

/// A value stored under an importer property key
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    /// Set with `aiSetImportPropertyInteger`
    Integer(i32),
    /// Set with `aiSetImportPropertyFloat`
    Float(f32),
    /// Set with `aiSetImportPropertyString`
    String(String),
    /// An integer 0 or 1
    Boolean(bool),
    /// Set with `aiSetImportPropertyMatrix`
    Matrix(Matrix4x4),
}

impl From<i32> for ConfigValue {
    fn from(value: i32) -> Self {
        Self::Integer(value)
    }
}

impl From<f32> for ConfigValue {
    fn from(value: f32) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for ConfigValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<&str> for ConfigValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Matrix4x4> for ConfigValue {
    fn from(value: Matrix4x4) -> Self {
        Self::Matrix(value)
    }
}

/// A native `aiPropertyStore` together with a record of what was set.
///
/// The native store is created on the first write and released on drop.
/// Setting a key again overwrites the earlier value.
///
/// ```rust,no_run
/// use cassimp::{Importer, PropertyStore, import_properties};
///
/// # fn main() -> cassimp::Result<()> {
/// let mut store = PropertyStore::new();
/// store
///     .set_float(import_properties::MAX_SMOOTHING_ANGLE, 60.0)?
///     .set_bool(import_properties::FBX_PRESERVE_PIVOTS, false)?;
///
/// let scene = Importer::new()
///     .read_file("model.fbx")
///     .with_property_store(store)
///     .import()?;
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct PropertyStore {
    raw: Option<NonNull<sys::aiPropertyStore>>,
    entries: Vec<(String, ConfigValue)>,
}

// The native store is a plain map with no thread affinity.
unsafe impl Send for PropertyStore {}

impl PropertyStore {
    /// An empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `key` to `value`
    pub fn set(&mut self, key: &str, value: impl Into<ConfigValue>) -> Result<&mut Self> {
        let value = value.into();
        let name = to_cstring(key, "property name")?;
        let store = self.native()?;
        unsafe {
            match &value {
                ConfigValue::Integer(v) => sys::aiSetImportPropertyInteger(store, name.as_ptr(), *v),
                ConfigValue::Boolean(v) => {
                    sys::aiSetImportPropertyInteger(store, name.as_ptr(), i32::from(*v))
                }
                ConfigValue::Float(v) => sys::aiSetImportPropertyFloat(store, name.as_ptr(), *v),
                ConfigValue::String(v) => {
                    let text = ai_string_from_str(v).map_err(|e| match e {
                        Error::InvalidParameter { message } => {
                            Error::invalid_parameter(format!("value of property `{key}`: {message}"))
                        }
                        other => other,
                    })?;
                    sys::aiSetImportPropertyString(store, name.as_ptr(), &text)
                }
                ConfigValue::Matrix(m) => {
                    let matrix = m.to_sys();
                    sys::aiSetImportPropertyMatrix(store, name.as_ptr(), &matrix)
                }
            }
        }
        trace!("property `{key}` = {value:?}");
        match self.entries.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key.to_string(), value)),
        }
        Ok(self)
    }

    /// Set an integer property
    pub fn set_int(&mut self, key: &str, value: i32) -> Result<&mut Self> {
        self.set(key, value)
    }

    /// Set a float property
    pub fn set_float(&mut self, key: &str, value: f32) -> Result<&mut Self> {
        self.set(key, value)
    }

    /// Set a string property
    pub fn set_string(&mut self, key: &str, value: &str) -> Result<&mut Self> {
        self.set(key, value)
    }

    /// Set a boolean property (stored as 0 or 1)
    pub fn set_bool(&mut self, key: &str, value: bool) -> Result<&mut Self> {
        self.set(key, value)
    }

    /// Set a matrix property
    pub fn set_matrix(&mut self, key: &str, value: Matrix4x4) -> Result<&mut Self> {
        self.set(key, value)
    }

    /// The value last set for `key`
    pub fn get(&self, key: &str) -> Option<&ConfigValue> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Every key and value, in the order they were first set
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (&str, &ConfigValue)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Number of distinct keys
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been set
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn native(&mut self) -> Result<*mut sys::aiPropertyStore> {
        if let Some(raw) = self.raw {
            return Ok(raw.as_ptr());
        }
        let raw = NonNull::new(unsafe { sys::aiCreatePropertyStore() }).ok_or(Error::NullPointer)?;
        self.raw = Some(raw);
        Ok(raw.as_ptr())
    }

    /// The native store, or null when nothing was set
    pub(crate) fn as_ptr(&self) -> *const sys::aiPropertyStore {
        self.raw.map_or(std::ptr::null(), |raw| raw.as_ptr().cast_const())
    }
}

impl Drop for PropertyStore {
    fn drop(&mut self) {
        if let Some(raw) = self.raw.take() {
            unsafe { sys::aiReleasePropertyStore(raw.as_ptr()) };
        }
    }
}

impl std::fmt::Debug for PropertyStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

enum Source<'a> {
    File(PathBuf),
    Memory(&'a [u8]),
}

/// A configured import, started by [`Importer::read_file`] or
/// [`Importer::read_from_memory`].
///
/// Configuration errors (a key with a NUL byte, say) are held back and
/// reported by [`ImportBuilder::import`].
pub struct ImportBuilder<'a> {
    source: Source<'a>,
    steps: PostProcessSteps,
    properties: PropertyStore,
    file_system: Option<Arc<dyn FileSystem>>,
    hint: Option<String>,
    error: Option<Error>,
}

impl<'a> ImportBuilder<'a> {
    fn new(source: Source<'a>) -> Self {
        Self {
            source,
            steps: PostProcessSteps::empty(),
            properties: PropertyStore::new(),
            file_system: None,
            hint: None,
            error: None,
        }
    }

    /// Post-processing steps to run during the import
    pub fn with_post_process(mut self, steps: PostProcessSteps) -> Self {
        self.steps = steps;
        self
    }

    fn with_property(mut self, key: &str, value: ConfigValue) -> Self {
        if let Err(err) = self.properties.set(key, value) {
            self.error.get_or_insert(err);
        }
        self
    }

    /// Set an integer importer property
    pub fn with_property_int(self, key: &str, value: i32) -> Self {
        self.with_property(key, ConfigValue::Integer(value))
    }

    /// Set a float importer property
    pub fn with_property_float(self, key: &str, value: f32) -> Self {
        self.with_property(key, ConfigValue::Float(value))
    }

    /// Set a string importer property
    pub fn with_property_string(self, key: &str, value: &str) -> Self {
        self.with_property(key, ConfigValue::String(value.to_string()))
    }

    /// Set a boolean importer property
    pub fn with_property_bool(self, key: &str, value: bool) -> Self {
        self.with_property(key, ConfigValue::Boolean(value))
    }

    /// Set a matrix importer property
    pub fn with_property_matrix(self, key: &str, value: Matrix4x4) -> Self {
        self.with_property(key, ConfigValue::Matrix(value))
    }

    /// Use `store` for the import. Properties already set on the builder
    /// are applied on top of it.
    pub fn with_property_store(mut self, store: PropertyStore) -> Self {
        let earlier = std::mem::replace(&mut self.properties, store);
        for (key, value) in earlier.entries.iter() {
            self = self.with_property(key, value.clone());
        }
        self
    }

    /// Serve every file Assimp opens from `fs`. File imports only.
    pub fn with_file_system(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.file_system = Some(fs);
        self
    }

    /// File extension (`"obj"`, `"ply"`, ...) that tells Assimp which loader
    /// to use for a memory import. Ignored for file imports.
    pub fn with_hint(mut self, hint: &str) -> Self {
        self.hint = Some(hint.trim_start_matches("*.").trim_start_matches('.').to_string());
        self
    }

    /// Run the import
    pub fn import(self) -> Result<Scene> {
        if let Some(err) = self.error {
            return Err(err);
        }
        let steps = self.steps.validate()?;
        match self.source {
            Source::File(ref path) => {
                Self::import_file(path, steps, &self.properties, self.file_system.clone())
            }
            Source::Memory(data) => {
                if self.file_system.is_some() {
                    return Err(Error::invalid_parameter(
                        "a custom file system only applies to file imports",
                    ));
                }
                Self::import_memory(data, self.hint.as_deref(), steps, &self.properties)
            }
        }
    }

    fn import_file(
        path: &Path,
        steps: PostProcessSteps,
        properties: &PropertyStore,
        fs: Option<Arc<dyn FileSystem>>,
    ) -> Result<Scene> {
        let source = path_to_str(path)?;
        let c_path = to_cstring(source, "path")?;
        let mut file_io = fs.map(FileIo::new);
        let io_ptr = file_io
            .as_mut()
            .map_or(std::ptr::null_mut(), |io| io.as_mut_ptr());
        debug!(
            "importing `{source}` (steps {:#x}, {} properties, custom io: {})",
            steps.as_raw(),
            properties.len(),
            !io_ptr.is_null()
        );

        let scene = unsafe {
            match (properties.is_empty(), io_ptr.is_null()) {
                (true, true) => sys::aiImportFile(c_path.as_ptr(), steps.as_raw()),
                (true, false) => sys::aiImportFileEx(c_path.as_ptr(), steps.as_raw(), io_ptr),
                _ => sys::aiImportFileExWithProperties(
                    c_path.as_ptr(),
                    steps.as_raw(),
                    io_ptr,
                    properties.as_ptr(),
                ),
            }
        };
        // The table is only read during the call.
        drop(file_io);
        unsafe { Scene::from_import(scene, source) }
    }

    fn import_memory(
        data: &[u8],
        hint: Option<&str>,
        steps: PostProcessSteps,
        properties: &PropertyStore,
    ) -> Result<Scene> {
        let len = u32::try_from(data.len())
            .map_err(|_| Error::invalid_parameter("buffer is larger than 4 GiB"))?;
        let hint = hint.map(|h| to_cstring(h, "hint")).transpose()?;
        let hint_ptr = hint.as_ref().map_or(std::ptr::null(), CString::as_ptr);
        let source = match &hint {
            Some(h) => format!("<memory>.{}", h.to_string_lossy()),
            None => "<memory>".to_string(),
        };
        debug!(
            "importing {len} bytes as `{source}` (steps {:#x}, {} properties)",
            steps.as_raw(),
            properties.len()
        );

        let buffer = data.as_ptr().cast::<c_char>();
        let scene = unsafe {
            if properties.is_empty() {
                sys::aiImportFileFromMemory(buffer, len, steps.as_raw(), hint_ptr)
            } else {
                sys::aiImportFileFromMemoryWithProperties(
                    buffer,
                    len,
                    steps.as_raw(),
                    hint_ptr,
                    properties.as_ptr(),
                )
            }
        };
        unsafe { Scene::from_import(scene, &source) }
    }
}

/// Entry point for imports
///
/// ```rust,no_run
/// use cassimp::{Importer, PostProcessSteps, import_properties};
///
/// # fn main() -> cassimp::Result<()> {
/// let scene = Importer::new()
///     .read_file("model.obj")
///     .with_post_process(PostProcessSteps::TRIANGULATE | PostProcessSteps::GEN_SMOOTH_NORMALS)
///     .with_property_float(import_properties::MAX_SMOOTHING_ANGLE, 45.0)
///     .import()?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Default, Clone, Copy)]
pub struct Importer;

impl Importer {
    /// A new importer
    pub fn new() -> Self {
        Self
    }

    /// Start configuring an import of the file at `path`
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> ImportBuilder<'static> {
        ImportBuilder::new(Source::File(path.as_ref().to_path_buf()))
    }

    /// Start configuring an import from a buffer. Assimp detects the format
    /// from the content unless [`ImportBuilder::with_hint`] names it.
    pub fn read_from_memory<'a>(&self, data: &'a [u8]) -> ImportBuilder<'a> {
        ImportBuilder::new(Source::Memory(data))
    }
}
