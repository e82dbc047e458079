//! Every enumerated function is bound to a pointer of its exact C signature.
//! A renamed symbol or a changed signature fails to compile; a missing
//! export fails to link.

use std::os::raw::{c_char, c_int, c_uint};

use cassimp_sys::*;

#[cfg(feature = "import-export")]
#[test]
fn import_export_signatures() {
    let _: unsafe extern "C" fn(*const c_char, c_uint) -> *const aiScene = aiImportFile;
    let _: unsafe extern "C" fn(*const c_char, c_uint, *mut aiFileIO) -> *const aiScene =
        aiImportFileEx;
    let _: unsafe extern "C" fn(
        *const c_char,
        c_uint,
        *mut aiFileIO,
        *const aiPropertyStore,
    ) -> *const aiScene = aiImportFileExWithProperties;
    let _: unsafe extern "C" fn(*const c_char, c_uint, c_uint, *const c_char) -> *const aiScene =
        aiImportFileFromMemory;
    let _: unsafe extern "C" fn(
        *const c_char,
        c_uint,
        c_uint,
        *const c_char,
        *const aiPropertyStore,
    ) -> *const aiScene = aiImportFileFromMemoryWithProperties;
    let _: unsafe extern "C" fn(*const aiScene, c_uint) -> *const aiScene = aiApplyPostProcessing;
    let _: unsafe extern "C" fn(*const aiScene) = aiReleaseImport;
    let _: unsafe extern "C" fn() -> *const c_char = aiGetErrorString;
    let _: unsafe extern "C" fn(*const c_char) -> aiBool = aiIsExtensionSupported;
    let _: unsafe extern "C" fn(*mut aiString) = aiGetExtensionList;
    let _: unsafe extern "C" fn(*const aiScene, *mut aiMemoryInfo) = aiGetMemoryRequirements;

    let _: unsafe extern "C" fn() -> usize = aiGetExportFormatCount;
    let _: unsafe extern "C" fn(usize) -> *const aiExportFormatDesc = aiGetExportFormatDescription;
    let _: unsafe extern "C" fn(*const aiExportFormatDesc) = aiReleaseExportFormatDescription;
    let _: unsafe extern "C" fn(*const aiScene, *mut *mut aiScene) = aiCopyScene;
    let _: unsafe extern "C" fn(*const aiScene) = aiFreeScene;
    let _: unsafe extern "C" fn(*const aiScene, *const c_char, *const c_char, c_uint) -> aiReturn =
        aiExportScene;
    let _: unsafe extern "C" fn(
        *const aiScene,
        *const c_char,
        *const c_char,
        *mut aiFileIO,
        c_uint,
    ) -> aiReturn = aiExportSceneEx;
    let _: unsafe extern "C" fn(*const aiScene, *const c_char, c_uint) -> *const aiExportDataBlob =
        aiExportSceneToBlob;
    let _: unsafe extern "C" fn(*const aiExportDataBlob) = aiReleaseExportBlob;

    let _: unsafe extern "C" fn(aiDefaultLogStream::Type, *const c_char) -> aiLogStream =
        aiGetPredefinedLogStream;
    let _: unsafe extern "C" fn(*const aiLogStream) = aiAttachLogStream;
    let _: unsafe extern "C" fn(aiBool) = aiEnableVerboseLogging;
    let _: unsafe extern "C" fn(*const aiLogStream) -> aiReturn = aiDetachLogStream;
    let _: unsafe extern "C" fn() = aiDetachAllLogStreams;
    let _: aiLogStreamCallback = None::<unsafe extern "C" fn(*const c_char, *mut c_char)>;

    let _ = aiPostProcessSteps::aiProcess_Triangulate;
}

#[cfg(feature = "file-io")]
#[test]
fn file_io_callback_shapes() {
    let _: aiFileOpenProc =
        None::<unsafe extern "C" fn(*mut aiFileIO, *const c_char, *const c_char) -> *mut aiFile>;
    let _: aiFileCloseProc = None::<unsafe extern "C" fn(*mut aiFileIO, *mut aiFile)>;
    let _: aiFileReadProc = None::<unsafe extern "C" fn(*mut aiFile, *mut c_char, usize, usize) -> usize>;
    let _: aiFileWriteProc =
        None::<unsafe extern "C" fn(*mut aiFile, *const c_char, usize, usize) -> usize>;
    let _: aiFileTellProc = None::<unsafe extern "C" fn(*mut aiFile) -> usize>;
    let _: aiFileFlushProc = None::<unsafe extern "C" fn(*mut aiFile)>;
    let _: aiFileSeek = None::<unsafe extern "C" fn(*mut aiFile, usize, aiOrigin) -> aiReturn>;

    let io = aiFileIO::default();
    assert!(io.OpenProc.is_none());
    assert!(io.CloseProc.is_none());
    let _: aiUserData = io.UserData;

    let file = aiFile::default();
    assert!(file.ReadProc.is_none() && file.SeekProc.is_none() && file.FileSizeProc.is_none());
}

#[cfg(all(feature = "config", feature = "math"))]
#[test]
fn config_signatures_and_keys() {
    let _: unsafe extern "C" fn() -> *mut aiPropertyStore = aiCreatePropertyStore;
    let _: unsafe extern "C" fn(*mut aiPropertyStore) = aiReleasePropertyStore;
    let _: unsafe extern "C" fn(*mut aiPropertyStore, *const c_char, c_int) =
        aiSetImportPropertyInteger;
    let _: unsafe extern "C" fn(*mut aiPropertyStore, *const c_char, ai_real) =
        aiSetImportPropertyFloat;
    let _: unsafe extern "C" fn(*mut aiPropertyStore, *const c_char, *const aiString) =
        aiSetImportPropertyString;
    let _: unsafe extern "C" fn(*mut aiPropertyStore, *const c_char, *const aiMatrix4x4) =
        aiSetImportPropertyMatrix;

    // Keys are NUL-terminated C strings naming themselves without the prefix.
    assert_eq!(AI_CONFIG_PP_RVC_FLAGS.as_slice(), b"PP_RVC_FLAGS\0");
    assert_eq!(AI_CONFIG_PP_SBP_REMOVE.as_slice(), b"PP_SBP_REMOVE\0");
    assert_eq!(AI_CONFIG_FAVOUR_SPEED.as_slice(), b"FAVOUR_SPEED\0");
    assert!(AI_CONFIG_IMPORT_FBX_PRESERVE_PIVOTS.ends_with(b"\0"));
    let _ = aiComponent::aiComponent_NORMALS;

    unsafe {
        let store = aiCreatePropertyStore();
        assert!(!store.is_null());
        aiSetImportPropertyInteger(store, AI_CONFIG_PP_SBP_REMOVE.as_ptr().cast(), 3);
        aiSetImportPropertyFloat(store, AI_CONFIG_PP_GSN_MAX_SMOOTHING_ANGLE.as_ptr().cast(), 80.0);
        aiReleasePropertyStore(store);
    }
}

#[cfg(all(feature = "scene", feature = "math"))]
#[test]
fn scene_signatures() {
    let _: unsafe extern "C" fn(
        *const aiMaterial,
        *const c_char,
        c_uint,
        c_uint,
        *mut *const aiMaterialProperty,
    ) -> aiReturn = aiGetMaterialProperty;
    let _: unsafe extern "C" fn(
        *const aiMaterial,
        *const c_char,
        c_uint,
        c_uint,
        *mut ai_real,
        *mut c_uint,
    ) -> aiReturn = aiGetMaterialFloatArray;
    let _: unsafe extern "C" fn(
        *const aiMaterial,
        *const c_char,
        c_uint,
        c_uint,
        *mut c_int,
        *mut c_uint,
    ) -> aiReturn = aiGetMaterialIntegerArray;
    let _: unsafe extern "C" fn(*const aiMaterial, *const c_char, c_uint, c_uint, *mut aiColor4D) -> aiReturn =
        aiGetMaterialColor;
    let _: unsafe extern "C" fn(
        *const aiMaterial,
        *const c_char,
        c_uint,
        c_uint,
        *mut aiUVTransform,
    ) -> aiReturn = aiGetMaterialUVTransform;
    let _: unsafe extern "C" fn(*const aiMaterial, *const c_char, c_uint, c_uint, *mut aiString) -> aiReturn =
        aiGetMaterialString;
    let _: unsafe extern "C" fn(*const aiMaterial, aiTextureType::Type) -> c_uint =
        aiGetMaterialTextureCount;
    let _: unsafe extern "C" fn(
        *const aiMaterial,
        aiTextureType::Type,
        c_uint,
        *mut aiString,
        *mut aiTextureMapping::Type,
        *mut c_uint,
        *mut ai_real,
        *mut aiTextureOp::Type,
        *mut aiTextureMapMode::Type,
        *mut c_uint,
    ) -> aiReturn = aiGetMaterialTexture;

    assert_eq!(AI_SCENE_FLAGS_INCOMPLETE, 0x1);
    assert_eq!(AI_MAX_NUMBER_OF_TEXTURECOORDS, 8);
    assert_eq!(AI_MAX_NUMBER_OF_COLOR_SETS, 8);
    assert_eq!(aiTextureType::aiTextureType_DIFFUSE as u32, 1);
    assert_eq!(aiPropertyTypeInfo::aiPTI_String as u32, 3);
    assert_eq!(aiPrimitiveType::aiPrimitiveType_TRIANGLE as u32, 0x4);
}

#[cfg(feature = "math")]
#[test]
fn math_helpers_resolve_and_run() {
    let _: unsafe extern "C" fn(*mut aiQuaternion, *const aiMatrix3x3) = aiCreateQuaternionFromMatrix;
    let _: unsafe extern "C" fn(*const aiMatrix4x4, *mut aiVector3D, *mut aiQuaternion, *mut aiVector3D) =
        aiDecomposeMatrix;
    let _: unsafe extern "C" fn(*mut aiMatrix4x4) = aiTransposeMatrix4;
    let _: unsafe extern "C" fn(*mut aiMatrix3x3) = aiTransposeMatrix3;
    let _: unsafe extern "C" fn(*mut aiVector3D, *const aiMatrix3x3) = aiTransformVecByMatrix3;
    let _: unsafe extern "C" fn(*mut aiVector3D, *const aiMatrix4x4) = aiTransformVecByMatrix4;
    let _: unsafe extern "C" fn(*mut aiMatrix4x4, *const aiMatrix4x4) = aiMultiplyMatrix4;
    let _: unsafe extern "C" fn(*mut aiMatrix3x3, *const aiMatrix3x3) = aiMultiplyMatrix3;
    let _: unsafe extern "C" fn(*mut aiMatrix3x3) = aiIdentityMatrix3;
    let _: unsafe extern "C" fn(*mut aiMatrix4x4) = aiIdentityMatrix4;

    let mut m = aiMatrix4x4::default();
    let mut v = aiVector3D {
        x: 1.0,
        y: 2.0,
        z: 3.0,
    };
    unsafe {
        aiIdentityMatrix4(&mut m);
        m.a4 = 10.0; // translation along x
        aiTransformVecByMatrix4(&mut v, &m);
    }
    assert_eq!((v.x, v.y, v.z), (11.0, 2.0, 3.0));
}

#[cfg(feature = "introspection")]
#[test]
fn introspection_signatures_and_values() {
    let _: unsafe extern "C" fn() -> *const c_char = aiGetLegalString;
    let _: unsafe extern "C" fn() -> c_uint = aiGetVersionMajor;
    let _: unsafe extern "C" fn() -> c_uint = aiGetVersionMinor;
    let _: unsafe extern "C" fn() -> c_uint = aiGetVersionRevision;
    let _: unsafe extern "C" fn() -> *const c_char = aiGetBranchName;
    let _: unsafe extern "C" fn() -> c_uint = aiGetCompileFlags;
    let _: unsafe extern "C" fn(*const c_char) -> *const aiImporterDesc = aiGetImporterDesc;
    let _: unsafe extern "C" fn() -> usize = aiGetImportFormatCount;
    let _: unsafe extern "C" fn(usize) -> *const aiImporterDesc = aiGetImportFormatDescription;

    unsafe {
        assert_eq!(aiGetVersionMajor(), HEADER_VERSION.0);
        assert!(!aiGetLegalString().is_null());
        assert!(aiGetImportFormatCount() > 0);
        assert!(!aiGetImporterDesc(c"obj".as_ptr()).is_null());
        assert!(aiGetImporterDesc(c"not-a-format".as_ptr()).is_null());
    }
    let _ = ASSIMP_CFLAGS_SHARED | ASSIMP_CFLAGS_DOUBLE_SUPPORT;
    let _ = aiImporterFlags::aiImporterFlags_SupportTextFlavour;
}

#[cfg(all(feature = "import-export", feature = "scene"))]
#[test]
fn memory_import_round_trip_through_raw_surface() {
    const TRIANGLE: &[u8] = b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n";

    unsafe {
        let scene = aiImportFileFromMemory(
            TRIANGLE.as_ptr().cast(),
            TRIANGLE.len() as c_uint,
            aiPostProcessSteps::aiProcess_Triangulate as c_uint,
            c"obj".as_ptr(),
        );
        assert!(!scene.is_null(), "import failed");
        let s = &*scene;
        assert_eq!(s.mFlags & AI_SCENE_FLAGS_INCOMPLETE, 0);
        assert_eq!(s.mNumMeshes, 1);
        let mesh = &**s.mMeshes;
        assert_eq!(mesh.mNumVertices, 3);
        assert_eq!(mesh.mNumFaces, 1);
        aiReleaseImport(scene);
    }
}
