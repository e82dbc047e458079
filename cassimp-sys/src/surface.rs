//! The enumerated declaration surface.
//!
//! Every category owns an explicit list of names taken from the generated
//! bindings. The crate root re-exports each list by name, so a declaration
//! listed in two categories is a compile error rather than a silent shadow,
//! and disabling a category's feature removes exactly its names.

macro_rules! surface {
    ($(
        $(#[$meta:meta])*
        $feature:literal => $name:ident { $($item:ident),+ $(,)? }
    )+) => {
        $(
            $(#[$meta])*
            #[cfg(feature = $feature)]
            pub mod $name {
                pub use crate::bindings::{$($item),+};

                /// Names re-exported by this category, in declaration order.
                pub const DECLARATIONS: &[&str] = &[$(stringify!($item)),+];
            }

            #[cfg(feature = $feature)]
            pub use self::$name::{$($item),+};
        )+

        /// Every enabled category paired with its declaration names.
        pub const ALL_DECLARATIONS: &[(&str, &[&str])] = &[
            ("common", common::DECLARATIONS),
            $(
                #[cfg(feature = $feature)]
                ($feature, $name::DECLARATIONS),
            )+
        ];
    };
}

/// Declarations every category leans on: the string type, status codes and
/// the C boolean.
pub mod common {
    pub use crate::bindings::{AI_FALSE, AI_TRUE, aiBool, aiReturn, aiString};

    /// Names re-exported by this category, in declaration order.
    pub const DECLARATIONS: &[&str] = &["AI_FALSE", "AI_TRUE", "aiBool", "aiReturn", "aiString"];
}

pub use self::common::{AI_FALSE, AI_TRUE, aiBool, aiReturn, aiString};

surface! {
    /// Import/export entry points (`cimport.h`, `cexport.h`, `postprocess.h`),
    /// including the importer's log-stream hooks.
    "import-export" => import_export {
        aiImportFile,
        aiImportFileEx,
        aiImportFileExWithProperties,
        aiImportFileFromMemory,
        aiImportFileFromMemoryWithProperties,
        aiApplyPostProcessing,
        aiReleaseImport,
        aiGetErrorString,
        aiIsExtensionSupported,
        aiGetExtensionList,
        aiGetMemoryRequirements,
        aiMemoryInfo,
        aiPostProcessSteps,
        aiExportFormatDesc,
        aiGetExportFormatCount,
        aiGetExportFormatDescription,
        aiReleaseExportFormatDescription,
        aiCopyScene,
        aiFreeScene,
        aiExportScene,
        aiExportSceneEx,
        aiExportDataBlob,
        aiExportSceneToBlob,
        aiReleaseExportBlob,
        aiLogStream,
        aiLogStreamCallback,
        aiDefaultLogStream,
        aiGetPredefinedLogStream,
        aiAttachLogStream,
        aiEnableVerboseLogging,
        aiDetachLogStream,
        aiDetachAllLogStreams,
    }

    /// Virtual file system callbacks (`cfileio.h`).
    "file-io" => file_io {
        aiFileIO,
        aiFile,
        aiUserData,
        aiOrigin,
        aiFileOpenProc,
        aiFileCloseProc,
        aiFileReadProc,
        aiFileWriteProc,
        aiFileTellProc,
        aiFileFlushProc,
        aiFileSeek,
    }

    /// Property store setters and the `AI_CONFIG_*` keys they accept (`config.h`).
    "config" => config {
        aiPropertyStore,
        aiCreatePropertyStore,
        aiReleasePropertyStore,
        aiSetImportPropertyInteger,
        aiSetImportPropertyFloat,
        aiSetImportPropertyString,
        aiSetImportPropertyMatrix,
        aiComponent,
        AI_CONFIG_GLOB_MEASURE_TIME,
        AI_CONFIG_IMPORT_NO_SKELETON_MESHES,
        AI_CONFIG_PP_SBBC_MAX_BONES,
        AI_CONFIG_PP_CT_MAX_SMOOTHING_ANGLE,
        AI_CONFIG_PP_CT_TEXTURE_CHANNEL_INDEX,
        AI_CONFIG_PP_GSN_MAX_SMOOTHING_ANGLE,
        AI_CONFIG_IMPORT_MDL_COLORMAP,
        AI_CONFIG_PP_RRM_EXCLUDE_LIST,
        AI_CONFIG_PP_PTV_KEEP_HIERARCHY,
        AI_CONFIG_PP_PTV_NORMALIZE,
        AI_CONFIG_PP_PTV_ADD_ROOT_TRANSFORMATION,
        AI_CONFIG_PP_PTV_ROOT_TRANSFORMATION,
        AI_CONFIG_PP_FD_REMOVE,
        AI_CONFIG_PP_OG_EXCLUDE_LIST,
        AI_CONFIG_PP_SLM_TRIANGLE_LIMIT,
        AI_CONFIG_PP_SLM_VERTEX_LIMIT,
        AI_CONFIG_PP_LBW_MAX_WEIGHTS,
        AI_CONFIG_PP_DB_THRESHOLD,
        AI_CONFIG_PP_DB_ALL_OR_NONE,
        AI_CONFIG_PP_ICL_PTCACHE_SIZE,
        AI_CONFIG_PP_RVC_FLAGS,
        AI_CONFIG_PP_SBP_REMOVE,
        AI_CONFIG_PP_FID_ANIM_ACCURACY,
        AI_CONFIG_PP_TUV_EVALUATE,
        AI_CONFIG_FAVOUR_SPEED,
        AI_CONFIG_IMPORT_FBX_READ_ALL_GEOMETRY_LAYERS,
        AI_CONFIG_IMPORT_FBX_READ_ALL_MATERIALS,
        AI_CONFIG_IMPORT_FBX_READ_MATERIALS,
        AI_CONFIG_IMPORT_FBX_READ_TEXTURES,
        AI_CONFIG_IMPORT_FBX_READ_CAMERAS,
        AI_CONFIG_IMPORT_FBX_READ_LIGHTS,
        AI_CONFIG_IMPORT_FBX_READ_ANIMATIONS,
        AI_CONFIG_IMPORT_FBX_STRICT_MODE,
        AI_CONFIG_IMPORT_FBX_PRESERVE_PIVOTS,
        AI_CONFIG_IMPORT_FBX_OPTIMIZE_EMPTY_ANIMATION_CURVES,
        AI_CONFIG_IMPORT_GLOBAL_KEYFRAME,
        AI_CONFIG_IMPORT_AC_SEPARATE_BFCULL,
        AI_CONFIG_IMPORT_AC_EVAL_SUBDIVISION,
        AI_CONFIG_IMPORT_UNREAL_HANDLE_FLAGS,
        AI_CONFIG_IMPORT_TER_MAKE_UVS,
        AI_CONFIG_IMPORT_ASE_RECONSTRUCT_NORMALS,
        AI_CONFIG_IMPORT_MD3_HANDLE_MULTIPART,
        AI_CONFIG_IMPORT_MD3_SKIN_NAME,
        AI_CONFIG_IMPORT_LWO_ONE_LAYER_ONLY,
        AI_CONFIG_IMPORT_IRR_ANIM_FPS,
        AI_CONFIG_IMPORT_OGRE_MATERIAL_FILE,
        AI_CONFIG_IMPORT_OGRE_TEXTURETYPE_FROM_FILENAME,
        AI_CONFIG_IMPORT_IFC_SKIP_SPACE_REPRESENTATIONS,
        AI_CONFIG_IMPORT_IFC_CUSTOM_TRIANGULATION,
        AI_CONFIG_IMPORT_COLLADA_IGNORE_UP_DIRECTION,
        AI_CONFIG_EXPORT_XFILE_64BIT,
        AI_CONFIG_GLOBAL_SCALE_FACTOR_KEY,
        AI_SLM_DEFAULT_MAX_TRIANGLES,
        AI_SLM_DEFAULT_MAX_VERTICES,
        AI_LMW_MAX_WEIGHTS,
        AI_SBBC_DEFAULT_MAX_BONES,
        AI_UVTRAFO_SCALING,
        AI_UVTRAFO_ROTATION,
        AI_UVTRAFO_TRANSLATION,
    }

    /// Scene graph data structures (`scene.h`, `mesh.h`, `material.h`,
    /// `texture.h`, `camera.h`, `light.h`, `anim.h`, `metadata.h`).
    "scene" => scene {
        aiScene,
        aiNode,
        AI_SCENE_FLAGS_INCOMPLETE,
        AI_SCENE_FLAGS_VALIDATED,
        AI_SCENE_FLAGS_VALIDATION_WARNING,
        AI_SCENE_FLAGS_NON_VERBOSE_FORMAT,
        AI_SCENE_FLAGS_TERRAIN,
        AI_SCENE_FLAGS_ALLOW_SHARED,
        aiMesh,
        aiFace,
        aiBone,
        aiVertexWeight,
        aiAnimMesh,
        aiAABB,
        aiPrimitiveType,
        aiMorphingMethod,
        AI_MAX_FACE_INDICES,
        AI_MAX_BONE_WEIGHTS,
        AI_MAX_VERTICES,
        AI_MAX_FACES,
        AI_MAX_NUMBER_OF_COLOR_SETS,
        AI_MAX_NUMBER_OF_TEXTURECOORDS,
        aiMaterial,
        aiMaterialProperty,
        aiPropertyTypeInfo,
        aiUVTransform,
        aiTextureType,
        aiTextureMapping,
        aiTextureOp,
        aiTextureMapMode,
        aiTextureFlags,
        aiShadingMode,
        aiBlendMode,
        AI_DEFAULT_MATERIAL_NAME,
        aiGetMaterialProperty,
        aiGetMaterialFloatArray,
        aiGetMaterialIntegerArray,
        aiGetMaterialColor,
        aiGetMaterialUVTransform,
        aiGetMaterialString,
        aiGetMaterialTextureCount,
        aiGetMaterialTexture,
        aiTexture,
        aiTexel,
        aiCamera,
        aiLight,
        aiLightSourceType,
        aiAnimation,
        aiNodeAnim,
        aiMeshAnim,
        aiMeshMorphAnim,
        aiVectorKey,
        aiQuatKey,
        aiMeshKey,
        aiMeshMorphKey,
        aiAnimBehaviour,
        aiMetadata,
        aiMetadataEntry,
        aiMetadataType,
    }

    /// Math primitives (`types.h`, `vector2.h`, `vector3.h`, `quaternion.h`,
    /// `matrix3x3.h`, `matrix4x4.h`, `color4.h`) and the C helpers over them.
    "math" => math {
        ai_real,
        aiVector2D,
        aiVector3D,
        aiQuaternion,
        aiMatrix3x3,
        aiMatrix4x4,
        aiColor3D,
        aiColor4D,
        aiPlane,
        aiRay,
        aiCreateQuaternionFromMatrix,
        aiDecomposeMatrix,
        aiTransposeMatrix4,
        aiTransposeMatrix3,
        aiTransformVecByMatrix3,
        aiTransformVecByMatrix4,
        aiMultiplyMatrix4,
        aiMultiplyMatrix3,
        aiIdentityMatrix3,
        aiIdentityMatrix4,
    }

    /// Library version, build flags and per-format importer descriptors
    /// (`version.h`, `importerdesc.h`).
    "introspection" => introspection {
        aiGetLegalString,
        aiGetVersionMinor,
        aiGetVersionMajor,
        aiGetVersionRevision,
        aiGetBranchName,
        aiGetCompileFlags,
        ASSIMP_CFLAGS_SHARED,
        ASSIMP_CFLAGS_STLPORT,
        ASSIMP_CFLAGS_DEBUG,
        ASSIMP_CFLAGS_NOBOOST,
        ASSIMP_CFLAGS_SINGLETHREADED,
        ASSIMP_CFLAGS_DOUBLE_SUPPORT,
        aiImporterDesc,
        aiImporterFlags,
        aiGetImporterDesc,
        aiGetImportFormatCount,
        aiGetImportFormatDescription,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn no_declaration_is_listed_twice() {
        let mut seen = HashSet::new();
        for (category, names) in ALL_DECLARATIONS {
            for name in *names {
                assert!(
                    seen.insert(*name),
                    "`{name}` from `{category}` is already exposed by another category"
                );
            }
        }
    }

    #[test]
    fn categories_follow_enabled_features() {
        let categories: Vec<&str> = ALL_DECLARATIONS.iter().map(|(c, _)| *c).collect();
        assert_eq!(categories[0], "common");
        assert_eq!(cfg!(feature = "math"), categories.contains(&"math"));
        assert_eq!(cfg!(feature = "scene"), categories.contains(&"scene"));
        assert_eq!(cfg!(feature = "config"), categories.contains(&"config"));
        assert!(ALL_DECLARATIONS.iter().all(|(_, names)| !names.is_empty()));
    }

    #[test]
    fn enumerated_names_are_c_identifiers() {
        for (_, names) in ALL_DECLARATIONS {
            for name in *names {
                assert!(
                    name.starts_with("ai")
                        || name.starts_with("AI_")
                        || name.starts_with("ASSIMP_CFLAGS_")
                );
            }
        }
    }
}
