//! Post-processing steps for imported scenes

use bitflags::bitflags;

use crate::error::{Error, Result};
use crate::sys::aiPostProcessSteps as pp;

bitflags! {
    /// Post-processing steps that can be applied during or after import
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PostProcessSteps: u32 {
        /// Calculates the tangents and bitangents for the imported meshes.
        const CALC_TANGENT_SPACE = pp::aiProcess_CalcTangentSpace as u32;
        /// Identifies and joins identical vertex data sets within all imported meshes.
        const JOIN_IDENTICAL_VERTICES = pp::aiProcess_JoinIdenticalVertices as u32;
        /// Converts all the imported data to a left-handed coordinate space.
        const MAKE_LEFT_HANDED = pp::aiProcess_MakeLeftHanded as u32;
        /// Triangulates all faces of all meshes.
        const TRIANGULATE = pp::aiProcess_Triangulate as u32;
        /// Removes the components selected by `PP_RVC_FLAGS`.
        const REMOVE_COMPONENT = pp::aiProcess_RemoveComponent as u32;
        /// Generates flat normals for all faces of all meshes.
        const GEN_NORMALS = pp::aiProcess_GenNormals as u32;
        /// Generates smooth normals for all vertices in the mesh.
        const GEN_SMOOTH_NORMALS = pp::aiProcess_GenSmoothNormals as u32;
        /// Splits large meshes into smaller sub-meshes.
        const SPLIT_LARGE_MESHES = pp::aiProcess_SplitLargeMeshes as u32;
        /// Bakes node transforms into the vertices and flattens the hierarchy.
        const PRE_TRANSFORM_VERTICES = pp::aiProcess_PreTransformVertices as u32;
        /// Limits the number of bones simultaneously affecting a single vertex.
        const LIMIT_BONE_WEIGHTS = pp::aiProcess_LimitBoneWeights as u32;
        /// Validates the imported scene data structure.
        const VALIDATE_DATA_STRUCTURE = pp::aiProcess_ValidateDataStructure as u32;
        /// Reorders triangles for better vertex cache locality.
        const IMPROVE_CACHE_LOCALITY = pp::aiProcess_ImproveCacheLocality as u32;
        /// Removes redundant or unreferenced materials.
        const REMOVE_REDUNDANT_MATERIALS = pp::aiProcess_RemoveRedundantMaterials as u32;
        /// Inverts normals that point into the mesh.
        const FIX_INFACING_NORMALS = pp::aiProcess_FixInfacingNormals as u32;
        /// Fills in `aiBone::mArmature` and `aiBone::mNode`.
        const POPULATE_ARMATURE_DATA = pp::aiProcess_PopulateArmatureData as u32;
        /// Splits meshes with more than one primitive type into homogeneous sub-meshes.
        const SORT_BY_PTYPE = pp::aiProcess_SortByPType as u32;
        /// Converts degenerate primitives to points or lines.
        const FIND_DEGENERATES = pp::aiProcess_FindDegenerates as u32;
        /// Removes or fixes zeroed normals and invalid UV coordinates.
        const FIND_INVALID_DATA = pp::aiProcess_FindInvalidData as u32;
        /// Converts non-UV mappings to proper texture coordinate channels.
        const GEN_UV_COORDS = pp::aiProcess_GenUVCoords as u32;
        /// Bakes per-texture UV transformations into the coordinates.
        const TRANSFORM_UV_COORDS = pp::aiProcess_TransformUVCoords as u32;
        /// Replaces duplicate meshes by references to one master.
        const FIND_INSTANCES = pp::aiProcess_FindInstances as u32;
        /// Reduces the number of meshes.
        const OPTIMIZE_MESHES = pp::aiProcess_OptimizeMeshes as u32;
        /// Collapses nodes that carry no animation, bones or lights.
        const OPTIMIZE_GRAPH = pp::aiProcess_OptimizeGraph as u32;
        /// Flips all UV coordinates along the y-axis.
        const FLIP_UVS = pp::aiProcess_FlipUVs as u32;
        /// Flips face winding order from CCW to CW.
        const FLIP_WINDING_ORDER = pp::aiProcess_FlipWindingOrder as u32;
        /// Splits meshes whose bone count exceeds `PP_SBBC_MAX_BONES`.
        const SPLIT_BY_BONE_COUNT = pp::aiProcess_SplitByBoneCount as u32;
        /// Removes bones losslessly or according to a threshold.
        const DEBONE = pp::aiProcess_Debone as u32;
        /// Applies `GLOBAL_SCALE_FACTOR_KEY` to the whole scene.
        const GLOBAL_SCALE = pp::aiProcess_GlobalScale as u32;
        /// Embeds referenced textures into the scene.
        const EMBED_TEXTURES = pp::aiProcess_EmbedTextures as u32;
        /// Regenerates normals even if the file provides them.
        const FORCE_GEN_NORMALS = pp::aiProcess_ForceGenNormals as u32;
        /// Drops normals so they can be regenerated.
        const DROP_NORMALS = pp::aiProcess_DropNormals as u32;
        /// Computes `aiMesh::mAABB` for every mesh.
        const GEN_BOUNDING_BOXES = pp::aiProcess_GenBoundingBoxes as u32;
    }
}

/// Presets from `postprocess.h`
impl PostProcessSteps {
    /// `aiProcess_ConvertToLeftHanded`: the Direct3D conventions
    pub const CONVERT_TO_LEFT_HANDED: Self = Self::MAKE_LEFT_HANDED
        .union(Self::FLIP_UVS)
        .union(Self::FLIP_WINDING_ORDER);

    /// `aiProcessPreset_TargetRealtime_Fast`
    pub const TARGET_REALTIME_FAST: Self = Self::CALC_TANGENT_SPACE
        .union(Self::GEN_NORMALS)
        .union(Self::JOIN_IDENTICAL_VERTICES)
        .union(Self::TRIANGULATE)
        .union(Self::GEN_UV_COORDS)
        .union(Self::SORT_BY_PTYPE);

    /// `aiProcessPreset_TargetRealtime_Quality`
    pub const TARGET_REALTIME_QUALITY: Self = Self::CALC_TANGENT_SPACE
        .union(Self::GEN_SMOOTH_NORMALS)
        .union(Self::JOIN_IDENTICAL_VERTICES)
        .union(Self::IMPROVE_CACHE_LOCALITY)
        .union(Self::LIMIT_BONE_WEIGHTS)
        .union(Self::REMOVE_REDUNDANT_MATERIALS)
        .union(Self::SPLIT_LARGE_MESHES)
        .union(Self::TRIANGULATE)
        .union(Self::GEN_UV_COORDS)
        .union(Self::SORT_BY_PTYPE)
        .union(Self::FIND_DEGENERATES)
        .union(Self::FIND_INVALID_DATA);

    /// `aiProcessPreset_TargetRealtime_MaxQuality`
    pub const TARGET_REALTIME_MAX_QUALITY: Self = Self::TARGET_REALTIME_QUALITY
        .union(Self::FIND_INSTANCES)
        .union(Self::VALIDATE_DATA_STRUCTURE)
        .union(Self::OPTIMIZE_MESHES);
}

impl Default for PostProcessSteps {
    /// No post-processing
    fn default() -> Self {
        Self::empty()
    }
}

impl PostProcessSteps {
    /// Raw value for the C API
    pub fn as_raw(self) -> u32 {
        self.bits()
    }

    /// Reject combinations Assimp refuses to run together.
    pub fn validate(self) -> Result<Self> {
        if self.contains(Self::GEN_NORMALS | Self::GEN_SMOOTH_NORMALS) {
            return Err(Error::invalid_parameter(
                "GEN_NORMALS and GEN_SMOOTH_NORMALS are mutually exclusive",
            ));
        }
        if self.contains(Self::OPTIMIZE_GRAPH | Self::PRE_TRANSFORM_VERTICES) {
            return Err(Error::invalid_parameter(
                "OPTIMIZE_GRAPH and PRE_TRANSFORM_VERTICES are mutually exclusive",
            ));
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_carry_header_values() {
        assert_eq!(PostProcessSteps::CALC_TANGENT_SPACE.bits(), 0x1);
        assert_eq!(PostProcessSteps::TRIANGULATE.bits(), 0x8);
        assert_eq!(PostProcessSteps::GEN_SMOOTH_NORMALS.bits(), 0x40);
        assert_eq!(PostProcessSteps::FLIP_UVS.bits(), 0x80_0000);
        assert_eq!(PostProcessSteps::GEN_BOUNDING_BOXES.bits(), 0x8000_0000);
    }

    #[test]
    fn presets_match_header() {
        // The presets are macros over enum members, so bindgen cannot emit them.
        assert_eq!(PostProcessSteps::CONVERT_TO_LEFT_HANDED.bits(), 0x180_0004);
        assert_eq!(PostProcessSteps::TARGET_REALTIME_FAST.bits(), 0x4_802B);
        assert_eq!(PostProcessSteps::TARGET_REALTIME_QUALITY.bits(), 0x7_9ACB);
        assert_eq!(PostProcessSteps::TARGET_REALTIME_MAX_QUALITY.bits(), 0x37_9ECB);
    }

    #[test]
    fn default_is_empty() {
        assert!(PostProcessSteps::default().is_empty());
    }

    #[test]
    fn validate_rejects_exclusive_pairs() {
        assert!(PostProcessSteps::TARGET_REALTIME_MAX_QUALITY.validate().is_ok());
        assert!(PostProcessSteps::TARGET_REALTIME_FAST.validate().is_ok());

        let normals = PostProcessSteps::GEN_NORMALS | PostProcessSteps::GEN_SMOOTH_NORMALS;
        assert!(matches!(
            normals.validate(),
            Err(Error::InvalidParameter { .. })
        ));

        let graph = PostProcessSteps::OPTIMIZE_GRAPH | PostProcessSteps::PRE_TRANSFORM_VERTICES;
        assert!(graph.validate().is_err());

        // Either flag alone is fine.
        assert!(PostProcessSteps::GEN_NORMALS.validate().is_ok());
    }
}
