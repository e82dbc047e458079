//! Meshes, faces and morph targets

use std::borrow::Cow;

use bitflags::bitflags;

use crate::{
    aabb::Aabb,
    bone::Bone,
    ffi::{self, PtrArray},
    sys,
    types::{Color4D, FromSys, Vector3D, ai_string_to_str, ai_string_to_string},
};

bitflags! {
    /// Primitive kinds present in a mesh (`aiPrimitiveType`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct PrimitiveTypes: u32 {
        /// Single-index faces
        const POINT = sys::aiPrimitiveType::aiPrimitiveType_POINT as u32;
        /// Two-index faces
        const LINE = sys::aiPrimitiveType::aiPrimitiveType_LINE as u32;
        /// Three-index faces
        const TRIANGLE = sys::aiPrimitiveType::aiPrimitiveType_TRIANGLE as u32;
        /// Faces with more than three indices
        const POLYGON = sys::aiPrimitiveType::aiPrimitiveType_POLYGON as u32;
        /// Polygons were triangulated with the n-gon encoding
        const NGON_ENCODING = sys::aiPrimitiveType::aiPrimitiveType_NGONEncodingFlag as u32;
    }
}

/// How anim meshes combine with the base mesh
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MorphingMethod {
    /// Interpolate between morph targets
    VertexBlend,
    /// Normalized morphing between targets
    MorphNormalized,
    /// Targets are added relative to the base mesh
    MorphRelative,
    /// Not set, or a value this crate does not know
    Unknown(u32),
}

impl From<u32> for MorphingMethod {
    fn from(value: u32) -> Self {
        use sys::aiMorphingMethod as m;
        match value {
            v if v == m::aiMorphingMethod_VERTEX_BLEND as u32 => Self::VertexBlend,
            v if v == m::aiMorphingMethod_MORPH_NORMALIZED as u32 => Self::MorphNormalized,
            v if v == m::aiMorphingMethod_MORPH_RELATIVE as u32 => Self::MorphRelative,
            other => Self::Unknown(other),
        }
    }
}

/// Reinterpret Assimp's vector arrays as glam vectors without copying.
///
/// # Safety
/// `ptr` must be null or point at `len` vectors valid for `'a`.
unsafe fn vec3_slice<'a>(ptr: *const sys::aiVector3D, len: usize) -> Option<&'a [Vector3D]> {
    let raw = unsafe { ffi::slice_opt(ptr, len) }?;
    Some(unsafe { ffi::cast_slice(raw) })
}

fn flatten(vectors: &[Vector3D]) -> Vec<f32> {
    vectors.iter().flat_map(|v| v.to_array()).collect()
}

/// A mesh: vertex streams plus the faces indexing them.
///
/// Each mesh uses a single material, referenced by [`Mesh::material_index`].
#[derive(Clone, Copy)]
pub struct Mesh<'a> {
    raw: &'a sys::aiMesh,
}

impl<'a> Mesh<'a> {
    pub(crate) fn new(raw: &'a sys::aiMesh) -> Self {
        Self { raw }
    }

    /// The underlying `aiMesh`
    pub fn as_raw(&self) -> *const sys::aiMesh {
        self.raw
    }

    /// Get the name of the mesh
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Get the name of the mesh without allocating (lossy UTF-8)
    pub fn name_str(&self) -> Cow<'a, str> {
        ai_string_to_str(&self.raw.mName)
    }

    /// Get the number of vertices in the mesh
    pub fn num_vertices(&self) -> usize {
        self.raw.mNumVertices as usize
    }

    /// Get the number of faces in the mesh
    pub fn num_faces(&self) -> usize {
        if self.raw.mFaces.is_null() {
            0
        } else {
            self.raw.mNumFaces as usize
        }
    }

    /// Index into [`crate::Scene::materials`]
    pub fn material_index(&self) -> usize {
        self.raw.mMaterialIndex as usize
    }

    /// Kinds of primitives the faces use
    pub fn primitive_types(&self) -> PrimitiveTypes {
        PrimitiveTypes::from_bits_retain(self.raw.mPrimitiveTypes)
    }

    /// Vertex positions
    pub fn vertices(&self) -> &'a [Vector3D] {
        unsafe { vec3_slice(self.raw.mVertices, self.num_vertices()) }.unwrap_or_default()
    }

    /// Vertex normals, if present
    pub fn normals(&self) -> Option<&'a [Vector3D]> {
        unsafe { vec3_slice(self.raw.mNormals, self.num_vertices()) }
    }

    /// Vertex tangents, if present
    pub fn tangents(&self) -> Option<&'a [Vector3D]> {
        unsafe { vec3_slice(self.raw.mTangents, self.num_vertices()) }
    }

    /// Vertex bitangents, if present
    pub fn bitangents(&self) -> Option<&'a [Vector3D]> {
        unsafe { vec3_slice(self.raw.mBitangents, self.num_vertices()) }
    }

    /// Positions as `x, y, z` triples
    pub fn vertices_flat(&self) -> Vec<f32> {
        flatten(self.vertices())
    }

    /// Normals as `x, y, z` triples, empty when absent
    pub fn normals_flat(&self) -> Vec<f32> {
        self.normals().map(flatten).unwrap_or_default()
    }

    /// Tangents as `x, y, z` triples, empty when absent
    pub fn tangents_flat(&self) -> Vec<f32> {
        self.tangents().map(flatten).unwrap_or_default()
    }

    /// Bitangents as `x, y, z` triples, empty when absent
    pub fn bitangents_flat(&self) -> Vec<f32> {
        self.bitangents().map(flatten).unwrap_or_default()
    }

    /// Texture coordinates of a UV channel.
    ///
    /// Always three components wide; only the first
    /// [`num_uv_components`](Self::num_uv_components) are meaningful.
    pub fn texture_coords(&self, channel: usize) -> Option<&'a [Vector3D]> {
        let ptr = *self.raw.mTextureCoords.get(channel)?;
        unsafe { vec3_slice(ptr, self.num_vertices()) }
    }

    /// Meaningful components (1 to 3) in a UV channel, 0 when the channel is empty
    pub fn num_uv_components(&self, channel: usize) -> u32 {
        match self.raw.mTextureCoords.get(channel) {
            Some(ptr) if !ptr.is_null() => self.raw.mNumUVComponents[channel],
            _ => 0,
        }
    }

    /// `(channel, components)` for every populated UV channel
    pub fn uv_component_counts(&self) -> Vec<(usize, u32)> {
        (0..self.raw.mTextureCoords.len())
            .map(|channel| (channel, self.num_uv_components(channel)))
            .filter(|&(_, n)| n > 0)
            .collect()
    }

    /// Texture coordinates with only the meaningful components of each vertex,
    /// e.g. `u, v, u, v, ...` for a 2D channel
    pub fn texture_coords_packed(&self, channel: usize) -> Vec<f32> {
        let components = self.num_uv_components(channel).min(3) as usize;
        self.texture_coords(channel)
            .map(|coords| {
                coords
                    .iter()
                    .flat_map(|v| v.to_array().into_iter().take(components))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Number of populated vertex color sets
    pub fn num_color_channels(&self) -> usize {
        self.raw.mColors.iter().filter(|p| !p.is_null()).count()
    }

    /// Vertex colors of one set, copied because glam's `Vec4` is 16-byte aligned
    pub fn vertex_colors(&self, set: usize) -> Option<Vec<Color4D>> {
        let ptr = *self.raw.mColors.get(set)?;
        let colors = unsafe { ffi::slice_opt(ptr, self.num_vertices()) }?;
        Some(colors.iter().map(|&c| Color4D::from_sys(c)).collect())
    }

    /// Iterate over the faces
    pub fn faces(&self) -> impl ExactSizeIterator<Item = Face<'a>> + Clone + 'a {
        self.faces_raw().iter().map(Face::new)
    }

    /// One face by index
    pub fn face(&self, index: usize) -> Option<Face<'a>> {
        self.faces_raw().get(index).map(Face::new)
    }

    fn faces_raw(&self) -> &'a [sys::aiFace] {
        unsafe { ffi::slice(self.raw.mFaces, self.raw.mNumFaces as usize) }
    }

    /// Indices of every triangle face, three per triangle
    pub fn triangle_indices(&self) -> Vec<u32> {
        self.faces()
            .map(|face| face.indices())
            .filter(|indices| indices.len() == 3)
            .flatten()
            .copied()
            .collect()
    }

    /// Bounding box as stored by `GEN_BOUNDING_BOXES`; all zero otherwise
    pub fn aabb(&self) -> Aabb {
        Aabb::from(&self.raw.mAABB)
    }

    /// Number of bones
    pub fn num_bones(&self) -> usize {
        if self.raw.mBones.is_null() {
            0
        } else {
            self.raw.mNumBones as usize
        }
    }

    /// Iterate over the bones deforming this mesh
    pub fn bones(&self) -> impl ExactSizeIterator<Item = Bone<'a>> + Clone + 'a {
        unsafe { PtrArray::new(self.raw.mBones, self.num_bones()) }.map(Bone::new)
    }

    /// First bone named `name`
    pub fn find_bone(&self, name: &str) -> Option<Bone<'a>> {
        self.bones().find(|bone| bone.name_str() == name)
    }

    /// Number of morph targets
    pub fn num_anim_meshes(&self) -> usize {
        if self.raw.mAnimMeshes.is_null() {
            0
        } else {
            self.raw.mNumAnimMeshes as usize
        }
    }

    /// Iterate over the morph targets
    pub fn anim_meshes(&self) -> impl ExactSizeIterator<Item = AnimMesh<'a>> + Clone + 'a {
        unsafe { PtrArray::new(self.raw.mAnimMeshes, self.num_anim_meshes()) }.map(AnimMesh::new)
    }

    /// How the morph targets are applied
    pub fn morphing_method(&self) -> MorphingMethod {
        MorphingMethod::from(self.raw.mMethod as u32)
    }

    /// Vertex positions as raw bytes, for uploading to a GPU buffer
    #[cfg(feature = "bytemuck")]
    pub fn vertices_bytes(&self) -> &'a [u8] {
        bytemuck::cast_slice(self.vertices())
    }

    /// Normals as raw bytes
    #[cfg(feature = "bytemuck")]
    pub fn normals_bytes(&self) -> Option<&'a [u8]> {
        self.normals().map(bytemuck::cast_slice)
    }

    /// Indices of every face as raw `u32` bytes, three per triangle
    #[cfg(feature = "bytemuck")]
    pub fn triangle_indices_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.triangle_indices()).to_vec()
    }
}

impl PartialEq for Mesh<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.raw, other.raw)
    }
}

impl Eq for Mesh<'_> {}

impl std::fmt::Debug for Mesh<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mesh")
            .field("name", &self.name_str())
            .field("vertices", &self.num_vertices())
            .field("faces", &self.num_faces())
            .field("material_index", &self.material_index())
            .field("primitive_types", &self.primitive_types())
            .finish()
    }
}

/// A single face
#[derive(Debug, Clone, Copy)]
pub struct Face<'a> {
    raw: &'a sys::aiFace,
}

impl<'a> Face<'a> {
    fn new(raw: &'a sys::aiFace) -> Self {
        Self { raw }
    }

    /// Number of indices (1 point, 2 line, 3 triangle, more for polygons)
    pub fn num_indices(&self) -> usize {
        self.indices().len()
    }

    /// Vertex indices into the owning mesh
    pub fn indices(&self) -> &'a [u32] {
        unsafe { ffi::slice(self.raw.mIndices, self.raw.mNumIndices as usize) }
    }
}

/// A morph target of a [`Mesh`]
#[derive(Clone, Copy)]
pub struct AnimMesh<'a> {
    raw: &'a sys::aiAnimMesh,
}

impl<'a> AnimMesh<'a> {
    fn new(raw: &'a sys::aiAnimMesh) -> Self {
        Self { raw }
    }

    /// Name of the target
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Number of vertices, equal to the base mesh's
    pub fn num_vertices(&self) -> usize {
        self.raw.mNumVertices as usize
    }

    /// Replacement positions, if the target moves vertices
    pub fn vertices(&self) -> Option<&'a [Vector3D]> {
        unsafe { vec3_slice(self.raw.mVertices, self.num_vertices()) }
    }

    /// Replacement normals, if present
    pub fn normals(&self) -> Option<&'a [Vector3D]> {
        unsafe { vec3_slice(self.raw.mNormals, self.num_vertices()) }
    }

    /// Default blend weight
    pub fn weight(&self) -> f32 {
        self.raw.mWeight
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{PostProcessSteps, Scene};

    const QUAD_OBJ: &[u8] = b"\
v 0 0 0\nv 1 0 0\nv 1 1 0\nv 0 1 0\n\
vt 0 0\nvt 1 0\nvt 1 1\nvt 0 1\n\
f 1/1 2/2 3/3 4/4\n";

    #[test]
    fn morphing_method_maps_known_values() {
        assert_eq!(MorphingMethod::from(1), MorphingMethod::VertexBlend);
        assert_eq!(MorphingMethod::from(3), MorphingMethod::MorphRelative);
        assert_eq!(MorphingMethod::from(42), MorphingMethod::Unknown(42));
    }

    #[test]
    fn quad_triangulates_into_two_faces() {
        let scene =
            Scene::from_memory(QUAD_OBJ, Some("obj"), PostProcessSteps::TRIANGULATE).unwrap();
        let mesh = scene.mesh(0).unwrap();
        assert_eq!(mesh.num_faces(), 2);
        assert!(mesh.primitive_types().contains(PrimitiveTypes::TRIANGLE));
        assert!(mesh.faces().all(|f| f.num_indices() == 3));
        assert_eq!(mesh.triangle_indices().len(), 6);
        assert_eq!(mesh.vertices_flat().len(), mesh.num_vertices() * 3);
    }

    #[test]
    fn polygon_survives_without_triangulation() {
        let scene = Scene::from_memory(QUAD_OBJ, Some("obj"), PostProcessSteps::empty()).unwrap();
        let mesh = scene.mesh(0).unwrap();
        assert_eq!(mesh.num_faces(), 1);
        assert_eq!(mesh.face(0).unwrap().num_indices(), 4);
        assert!(mesh.triangle_indices().is_empty());
        assert!(mesh.primitive_types().contains(PrimitiveTypes::POLYGON));
    }

    #[test]
    fn uv_channels_pack_to_two_components() {
        let scene = Scene::from_memory(QUAD_OBJ, Some("obj"), PostProcessSteps::empty()).unwrap();
        let mesh = scene.mesh(0).unwrap();
        assert_eq!(mesh.num_uv_components(0), 2);
        assert_eq!(mesh.uv_component_counts(), vec![(0, 2)]);
        assert_eq!(mesh.texture_coords_packed(0).len(), mesh.num_vertices() * 2);
        assert!(mesh.texture_coords(1).is_none());
        assert!(mesh.texture_coords(99).is_none());
        assert_eq!(mesh.num_uv_components(99), 0);
        assert_eq!(mesh.num_color_channels(), 0);
        assert!(mesh.vertex_colors(0).is_none());
    }

    #[test]
    fn equality_is_identity() {
        let scene = Scene::from_memory(QUAD_OBJ, Some("obj"), PostProcessSteps::empty()).unwrap();
        assert_eq!(scene.mesh(0), scene.mesh(0));
        let other = Scene::from_memory(QUAD_OBJ, Some("obj"), PostProcessSteps::empty()).unwrap();
        assert_ne!(scene.mesh(0), other.mesh(0));
    }

    #[test]
    fn bounding_boxes_are_generated_on_request() {
        let scene =
            Scene::from_memory(QUAD_OBJ, Some("obj"), PostProcessSteps::GEN_BOUNDING_BOXES)
                .unwrap();
        let aabb = scene.mesh(0).unwrap().aabb();
        assert_eq!(aabb.min, Vector3D::ZERO);
        assert_eq!(aabb.max, Vector3D::new(1.0, 1.0, 0.0));
    }
}
