//! Skeletal bones and their vertex weights

use std::borrow::Cow;

use crate::{
    ffi,
    sys,
    types::{FromSys, Matrix4x4, ai_string_to_str, ai_string_to_string},
};

/// Influence of one bone on one vertex.
///
/// Layout-compatible with `aiVertexWeight`, so [`Bone::weights`] borrows the
/// native array directly.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VertexWeight {
    /// Index into the mesh's vertices
    pub vertex_id: u32,
    /// Influence strength in `0.0..=1.0`
    pub weight: f32,
}

const _: () = {
    assert!(std::mem::size_of::<VertexWeight>() == std::mem::size_of::<sys::aiVertexWeight>());
    assert!(std::mem::align_of::<VertexWeight>() == std::mem::align_of::<sys::aiVertexWeight>());
};

/// A bone of a skinned mesh
#[derive(Clone, Copy)]
pub struct Bone<'a> {
    raw: &'a sys::aiBone,
}

impl<'a> Bone<'a> {
    pub(crate) fn new(raw: &'a sys::aiBone) -> Self {
        Self { raw }
    }

    /// The underlying `aiBone`
    pub fn as_raw(&self) -> *const sys::aiBone {
        self.raw
    }

    /// Name of the bone; matches the node that animates it
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Name without allocating (lossy UTF-8)
    pub fn name_str(&self) -> Cow<'a, str> {
        ai_string_to_str(&self.raw.mName)
    }

    /// Mesh space to bone space in bind pose
    pub fn offset_matrix(&self) -> Matrix4x4 {
        Matrix4x4::from_sys(self.raw.mOffsetMatrix)
    }

    /// Number of vertices this bone influences
    pub fn num_weights(&self) -> usize {
        self.weights().len()
    }

    /// Vertex weights, borrowed from the scene
    pub fn weights(&self) -> &'a [VertexWeight] {
        let raw = unsafe { ffi::slice(self.raw.mWeights, self.raw.mNumWeights as usize) };
        unsafe { ffi::cast_slice(raw) }
    }

    /// Weight this bone applies to `vertex_id`, summed over duplicate entries
    pub fn weight_for_vertex(&self, vertex_id: u32) -> f32 {
        self.weights()
            .iter()
            .filter(|w| w.vertex_id == vertex_id)
            .map(|w| w.weight)
            .sum()
    }
}

impl std::fmt::Debug for Bone<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Bone")
            .field("name", &self.name_str())
            .field("weights", &self.num_weights())
            .finish()
    }
}
