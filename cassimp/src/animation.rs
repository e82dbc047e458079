//! Keyframe animations

use std::borrow::Cow;

use crate::{
    ffi::{self, PtrArray},
    sys,
    types::{FromSys, Quaternion, Vector3D, ai_string_to_str, ai_string_to_string},
};

/// What a channel does outside its key range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimBehaviour {
    /// Use the node's own transformation
    Default,
    /// Hold the nearest key
    Constant,
    /// Extrapolate from the nearest two keys
    Linear,
    /// Loop
    Repeat,
    /// A value this crate does not know
    Unknown(u32),
}

impl From<u32> for AnimBehaviour {
    fn from(value: u32) -> Self {
        use sys::aiAnimBehaviour as b;
        match value {
            v if v == b::aiAnimBehaviour_DEFAULT as u32 => Self::Default,
            v if v == b::aiAnimBehaviour_CONSTANT as u32 => Self::Constant,
            v if v == b::aiAnimBehaviour_LINEAR as u32 => Self::Linear,
            v if v == b::aiAnimBehaviour_REPEAT as u32 => Self::Repeat,
            other => Self::Unknown(other),
        }
    }
}

/// Position or scaling key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorKey {
    /// Time in ticks
    pub time: f64,
    /// Value at that time
    pub value: Vector3D,
}

/// Rotation key
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuatKey {
    /// Time in ticks
    pub time: f64,
    /// Value at that time
    pub value: Quaternion,
}

/// Vertex-animation key: which anim mesh to show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MeshKey {
    /// Time in ticks
    pub time: f64,
    /// Index into the mesh's anim meshes
    pub value: u32,
}

/// Morph key: weights of several anim meshes at once
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshMorphKey<'a> {
    /// Time in ticks
    pub time: f64,
    /// Anim mesh indices
    pub values: &'a [u32],
    /// Weight of each entry in `values`
    pub weights: &'a [f64],
}

/// An animation clip
#[derive(Clone, Copy)]
pub struct Animation<'a> {
    raw: &'a sys::aiAnimation,
}

impl<'a> Animation<'a> {
    pub(crate) fn new(raw: &'a sys::aiAnimation) -> Self {
        Self { raw }
    }

    /// The underlying `aiAnimation`
    pub fn as_raw(&self) -> *const sys::aiAnimation {
        self.raw
    }

    /// Name of the clip; may be empty
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Length in ticks
    pub fn duration(&self) -> f64 {
        self.raw.mDuration
    }

    /// Ticks per second; 0 when the file does not say
    pub fn ticks_per_second(&self) -> f64 {
        self.raw.mTicksPerSecond
    }

    /// Length in seconds, assuming 25 ticks per second when unspecified
    pub fn duration_in_seconds(&self) -> f64 {
        let tps = self.ticks_per_second();
        self.duration() / if tps > 0.0 { tps } else { 25.0 }
    }

    /// Number of node channels
    pub fn num_channels(&self) -> usize {
        if self.raw.mChannels.is_null() {
            0
        } else {
            self.raw.mNumChannels as usize
        }
    }

    /// Node channels: one per animated node
    pub fn channels(&self) -> impl ExactSizeIterator<Item = NodeAnim<'a>> + Clone + 'a {
        unsafe { PtrArray::new(self.raw.mChannels, self.num_channels()) }.map(NodeAnim::new)
    }

    /// The channel animating `node_name`
    pub fn channel_for(&self, node_name: &str) -> Option<NodeAnim<'a>> {
        self.channels().find(|c| c.node_name_str() == node_name)
    }

    /// Number of vertex-animation channels
    pub fn num_mesh_channels(&self) -> usize {
        if self.raw.mMeshChannels.is_null() {
            0
        } else {
            self.raw.mNumMeshChannels as usize
        }
    }

    /// Vertex-animation channels
    pub fn mesh_channels(&self) -> impl ExactSizeIterator<Item = MeshAnim<'a>> + Clone + 'a {
        unsafe { PtrArray::new(self.raw.mMeshChannels, self.num_mesh_channels()) }
            .map(MeshAnim::new)
    }

    /// Number of morph channels
    pub fn num_morph_mesh_channels(&self) -> usize {
        if self.raw.mMorphMeshChannels.is_null() {
            0
        } else {
            self.raw.mNumMorphMeshChannels as usize
        }
    }

    /// Morph-target channels
    pub fn morph_mesh_channels(
        &self,
    ) -> impl ExactSizeIterator<Item = MorphMeshAnim<'a>> + Clone + 'a {
        unsafe { PtrArray::new(self.raw.mMorphMeshChannels, self.num_morph_mesh_channels()) }
            .map(MorphMeshAnim::new)
    }
}

impl std::fmt::Debug for Animation<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Animation")
            .field("name", &self.name())
            .field("duration", &self.duration())
            .field("ticks_per_second", &self.ticks_per_second())
            .field("channels", &self.num_channels())
            .finish()
    }
}

/// Keys animating one node
#[derive(Clone, Copy)]
pub struct NodeAnim<'a> {
    raw: &'a sys::aiNodeAnim,
}

impl<'a> NodeAnim<'a> {
    fn new(raw: &'a sys::aiNodeAnim) -> Self {
        Self { raw }
    }

    /// Name of the animated node
    pub fn node_name(&self) -> String {
        ai_string_to_string(&self.raw.mNodeName)
    }

    /// Name of the animated node without allocating
    pub fn node_name_str(&self) -> Cow<'a, str> {
        ai_string_to_str(&self.raw.mNodeName)
    }

    /// Position keys, in time order
    pub fn position_keys(&self) -> Vec<VectorKey> {
        vector_keys(self.raw.mPositionKeys, self.raw.mNumPositionKeys)
    }

    /// Rotation keys, in time order
    pub fn rotation_keys(&self) -> Vec<QuatKey> {
        let keys = unsafe { ffi::slice(self.raw.mRotationKeys, self.raw.mNumRotationKeys as usize) };
        keys.iter()
            .map(|k| QuatKey {
                time: k.mTime,
                value: Quaternion::from_sys(k.mValue),
            })
            .collect()
    }

    /// Scaling keys, in time order
    pub fn scaling_keys(&self) -> Vec<VectorKey> {
        vector_keys(self.raw.mScalingKeys, self.raw.mNumScalingKeys)
    }

    /// Behaviour before the first key
    pub fn pre_state(&self) -> AnimBehaviour {
        AnimBehaviour::from(self.raw.mPreState as u32)
    }

    /// Behaviour after the last key
    pub fn post_state(&self) -> AnimBehaviour {
        AnimBehaviour::from(self.raw.mPostState as u32)
    }
}

fn vector_keys(ptr: *const sys::aiVectorKey, len: u32) -> Vec<VectorKey> {
    let keys = unsafe { ffi::slice(ptr, len as usize) };
    keys.iter()
        .map(|k| VectorKey {
            time: k.mTime,
            value: Vector3D::from_sys(k.mValue),
        })
        .collect()
}

impl std::fmt::Debug for NodeAnim<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeAnim")
            .field("node_name", &self.node_name_str())
            .field("position_keys", &self.raw.mNumPositionKeys)
            .field("rotation_keys", &self.raw.mNumRotationKeys)
            .field("scaling_keys", &self.raw.mNumScalingKeys)
            .finish()
    }
}

/// Vertex-animation channel of one mesh
#[derive(Debug, Clone, Copy)]
pub struct MeshAnim<'a> {
    raw: &'a sys::aiMeshAnim,
}

impl<'a> MeshAnim<'a> {
    fn new(raw: &'a sys::aiMeshAnim) -> Self {
        Self { raw }
    }

    /// Name of the animated mesh
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Keys, in time order
    pub fn keys(&self) -> Vec<MeshKey> {
        let keys = unsafe { ffi::slice(self.raw.mKeys, self.raw.mNumKeys as usize) };
        keys.iter()
            .map(|k| MeshKey {
                time: k.mTime,
                value: k.mValue,
            })
            .collect()
    }
}

/// Morph-target channel of one mesh
#[derive(Debug, Clone, Copy)]
pub struct MorphMeshAnim<'a> {
    raw: &'a sys::aiMeshMorphAnim,
}

impl<'a> MorphMeshAnim<'a> {
    fn new(raw: &'a sys::aiMeshMorphAnim) -> Self {
        Self { raw }
    }

    /// Name of the animated mesh
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Keys, in time order; values and weights are borrowed from the scene
    pub fn keys(&self) -> Vec<MeshMorphKey<'a>> {
        let keys = unsafe { ffi::slice(self.raw.mKeys, self.raw.mNumKeys as usize) };
        keys.iter()
            .map(|k| {
                let n = k.mNumValuesAndWeights as usize;
                MeshMorphKey {
                    time: k.mTime,
                    values: unsafe { ffi::slice(k.mValues, n) },
                    weights: unsafe { ffi::slice(k.mWeights, n) },
                }
            })
            .collect()
    }
}
