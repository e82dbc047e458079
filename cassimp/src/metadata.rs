//! Key/value metadata attached to scenes and nodes

use std::borrow::Cow;
use std::ffi::c_void;

use crate::{
    ffi,
    sys,
    types::{FromSys, Vector3D, ai_string_to_str, ai_string_to_string},
};

/// Well-known metadata keys
pub mod keys {
    /// Importer that produced the scene
    pub const SOURCE_FORMAT: &str = "SourceAsset_Format";
    /// Version of the source format
    pub const SOURCE_FORMAT_VERSION: &str = "SourceAsset_FormatVersion";
    /// Tool that wrote the source file
    pub const SOURCE_GENERATOR: &str = "SourceAsset_Generator";
    /// Copyright notice of the source file
    pub const SOURCE_COPYRIGHT: &str = "SourceAsset_Copyright";
    /// Unit scale of the scene (FBX, glTF)
    pub const UNIT_SCALE_FACTOR: &str = "UnitScaleFactor";
    /// Unit scale before conversion
    pub const ORIGINAL_UNIT_SCALE_FACTOR: &str = "OriginalUnitScaleFactor";
    /// Up axis index (FBX)
    pub const UP_AXIS: &str = "UpAxis";
    /// Sign of the up axis (FBX)
    pub const UP_AXIS_SIGN: &str = "UpAxisSign";
    /// Front axis index (FBX)
    pub const FRONT_AXIS: &str = "FrontAxis";
    /// Sign of the front axis (FBX)
    pub const FRONT_AXIS_SIGN: &str = "FrontAxisSign";
    /// Coordinate axis index (FBX)
    pub const COORD_AXIS: &str = "CoordAxis";
    /// Sign of the coordinate axis (FBX)
    pub const COORD_AXIS_SIGN: &str = "CoordAxisSign";
}

/// One decoded metadata value
#[derive(Debug, Clone, PartialEq)]
pub enum MetadataValue<'a> {
    /// `bool`
    Bool(bool),
    /// `int32_t`
    Int32(i32),
    /// `uint64_t`
    UInt64(u64),
    /// `float`
    Float(f32),
    /// `double`
    Double(f64),
    /// `aiString`
    String(String),
    /// `aiVector3D`
    Vector3(Vector3D),
    /// Nested `aiMetadata`
    Metadata(Metadata<'a>),
    /// `int64_t`
    Int64(i64),
    /// `uint32_t`
    UInt32(u32),
    /// A type this crate does not know, or a null value
    Unknown(u32),
}

impl MetadataValue<'_> {
    /// The value as `f64`, when it is numeric
    pub fn as_f64(&self) -> Option<f64> {
        match *self {
            Self::Int32(v) => Some(v.into()),
            Self::UInt32(v) => Some(v.into()),
            Self::Int64(v) => Some(v as f64),
            Self::UInt64(v) => Some(v as f64),
            Self::Float(v) => Some(v.into()),
            Self::Double(v) => Some(v),
            _ => None,
        }
    }

    /// The value as text, when it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }
}

/// A metadata map, borrowed from the scene
#[derive(Clone, Copy)]
pub struct Metadata<'a> {
    raw: &'a sys::aiMetadata,
}

impl<'a> Metadata<'a> {
    pub(crate) fn new(raw: &'a sys::aiMetadata) -> Self {
        Self { raw }
    }

    fn keys_raw(&self) -> &'a [sys::aiString] {
        unsafe { ffi::slice(self.raw.mKeys, self.raw.mNumProperties as usize) }
    }

    fn values_raw(&self) -> &'a [sys::aiMetadataEntry] {
        unsafe { ffi::slice(self.raw.mValues, self.raw.mNumProperties as usize) }
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.keys_raw().len().min(self.values_raw().len())
    }

    /// Whether there are no entries
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value stored under `key`
    pub fn get(&self, key: &str) -> Option<MetadataValue<'a>> {
        self.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Whether `key` is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.keys_raw().iter().any(|k| ai_string_to_str(k) == key)
    }

    /// Iterate over `(key, value)` pairs in storage order
    pub fn iter(&self) -> impl ExactSizeIterator<Item = (Cow<'a, str>, MetadataValue<'a>)> + 'a {
        let keys = self.keys_raw();
        let values = self.values_raw();
        keys.iter()
            .zip(values)
            .map(|(key, entry)| (ai_string_to_str(key), decode(entry)))
    }
}

fn decode<'a>(entry: &'a sys::aiMetadataEntry) -> MetadataValue<'a> {
    use sys::aiMetadataType as t;

    let data: *const c_void = entry.mData;
    let kind = entry.mType as u32;
    if data.is_null() {
        return MetadataValue::Unknown(kind);
    }
    // SAFETY: Assimp allocates mData with the type given by mType.
    unsafe {
        match kind {
            k if k == t::AI_BOOL as u32 => MetadataValue::Bool(*data.cast::<u8>() != 0),
            k if k == t::AI_INT32 as u32 => MetadataValue::Int32(*data.cast::<i32>()),
            k if k == t::AI_UINT64 as u32 => MetadataValue::UInt64(*data.cast::<u64>()),
            k if k == t::AI_FLOAT as u32 => MetadataValue::Float(*data.cast::<f32>()),
            k if k == t::AI_DOUBLE as u32 => MetadataValue::Double(*data.cast::<f64>()),
            k if k == t::AI_AISTRING as u32 => {
                MetadataValue::String(ai_string_to_string(&*data.cast::<sys::aiString>()))
            }
            k if k == t::AI_AIVECTOR3D as u32 => {
                MetadataValue::Vector3(Vector3D::from_sys(*data.cast::<sys::aiVector3D>()))
            }
            k if k == t::AI_AIMETADATA as u32 => {
                MetadataValue::Metadata(Metadata::new(&*data.cast::<sys::aiMetadata>()))
            }
            k if k == t::AI_INT64 as u32 => MetadataValue::Int64(*data.cast::<i64>()),
            k if k == t::AI_UINT32 as u32 => MetadataValue::UInt32(*data.cast::<u32>()),
            other => MetadataValue::Unknown(other),
        }
    }
}

impl PartialEq for Metadata<'_> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.raw, other.raw)
    }
}

impl std::fmt::Debug for Metadata<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_decode_by_type() {
        let mut flag = true;
        let mut scale = 2.5f64;
        let mut name = crate::types::ai_string_from_str("FBX").unwrap();
        let mut up = 1i32;
        let mut names = [
            crate::types::ai_string_from_str(keys::SOURCE_FORMAT).unwrap(),
            crate::types::ai_string_from_str(keys::UNIT_SCALE_FACTOR).unwrap(),
            crate::types::ai_string_from_str("IsRightHanded").unwrap(),
            crate::types::ai_string_from_str(keys::UP_AXIS).unwrap(),
            crate::types::ai_string_from_str("Broken").unwrap(),
        ];
        let entry = |ty, data: *mut c_void| sys::aiMetadataEntry {
            mType: ty,
            mData: data,
        };
        let mut values = [
            entry(sys::aiMetadataType::AI_AISTRING, (&mut name as *mut sys::aiString).cast()),
            entry(sys::aiMetadataType::AI_DOUBLE, (&mut scale as *mut f64).cast()),
            entry(sys::aiMetadataType::AI_BOOL, (&mut flag as *mut bool).cast()),
            entry(sys::aiMetadataType::AI_INT32, (&mut up as *mut i32).cast()),
            entry(sys::aiMetadataType::AI_INT32, std::ptr::null_mut()),
        ];
        let raw = sys::aiMetadata {
            mNumProperties: names.len() as u32,
            mKeys: names.as_mut_ptr(),
            mValues: values.as_mut_ptr(),
        };

        let meta = Metadata::new(&raw);
        assert_eq!(meta.len(), 5);
        assert_eq!(
            meta.get(keys::SOURCE_FORMAT).unwrap().as_str(),
            Some("FBX")
        );
        assert_eq!(meta.get(keys::UNIT_SCALE_FACTOR), Some(MetadataValue::Double(2.5)));
        assert_eq!(meta.get("IsRightHanded"), Some(MetadataValue::Bool(true)));
        assert_eq!(meta.get(keys::UP_AXIS).unwrap().as_f64(), Some(1.0));
        assert!(matches!(meta.get("Broken"), Some(MetadataValue::Unknown(_))));
        assert!(meta.get("Missing").is_none());
        assert!(meta.contains_key("Broken"));
    }
}
