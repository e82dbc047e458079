//! Materials, their property database and texture slots
//!
//! A material is a list of typed key/value properties. Keys are a base name
//! plus a texture type and index (see [`MatKey`]); every getter here goes
//! through the native `aiGetMaterial*` functions so Assimp's own type
//! conversions apply.

use std::borrow::Cow;
use std::ffi::c_char;
use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;

use crate::{
    error::{Error, Result, to_cstring},
    ffi::{self, PtrArray},
    sys,
    types::{Color4D, FromSys, Vector2D, ai_string_to_str, ai_string_to_string},
};

/// Name Assimp gives the material it creates when a file has none
pub const DEFAULT_MATERIAL_NAME: &str = ffi::header_str(sys::AI_DEFAULT_MATERIAL_NAME);

/// The semantic of a texture slot (`aiTextureType`).
///
/// A newtype rather than an enum: files may carry values newer than this
/// crate knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct TextureType(pub u32);

impl TextureType {
    /// Not a texture; used by every non-texture property
    pub const NONE: Self = Self(0);
    /// Combined with the diffuse lighting term
    pub const DIFFUSE: Self = Self(1);
    /// Combined with the specular lighting term
    pub const SPECULAR: Self = Self(2);
    /// Combined with the ambient lighting term
    pub const AMBIENT: Self = Self(3);
    /// Added after lighting
    pub const EMISSIVE: Self = Self(4);
    /// Height map
    pub const HEIGHT: Self = Self(5);
    /// Tangent-space normal map
    pub const NORMALS: Self = Self(6);
    /// Glossiness of the specular highlight
    pub const SHININESS: Self = Self(7);
    /// Per-pixel opacity
    pub const OPACITY: Self = Self(8);
    /// Displacement map
    pub const DISPLACEMENT: Self = Self(9);
    /// Baked lighting or ambient occlusion
    pub const LIGHTMAP: Self = Self(10);
    /// Reflection map
    pub const REFLECTION: Self = Self(11);
    /// PBR base color
    pub const BASE_COLOR: Self = Self(12);
    /// PBR normal map
    pub const NORMAL_CAMERA: Self = Self(13);
    /// PBR emission
    pub const EMISSION_COLOR: Self = Self(14);
    /// PBR metalness
    pub const METALNESS: Self = Self(15);
    /// PBR roughness
    pub const DIFFUSE_ROUGHNESS: Self = Self(16);
    /// PBR ambient occlusion
    pub const AMBIENT_OCCLUSION: Self = Self(17);
    /// A texture Assimp could not classify
    pub const UNKNOWN: Self = Self(18);
    /// PBR sheen layer
    pub const SHEEN: Self = Self(19);
    /// PBR clearcoat layer
    pub const CLEARCOAT: Self = Self(20);
    /// PBR transmission layer
    pub const TRANSMISSION: Self = Self(21);

    /// Every type this crate names, in numeric order
    pub const ALL: [Self; 22] = {
        let mut all = [Self::NONE; 22];
        let mut i = 0;
        while i < all.len() {
            all[i] = Self(i as u32);
            i += 1;
        }
        all
    };

    fn as_sys(self) -> sys::aiTextureType::Type {
        self.0 as sys::aiTextureType::Type
    }
}

impl fmt::Display for TextureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        const NAMES: [&str; 22] = [
            "n/a",
            "Diffuse",
            "Specular",
            "Ambient",
            "Emissive",
            "Height",
            "Normals",
            "Shininess",
            "Opacity",
            "Displacement",
            "Lightmap",
            "Reflection",
            "BaseColor",
            "NormalCamera",
            "EmissionColor",
            "Metalness",
            "DiffuseRoughness",
            "AmbientOcclusion",
            "Unknown",
            "Sheen",
            "Clearcoat",
            "Transmission",
        ];
        f.write_str(NAMES.get(self.0 as usize).copied().unwrap_or("BUG"))
    }
}

macro_rules! c_enum {
    (
        $(#[$meta:meta])*
        $name:ident in $module:ident {
            $($(#[$vmeta:meta])* $variant:ident = $c:ident,)+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant,)+
            /// A value this crate does not know
            Unknown(u32),
        }

        impl From<u32> for $name {
            fn from(value: u32) -> Self {
                $(
                    if value == sys::$module::$c as u32 {
                        return Self::$variant;
                    }
                )+
                Self::Unknown(value)
            }
        }

        impl $name {
            /// The raw C value
            pub fn as_raw(self) -> u32 {
                match self {
                    $(Self::$variant => sys::$module::$c as u32,)+
                    Self::Unknown(value) => value,
                }
            }
        }
    };
}

c_enum! {
    /// Shading model (`$mat.shadingm`)
    ShadingMode in aiShadingMode {
        /// Per-face diffuse shading
        Flat = aiShadingMode_Flat,
        /// Gouraud shading
        Gouraud = aiShadingMode_Gouraud,
        /// Phong shading
        Phong = aiShadingMode_Phong,
        /// Blinn-Phong shading
        Blinn = aiShadingMode_Blinn,
        /// Toon shading
        Toon = aiShadingMode_Toon,
        /// Oren-Nayar shading
        OrenNayar = aiShadingMode_OrenNayar,
        /// Minnaert shading
        Minnaert = aiShadingMode_Minnaert,
        /// Cook-Torrance shading
        CookTorrance = aiShadingMode_CookTorrance,
        /// Unlit
        NoShading = aiShadingMode_NoShading,
        /// Fresnel shading
        Fresnel = aiShadingMode_Fresnel,
        /// Physically based BRDF
        PbrBrdf = aiShadingMode_PBR_BRDF,
    }
}

impl fmt::Display for ShadingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(value) => write!(f, "ShadingMode<Unknown>({value})"),
            known => fmt::Debug::fmt(known, f),
        }
    }
}

c_enum! {
    /// How texture coordinates are generated (`$tex.mapping`)
    TextureMapping in aiTextureMapping {
        /// Explicit UV channel
        Uv = aiTextureMapping_UV,
        /// Spherical projection
        Sphere = aiTextureMapping_SPHERE,
        /// Cylindrical projection
        Cylinder = aiTextureMapping_CYLINDER,
        /// Cubic projection
        Box = aiTextureMapping_BOX,
        /// Planar projection
        Plane = aiTextureMapping_PLANE,
        /// Format-specific mapping
        Other = aiTextureMapping_OTHER,
    }
}

c_enum! {
    /// How a texture combines with the layer below it (`$tex.op`)
    TextureOp in aiTextureOp {
        /// `T = T1 * T2`
        Multiply = aiTextureOp_Multiply,
        /// `T = T1 + T2`
        Add = aiTextureOp_Add,
        /// `T = T1 - T2`
        Subtract = aiTextureOp_Subtract,
        /// `T = T1 / T2`
        Divide = aiTextureOp_Divide,
        /// `T = (T1 + T2) - (T1 * T2)`
        SmoothAdd = aiTextureOp_SmoothAdd,
        /// `T = T1 + (T2 - 0.5)`
        SignedAdd = aiTextureOp_SignedAdd,
    }
}

c_enum! {
    /// Behavior outside `0..1` UV range (`$tex.mapmodeu` / `$tex.mapmodev`)
    TextureMapMode in aiTextureMapMode {
        /// Repeat
        Wrap = aiTextureMapMode_Wrap,
        /// Clamp to the edge texel
        Clamp = aiTextureMapMode_Clamp,
        /// Repeat, mirroring every other tile
        Mirror = aiTextureMapMode_Mirror,
        /// Transparent outside the texture
        Decal = aiTextureMapMode_Decal,
    }
}

c_enum! {
    /// Framebuffer blending (`$mat.blend`)
    BlendMode in aiBlendMode {
        /// `src * alpha + dst * (1 - alpha)`
        Default = aiBlendMode_Default,
        /// `src * alpha + dst`
        Additive = aiBlendMode_Additive,
    }
}

bitflags! {
    /// Per-texture flags (`$tex.flags`)
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct TextureFlags: u32 {
        /// Invert the texture's colors
        const INVERT = sys::aiTextureFlags::aiTextureFlags_Invert as u32;
        /// Use the alpha channel even if the material says otherwise
        const USE_ALPHA = sys::aiTextureFlags::aiTextureFlags_UseAlpha as u32;
        /// Ignore the alpha channel
        const IGNORE_ALPHA = sys::aiTextureFlags::aiTextureFlags_IgnoreAlpha as u32;
    }
}

/// Layout of a property's data buffer (`aiPropertyTypeInfo`)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyTypeInfo {
    /// `f32` array
    Float,
    /// `f64` array
    Double,
    /// `aiString` (length prefix, bytes, NUL)
    String,
    /// `i32` array
    Integer,
    /// Opaque bytes
    Buffer,
    /// A value this crate does not know
    Unknown(u32),
}

impl From<u32> for PropertyTypeInfo {
    fn from(value: u32) -> Self {
        use sys::aiPropertyTypeInfo as t;
        match value {
            v if v == t::aiPTI_Float as u32 => Self::Float,
            v if v == t::aiPTI_Double as u32 => Self::Double,
            v if v == t::aiPTI_String as u32 => Self::String,
            v if v == t::aiPTI_Integer as u32 => Self::Integer,
            v if v == t::aiPTI_Buffer as u32 => Self::Buffer,
            other => Self::Unknown(other),
        }
    }
}

/// Decoded contents of a [`MaterialProperty`]
#[derive(Debug, Clone, PartialEq)]
pub enum PropertyValue {
    /// Text
    String(String),
    /// Single-precision values
    Floats(Vec<f32>),
    /// Double-precision values
    Doubles(Vec<f64>),
    /// Integer values
    Integers(Vec<i32>),
    /// Anything else, verbatim
    Buffer(Vec<u8>),
}

/// A material property key: base name, texture type and texture index.
///
/// Its raw form (`Display` / `FromStr`) is `"base,type,index"`, matching how
/// Assimp prints keys, e.g. `"$tex.file,1,0"` for the first diffuse texture.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MatKey {
    /// Key name such as `"$clr.diffuse"`
    pub base: Cow<'static, str>,
    /// Texture slot; [`TextureType::NONE`] for non-texture keys
    pub texture_type: TextureType,
    /// Index within the slot; 0 for non-texture keys
    pub index: u32,
}

macro_rules! plain_keys {
    ($($(#[$meta:meta])* $name:ident = $base:literal;)+) => {
        impl MatKey {
            $(
                $(#[$meta])*
                pub const $name: MatKey = MatKey::new($base);
            )+
        }
    };
}

macro_rules! texture_keys {
    ($($(#[$meta:meta])* $name:ident = $base:literal;)+) => {
        impl MatKey {
            $(
                $(#[$meta])*
                pub const fn $name(texture_type: TextureType, index: u32) -> MatKey {
                    MatKey::for_texture($base, texture_type, index)
                }
            )+
        }
    };
}

impl MatKey {
    /// A non-texture key
    pub const fn new(base: &'static str) -> Self {
        Self::for_texture(base, TextureType::NONE, 0)
    }

    /// A key addressing texture `index` of `texture_type`
    pub const fn for_texture(base: &'static str, texture_type: TextureType, index: u32) -> Self {
        Self {
            base: Cow::Borrowed(base),
            texture_type,
            index,
        }
    }

    /// A key with a base name only known at run time
    pub fn custom(base: impl Into<String>, texture_type: TextureType, index: u32) -> Self {
        Self {
            base: Cow::Owned(base.into()),
            texture_type,
            index,
        }
    }
}

plain_keys! {
    /// Material name (string)
    NAME = "?mat.name";
    /// Two-sided rendering (integer, non-zero means true)
    TWOSIDED = "$mat.twosided";
    /// [`ShadingMode`] (integer)
    SHADING_MODEL = "$mat.shadingm";
    /// Wireframe rendering (integer)
    ENABLE_WIREFRAME = "$mat.wireframe";
    /// [`BlendMode`] (integer)
    BLEND_FUNC = "$mat.blend";
    /// Opacity in `0..=1` (float)
    OPACITY = "$mat.opacity";
    /// Transparency factor (float)
    TRANSPARENCYFACTOR = "$mat.transparencyfactor";
    /// Bump scaling (float)
    BUMPSCALING = "$mat.bumpscaling";
    /// Phong exponent (float)
    SHININESS = "$mat.shininess";
    /// Specular scale (float)
    SHININESS_STRENGTH = "$mat.shinpercent";
    /// Reflectivity (float)
    REFLECTIVITY = "$mat.reflectivity";
    /// Index of refraction (float)
    REFRACTI = "$mat.refracti";
    /// Diffuse color
    COLOR_DIFFUSE = "$clr.diffuse";
    /// Ambient color
    COLOR_AMBIENT = "$clr.ambient";
    /// Specular color
    COLOR_SPECULAR = "$clr.specular";
    /// Emissive color
    COLOR_EMISSIVE = "$clr.emissive";
    /// Transparent color
    COLOR_TRANSPARENT = "$clr.transparent";
    /// Reflective color
    COLOR_REFLECTIVE = "$clr.reflective";
    /// Scene background image (string)
    GLOBAL_BACKGROUND_IMAGE = "?bg.global";
    /// Shader language of the following shader keys (string)
    SHADER_LANGUAGE = "?sh.lang";
    /// PBR base color
    BASE_COLOR = "$clr.base";
    /// PBR metallic factor (float)
    METALLIC_FACTOR = "$mat.metallicFactor";
    /// PBR roughness factor (float)
    ROUGHNESS_FACTOR = "$mat.roughnessFactor";
    /// PBR specular factor (float)
    SPECULAR_FACTOR = "$mat.specularFactor";
    /// PBR glossiness factor (float)
    GLOSSINESS_FACTOR = "$mat.glossinessFactor";
    /// Emissive intensity (float)
    EMISSIVE_INTENSITY = "$mat.emissiveIntensity";
    /// Sheen color factor
    SHEEN_COLOR_FACTOR = "$clr.sheen.factor";
    /// Sheen roughness factor (float)
    SHEEN_ROUGHNESS_FACTOR = "$mat.sheen.roughness.factor";
    /// Clearcoat factor (float)
    CLEARCOAT_FACTOR = "$mat.clearcoat.factor";
    /// Clearcoat roughness factor (float)
    CLEARCOAT_ROUGHNESS_FACTOR = "$mat.clearcoat.roughnessFactor";
    /// Transmission factor (float)
    TRANSMISSION_FACTOR = "$mat.transmission.factor";
    /// glTF base color factor
    GLTF_PBRMETALLICROUGHNESS_BASE_COLOR_FACTOR = "$mat.gltf.pbrMetallicRoughness.baseColorFactor";
    /// glTF metallic factor (float)
    GLTF_PBRMETALLICROUGHNESS_METALLIC_FACTOR = "$mat.gltf.pbrMetallicRoughness.metallicFactor";
    /// glTF roughness factor (float)
    GLTF_PBRMETALLICROUGHNESS_ROUGHNESS_FACTOR = "$mat.gltf.pbrMetallicRoughness.roughnessFactor";
    /// glTF alpha mode: `OPAQUE`, `MASK` or `BLEND` (string)
    GLTF_ALPHAMODE = "$mat.gltf.alphaMode";
    /// glTF alpha cutoff (float)
    GLTF_ALPHACUTOFF = "$mat.gltf.alphaCutoff";
    /// glTF specular-glossiness workflow flag (integer)
    GLTF_PBRSPECULARGLOSSINESS = "$mat.gltf.pbrSpecularGlossiness";
    /// glTF glossiness factor (float)
    GLTF_PBRSPECULARGLOSSINESS_GLOSSINESS_FACTOR = "$mat.gltf.pbrMetallicRoughness.glossinessFactor";
    /// glTF unlit extension flag (integer)
    GLTF_UNLIT = "$mat.gltf.unlit";
}

texture_keys! {
    /// Texture path (string)
    texture = "$tex.file";
    /// UV channel of the texture (integer)
    uvwsrc = "$tex.uvwsrc";
    /// [`TextureOp`] (integer)
    texop = "$tex.op";
    /// [`TextureMapping`] (integer)
    mapping = "$tex.mapping";
    /// Blend strength (float)
    texblend = "$tex.blend";
    /// [`TextureMapMode`] on u (integer)
    mappingmode_u = "$tex.mapmodeu";
    /// [`TextureMapMode`] on v (integer)
    mappingmode_v = "$tex.mapmodev";
    /// Projection axis for non-UV mappings (vector)
    texmap_axis = "$tex.mapaxis";
    /// UV transform (see [`Material::uv_transform`])
    uvtransform = "$tex.uvtrafo";
    /// [`TextureFlags`] (integer)
    texflags = "$tex.flags";
    /// glTF texture coordinate set (integer)
    gltf_texture_texcoord = "$tex.file.texCoord";
    /// glTF sampler name (string)
    gltf_mappingname = "$tex.mappingname";
    /// glTF sampler id (string)
    gltf_mappingid = "$tex.mappingid";
    /// glTF magnification filter (integer)
    gltf_mappingfilter_mag = "$tex.mappingfiltermag";
    /// glTF minification filter (integer)
    gltf_mappingfilter_min = "$tex.mappingfiltermin";
    /// glTF normal map scale (float)
    gltf_texture_scale = "$tex.scale";
    /// glTF occlusion strength (float)
    gltf_texture_strength = "$tex.strength";
}

impl fmt::Display for MatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{}", self.base, self.texture_type.0, self.index)
    }
}

impl FromStr for MatKey {
    type Err = Error;

    /// Parses `"base,type,index"`; a string without the two numeric fields is
    /// taken as a bare base name.
    fn from_str(raw: &str) -> Result<Self> {
        let mut parts = raw.rsplitn(3, ',');
        let (Some(index), Some(texture_type), Some(base)) = (parts.next(), parts.next(), parts.next())
        else {
            if raw.is_empty() {
                return Err(Error::invalid_parameter("empty material key"));
            }
            return Ok(Self::custom(raw, TextureType::NONE, 0));
        };
        let parse = |field: &str| {
            field.trim().parse::<u32>().map_err(|_| {
                Error::invalid_parameter(format!("material key `{raw}` has a non-numeric field"))
            })
        };
        Ok(Self::custom(base, TextureType(parse(texture_type)?), parse(index)?))
    }
}

/// A UV transform (`aiUVTransform`)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UvTransform {
    /// Offset applied after scaling and rotation
    pub translation: Vector2D,
    /// Scale around `(0.5, 0.5)`
    pub scaling: Vector2D,
    /// Counter-clockwise rotation in radians
    pub rotation: f32,
}

impl Default for UvTransform {
    fn default() -> Self {
        Self {
            translation: Vector2D::ZERO,
            scaling: Vector2D::ONE,
            rotation: 0.0,
        }
    }
}

/// Everything `aiGetMaterialTexture` reports about one texture slot
#[derive(Debug, Clone, PartialEq)]
pub struct TextureInfo {
    /// File path, or `*N` for embedded texture `N`
    pub path: String,
    /// Coordinate generation
    pub mapping: TextureMapping,
    /// UV channel
    pub uv_index: u32,
    /// Blend strength; 1.0 when the file does not set one
    pub blend: f32,
    /// Combine operation, if the file sets one
    pub op: Option<TextureOp>,
    /// Wrap modes on u and v
    pub map_modes: [TextureMapMode; 2],
    /// Extra flags
    pub flags: TextureFlags,
}

/// One entry of a material's property database
#[derive(Clone, Copy)]
pub struct MaterialProperty<'a> {
    raw: &'a sys::aiMaterialProperty,
}

impl<'a> MaterialProperty<'a> {
    fn new(raw: &'a sys::aiMaterialProperty) -> Self {
        Self { raw }
    }

    /// Base name of the key
    pub fn key(&self) -> Cow<'a, str> {
        ai_string_to_str(&self.raw.mKey)
    }

    /// Texture type, [`TextureType::NONE`] for non-texture properties
    pub fn semantic(&self) -> TextureType {
        TextureType(self.raw.mSemantic)
    }

    /// Texture index, 0 for non-texture properties
    pub fn index(&self) -> u32 {
        self.raw.mIndex
    }

    /// The full key of this property
    pub fn mat_key(&self) -> MatKey {
        MatKey::custom(self.key(), self.semantic(), self.index())
    }

    /// Layout of [`data`](Self::data)
    pub fn type_info(&self) -> PropertyTypeInfo {
        PropertyTypeInfo::from(self.raw.mType as u32)
    }

    /// Size of the data buffer in bytes
    pub fn data_length(&self) -> usize {
        self.raw.mDataLength as usize
    }

    /// Raw data buffer
    pub fn data(&self) -> &'a [u8] {
        unsafe { ffi::slice(self.raw.mData.cast::<u8>(), self.data_length()) }
    }

    /// Decode the data buffer according to [`type_info`](Self::type_info)
    pub fn value(&self) -> PropertyValue {
        let data = self.data();
        match self.type_info() {
            PropertyTypeInfo::String => PropertyValue::String(decode_string(data)),
            PropertyTypeInfo::Float => PropertyValue::Floats(
                data.chunks_exact(4)
                    .map(|c| f32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            PropertyTypeInfo::Double => PropertyValue::Doubles(
                data.chunks_exact(8)
                    .map(|c| f64::from_ne_bytes([c[0], c[1], c[2], c[3], c[4], c[5], c[6], c[7]]))
                    .collect(),
            ),
            PropertyTypeInfo::Integer => PropertyValue::Integers(
                data.chunks_exact(4)
                    .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
                    .collect(),
            ),
            PropertyTypeInfo::Buffer | PropertyTypeInfo::Unknown(_) => {
                PropertyValue::Buffer(data.to_vec())
            }
        }
    }
}

/// A serialized `aiString`: 4-byte length, bytes, NUL.
fn decode_string(data: &[u8]) -> String {
    const PREFIX: usize = std::mem::size_of::<u32>();
    if data.len() <= PREFIX {
        return String::new();
    }
    let body = &data[PREFIX..];
    let body = body.strip_suffix(&[0]).unwrap_or(body);
    String::from_utf8_lossy(body).into_owned()
}

impl fmt::Debug for MaterialProperty<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MaterialProperty")
            .field("key", &self.key())
            .field("semantic", &self.semantic())
            .field("index", &self.index())
            .field("type_info", &self.type_info())
            .field("data_length", &self.data_length())
            .finish()
    }
}

/// A material of a scene
#[derive(Clone, Copy)]
pub struct Material<'a> {
    raw: &'a sys::aiMaterial,
}

impl<'a> Material<'a> {
    pub(crate) fn new(raw: &'a sys::aiMaterial) -> Self {
        Self { raw }
    }

    /// The underlying `aiMaterial`
    pub fn as_raw(&self) -> *const sys::aiMaterial {
        self.raw
    }

    /// Number of properties
    pub fn num_properties(&self) -> usize {
        if self.raw.mProperties.is_null() {
            0
        } else {
            self.raw.mNumProperties as usize
        }
    }

    /// Capacity of the property array
    pub fn num_allocated(&self) -> usize {
        self.raw.mNumAllocated as usize
    }

    /// Iterate over every property
    pub fn properties(&self) -> impl ExactSizeIterator<Item = MaterialProperty<'a>> + Clone + 'a {
        unsafe { PtrArray::new(self.raw.mProperties, self.num_properties()) }
            .map(MaterialProperty::new)
    }

    /// Look up a property via `aiGetMaterialProperty`
    pub fn property(&self, key: &MatKey) -> Result<MaterialProperty<'a>> {
        let c_key = to_cstring(&key.base, "material key")?;
        let mut out: *const sys::aiMaterialProperty = std::ptr::null();
        let status = unsafe {
            sys::aiGetMaterialProperty(
                self.raw,
                c_key.as_ptr(),
                key.texture_type.0,
                key.index,
                &mut out,
            )
        };
        check(status, key)?;
        unsafe { ffi::deref(out) }
            .map(MaterialProperty::new)
            .ok_or(Error::NullPointer)
    }

    /// A string property
    pub fn string(&self, key: &MatKey) -> Result<String> {
        self.with_key(key, |mat, c_key| {
            let mut out = sys::aiString::default();
            let status = unsafe {
                sys::aiGetMaterialString(mat, c_key, key.texture_type.0, key.index, &mut out)
            };
            check(status, key).map(|()| ai_string_to_string(&out))
        })
    }

    /// A color property; RGB colors come back with alpha 1
    pub fn color(&self, key: &MatKey) -> Result<Color4D> {
        self.with_key(key, |mat, c_key| {
            let mut out = sys::aiColor4D::default();
            let status = unsafe {
                sys::aiGetMaterialColor(mat, c_key, key.texture_type.0, key.index, &mut out)
            };
            check(status, key).map(|()| Color4D::from_sys(out))
        })
    }

    /// The first value of a float property
    pub fn float(&self, key: &MatKey) -> Result<f32> {
        let values = self.float_array(key, 1)?;
        values
            .first()
            .copied()
            .ok_or_else(|| Error::material_property(key, "no values"))
    }

    /// Up to `max` values of a float property
    pub fn float_array(&self, key: &MatKey, max: usize) -> Result<Vec<f32>> {
        self.with_key(key, |mat, c_key| {
            let mut out = vec![0.0 as sys::ai_real; max];
            let mut count = max as u32;
            let status = unsafe {
                sys::aiGetMaterialFloatArray(
                    mat,
                    c_key,
                    key.texture_type.0,
                    key.index,
                    out.as_mut_ptr(),
                    &mut count,
                )
            };
            check(status, key)?;
            out.truncate(count as usize);
            Ok(out)
        })
    }

    /// The first value of an integer property
    pub fn integer(&self, key: &MatKey) -> Result<i32> {
        let values = self.integer_array(key, 1)?;
        values
            .first()
            .copied()
            .ok_or_else(|| Error::material_property(key, "no values"))
    }

    /// Up to `max` values of an integer property
    pub fn integer_array(&self, key: &MatKey, max: usize) -> Result<Vec<i32>> {
        self.with_key(key, |mat, c_key| {
            let mut out = vec![0i32; max];
            let mut count = max as u32;
            let status = unsafe {
                sys::aiGetMaterialIntegerArray(
                    mat,
                    c_key,
                    key.texture_type.0,
                    key.index,
                    out.as_mut_ptr(),
                    &mut count,
                )
            };
            check(status, key)?;
            out.truncate(count as usize);
            Ok(out)
        })
    }

    /// A UV transform property, usually [`MatKey::uvtransform`]
    pub fn uv_transform(&self, key: &MatKey) -> Result<UvTransform> {
        self.with_key(key, |mat, c_key| {
            let mut out = sys::aiUVTransform::default();
            let status = unsafe {
                sys::aiGetMaterialUVTransform(mat, c_key, key.texture_type.0, key.index, &mut out)
            };
            check(status, key).map(|()| UvTransform {
                translation: Vector2D::from_sys(out.mTranslation),
                scaling: Vector2D::from_sys(out.mScaling),
                rotation: out.mRotation,
            })
        })
    }

    /// Number of textures of one type
    pub fn texture_count(&self, texture_type: TextureType) -> usize {
        unsafe { sys::aiGetMaterialTextureCount(self.raw, texture_type.as_sys()) as usize }
    }

    /// Texture `index` of `texture_type` and its sampling parameters
    pub fn texture(&self, texture_type: TextureType, index: u32) -> Result<TextureInfo> {
        let mut path = sys::aiString::default();
        let mut mapping = sys::aiTextureMapping::aiTextureMapping_UV;
        let mut uv_index = 0u32;
        let mut blend: sys::ai_real = 1.0;
        // Left untouched when the file sets no op.
        let mut op = u32::MAX as sys::aiTextureOp::Type;
        let mut map_modes = [sys::aiTextureMapMode::aiTextureMapMode_Wrap; 2];
        let mut flags = 0u32;
        let status = unsafe {
            sys::aiGetMaterialTexture(
                self.raw,
                texture_type.as_sys(),
                index,
                &mut path,
                &mut mapping,
                &mut uv_index,
                &mut blend,
                &mut op,
                map_modes.as_mut_ptr(),
                &mut flags,
            )
        };
        check(status, &MatKey::texture(texture_type, index))?;
        Ok(TextureInfo {
            path: ai_string_to_string(&path),
            mapping: TextureMapping::from(mapping as u32),
            uv_index,
            blend,
            op: (op as u32 != u32::MAX).then(|| TextureOp::from(op as u32)),
            map_modes: map_modes.map(|mode| TextureMapMode::from(mode as u32)),
            flags: TextureFlags::from_bits_retain(flags),
        })
    }

    /// Every texture of one type, in index order
    pub fn textures(&self, texture_type: TextureType) -> Result<Vec<TextureInfo>> {
        (0..self.texture_count(texture_type) as u32)
            .map(|index| self.texture(texture_type, index))
            .collect()
    }

    /// Material name, empty when unnamed
    pub fn name(&self) -> String {
        self.string(&MatKey::NAME).unwrap_or_default()
    }

    /// Shading model, if set
    pub fn shading_mode(&self) -> Option<ShadingMode> {
        self.integer(&MatKey::SHADING_MODEL)
            .ok()
            .map(|value| ShadingMode::from(value as u32))
    }

    /// Diffuse color, if set
    pub fn diffuse_color(&self) -> Option<Color4D> {
        self.color(&MatKey::COLOR_DIFFUSE).ok()
    }

    /// Whether back-face culling should be disabled; false when unset
    pub fn two_sided(&self) -> bool {
        self.integer(&MatKey::TWOSIDED).is_ok_and(|value| value != 0)
    }

    /// Opacity, if set
    pub fn opacity(&self) -> Option<f32> {
        self.float(&MatKey::OPACITY).ok()
    }

    fn with_key<T>(
        &self,
        key: &MatKey,
        f: impl FnOnce(*const sys::aiMaterial, *const c_char) -> Result<T>,
    ) -> Result<T> {
        let c_key = to_cstring(&key.base, "material key")?;
        f(self.raw as *const sys::aiMaterial, c_key.as_ptr())
    }
}

fn check(status: sys::aiReturn, key: &MatKey) -> Result<()> {
    match status {
        sys::aiReturn::aiReturn_SUCCESS => Ok(()),
        sys::aiReturn::aiReturn_OUTOFMEMORY => Err(Error::material_property(key, "out of memory")),
        _ => Err(Error::material_property(key, "not found")),
    }
}

impl fmt::Debug for Material<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Material")
            .field("name", &self.name())
            .field("properties", &self.num_properties())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn texture_types_match_header() {
        use sys::aiTextureType as t;
        assert_eq!(TextureType::NONE.0, t::aiTextureType_NONE as u32);
        assert_eq!(TextureType::DIFFUSE.0, t::aiTextureType_DIFFUSE as u32);
        assert_eq!(TextureType::REFLECTION.0, t::aiTextureType_REFLECTION as u32);
        assert_eq!(TextureType::BASE_COLOR.0, t::aiTextureType_BASE_COLOR as u32);
        assert_eq!(
            TextureType::AMBIENT_OCCLUSION.0,
            t::aiTextureType_AMBIENT_OCCLUSION as u32
        );
        assert_eq!(TextureType::UNKNOWN.0, t::aiTextureType_UNKNOWN as u32);
        assert_eq!(TextureType::TRANSMISSION.0, t::aiTextureType_TRANSMISSION as u32);
        assert_eq!(TextureType::ALL[21], TextureType::TRANSMISSION);
    }

    #[test]
    fn texture_type_names() {
        assert_eq!(TextureType::NONE.to_string(), "n/a");
        assert_eq!(TextureType::DIFFUSE.to_string(), "Diffuse");
        assert_eq!(TextureType::NORMAL_CAMERA.to_string(), "NormalCamera");
        assert_eq!(TextureType::UNKNOWN.to_string(), "Unknown");
        assert_eq!(TextureType(99).to_string(), "BUG");
    }

    #[test]
    fn shading_mode_round_trips_and_prints_unknown() {
        assert_eq!(ShadingMode::from(1), ShadingMode::Flat);
        assert_eq!(ShadingMode::from(10), ShadingMode::Fresnel);
        assert_eq!(ShadingMode::PbrBrdf.as_raw(), 11);
        assert_eq!(ShadingMode::Phong.to_string(), "Phong");
        assert_eq!(ShadingMode::from(77).to_string(), "ShadingMode<Unknown>(77)");
    }

    #[test]
    fn small_enums_match_header() {
        assert_eq!(TextureOp::SignedAdd.as_raw(), 5);
        assert_eq!(TextureMapMode::from(3), TextureMapMode::Decal);
        assert_eq!(TextureMapping::Other.as_raw(), 5);
        assert_eq!(BlendMode::from(1), BlendMode::Additive);
        assert_eq!(TextureFlags::IGNORE_ALPHA.bits(), 4);
        assert_eq!(PropertyTypeInfo::from(3), PropertyTypeInfo::String);
        assert_eq!(PropertyTypeInfo::from(9), PropertyTypeInfo::Unknown(9));
    }

    #[test]
    fn mat_key_raw_form() {
        assert_eq!(MatKey::COLOR_DIFFUSE.to_string(), "$clr.diffuse,0,0");
        let key = MatKey::texture(TextureType::DIFFUSE, 1);
        assert_eq!(key.to_string(), "$tex.file,1,1");
        assert_eq!("$tex.file,1,1".parse::<MatKey>().unwrap(), key);
        assert_eq!(
            "?mat.name".parse::<MatKey>().unwrap(),
            MatKey::NAME,
            "a bare base parses as a non-texture key"
        );
        assert!("$tex.file,x,1".parse::<MatKey>().is_err());
        assert!("".parse::<MatKey>().is_err());
    }

    fn raw_property(
        key: &str,
        type_info: sys::aiPropertyTypeInfo::Type,
        data: &mut [u8],
    ) -> sys::aiMaterialProperty {
        sys::aiMaterialProperty {
            mKey: crate::types::ai_string_from_str(key).unwrap(),
            mSemantic: 0,
            mIndex: 0,
            mDataLength: data.len() as u32,
            mType: type_info,
            mData: data.as_mut_ptr().cast(),
        }
    }

    #[test]
    fn string_value_skips_length_prefix_and_nul() {
        let mut data = Vec::new();
        data.extend_from_slice(&5u32.to_ne_bytes());
        data.extend_from_slice(b"steel\0");
        let raw = raw_property("?mat.name", sys::aiPropertyTypeInfo::aiPTI_String, &mut data);
        let prop = MaterialProperty::new(&raw);
        assert_eq!(prop.key(), "?mat.name");
        assert_eq!(prop.type_info(), PropertyTypeInfo::String);
        assert_eq!(prop.value(), PropertyValue::String("steel".into()));
        assert_eq!(prop.mat_key(), MatKey::NAME);
    }

    #[test]
    fn float_value_decodes_whole_elements() {
        let mut data: Vec<u8> = [0.25f32, 0.5, 1.0]
            .iter()
            .flat_map(|f| f.to_ne_bytes())
            .collect();
        let raw = raw_property("$clr.diffuse", sys::aiPropertyTypeInfo::aiPTI_Float, &mut data);
        let prop = MaterialProperty::new(&raw);
        assert_eq!(prop.data_length(), 12);
        assert_eq!(prop.value(), PropertyValue::Floats(vec![0.25, 0.5, 1.0]));
    }

    #[test]
    fn obj_default_material_is_queryable() {
        let scene = crate::Scene::from_memory(
            b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n",
            Some("obj"),
            crate::PostProcessSteps::empty(),
        )
        .unwrap();
        let material = scene.material(0).unwrap();
        assert_eq!(material.name(), DEFAULT_MATERIAL_NAME);
        assert!(material.diffuse_color().is_some());
        assert!(material.properties().any(|p| p.key() == "?mat.name"));
        assert_eq!(material.texture_count(TextureType::DIFFUSE), 0);
        assert!(material.texture(TextureType::DIFFUSE, 0).is_err());

        let missing = material.float(&MatKey::new("$mat.nonexistent")).unwrap_err();
        assert!(matches!(missing, Error::MaterialProperty { .. }));
    }
}
