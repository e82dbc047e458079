//! Light sources

use crate::{
    sys,
    types::{Color3D, FromSys, Vector2D, Vector3D, ai_string_to_string},
};

/// Kind of light source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LightType {
    /// Not set
    Undefined,
    /// Parallel rays from infinitely far away
    Directional,
    /// Omnidirectional from a point
    Point,
    /// Cone from a point
    Spot,
    /// Uniform ambient contribution
    Ambient,
    /// Emitting surface of [`Light::size`]
    Area,
    /// A value this crate does not know
    Unknown(u32),
}

impl From<u32> for LightType {
    fn from(value: u32) -> Self {
        use sys::aiLightSourceType as t;
        match value {
            v if v == t::aiLightSource_UNDEFINED as u32 => Self::Undefined,
            v if v == t::aiLightSource_DIRECTIONAL as u32 => Self::Directional,
            v if v == t::aiLightSource_POINT as u32 => Self::Point,
            v if v == t::aiLightSource_SPOT as u32 => Self::Spot,
            v if v == t::aiLightSource_AMBIENT as u32 => Self::Ambient,
            v if v == t::aiLightSource_AREA as u32 => Self::Area,
            other => Self::Unknown(other),
        }
    }
}

/// A light source. Like cameras, it is placed by the node with the same name.
#[derive(Clone, Copy)]
pub struct Light<'a> {
    raw: &'a sys::aiLight,
}

impl<'a> Light<'a> {
    pub(crate) fn new(raw: &'a sys::aiLight) -> Self {
        Self { raw }
    }

    /// The underlying `aiLight`
    pub fn as_raw(&self) -> *const sys::aiLight {
        self.raw
    }

    /// Name of the light and of the node that places it
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Kind of light
    pub fn light_type(&self) -> LightType {
        LightType::from(self.raw.mType as u32)
    }

    /// Position relative to the owning node
    pub fn position(&self) -> Vector3D {
        Vector3D::from_sys(self.raw.mPosition)
    }

    /// Emission direction (directional and spot lights)
    pub fn direction(&self) -> Vector3D {
        Vector3D::from_sys(self.raw.mDirection)
    }

    /// Up vector (area lights)
    pub fn up(&self) -> Vector3D {
        Vector3D::from_sys(self.raw.mUp)
    }

    /// Diffuse color
    pub fn color_diffuse(&self) -> Color3D {
        Color3D::from_sys(self.raw.mColorDiffuse)
    }

    /// Specular color
    pub fn color_specular(&self) -> Color3D {
        Color3D::from_sys(self.raw.mColorSpecular)
    }

    /// Ambient color
    pub fn color_ambient(&self) -> Color3D {
        Color3D::from_sys(self.raw.mColorAmbient)
    }

    /// Constant attenuation term
    pub fn attenuation_constant(&self) -> f32 {
        self.raw.mAttenuationConstant
    }

    /// Linear attenuation term
    pub fn attenuation_linear(&self) -> f32 {
        self.raw.mAttenuationLinear
    }

    /// Quadratic attenuation term
    pub fn attenuation_quadratic(&self) -> f32 {
        self.raw.mAttenuationQuadratic
    }

    /// Attenuation at `distance`: `1 / (c + l*d + q*d^2)`
    pub fn attenuation_at(&self, distance: f32) -> f32 {
        let denom = self.attenuation_constant()
            + self.attenuation_linear() * distance
            + self.attenuation_quadratic() * distance * distance;
        if denom > 0.0 { 1.0 / denom } else { 1.0 }
    }

    /// Full-intensity cone angle of a spot light, in radians
    pub fn angle_inner_cone(&self) -> f32 {
        self.raw.mAngleInnerCone
    }

    /// Outer cone angle of a spot light, in radians
    pub fn angle_outer_cone(&self) -> f32 {
        self.raw.mAngleOuterCone
    }

    /// Extent of an area light
    pub fn size(&self) -> Vector2D {
        Vector2D::from_sys(self.raw.mSize)
    }
}

impl std::fmt::Debug for Light<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Light")
            .field("name", &self.name())
            .field("type", &self.light_type())
            .field("position", &self.position())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn light_types_match_header() {
        assert_eq!(LightType::from(0), LightType::Undefined);
        assert_eq!(LightType::from(1), LightType::Directional);
        assert_eq!(LightType::from(3), LightType::Spot);
        assert_eq!(LightType::from(5), LightType::Area);
        assert_eq!(LightType::from(42), LightType::Unknown(42));
    }

    #[test]
    fn attenuation_follows_formula() {
        let raw = sys::aiLight {
            mName: crate::types::ai_string_from_str("lamp").unwrap(),
            mType: sys::aiLightSourceType::aiLightSource_POINT,
            mAttenuationConstant: 1.0,
            mAttenuationLinear: 0.5,
            mAttenuationQuadratic: 0.25,
            ..Default::default()
        };
        let light = Light::new(&raw);
        assert_eq!(light.light_type(), LightType::Point);
        assert_eq!(light.attenuation_at(0.0), 1.0);
        assert_eq!(light.attenuation_at(2.0), 1.0 / 3.0);
        assert_eq!(light.name(), "lamp");
    }
}
