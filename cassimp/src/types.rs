//! Math types used by the safe API, and conversions to and from Assimp's
//! raw layouts.
//!
//! The public types are [`glam`] aliases. Assimp stores matrices row-major
//! (`a1..a4` is the first row) while glam is column-major, and Assimp orders
//! quaternions `w, x, y, z`; the [`FromSys`] / [`ToSys`] conversions account
//! for both.
//!
//! ```rust,no_run
//! use cassimp::types::*;
//! use cassimp::Scene;
//!
//! # fn main() -> cassimp::Result<()> {
//! let scene = Scene::from_file("model.obj", Default::default())?;
//! for mesh in scene.meshes() {
//!     let centroid = mesh.vertices().iter().copied().sum::<Vector3D>() / mesh.num_vertices() as f32;
//!     println!("{}: {centroid}", mesh.name());
//! }
//! # Ok(())
//! # }
//! ```

use std::borrow::Cow;

use crate::{
    error::{Error, Result},
    sys,
};

pub use glam::{
    Mat3 as Matrix3x3, Mat4 as Matrix4x4, Quat as Quaternion, Vec2 as Vector2D, Vec3 as Vector3D,
    Vec4 as Vector4D,
};

/// RGB color
pub type Color3D = Vector3D;

/// RGBA color
pub type Color4D = Vector4D;

// Zero-copy vertex views reinterpret `aiVector3D` as `Vec3`; that only holds
// for single-precision Assimp builds.
const _: () = {
    assert!(std::mem::size_of::<sys::ai_real>() == std::mem::size_of::<f32>());
    assert!(std::mem::size_of::<sys::aiVector3D>() == std::mem::size_of::<Vector3D>());
    assert!(std::mem::align_of::<Vector3D>() <= std::mem::align_of::<sys::aiVector3D>());
};

/// Build a value from its raw Assimp counterpart.
pub trait FromSys<T>: Sized {
    /// Convert from the raw layout
    fn from_sys(value: T) -> Self;
}

/// Produce the raw Assimp layout of a value.
pub trait ToSys<T> {
    /// Convert into the raw layout
    fn to_sys(&self) -> T;
}

impl FromSys<sys::aiVector2D> for Vector2D {
    #[inline]
    fn from_sys(v: sys::aiVector2D) -> Self {
        Vector2D::new(v.x, v.y)
    }
}

impl ToSys<sys::aiVector2D> for Vector2D {
    #[inline]
    fn to_sys(&self) -> sys::aiVector2D {
        sys::aiVector2D {
            x: self.x,
            y: self.y,
        }
    }
}

impl FromSys<sys::aiVector3D> for Vector3D {
    #[inline]
    fn from_sys(v: sys::aiVector3D) -> Self {
        Vector3D::new(v.x, v.y, v.z)
    }
}

impl ToSys<sys::aiVector3D> for Vector3D {
    #[inline]
    fn to_sys(&self) -> sys::aiVector3D {
        sys::aiVector3D {
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

impl FromSys<sys::aiColor3D> for Color3D {
    #[inline]
    fn from_sys(c: sys::aiColor3D) -> Self {
        Color3D::new(c.r, c.g, c.b)
    }
}

impl ToSys<sys::aiColor3D> for Color3D {
    #[inline]
    fn to_sys(&self) -> sys::aiColor3D {
        sys::aiColor3D {
            r: self.x,
            g: self.y,
            b: self.z,
        }
    }
}

impl FromSys<sys::aiColor4D> for Color4D {
    #[inline]
    fn from_sys(c: sys::aiColor4D) -> Self {
        Color4D::new(c.r, c.g, c.b, c.a)
    }
}

impl ToSys<sys::aiColor4D> for Color4D {
    #[inline]
    fn to_sys(&self) -> sys::aiColor4D {
        sys::aiColor4D {
            r: self.x,
            g: self.y,
            b: self.z,
            a: self.w,
        }
    }
}

impl FromSys<sys::aiQuaternion> for Quaternion {
    #[inline]
    fn from_sys(q: sys::aiQuaternion) -> Self {
        Quaternion::from_xyzw(q.x, q.y, q.z, q.w)
    }
}

impl ToSys<sys::aiQuaternion> for Quaternion {
    #[inline]
    fn to_sys(&self) -> sys::aiQuaternion {
        sys::aiQuaternion {
            w: self.w,
            x: self.x,
            y: self.y,
            z: self.z,
        }
    }
}

impl FromSys<sys::aiMatrix3x3> for Matrix3x3 {
    #[inline]
    fn from_sys(m: sys::aiMatrix3x3) -> Self {
        Matrix3x3::from_cols_array(&[m.a1, m.b1, m.c1, m.a2, m.b2, m.c2, m.a3, m.b3, m.c3])
    }
}

impl ToSys<sys::aiMatrix3x3> for Matrix3x3 {
    #[inline]
    fn to_sys(&self) -> sys::aiMatrix3x3 {
        // Rows of the Assimp matrix are the columns of the transpose.
        let [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]] = self.transpose().to_cols_array_2d();
        sys::aiMatrix3x3 {
            a1,
            a2,
            a3,
            b1,
            b2,
            b3,
            c1,
            c2,
            c3,
        }
    }
}

impl FromSys<sys::aiMatrix4x4> for Matrix4x4 {
    #[inline]
    fn from_sys(m: sys::aiMatrix4x4) -> Self {
        Matrix4x4::from_cols_array(&[
            m.a1, m.b1, m.c1, m.d1, //
            m.a2, m.b2, m.c2, m.d2, //
            m.a3, m.b3, m.c3, m.d3, //
            m.a4, m.b4, m.c4, m.d4,
        ])
    }
}

impl ToSys<sys::aiMatrix4x4> for Matrix4x4 {
    #[inline]
    fn to_sys(&self) -> sys::aiMatrix4x4 {
        let [
            [a1, a2, a3, a4],
            [b1, b2, b3, b4],
            [c1, c2, c3, c4],
            [d1, d2, d3, d4],
        ] = self.transpose().to_cols_array_2d();
        sys::aiMatrix4x4 {
            a1,
            a2,
            a3,
            a4,
            b1,
            b2,
            b3,
            b4,
            c1,
            c2,
            c3,
            c4,
            d1,
            d2,
            d3,
            d4,
        }
    }
}

/// Borrow the text of an `aiString`, honoring its explicit length.
///
/// The buffer is not assumed to be NUL-terminated; invalid UTF-8 is replaced.
#[inline]
pub fn ai_string_to_str(value: &sys::aiString) -> Cow<'_, str> {
    let len = (value.length as usize).min(value.data.len());
    let bytes = unsafe { std::slice::from_raw_parts(value.data.as_ptr().cast::<u8>(), len) };
    String::from_utf8_lossy(bytes)
}

/// Owned variant of [`ai_string_to_str`]
#[inline]
pub fn ai_string_to_string(value: &sys::aiString) -> String {
    ai_string_to_str(value).into_owned()
}

/// Build an `aiString` from UTF-8 text.
///
/// Text that does not fit the fixed buffer, or that contains a NUL byte,
/// is rejected rather than cut short.
pub(crate) fn ai_string_from_str(value: &str) -> Result<sys::aiString> {
    let mut out = sys::aiString::default();
    let capacity = out.data.len() - 1;
    if value.len() > capacity {
        return Err(Error::invalid_parameter(format!(
            "string of {} bytes exceeds the {capacity}-byte limit of aiString",
            value.len()
        )));
    }
    if value.contains('\0') {
        return Err(Error::invalid_parameter("string contains an interior NUL byte"));
    }
    for (dst, &src) in out.data.iter_mut().zip(value.as_bytes()) {
        *dst = src as std::os::raw::c_char;
    }
    out.data[value.len()] = 0;
    out.length = value.len() as u32;
    Ok(out)
}
