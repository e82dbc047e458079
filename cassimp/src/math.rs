//! Assimp's own C math helpers, returning glam types.
//!
//! glam covers general math; these exist for callers that need results
//! bit-for-bit identical to what Assimp computes internally (for example when
//! comparing against node transforms it produced).

use crate::{
    sys,
    types::{FromSys, Matrix3x3, Matrix4x4, Quaternion, ToSys, Vector3D},
};

/// Split an affine transform into `(scale, rotation, translation)` via `aiDecomposeMatrix`.
pub fn decompose(m: Matrix4x4) -> (Vector3D, Quaternion, Vector3D) {
    let raw = m.to_sys();
    let mut scaling = sys::aiVector3D::default();
    let mut rotation = sys::aiQuaternion::default();
    let mut position = sys::aiVector3D::default();
    unsafe { sys::aiDecomposeMatrix(&raw, &mut scaling, &mut rotation, &mut position) };
    (
        Vector3D::from_sys(scaling),
        Quaternion::from_sys(rotation),
        Vector3D::from_sys(position),
    )
}

/// Transform a point (w = 1) by a 4x4 matrix via `aiTransformVecByMatrix4`.
pub fn transform_point(m: Matrix4x4, v: Vector3D) -> Vector3D {
    let raw = m.to_sys();
    let mut out: sys::aiVector3D = v.to_sys();
    unsafe { sys::aiTransformVecByMatrix4(&mut out, &raw) };
    Vector3D::from_sys(out)
}

/// Transform a vector by a 3x3 matrix via `aiTransformVecByMatrix3`.
pub fn transform_vector(m: Matrix3x3, v: Vector3D) -> Vector3D {
    let raw = m.to_sys();
    let mut out: sys::aiVector3D = v.to_sys();
    unsafe { sys::aiTransformVecByMatrix3(&mut out, &raw) };
    Vector3D::from_sys(out)
}

/// `a * b` via `aiMultiplyMatrix4`
pub fn multiply(a: Matrix4x4, b: Matrix4x4) -> Matrix4x4 {
    let mut dst = a.to_sys();
    let src = b.to_sys();
    unsafe { sys::aiMultiplyMatrix4(&mut dst, &src) };
    Matrix4x4::from_sys(dst)
}

/// `a * b` via `aiMultiplyMatrix3`
pub fn multiply3(a: Matrix3x3, b: Matrix3x3) -> Matrix3x3 {
    let mut dst = a.to_sys();
    let src = b.to_sys();
    unsafe { sys::aiMultiplyMatrix3(&mut dst, &src) };
    Matrix3x3::from_sys(dst)
}

/// Transpose via `aiTransposeMatrix4`
pub fn transpose(m: Matrix4x4) -> Matrix4x4 {
    let mut raw = m.to_sys();
    unsafe { sys::aiTransposeMatrix4(&mut raw) };
    Matrix4x4::from_sys(raw)
}

/// Transpose via `aiTransposeMatrix3`
pub fn transpose3(m: Matrix3x3) -> Matrix3x3 {
    let mut raw = m.to_sys();
    unsafe { sys::aiTransposeMatrix3(&mut raw) };
    Matrix3x3::from_sys(raw)
}

/// Rotation quaternion of a 3x3 rotation matrix via `aiCreateQuaternionFromMatrix`.
pub fn quaternion_from_matrix3(m: Matrix3x3) -> Quaternion {
    let raw = m.to_sys();
    let mut q = sys::aiQuaternion::default();
    unsafe { sys::aiCreateQuaternionFromMatrix(&mut q, &raw) };
    Quaternion::from_sys(q)
}

/// The identity matrix as produced by `aiIdentityMatrix4`
pub fn identity4() -> Matrix4x4 {
    let mut m = sys::aiMatrix4x4::default();
    unsafe { sys::aiIdentityMatrix4(&mut m) };
    Matrix4x4::from_sys(m)
}

/// The identity matrix as produced by `aiIdentityMatrix3`
pub fn identity3() -> Matrix3x3 {
    let mut m = sys::aiMatrix3x3::default();
    unsafe { sys::aiIdentityMatrix3(&mut m) };
    Matrix3x3::from_sys(m)
}
