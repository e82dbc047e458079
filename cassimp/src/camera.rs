//! Cameras

use crate::{
    sys,
    types::{FromSys, Matrix4x4, Vector3D, ai_string_to_string},
};

/// A camera. Its pose comes from the node with the same name; the vectors
/// here are relative to that node.
#[derive(Clone, Copy)]
pub struct Camera<'a> {
    raw: &'a sys::aiCamera,
}

impl<'a> Camera<'a> {
    pub(crate) fn new(raw: &'a sys::aiCamera) -> Self {
        Self { raw }
    }

    /// The underlying `aiCamera`
    pub fn as_raw(&self) -> *const sys::aiCamera {
        self.raw
    }

    /// Name of the camera and of the node that places it
    pub fn name(&self) -> String {
        ai_string_to_string(&self.raw.mName)
    }

    /// Position relative to the owning node
    pub fn position(&self) -> Vector3D {
        Vector3D::from_sys(self.raw.mPosition)
    }

    /// Up vector
    pub fn up(&self) -> Vector3D {
        Vector3D::from_sys(self.raw.mUp)
    }

    /// Viewing direction
    pub fn look_at(&self) -> Vector3D {
        Vector3D::from_sys(self.raw.mLookAt)
    }

    /// Half the horizontal field of view, in radians
    pub fn horizontal_fov(&self) -> f32 {
        self.raw.mHorizontalFOV
    }

    /// Near clipping distance
    pub fn clip_plane_near(&self) -> f32 {
        self.raw.mClipPlaneNear
    }

    /// Far clipping distance
    pub fn clip_plane_far(&self) -> f32 {
        self.raw.mClipPlaneFar
    }

    /// Width over height; 0 when the file leaves it to the viewer
    pub fn aspect(&self) -> f32 {
        self.raw.mAspect
    }

    /// Half the width of an orthographic view; 0 for perspective cameras
    pub fn orthographic_width(&self) -> f32 {
        self.raw.mOrthographicWidth
    }

    /// Right-handed view matrix in the camera's local space
    pub fn view_matrix(&self) -> Matrix4x4 {
        Matrix4x4::look_to_rh(self.position(), self.look_at(), self.up())
    }
}

impl std::fmt::Debug for Camera<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Camera")
            .field("name", &self.name())
            .field("position", &self.position())
            .field("look_at", &self.look_at())
            .field("horizontal_fov", &self.horizontal_fov())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accessors_read_through() {
        let raw = sys::aiCamera {
            mName: crate::types::ai_string_from_str("main").unwrap(),
            mPosition: sys::aiVector3D { x: 0.0, y: 1.0, z: 5.0 },
            mUp: sys::aiVector3D { x: 0.0, y: 1.0, z: 0.0 },
            mLookAt: sys::aiVector3D { x: 0.0, y: 0.0, z: -1.0 },
            mHorizontalFOV: 0.785,
            mClipPlaneNear: 0.1,
            mClipPlaneFar: 1000.0,
            mAspect: 16.0 / 9.0,
            ..Default::default()
        };
        let camera = Camera::new(&raw);
        assert_eq!(camera.name(), "main");
        assert_eq!(camera.position(), Vector3D::new(0.0, 1.0, 5.0));
        assert_eq!(camera.look_at(), Vector3D::NEG_Z);
        assert_eq!(camera.clip_plane_far(), 1000.0);
        assert_eq!(camera.orthographic_width(), 0.0);
        let eye = camera.view_matrix().transform_point3(camera.position());
        assert!(eye.length() < 1e-5);
    }
}
