//! Axis-aligned bounding boxes

use crate::{
    sys,
    types::{FromSys, Matrix4x4, Vector3D},
};

/// An axis-aligned bounding box given by its two extreme corners.
///
/// Assimp only fills `aiMesh::mAABB` when the scene was imported with
/// [`PostProcessSteps::GEN_BOUNDING_BOXES`](crate::PostProcessSteps::GEN_BOUNDING_BOXES);
/// otherwise both corners are zero. [`Aabb::from_points`] computes one on demand.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner
    pub min: Vector3D,
    /// Maximum corner
    pub max: Vector3D,
}

impl Aabb {
    /// Box spanning `min..=max`
    pub fn new(min: Vector3D, max: Vector3D) -> Self {
        Self { min, max }
    }

    /// The empty box: `min` is `+inf` and `max` is `-inf`, the identity of [`Aabb::union`].
    pub fn empty() -> Self {
        Self {
            min: Vector3D::splat(f32::INFINITY),
            max: Vector3D::splat(f32::NEG_INFINITY),
        }
    }

    /// Smallest box containing every point
    pub fn from_points<I: IntoIterator<Item = Vector3D>>(points: I) -> Self {
        points.into_iter().fold(Self::empty(), |b, p| Self {
            min: b.min.min(p),
            max: b.max.max(p),
        })
    }

    /// True when `min > max` on any axis
    pub fn is_empty(&self) -> bool {
        self.min.cmpgt(self.max).any()
    }

    /// Midpoint of the box
    pub fn center(&self) -> Vector3D {
        (self.min + self.max) * 0.5
    }

    /// Edge lengths along each axis
    pub fn size(&self) -> Vector3D {
        if self.is_empty() {
            Vector3D::ZERO
        } else {
            self.max - self.min
        }
    }

    /// Whether `point` lies inside or on the boundary
    pub fn contains(&self, point: Vector3D) -> bool {
        point.cmpge(self.min).all() && point.cmple(self.max).all()
    }

    /// Smallest box containing both
    pub fn union(&self, other: &Aabb) -> Self {
        Self {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// Box around the eight transformed corners
    pub fn transformed(&self, matrix: &Matrix4x4) -> Self {
        if self.is_empty() {
            return *self;
        }
        Self::from_points(self.corners().map(|c| matrix.transform_point3(c)))
    }

    /// The eight corners
    pub fn corners(&self) -> [Vector3D; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3D::new(lo.x, lo.y, lo.z),
            Vector3D::new(hi.x, lo.y, lo.z),
            Vector3D::new(lo.x, hi.y, lo.z),
            Vector3D::new(hi.x, hi.y, lo.z),
            Vector3D::new(lo.x, lo.y, hi.z),
            Vector3D::new(hi.x, lo.y, hi.z),
            Vector3D::new(lo.x, hi.y, hi.z),
            Vector3D::new(hi.x, hi.y, hi.z),
        ]
    }
}

impl From<&sys::aiAABB> for Aabb {
    fn from(raw: &sys::aiAABB) -> Self {
        Self {
            min: Vector3D::from_sys(raw.mMin),
            max: Vector3D::from_sys(raw.mMax),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_points_spans_extremes() {
        let b = Aabb::from_points([
            Vector3D::new(1.0, -2.0, 0.0),
            Vector3D::new(-1.0, 4.0, 3.0),
            Vector3D::new(0.0, 0.0, -5.0),
        ]);
        assert_eq!(b.min, Vector3D::new(-1.0, -2.0, -5.0));
        assert_eq!(b.max, Vector3D::new(1.0, 4.0, 3.0));
        assert!(b.contains(Vector3D::ZERO));
        assert!(!b.contains(Vector3D::new(2.0, 0.0, 0.0)));
    }

    #[test]
    fn empty_is_union_identity() {
        let empty = Aabb::empty();
        assert!(empty.is_empty());
        assert_eq!(empty.size(), Vector3D::ZERO);
        let unit = Aabb::new(Vector3D::ZERO, Vector3D::ONE);
        assert_eq!(empty.union(&unit), unit);
        assert!(Aabb::from_points(std::iter::empty()).is_empty());
    }

    #[test]
    fn transformed_follows_translation() {
        let unit = Aabb::new(Vector3D::ZERO, Vector3D::ONE);
        let moved = unit.transformed(&Matrix4x4::from_translation(Vector3D::new(5.0, 0.0, 0.0)));
        assert_eq!(moved.min, Vector3D::new(5.0, 0.0, 0.0));
        assert_eq!(moved.center(), Vector3D::new(5.5, 0.5, 0.5));
    }

    #[test]
    fn converts_from_raw() {
        let raw = sys::aiAABB {
            mMin: sys::aiVector3D {
                x: -1.0,
                y: -1.0,
                z: -1.0,
            },
            mMax: sys::aiVector3D {
                x: 1.0,
                y: 1.0,
                z: 1.0,
            },
        };
        let b = Aabb::from(&raw);
        assert_eq!(b.size(), Vector3D::splat(2.0));
    }
}
