//! Const constructors and plain conversions for the math primitives.
//!
//! Only compiled with `type-extensions` or `mint`; neither changes the layout
//! or meaning of the generated declarations.

#[allow(unused_imports)]
use crate::{aiColor3D, aiColor4D, aiMatrix3x3, aiMatrix4x4, aiQuaternion, aiVector2D, aiVector3D, ai_real};

#[cfg(feature = "type-extensions")]
mod constructors {
    use super::*;

    impl aiVector2D {
        /// Create a new 2D vector
        #[inline]
        pub const fn new(x: ai_real, y: ai_real) -> Self {
            Self { x, y }
        }
    }

    impl aiVector3D {
        /// Create a new 3D vector
        #[inline]
        pub const fn new(x: ai_real, y: ai_real, z: ai_real) -> Self {
            Self { x, y, z }
        }
    }

    impl aiColor3D {
        /// Create a new RGB color
        #[inline]
        pub const fn new(r: ai_real, g: ai_real, b: ai_real) -> Self {
            Self { r, g, b }
        }
    }

    impl aiColor4D {
        /// Create a new RGBA color
        #[inline]
        pub const fn new(r: ai_real, g: ai_real, b: ai_real, a: ai_real) -> Self {
            Self { r, g, b, a }
        }
    }

    impl aiQuaternion {
        /// Create a quaternion in Assimp's `w, x, y, z` order
        #[inline]
        pub const fn new(w: ai_real, x: ai_real, y: ai_real, z: ai_real) -> Self {
            Self { w, x, y, z }
        }

        /// The identity rotation
        #[inline]
        pub const fn identity() -> Self {
            Self::new(1.0, 0.0, 0.0, 0.0)
        }
    }

    impl aiMatrix3x3 {
        /// Build from rows, matching Assimp's `a1..c3` row-major naming
        #[inline]
        pub const fn from_rows(rows: [[ai_real; 3]; 3]) -> Self {
            let [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]] = rows;
            Self {
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

        /// The identity matrix
        #[inline]
        pub const fn identity() -> Self {
            Self::from_rows([[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]])
        }
    }

    impl aiMatrix4x4 {
        /// Build from rows, matching Assimp's `a1..d4` row-major naming
        #[inline]
        pub const fn from_rows(rows: [[ai_real; 4]; 4]) -> Self {
            let [
                [a1, a2, a3, a4],
                [b1, b2, b3, b4],
                [c1, c2, c3, c4],
                [d1, d2, d3, d4],
            ] = rows;
            Self {
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

        /// Rows in Assimp's storage order
        #[inline]
        pub const fn to_rows(&self) -> [[ai_real; 4]; 4] {
            [
                [self.a1, self.a2, self.a3, self.a4],
                [self.b1, self.b2, self.b3, self.b4],
                [self.c1, self.c2, self.c3, self.c4],
                [self.d1, self.d2, self.d3, self.d4],
            ]
        }

        /// The identity matrix
        #[inline]
        pub const fn identity() -> Self {
            Self::from_rows([
                [1.0, 0.0, 0.0, 0.0],
                [0.0, 1.0, 0.0, 0.0],
                [0.0, 0.0, 1.0, 0.0],
                [0.0, 0.0, 0.0, 1.0],
            ])
        }
    }

    impl From<[ai_real; 3]> for aiVector3D {
        #[inline]
        fn from([x, y, z]: [ai_real; 3]) -> Self {
            Self::new(x, y, z)
        }
    }

    impl From<aiVector3D> for [ai_real; 3] {
        #[inline]
        fn from(v: aiVector3D) -> Self {
            [v.x, v.y, v.z]
        }
    }

    impl From<[ai_real; 2]> for aiVector2D {
        #[inline]
        fn from([x, y]: [ai_real; 2]) -> Self {
            Self::new(x, y)
        }
    }

    impl From<aiVector2D> for [ai_real; 2] {
        #[inline]
        fn from(v: aiVector2D) -> Self {
            [v.x, v.y]
        }
    }

    impl From<[ai_real; 4]> for aiColor4D {
        #[inline]
        fn from([r, g, b, a]: [ai_real; 4]) -> Self {
            Self::new(r, g, b, a)
        }
    }

    impl From<aiColor4D> for [ai_real; 4] {
        #[inline]
        fn from(c: aiColor4D) -> Self {
            [c.r, c.g, c.b, c.a]
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn matrix_rows_round_trip() {
            let rows = [
                [1.0, 2.0, 3.0, 4.0],
                [5.0, 6.0, 7.0, 8.0],
                [9.0, 10.0, 11.0, 12.0],
                [13.0, 14.0, 15.0, 16.0],
            ];
            let m = aiMatrix4x4::from_rows(rows);
            assert_eq!(m.a4, 4.0);
            assert_eq!(m.d1, 13.0);
            assert_eq!(m.to_rows(), rows);
        }

        #[test]
        fn identity_quaternion_is_w_first() {
            let q = aiQuaternion::identity();
            assert_eq!((q.w, q.x, q.y, q.z), (1.0, 0.0, 0.0, 0.0));
        }
    }
}

#[cfg(feature = "mint")]
mod mint_integration {
    use super::*;

    impl From<mint::Vector3<ai_real>> for aiVector3D {
        #[inline]
        fn from(v: mint::Vector3<ai_real>) -> Self {
            Self {
                x: v.x,
                y: v.y,
                z: v.z,
            }
        }
    }

    impl From<aiVector3D> for mint::Vector3<ai_real> {
        #[inline]
        fn from(v: aiVector3D) -> Self {
            mint::Vector3 {
                x: v.x,
                y: v.y,
                z: v.z,
            }
        }
    }

    impl From<mint::Vector2<ai_real>> for aiVector2D {
        #[inline]
        fn from(v: mint::Vector2<ai_real>) -> Self {
            Self { x: v.x, y: v.y }
        }
    }

    impl From<aiVector2D> for mint::Vector2<ai_real> {
        #[inline]
        fn from(v: aiVector2D) -> Self {
            mint::Vector2 { x: v.x, y: v.y }
        }
    }

    impl From<mint::Quaternion<ai_real>> for aiQuaternion {
        #[inline]
        fn from(q: mint::Quaternion<ai_real>) -> Self {
            Self {
                w: q.s,
                x: q.v.x,
                y: q.v.y,
                z: q.v.z,
            }
        }
    }

    impl From<aiQuaternion> for mint::Quaternion<ai_real> {
        #[inline]
        fn from(q: aiQuaternion) -> Self {
            mint::Quaternion {
                s: q.w,
                v: mint::Vector3 {
                    x: q.x,
                    y: q.y,
                    z: q.z,
                },
            }
        }
    }

    // aiMatrix4x4 is row-major, which is exactly mint's RowMatrix4.
    impl From<aiMatrix4x4> for mint::RowMatrix4<ai_real> {
        #[inline]
        fn from(m: aiMatrix4x4) -> Self {
            let row = |x, y, z, w| mint::Vector4 { x, y, z, w };
            mint::RowMatrix4 {
                x: row(m.a1, m.a2, m.a3, m.a4),
                y: row(m.b1, m.b2, m.b3, m.b4),
                z: row(m.c1, m.c2, m.c3, m.c4),
                w: row(m.d1, m.d2, m.d3, m.d4),
            }
        }
    }

    impl From<mint::RowMatrix4<ai_real>> for aiMatrix4x4 {
        #[inline]
        fn from(m: mint::RowMatrix4<ai_real>) -> Self {
            Self {
                a1: m.x.x,
                a2: m.x.y,
                a3: m.x.z,
                a4: m.x.w,
                b1: m.y.x,
                b2: m.y.y,
                b3: m.y.z,
                b4: m.y.w,
                c1: m.z.x,
                c2: m.z.y,
                c3: m.z.z,
                c4: m.z.w,
                d1: m.w.x,
                d2: m.w.y,
                d3: m.w.z,
                d4: m.w.w,
            }
        }
    }

    impl From<aiColor3D> for mint::Vector3<ai_real> {
        #[inline]
        fn from(c: aiColor3D) -> Self {
            mint::Vector3 {
                x: c.r,
                y: c.g,
                z: c.b,
            }
        }
    }

    impl From<aiColor4D> for mint::Vector4<ai_real> {
        #[inline]
        fn from(c: aiColor4D) -> Self {
            mint::Vector4 {
                x: c.r,
                y: c.g,
                z: c.b,
                w: c.a,
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn row_matrix_keeps_translation_in_last_column() {
            let mut m = aiMatrix4x4::default();
            m.a4 = 7.0;
            let rows: mint::RowMatrix4<ai_real> = m.into();
            assert_eq!(rows.x.w, 7.0);
            let back: aiMatrix4x4 = rows.into();
            assert_eq!(back, m);
        }
    }
}
