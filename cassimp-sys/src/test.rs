#[cfg(test)]
mod tests {
    use crate::HEADER_VERSION;

    #[test]
    fn header_version_is_inside_the_pinned_range() {
        let (major, minor, _) = HEADER_VERSION;
        assert!((major, minor) >= (5, 2), "headers {major}.{minor} predate 5.2");
        assert!(major < 7, "headers {major}.{minor} are newer than the surface");
    }

    #[cfg(feature = "introspection")]
    #[test]
    fn linked_library_matches_the_headers() {
        let (major, minor, _) = crate::linked_version();
        assert!(
            crate::linked_version_matches_headers(),
            "linked Assimp {major}.{minor} differs from headers {:?}",
            HEADER_VERSION
        );
    }

    #[cfg(feature = "math")]
    #[test]
    fn math_primitives_have_c_layout() {
        use crate::{aiColor4D, aiMatrix4x4, aiQuaternion, aiVector3D, ai_real};
        use std::mem::size_of;

        let real = size_of::<ai_real>();
        assert_eq!(size_of::<aiVector3D>(), 3 * real);
        assert_eq!(size_of::<aiQuaternion>(), 4 * real);
        assert_eq!(size_of::<aiMatrix4x4>(), 16 * real);
        assert_eq!(size_of::<aiColor4D>(), 4 * real);
    }

    #[test]
    fn ai_string_is_length_prefixed() {
        use crate::aiString;

        let s = aiString::default();
        assert_eq!(s.length, 0);
        assert!(std::mem::size_of::<aiString>() >= 4 + s.data.len());
        assert!(s.data.len() >= 1024);
    }

    #[cfg(feature = "scene")]
    #[test]
    fn scene_types_are_sized() {
        use crate::{aiMesh, aiNode, aiScene};

        assert!(std::mem::size_of::<aiScene>() > 0);
        assert!(std::mem::size_of::<aiMesh>() > std::mem::size_of::<aiNode>());
        assert!(std::mem::align_of::<aiScene>().is_power_of_two());
    }
}
