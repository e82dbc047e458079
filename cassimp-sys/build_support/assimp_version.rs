//! Version parsing and the supported range. Kept free of build-script state so
//! `tests/version_gate.rs` can compile it on its own.

use std::fmt;

/// Oldest Assimp release whose C headers carry every enumerated declaration.
pub const MIN_SUPPORTED: (u32, u32) = (5, 2);
/// First major release that is no longer accepted.
pub const MAJOR_CEILING: u32 = 7;

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct AssimpVersion {
    pub major: u32,
    pub minor: u32,
    pub patch: u32,
}

impl AssimpVersion {
    /// Parses `5.3.1`, `5.2`, `5.2.5-1ubuntu1` and similar pkg-config strings.
    pub fn parse(version: &str) -> Option<Self> {
        let mut parts = version
            .trim()
            .split(['.', '-', '+', '~'])
            .map(|p| p.trim().parse::<u32>());
        let major = parts.next()?.ok()?;
        let minor = parts.next().and_then(Result::ok).unwrap_or(0);
        let patch = parts.next().and_then(Result::ok).unwrap_or(0);
        Some(Self {
            major,
            minor,
            patch,
        })
    }

    /// Reads `VER_MAJOR`, `VER_MINOR` and `VER_PATCH` from `assimp/revision.h`.
    pub fn from_revision_header(contents: &str) -> Option<Self> {
        let major = parse_define_u32(contents, "VER_MAJOR")?;
        let minor = parse_define_u32(contents, "VER_MINOR")?;
        let patch = parse_define_u32(contents, "VER_PATCH").unwrap_or(0);
        Some(Self {
            major,
            minor,
            patch,
        })
    }

    pub fn is_supported(&self) -> bool {
        (self.major, self.minor) >= MIN_SUPPORTED && self.major < MAJOR_CEILING
    }
}

impl fmt::Display for AssimpVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)
    }
}

fn parse_define_u32(contents: &str, name: &str) -> Option<u32> {
    contents.lines().find_map(|line| {
        let rest = line.trim().strip_prefix("#define")?.trim_start();
        let rest = rest.strip_prefix(name)?;
        // VER_MAJOR must not match VER_MAJOR_EXTRA
        if !rest.starts_with(char::is_whitespace) {
            return None;
        }
        rest.split_whitespace().next()?.parse::<u32>().ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn v(major: u32, minor: u32, patch: u32) -> AssimpVersion {
        AssimpVersion {
            major,
            minor,
            patch,
        }
    }

    #[test]
    fn pkg_config_strings() {
        assert_eq!(AssimpVersion::parse("5.3.1"), Some(v(5, 3, 1)));
        assert_eq!(AssimpVersion::parse("5.2"), Some(v(5, 2, 0)));
        assert_eq!(AssimpVersion::parse(" 6 "), Some(v(6, 0, 0)));
        assert_eq!(AssimpVersion::parse("5.2.5-1ubuntu1"), Some(v(5, 2, 5)));
        assert_eq!(AssimpVersion::parse("5.4.3+dfsg"), Some(v(5, 4, 3)));
        assert_eq!(AssimpVersion::parse("5.0~rc1"), Some(v(5, 0, 0)));
        assert_eq!(AssimpVersion::parse(""), None);
        assert_eq!(AssimpVersion::parse("unknown"), None);
    }

    #[test]
    fn revision_header_defines() {
        let header = "\
#ifndef ASSIMP_REVISION_H_INC
#define ASSIMP_REVISION_H_INC

#define GitVersion 0x8d2b1ab
#define GitBranch \"master\"

#define VER_MAJOR_EXTRA 99
#define VER_MAJOR 5
#define VER_MINOR 4
#define VER_PATCH 3
#define VER_BUILD 0
#endif
";
        assert_eq!(AssimpVersion::from_revision_header(header), Some(v(5, 4, 3)));
    }

    #[test]
    fn revision_header_without_patch_or_major() {
        let no_patch = "#define VER_MAJOR 5\n#define VER_MINOR 2\n";
        assert_eq!(AssimpVersion::from_revision_header(no_patch), Some(v(5, 2, 0)));

        let extra_only = "#define VER_MAJOR_EXTRA 5\n#define VER_MINOR 2\n";
        assert_eq!(AssimpVersion::from_revision_header(extra_only), None);

        let indented = "  #define   VER_MAJOR\t6\n#define VER_MINOR 0\n";
        assert_eq!(AssimpVersion::from_revision_header(indented), Some(v(6, 0, 0)));
    }

    #[test]
    fn supported_range_boundaries() {
        assert!(!v(5, 1, 99).is_supported());
        assert!(!v(4, 9, 0).is_supported());
        assert!(v(5, 2, 0).is_supported());
        assert!(v(5, 4, 3).is_supported());
        assert!(v(6, 99, 0).is_supported());
        assert!(!v(7, 0, 0).is_supported());
        assert!(!v(8, 1, 0).is_supported());
    }

    #[test]
    fn display_is_dotted() {
        assert_eq!(v(5, 2, 5).to_string(), "5.2.5");
        assert!(v(5, 2, 0) < v(5, 10, 0));
    }
}
