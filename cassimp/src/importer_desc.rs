//! Descriptions of the importers compiled into the linked library

use std::ops::RangeInclusive;

use bitflags::bitflags;

use crate::{error::c_str_to_string_or_empty, ffi, sys};

bitflags! {
    /// `aiImporterFlags`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct ImporterFlags: u32 {
        /// A text encoding of the format exists and is supported
        const SUPPORT_TEXT_FLAVOUR = sys::aiImporterFlags::aiImporterFlags_SupportTextFlavour as u32;
        /// A binary encoding of the format exists and is supported
        const SUPPORT_BINARY_FLAVOUR = sys::aiImporterFlags::aiImporterFlags_SupportBinaryFlavour as u32;
        /// A compressed encoding of the format exists and is supported
        const SUPPORT_COMPRESSED_FLAVOUR =
            sys::aiImporterFlags::aiImporterFlags_SupportCompressedFlavour as u32;
        /// Only a particular subset of the format is read
        const LIMITED_SUPPORT = sys::aiImporterFlags::aiImporterFlags_LimitedSupport as u32;
        /// Highly experimental
        const EXPERIMENTAL = sys::aiImporterFlags::aiImporterFlags_Experimental as u32;
    }
}

/// What one importer reads and who maintains it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImporterDesc {
    /// Full name, such as `"Wavefront Object Importer"`
    pub name: String,
    /// Original author; empty if unknown
    pub author: String,
    /// Current maintainer; empty if unknown
    pub maintainer: String,
    /// Implementation notes, such as unsupported features
    pub comments: String,
    /// Feature flags
    pub flags: ImporterFlags,
    /// Supported major format versions; `0..=0` when versions do not apply
    pub major_versions: RangeInclusive<u32>,
    /// Supported minor format versions
    pub minor_versions: RangeInclusive<u32>,
    /// Extensions without the dot, such as `["obj"]`
    pub file_extensions: Vec<String>,
}

impl ImporterDesc {
    pub(crate) fn from_raw(desc: &sys::aiImporterDesc) -> Self {
        Self {
            name: c_str_to_string_or_empty(desc.mName),
            author: c_str_to_string_or_empty(desc.mAuthor),
            maintainer: c_str_to_string_or_empty(desc.mMaintainer),
            comments: c_str_to_string_or_empty(desc.mComments),
            flags: ImporterFlags::from_bits_retain(desc.mFlags),
            major_versions: desc.mMinMajor..=desc.mMaxMajor,
            minor_versions: desc.mMinMinor..=desc.mMaxMinor,
            file_extensions: c_str_to_string_or_empty(desc.mFileExtensions)
                .split_whitespace()
                .map(str::to_string)
                .collect(),
        }
    }

    /// Whether this importer claims `extension` (with or without a dot)
    pub fn handles(&self, extension: &str) -> bool {
        let ext = normalize_extension(extension);
        self.file_extensions.iter().any(|e| e.eq_ignore_ascii_case(&ext))
    }
}

/// Strip `*.` or `.` and lowercase
pub(crate) fn normalize_extension(extension: &str) -> String {
    extension
        .trim()
        .trim_start_matches('*')
        .trim_start_matches('.')
        .to_ascii_lowercase()
}

/// The importer responsible for `extension` (`"obj"`, `".obj"` and
/// `"*.obj"` are all accepted)
pub fn importer_descriptor(extension: &str) -> Option<ImporterDesc> {
    let ext = std::ffi::CString::new(normalize_extension(extension)).ok()?;
    let desc = unsafe { ffi::deref(sys::aiGetImporterDesc(ext.as_ptr())) }?;
    Some(ImporterDesc::from_raw(desc))
}

/// Every importer compiled into the library, in registration order
pub fn import_formats() -> Vec<ImporterDesc> {
    let count = unsafe { sys::aiGetImportFormatCount() };
    (0..count)
        .filter_map(|i| unsafe { ffi::deref(sys::aiGetImportFormatDescription(i)) })
        .map(ImporterDesc::from_raw)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_match_header() {
        assert_eq!(ImporterFlags::SUPPORT_TEXT_FLAVOUR.bits(), 0x1);
        assert_eq!(ImporterFlags::SUPPORT_BINARY_FLAVOUR.bits(), 0x2);
        assert_eq!(ImporterFlags::SUPPORT_COMPRESSED_FLAVOUR.bits(), 0x4);
        assert_eq!(ImporterFlags::LIMITED_SUPPORT.bits(), 0x8);
        assert_eq!(ImporterFlags::EXPERIMENTAL.bits(), 0x10);
    }

    #[test]
    fn extensions_are_split_on_whitespace() {
        let raw = sys::aiImporterDesc {
            mName: c"Test Importer".as_ptr(),
            mAuthor: std::ptr::null(),
            mMaintainer: c"someone".as_ptr(),
            mComments: c"".as_ptr(),
            mFlags: 0x3,
            mMinMajor: 1,
            mMinMinor: 0,
            mMaxMajor: 2,
            mMaxMinor: 5,
            mFileExtensions: c"abc  xyz\tqq".as_ptr(),
        };
        let desc = ImporterDesc::from_raw(&raw);
        assert_eq!(desc.name, "Test Importer");
        assert_eq!(desc.author, "");
        assert_eq!(desc.file_extensions, vec!["abc", "xyz", "qq"]);
        assert_eq!(desc.major_versions, 1..=2);
        assert_eq!(desc.minor_versions, 0..=5);
        assert!(desc.flags.contains(ImporterFlags::SUPPORT_BINARY_FLAVOUR));
        assert!(desc.handles("*.XYZ"));
        assert!(!desc.handles("obj"));
    }

    #[test]
    fn obj_has_an_importer() {
        let desc = importer_descriptor(".OBJ").unwrap();
        assert!(desc.file_extensions.iter().any(|e| e == "obj"));
        assert!(importer_descriptor("no_such_format").is_none());
        assert!(importer_descriptor("ob\0j").is_none());
    }

    #[test]
    fn every_importer_is_listed() {
        let formats = import_formats();
        assert!(formats.iter().any(|d| d.handles("obj")));
        assert!(formats.iter().all(|d| !d.name.is_empty()));
    }
}
