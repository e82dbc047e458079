//! Error type shared by every fallible operation in the crate

use std::ffi::{CStr, CString};
use std::path::Path;

use thiserror::Error;

use crate::sys;

/// Result type alias for cassimp operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by imports, exports and scene queries
#[derive(Error, Debug)]
pub enum Error {
    /// The native importer returned no scene
    #[error("Import failed: {message}")]
    ImportFailed {
        /// Assimp's error string
        message: String,
    },

    /// The native importer flagged the scene as incomplete
    #[error("Import of `{path}` produced an incomplete scene")]
    ImportIncomplete {
        /// File or memory label that was imported
        path: String,
    },

    /// The native exporter reported a failure
    #[error("Export failed: {message}")]
    ExportFailed {
        /// Assimp's error string
        message: String,
    },

    /// Invalid argument (interior NUL, out-of-range index, bad combination)
    #[error("Invalid parameter: {message}")]
    InvalidParameter {
        /// What was wrong with the argument
        message: String,
    },

    /// No importer or exporter handles the requested format
    #[error("Unsupported format: {format}")]
    UnsupportedFormat {
        /// The format id or extension that was asked for
        format: String,
    },

    /// A virtual file system could not satisfy a request
    #[error("File error: {message}")]
    FileError {
        /// Description of the failed request
        message: String,
    },

    /// Host I/O failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// String data coming from Assimp was not UTF-8
    #[error("String conversion error: {0}")]
    StringConversion(#[from] std::str::Utf8Error),

    /// Assimp handed back a null pointer where data was expected
    #[error("Null pointer encountered")]
    NullPointer,

    /// A material key is missing or has an unexpected type
    #[error("Material property `{key}`: {reason}")]
    MaterialProperty {
        /// Raw key, `"base,type,index"`
        key: String,
        /// Why the lookup failed
        reason: String,
    },
}

impl Error {
    /// Create a new import error
    pub fn import_failed<S: Into<String>>(message: S) -> Self {
        Self::ImportFailed {
            message: message.into(),
        }
    }

    /// Create a new export error
    pub fn export_failed<S: Into<String>>(message: S) -> Self {
        Self::ExportFailed {
            message: message.into(),
        }
    }

    /// Create a new file error
    pub fn file_error<S: Into<String>>(message: S) -> Self {
        Self::FileError {
            message: message.into(),
        }
    }

    /// Create a new invalid parameter error
    pub fn invalid_parameter<S: Into<String>>(message: S) -> Self {
        Self::InvalidParameter {
            message: message.into(),
        }
    }

    /// Create a new unsupported format error
    pub fn unsupported_format<S: Into<String>>(format: S) -> Self {
        Self::UnsupportedFormat {
            format: format.into(),
        }
    }

    pub(crate) fn material_property(key: impl ToString, reason: impl Into<String>) -> Self {
        Self::MaterialProperty {
            key: key.to_string(),
            reason: reason.into(),
        }
    }

    /// An [`Error::ImportFailed`] carrying Assimp's last error string
    pub fn from_assimp() -> Self {
        Self::ImportFailed {
            message: last_error_string(),
        }
    }
}

/// Assimp's thread-global "last error" message, or a placeholder when empty
pub fn last_error_string() -> String {
    let message = unsafe {
        let ptr = sys::aiGetErrorString();
        if ptr.is_null() {
            String::new()
        } else {
            CStr::from_ptr(ptr).to_string_lossy().into_owned()
        }
    };
    if message.is_empty() {
        "unknown Assimp error".to_string()
    } else {
        message
    }
}

/// Convert a Rust string into a C string, rejecting interior NULs
pub(crate) fn to_cstring(value: &str, what: &str) -> Result<CString> {
    CString::new(value)
        .map_err(|_| Error::invalid_parameter(format!("{what} contains an interior NUL byte")))
}

/// A path as UTF-8 text. Assimp takes `char*` paths, so anything else is
/// rejected instead of being passed on mangled.
pub(crate) fn path_to_str(path: &Path) -> Result<&str> {
    path.to_str().ok_or_else(|| {
        Error::invalid_parameter(format!("path `{}` is not valid UTF-8", path.display()))
    })
}

/// Convert a C string to a Rust string, returning empty string for null pointers
pub(crate) fn c_str_to_string_or_empty(ptr: *const std::os::raw::c_char) -> String {
    if ptr.is_null() {
        String::new()
    } else {
        unsafe { CStr::from_ptr(ptr).to_string_lossy().into_owned() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn import_failed_formats_message() {
        let error = Error::import_failed("no such file");
        assert!(matches!(error, Error::ImportFailed { .. }));
        assert_eq!(error.to_string(), "Import failed: no such file");
    }

    #[test]
    fn interior_nul_is_invalid_parameter() {
        let err = to_cstring("bad\0path.obj", "path").unwrap_err();
        assert!(matches!(err, Error::InvalidParameter { .. }));
        assert!(err.to_string().contains("path"));
    }

    #[cfg(unix)]
    #[test]
    fn non_utf8_path_is_invalid_parameter() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let path = Path::new(OsStr::from_bytes(b"model\xff.obj"));
        assert!(matches!(path_to_str(path), Err(Error::InvalidParameter { .. })));
        assert_eq!(path_to_str(Path::new("model.obj")).unwrap(), "model.obj");
    }

    #[test]
    fn io_errors_convert() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err: Error = io.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn null_c_string_reads_as_empty() {
        assert_eq!(c_str_to_string_or_empty(std::ptr::null()), "");
        assert_eq!(c_str_to_string_or_empty(c"obj".as_ptr()), "obj");
    }

    #[test]
    fn material_property_names_the_key() {
        let err = Error::material_property("$clr.diffuse,0,0", "not found");
        assert_eq!(
            err.to_string(),
            "Material property `$clr.diffuse,0,0`: not found"
        );
    }
}
