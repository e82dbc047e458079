//! Virtual file systems for imports and exports
//!
//! Assimp reads every file it touches (the model itself, `.mtl` libraries,
//! external buffers) through an `aiFileIO` table when one is supplied. This
//! module lets a [`FileSystem`] implementation serve those requests, for
//! example from memory or from an archive.
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use cassimp::{Importer, io::MemoryFileSystem};
//!
//! # fn main() -> cassimp::Result<()> {
//! let fs = MemoryFileSystem::new();
//! fs.add_file("box.obj", std::fs::read("box.obj")?);
//! fs.add_file("box.mtl", std::fs::read("box.mtl")?);
//!
//! let scene = Importer::new()
//!     .read_file("box.obj")
//!     .with_file_system(Arc::new(fs))
//!     .import()?;
//! # Ok(())
//! # }
//! ```

use std::collections::HashMap;
use std::ffi::CStr;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::os::raw::c_char;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::ptr;
use std::sync::{Arc, Mutex, MutexGuard};

use log::{trace, warn};

use crate::{
    error::{Error, Result},
    sys,
};

/// How a file is being opened, parsed from a C `fopen` mode string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OpenMode {
    /// Reading allowed
    pub read: bool,
    /// Writing allowed
    pub write: bool,
    /// Writes go to the end of the file
    pub append: bool,
    /// Existing contents are discarded
    pub truncate: bool,
}

impl OpenMode {
    /// Parse `"rb"`, `"wb"`, `"ab"`, `"r+b"` and friends. The binary/text
    /// marker is ignored.
    pub fn parse(mode: &str) -> Self {
        let plus = mode.contains('+');
        match mode.chars().next() {
            Some('w') => Self {
                read: plus,
                write: true,
                append: false,
                truncate: true,
            },
            Some('a') => Self {
                read: plus,
                write: true,
                append: true,
                truncate: false,
            },
            _ => Self {
                read: true,
                write: plus,
                append: false,
                truncate: false,
            },
        }
    }
}

/// A source of files for Assimp
pub trait FileSystem: Send + Sync {
    /// Whether `path` names an existing file
    fn exists(&self, path: &str) -> bool;

    /// Open `path` with a C `fopen` mode such as `"rb"` or `"wb"`
    fn open(&self, path: &str, mode: &str) -> Result<Box<dyn FileStream>>;
}

/// An open file
pub trait FileStream: Send {
    /// Read up to `buffer.len()` bytes; 0 means end of file
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize>;

    /// Write `buffer`, returning how many bytes were taken
    fn write(&mut self, buffer: &[u8]) -> Result<usize> {
        let _ = buffer;
        Err(Error::file_error("stream is read-only"))
    }

    /// Current position
    fn tell(&mut self) -> Result<u64>;

    /// Total size in bytes
    fn size(&mut self) -> Result<u64>;

    /// Move the cursor; returns the new position
    fn seek(&mut self, position: SeekFrom) -> Result<u64>;

    /// Push buffered writes to the backing store
    fn flush(&mut self) -> Result<()> {
        Ok(())
    }
}

/// The host file system, through `std::fs`
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultFileSystem;

impl FileSystem for DefaultFileSystem {
    fn exists(&self, path: &str) -> bool {
        std::path::Path::new(path).is_file()
    }

    fn open(&self, path: &str, mode: &str) -> Result<Box<dyn FileStream>> {
        let mode = OpenMode::parse(mode);
        let file = std::fs::OpenOptions::new()
            .read(mode.read)
            .write(mode.write && !mode.append)
            .append(mode.append)
            .truncate(mode.truncate)
            .create(mode.truncate || mode.append)
            .open(path)?;
        Ok(Box::new(StdFileStream { file }))
    }
}

struct StdFileStream {
    file: std::fs::File,
}

impl FileStream for StdFileStream {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        Ok(self.file.read(buffer)?)
    }

    fn write(&mut self, buffer: &[u8]) -> Result<usize> {
        Ok(self.file.write(buffer)?)
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.file.stream_position()?)
    }

    fn size(&mut self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    fn seek(&mut self, position: SeekFrom) -> Result<u64> {
        Ok(self.file.seek(position)?)
    }

    fn flush(&mut self) -> Result<()> {
        Ok(self.file.flush()?)
    }
}

type FileMap = HashMap<String, Arc<[u8]>>;

/// Named in-memory files.
///
/// Clones share the same storage, so a clone handed to an export can be
/// inspected afterwards. Written files become visible when the stream is
/// flushed or closed.
#[derive(Debug, Default, Clone)]
pub struct MemoryFileSystem {
    files: Arc<Mutex<FileMap>>,
}

fn normalize(path: &str) -> String {
    let path = path.replace('\\', "/");
    path.strip_prefix("./").unwrap_or(&path).to_string()
}

fn lock(files: &Mutex<FileMap>) -> Result<MutexGuard<'_, FileMap>> {
    files
        .lock()
        .map_err(|_| Error::file_error("memory file system lock poisoned"))
}

impl MemoryFileSystem {
    /// An empty file system
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a file
    pub fn add_file(&self, path: &str, data: impl Into<Vec<u8>>) {
        if let Ok(mut files) = lock(&self.files) {
            files.insert(normalize(path), Arc::from(data.into()));
        }
    }

    /// Contents of a file
    pub fn file(&self, path: &str) -> Option<Vec<u8>> {
        lock(&self.files).ok()?.get(&normalize(path)).map(|d| d.to_vec())
    }

    /// Remove a file, returning whether it existed
    pub fn remove_file(&self, path: &str) -> bool {
        lock(&self.files).is_ok_and(|mut files| files.remove(&normalize(path)).is_some())
    }

    /// Stored paths, sorted
    pub fn paths(&self) -> Vec<String> {
        let mut paths: Vec<String> = lock(&self.files)
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default();
        paths.sort();
        paths
    }

    /// Number of stored files
    pub fn file_count(&self) -> usize {
        lock(&self.files).map(|files| files.len()).unwrap_or(0)
    }
}

impl FileSystem for MemoryFileSystem {
    fn exists(&self, path: &str) -> bool {
        lock(&self.files).is_ok_and(|files| files.contains_key(&normalize(path)))
    }

    fn open(&self, path: &str, mode: &str) -> Result<Box<dyn FileStream>> {
        let key = normalize(path);
        let mode = OpenMode::parse(mode);
        let existing = lock(&self.files)?.get(&key).cloned();

        if !mode.write {
            let data = existing.ok_or_else(|| Error::file_error(format!("file not found: {path}")))?;
            return Ok(Box::new(MemoryReader {
                cursor: Cursor::new(data),
            }));
        }

        let initial = match existing {
            Some(data) if !mode.truncate => data.to_vec(),
            None if !mode.truncate && !mode.append => {
                return Err(Error::file_error(format!("file not found: {path}")));
            }
            _ => Vec::new(),
        };
        let mut cursor = Cursor::new(initial);
        if mode.append {
            cursor.seek(SeekFrom::End(0))?;
        }
        let mut writer = MemoryWriter {
            files: Arc::clone(&self.files),
            path: key,
            cursor,
            append: mode.append,
        };
        // `w` creates the file right away, like fopen
        writer.commit()?;
        Ok(Box::new(writer))
    }
}

struct MemoryReader {
    cursor: Cursor<Arc<[u8]>>,
}

impl FileStream for MemoryReader {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        Ok(self.cursor.read(buffer)?)
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.cursor.position())
    }

    fn size(&mut self) -> Result<u64> {
        Ok(self.cursor.get_ref().len() as u64)
    }

    fn seek(&mut self, position: SeekFrom) -> Result<u64> {
        let old = self.cursor.position();
        let new = self.cursor.seek(position)?;
        if new > self.cursor.get_ref().len() as u64 {
            self.cursor.set_position(old);
            return Err(Error::file_error("seek past end of read-only file"));
        }
        Ok(new)
    }
}

struct MemoryWriter {
    files: Arc<Mutex<FileMap>>,
    path: String,
    cursor: Cursor<Vec<u8>>,
    append: bool,
}

impl MemoryWriter {
    fn commit(&mut self) -> Result<()> {
        lock(&self.files)?.insert(self.path.clone(), Arc::from(self.cursor.get_ref().as_slice()));
        Ok(())
    }
}

impl FileStream for MemoryWriter {
    fn read(&mut self, buffer: &mut [u8]) -> Result<usize> {
        Ok(self.cursor.read(buffer)?)
    }

    fn write(&mut self, buffer: &[u8]) -> Result<usize> {
        if self.append {
            self.cursor.seek(SeekFrom::End(0))?;
        }
        Ok(self.cursor.write(buffer)?)
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(self.cursor.position())
    }

    fn size(&mut self) -> Result<u64> {
        Ok(self.cursor.get_ref().len() as u64)
    }

    fn seek(&mut self, position: SeekFrom) -> Result<u64> {
        Ok(self.cursor.seek(position)?)
    }

    fn flush(&mut self) -> Result<()> {
        self.commit()
    }
}

impl Drop for MemoryWriter {
    fn drop(&mut self) {
        if let Err(err) = self.commit() {
            warn!("could not store `{}`: {err}", self.path);
        }
    }
}

/// An `aiFileIO` table bound to a [`FileSystem`].
///
/// The table must stay at a fixed address for the duration of the native
/// call it is passed to; it is boxed for that reason.
pub(crate) struct FileIo {
    raw: sys::aiFileIO,
}

impl FileIo {
    pub(crate) fn new(fs: Arc<dyn FileSystem>) -> Box<Self> {
        let user_data = Box::into_raw(Box::new(fs));
        Box::new(Self {
            raw: sys::aiFileIO {
                OpenProc: Some(open_proc),
                CloseProc: Some(close_proc),
                UserData: user_data.cast::<c_char>(),
            },
        })
    }

    pub(crate) fn as_mut_ptr(&mut self) -> *mut sys::aiFileIO {
        &mut self.raw
    }
}

impl Drop for FileIo {
    fn drop(&mut self) {
        let fs = self.raw.UserData.cast::<Arc<dyn FileSystem>>();
        if !fs.is_null() {
            drop(unsafe { Box::from_raw(fs) });
            self.raw.UserData = ptr::null_mut();
        }
    }
}

/// Run `f`, turning a panic into `fallback`. Nothing may unwind into Assimp.
fn guarded<T>(what: &str, fallback: T, f: impl FnOnce() -> T) -> T {
    catch_unwind(AssertUnwindSafe(f)).unwrap_or_else(|_| {
        warn!("file system callback `{what}` panicked");
        fallback
    })
}

/// # Safety
/// `file` must be null or an `aiFile` made by [`open_proc`].
unsafe fn stream<'a>(file: *mut sys::aiFile) -> Option<&'a mut Box<dyn FileStream>> {
    let file = unsafe { file.as_ref() }?;
    unsafe { file.UserData.cast::<Box<dyn FileStream>>().as_mut() }
}

extern "C" fn open_proc(
    io: *mut sys::aiFileIO,
    path: *const c_char,
    mode: *const c_char,
) -> *mut sys::aiFile {
    if io.is_null() || path.is_null() || mode.is_null() {
        return ptr::null_mut();
    }
    guarded("open", ptr::null_mut(), || {
        let Some(fs) = (unsafe { (*io).UserData.cast::<Arc<dyn FileSystem>>().as_ref() }) else {
            return ptr::null_mut();
        };
        let path = unsafe { CStr::from_ptr(path) }.to_string_lossy();
        let mode = unsafe { CStr::from_ptr(mode) }.to_string_lossy();
        let stream = match fs.open(&path, &mode) {
            Ok(stream) => stream,
            Err(err) => {
                trace!("open `{path}` ({mode}) failed: {err}");
                return ptr::null_mut();
            }
        };
        trace!("opened `{path}` ({mode})");
        let file = sys::aiFile {
            ReadProc: Some(read_proc),
            WriteProc: Some(write_proc),
            TellProc: Some(tell_proc),
            FileSizeProc: Some(size_proc),
            SeekProc: Some(seek_proc),
            FlushProc: Some(flush_proc),
            UserData: Box::into_raw(Box::new(stream)).cast::<c_char>(),
        };
        Box::into_raw(Box::new(file))
    })
}

extern "C" fn close_proc(_io: *mut sys::aiFileIO, file: *mut sys::aiFile) {
    if file.is_null() {
        return;
    }
    guarded("close", (), || {
        let file = unsafe { Box::from_raw(file) };
        let stream = file.UserData.cast::<Box<dyn FileStream>>();
        if !stream.is_null() {
            let mut stream = unsafe { Box::from_raw(stream) };
            if let Err(err) = stream.flush() {
                warn!("flush on close failed: {err}");
            }
        }
    })
}

extern "C" fn read_proc(file: *mut sys::aiFile, buffer: *mut c_char, size: usize, count: usize) -> usize {
    if buffer.is_null() || size == 0 || count == 0 {
        return 0;
    }
    guarded("read", 0, || {
        let Some(stream) = (unsafe { stream(file) }) else {
            return 0;
        };
        let Some(total) = size.checked_mul(count) else {
            return 0;
        };
        let out = unsafe { std::slice::from_raw_parts_mut(buffer.cast::<u8>(), total) };
        // fread semantics: fill the buffer unless the file ends first
        let mut filled = 0;
        while filled < total {
            match stream.read(&mut out[filled..]) {
                Ok(0) | Err(_) => break,
                Ok(n) => filled += n,
            }
        }
        filled / size
    })
}

extern "C" fn write_proc(file: *mut sys::aiFile, buffer: *const c_char, size: usize, count: usize) -> usize {
    if buffer.is_null() || size == 0 || count == 0 {
        return 0;
    }
    guarded("write", 0, || {
        let Some(stream) = (unsafe { stream(file) }) else {
            return 0;
        };
        let Some(total) = size.checked_mul(count) else {
            return 0;
        };
        let data = unsafe { std::slice::from_raw_parts(buffer.cast::<u8>(), total) };
        let mut written = 0;
        while written < total {
            match stream.write(&data[written..]) {
                Ok(0) | Err(_) => break,
                Ok(n) => written += n,
            }
        }
        written / size
    })
}

extern "C" fn tell_proc(file: *mut sys::aiFile) -> usize {
    guarded("tell", 0, || {
        unsafe { stream(file) }
            .and_then(|s| s.tell().ok())
            .map_or(0, |pos| pos as usize)
    })
}

extern "C" fn size_proc(file: *mut sys::aiFile) -> usize {
    guarded("size", 0, || {
        unsafe { stream(file) }
            .and_then(|s| s.size().ok())
            .map_or(0, |size| size as usize)
    })
}

/// Map a native seek request onto [`SeekFrom`]. The offset is a `size_t`;
/// relative seeks backwards arrive wrapped around.
fn seek_from(offset: usize, origin: sys::aiOrigin) -> Option<SeekFrom> {
    match origin {
        sys::aiOrigin::aiOrigin_SET => Some(SeekFrom::Start(offset as u64)),
        sys::aiOrigin::aiOrigin_CUR => Some(SeekFrom::Current(offset as isize as i64)),
        sys::aiOrigin::aiOrigin_END => Some(SeekFrom::End(offset as isize as i64)),
        _ => None,
    }
}

extern "C" fn seek_proc(file: *mut sys::aiFile, offset: usize, origin: sys::aiOrigin) -> sys::aiReturn {
    guarded("seek", sys::aiReturn::aiReturn_FAILURE, || {
        let (Some(stream), Some(target)) = (unsafe { stream(file) }, seek_from(offset, origin)) else {
            return sys::aiReturn::aiReturn_FAILURE;
        };
        match stream.seek(target) {
            Ok(_) => sys::aiReturn::aiReturn_SUCCESS,
            Err(_) => sys::aiReturn::aiReturn_FAILURE,
        }
    })
}

extern "C" fn flush_proc(file: *mut sys::aiFile) {
    guarded("flush", (), || {
        if let Some(stream) = unsafe { stream(file) } {
            if let Err(err) = stream.flush() {
                warn!("flush failed: {err}");
            }
        }
    })
}
