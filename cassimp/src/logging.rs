//! Routing of Assimp's log output
//!
//! Assimp has one process-wide logger. Streams attached here receive every
//! line it writes, from any thread. The usual setup forwards everything into
//! the [`log`] crate:
//!
//! ```rust,no_run
//! cassimp::logging::attach_log_crate();
//! // Assimp messages now arrive as `log` records with target "assimp".
//! ```

use std::ffi::CStr;
use std::io::Write;
use std::os::raw::c_char;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};

use log::Level;

use crate::{error::Result, sys};

/// Target of the records emitted by [`attach_log_crate`]
pub const LOG_TARGET: &str = "assimp";

/// A sink for Assimp log lines
pub trait LogStream: Send {
    /// One line as Assimp formatted it, severity prefix included
    fn write(&mut self, message: &str);
}

/// Writes every line to standard output
#[derive(Debug, Default)]
pub struct StdoutLogStream;

impl LogStream for StdoutLogStream {
    fn write(&mut self, message: &str) {
        print!("{message}");
    }
}

/// Writes every line to standard error
#[derive(Debug, Default)]
pub struct StderrLogStream;

impl LogStream for StderrLogStream {
    fn write(&mut self, message: &str) {
        eprint!("{message}");
    }
}

/// Appends every line to a file
#[derive(Debug)]
pub struct FileLogStream {
    file: std::fs::File,
}

impl FileLogStream {
    /// Open `path` for appending, creating it if needed
    pub fn new<P: AsRef<std::path::Path>>(path: P) -> Result<Self> {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        Ok(Self { file })
    }
}

impl LogStream for FileLogStream {
    fn write(&mut self, message: &str) {
        let _ = self.file.write_all(message.as_bytes());
    }
}

/// Collects lines in memory. Clones share the buffer.
#[derive(Debug, Default, Clone)]
pub struct MemoryLogStream {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryLogStream {
    /// An empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Lines received so far
    pub fn lines(&self) -> Vec<String> {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Drop every collected line
    pub fn clear(&self) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

impl LogStream for MemoryLogStream {
    fn write(&mut self, message: &str) {
        self.lines
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.trim_end().to_string());
    }
}

/// Split an Assimp log line into its severity and text.
///
/// Lines look like `"Info,  T0: Load model.obj\n"`; the thread tag is
/// dropped. Lines without a known prefix are reported at `Info`.
pub fn parse_line(line: &str) -> (Level, &str) {
    let line = line.trim_end();
    let Some((severity, rest)) = line.split_once(',') else {
        return (Level::Info, line);
    };
    let level = match severity {
        "Debug" => Level::Debug,
        "Verbose" => Level::Trace,
        "Info" => Level::Info,
        "Warn" => Level::Warn,
        "Error" => Level::Error,
        _ => return (Level::Info, line),
    };
    let rest = rest.trim_start();
    let text = match rest.split_once(": ") {
        Some((tag, text)) if tag.starts_with('T') && tag[1..].bytes().all(|b| b.is_ascii_digit()) => text,
        _ => rest,
    };
    (level, text)
}

/// Forwards lines into the `log` crate
#[derive(Debug, Default)]
struct LogCrateStream;

impl LogStream for LogCrateStream {
    fn write(&mut self, message: &str) {
        let (level, text) = parse_line(message);
        log::log!(target: LOG_TARGET, level, "{text}");
    }
}

/// Shared handle to a stream, as attached to a [`Logger`]
pub type SharedLogStream = Arc<Mutex<dyn LogStream>>;

struct Attached {
    stream: SharedLogStream,
    // Boxed so `user` keeps pointing at it while `streams` reallocates.
    user: Box<SharedLogStream>,
    raw: sys::aiLogStream,
}

// `raw.user` points into `user`, which moves with the entry.
unsafe impl Send for Attached {}

/// The set of streams attached to Assimp's logger
#[derive(Default)]
pub struct Logger {
    streams: Vec<Attached>,
    log_crate: Option<SharedLogStream>,
}

impl Logger {
    /// Attach `stream`; it receives every line from now on
    pub fn attach(&mut self, stream: SharedLogStream) {
        let mut user = Box::new(Arc::clone(&stream));
        let raw = sys::aiLogStream {
            callback: Some(log_callback),
            user: (&mut *user as *mut SharedLogStream).cast::<c_char>(),
        };
        unsafe { sys::aiAttachLogStream(&raw) };
        self.streams.push(Attached { stream, user, raw });
    }

    /// Detach `stream`, returning whether it was attached
    pub fn detach(&mut self, stream: &SharedLogStream) -> bool {
        let Some(index) = self
            .streams
            .iter()
            .position(|a| Arc::ptr_eq(&a.stream, stream))
        else {
            return false;
        };
        let attached = self.streams.remove(index);
        unsafe { sys::aiDetachLogStream(&attached.raw) };
        drop(attached.user);
        if self.log_crate.as_ref().is_some_and(|s| Arc::ptr_eq(s, stream)) {
            self.log_crate = None;
        }
        true
    }

    /// Detach every stream and shut Assimp's logger down
    pub fn detach_all(&mut self) {
        unsafe { sys::aiDetachAllLogStreams() };
        self.streams.clear();
        self.log_crate = None;
    }

    /// Number of attached streams
    pub fn len(&self) -> usize {
        self.streams.len()
    }

    /// Whether no stream is attached
    pub fn is_empty(&self) -> bool {
        self.streams.is_empty()
    }

    /// Forward into the `log` crate; does nothing if already forwarding
    pub fn attach_log_crate(&mut self) {
        if self.log_crate.is_none() {
            let stream: SharedLogStream = Arc::new(Mutex::new(LogCrateStream));
            self.attach(Arc::clone(&stream));
            self.log_crate = Some(stream);
        }
    }

    /// Turn Assimp's debug-level output on or off
    pub fn set_verbose(&self, verbose: bool) {
        set_verbose(verbose);
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        for attached in &self.streams {
            unsafe { sys::aiDetachLogStream(&attached.raw) };
        }
    }
}

extern "C" fn log_callback(message: *const c_char, user: *mut c_char) {
    if message.is_null() || user.is_null() {
        return;
    }
    let _ = catch_unwind(AssertUnwindSafe(|| {
        let stream = unsafe { &*user.cast::<SharedLogStream>() };
        let text = unsafe { CStr::from_ptr(message) }.to_string_lossy();
        // A stream that logs back into Assimp would deadlock here.
        if let Ok(mut stream) = stream.try_lock() {
            stream.write(&text);
        }
    }));
}

/// The process-wide logger
pub fn global() -> MutexGuard<'static, Logger> {
    static LOGGER: OnceLock<Mutex<Logger>> = OnceLock::new();
    LOGGER
        .get_or_init(Default::default)
        .lock()
        .unwrap_or_else(PoisonError::into_inner)
}

/// Forward Assimp's log output into the `log` crate under [`LOG_TARGET`]
pub fn attach_log_crate() {
    global().attach_log_crate();
}

/// Attach `stream` to the process-wide logger
pub fn attach(stream: SharedLogStream) {
    global().attach(stream);
}

/// Attach a stream that prints to standard output
pub fn attach_stdout() -> SharedLogStream {
    let stream: SharedLogStream = Arc::new(Mutex::new(StdoutLogStream));
    attach(Arc::clone(&stream));
    stream
}

/// Attach a stream that prints to standard error
pub fn attach_stderr() -> SharedLogStream {
    let stream: SharedLogStream = Arc::new(Mutex::new(StderrLogStream));
    attach(Arc::clone(&stream));
    stream
}

/// Attach a stream appending to the file at `path`
pub fn attach_file<P: AsRef<std::path::Path>>(path: P) -> Result<SharedLogStream> {
    let stream: SharedLogStream = Arc::new(Mutex::new(FileLogStream::new(path)?));
    attach(Arc::clone(&stream));
    Ok(stream)
}

/// Detach every stream from the process-wide logger
pub fn detach_all() {
    global().detach_all();
}

/// Turn Assimp's debug-level output on or off
pub fn set_verbose(verbose: bool) {
    unsafe { sys::aiEnableVerboseLogging(sys::aiBool::from(verbose)) };
}
