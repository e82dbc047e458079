// Panics inside user callbacks must never unwind across the C ABI.

use std::io::SeekFrom;
use std::sync::{Arc, Mutex};

use cassimp::io::{FileStream, FileSystem};
use cassimp::logging::{LogStream, Logger, SharedLogStream};
use cassimp::{Error, Importer, PostProcessSteps, Result, Scene};

#[derive(Debug)]
struct PanicFs;

impl FileSystem for PanicFs {
    fn exists(&self, _path: &str) -> bool {
        true
    }

    fn open(&self, _path: &str, _mode: &str) -> Result<Box<dyn FileStream>> {
        panic!("intentional panic in FileSystem::open");
    }
}

/// Opens fine, then panics on the first read
#[derive(Debug)]
struct PanicOnReadFs;

struct PanicStream;

impl FileStream for PanicStream {
    fn read(&mut self, _buffer: &mut [u8]) -> Result<usize> {
        panic!("intentional panic in FileStream::read");
    }

    fn tell(&mut self) -> Result<u64> {
        Ok(0)
    }

    fn size(&mut self) -> Result<u64> {
        Ok(64)
    }

    fn seek(&mut self, _position: SeekFrom) -> Result<u64> {
        Ok(0)
    }
}

impl FileSystem for PanicOnReadFs {
    fn exists(&self, _path: &str) -> bool {
        true
    }

    fn open(&self, _path: &str, _mode: &str) -> Result<Box<dyn FileStream>> {
        Ok(Box::new(PanicStream))
    }
}

#[test]
fn panicking_open_becomes_an_import_error() {
    let result = Importer::new()
        .read_file("does-not-matter.obj")
        .with_file_system(Arc::new(PanicFs))
        .import();
    assert!(matches!(result, Err(Error::ImportFailed { .. })));
}

#[test]
fn panicking_read_reports_no_data() {
    // The read yields zero bytes; whether the importer then fails depends
    // on the format, but the process must survive it.
    let result = Importer::new()
        .read_file("does-not-matter.obj")
        .with_file_system(Arc::new(PanicOnReadFs))
        .import();
    if let Ok(scene) = result {
        assert!(!scene.has_meshes());
    }
}

struct PanicLog;

impl LogStream for PanicLog {
    fn write(&mut self, _message: &str) {
        panic!("intentional panic in LogStream::write");
    }
}

#[test]
fn panicking_log_stream_does_not_abort_the_import() {
    let stream: SharedLogStream = Arc::new(Mutex::new(PanicLog));
    let mut logger = Logger::default();
    logger.attach(Arc::clone(&stream));

    let scene = Scene::from_memory(b"v 0 0 0\nv 1 0 0\nv 0 1 0\nf 1 2 3\n", Some("obj"), PostProcessSteps::empty());
    assert!(scene.is_ok());
    assert!(logger.detach(&stream));
}
