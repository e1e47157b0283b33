//! stream/io.rs
//! Shared sink/source handles.
//!
//! A job's endpoint must outlive any single handler attempt: a candidate that
//! fails with a capacity error hands the same source to the next candidate,
//! and a stateful decoder keeps reading it across continuation calls. Handles
//! are therefore cheap clones of one `Arc<Mutex<..>>`.
use std::fmt;
use std::io::{self, Read, Write};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};


fn relock<T: ?Sized>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Clonable handle to the writer a compress job emits into.
#[derive(Clone)]
pub struct SinkHandle {
    inner: Arc<Mutex<Box<dyn Write + Send>>>,
}

impl SinkHandle {
    pub fn new<W: Write + Send + 'static>(w: W) -> Self {
        Self { inner: Arc::new(Mutex::new(Box::new(w))) }
    }
}

impl Write for SinkHandle {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        relock(&self.inner).write(data)
    }

    fn write_all(&mut self, data: &[u8]) -> io::Result<()> {
        relock(&self.inner).write_all(data)
    }

    fn flush(&mut self) -> io::Result<()> {
        relock(&self.inner).flush()
    }
}

impl fmt::Debug for SinkHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SinkHandle").field("refs", &Arc::strong_count(&self.inner)).finish()
    }
}

/// Clonable handle to the reader a decompress job consumes.
#[derive(Clone)]
pub struct SourceHandle {
    inner: Arc<Mutex<Box<dyn Read + Send>>>,
}

impl SourceHandle {
    pub fn new<R: Read + Send + 'static>(r: R) -> Self {
        Self { inner: Arc::new(Mutex::new(Box::new(r))) }
    }
}

impl Read for SourceHandle {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        relock(&self.inner).read(buf)
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle").field("refs", &Arc::strong_count(&self.inner)).finish()
    }
}

/// In-memory sink whose clones all append to the same buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> Vec<u8> {
        relock(&self.buf).clone()
    }

    pub fn len(&self) -> usize {
        relock(&self.buf).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        relock(&self.buf).clear();
    }

    pub fn sink(&self) -> SinkHandle {
        SinkHandle::new(self.clone())
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        relock(&self.buf).extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl fmt::Debug for SharedBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SharedBuffer").field("len", &self.len()).finish()
    }
}
