//! Byte-stream facade over the dispatch manager, plus the shared sink and
//! source handles jobs write to and read from.
pub mod io;
pub mod options;
pub mod reader;
pub mod writer;

pub use io::{SharedBuffer, SinkHandle, SourceHandle};
pub use options::{Configurable, StreamOption};
pub use reader::Reader;
pub use writer::Writer;
