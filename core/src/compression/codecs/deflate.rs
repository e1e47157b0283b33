//! codecs/deflate.rs
//! Raw deflate (RFC 1951) via flate2: streaming encoder/decoder and the
//! low-level session engine used by offload session mode.
use std::io::{self, Read, Write};

use flate2::{read::DeflateDecoder, write::DeflateEncoder, Compress, Compression, FlushCompress, Status};

use crate::compression::session::{SessionEngine, SessionStep};
use crate::compression::types::{Algorithm, CompressionError, FrameDecoder, FrameEncoder};

impl<W: Write + Send> FrameEncoder for DeflateEncoder<W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish().map(drop)
    }
}

pub fn encoder<W: Write + Send + 'static>(level: i32, sink: W) -> Box<dyn FrameEncoder> {
    Box::new(DeflateEncoder::new(sink, flate_level(level)))
}

pub fn decoder<R: Read + Send + 'static>(source: R) -> FrameDecoder {
    Box::new(DeflateDecoder::new(source))
}

pub(crate) fn flate_level(level: i32) -> Compression {
    match level {
        0..=9 => Compression::new(level as u32),
        _ => Compression::default(),
    }
}

/// Raw deflate session over `flate2::Compress`.
pub struct DeflateSession {
    raw: Compress,
}

impl DeflateSession {
    pub fn new(level: i32) -> Self {
        Self { raw: Compress::new(flate_level(level), false) }
    }
}

impl SessionEngine for DeflateSession {
    fn compress(&mut self, input: &[u8], output: &mut [u8], last: bool) -> Result<SessionStep, CompressionError> {
        let flush = if last { FlushCompress::Finish } else { FlushCompress::None };
        let (in_before, out_before) = (self.raw.total_in(), self.raw.total_out());

        let status = self.raw.compress(input, output, flush).map_err(|e| CompressionError::CodecProcessFailed {
            codec: Algorithm::Deflate.name(),
            msg: e.to_string(),
        })?;

        let consumed = (self.raw.total_in() - in_before) as usize;
        let produced = (self.raw.total_out() - out_before) as usize;

        match status {
            Status::StreamEnd => Ok(SessionStep::Done { consumed, produced }),
            Status::Ok | Status::BufError if !last && consumed == input.len() => {
                Ok(SessionStep::Done { consumed, produced })
            }
            Status::Ok | Status::BufError => Ok(SessionStep::NeedOutput { consumed, produced }),
        }
    }
}
