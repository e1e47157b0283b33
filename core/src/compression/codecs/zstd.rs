//! src/compression/codecs/zstd.rs
//!
//! Zstd streaming encoder/decoder and raw session engine.
//!
//! Design notes:
//! - `SingleFrame` decoders stop after the first frame; concatenated decoders
//!   keep reading frames until the source is drained.
//! - The session engine drives `zstd::stream::raw::Encoder` directly against
//!   a caller-owned output slice. Once the end directive has started, only
//!   `finish` is called until it reports nothing left to flush.
use std::io::{self, Read, Write};

use zstd::stream::raw::{Encoder as RawEncoder, InBuffer, Operation, OutBuffer};
use zstd::stream::{read::Decoder, write::Encoder};

use crate::compression::session::{SessionEngine, SessionStep};
use crate::compression::types::{Algorithm, CompressionError, FrameDecoder, FrameEncoder};
use crate::compression::DecoderFraming;

impl<W: Write + Send> FrameEncoder for Encoder<'static, W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish().map(drop)
    }
}

pub fn encoder<W: Write + Send + 'static>(level: i32, sink: W) -> Result<Box<dyn FrameEncoder>, CompressionError> {
    let enc = Encoder::new(sink, level).map_err(CompressionError::init(Algorithm::Zstd))?;
    Ok(Box::new(enc))
}

pub fn decoder<R: Read + Send + 'static>(source: R, framing: DecoderFraming) -> Result<FrameDecoder, CompressionError> {
    let dec = Decoder::new(source).map_err(CompressionError::init(Algorithm::Zstd))?;
    Ok(match framing {
        DecoderFraming::SingleFrame => Box::new(dec.single_frame()),
        DecoderFraming::Concatenated => Box::new(dec),
    })
}

pub struct ZstdSession {
    raw: RawEncoder<'static>,
    finishing: bool,
}

impl ZstdSession {
    pub fn new(level: i32) -> Result<Self, CompressionError> {
        let raw = RawEncoder::new(level).map_err(CompressionError::init(Algorithm::Zstd))?;
        Ok(Self { raw, finishing: false })
    }
}

impl SessionEngine for ZstdSession {
    fn compress(&mut self, input: &[u8], output: &mut [u8], last: bool) -> Result<SessionStep, CompressionError> {
        let mut src = InBuffer::around(input);
        let mut dst = OutBuffer::around(output);

        if !self.finishing {
            self.raw.run(&mut src, &mut dst).map_err(CompressionError::process(Algorithm::Zstd))?;
        }
        let consumed = src.pos();
        if consumed < input.len() {
            return Ok(SessionStep::NeedOutput { consumed, produced: dst.pos() });
        }
        if !last {
            return Ok(SessionStep::Done { consumed, produced: dst.pos() });
        }

        self.finishing = true;
        let remaining = self.raw.finish(&mut dst, true).map_err(CompressionError::process(Algorithm::Zstd))?;
        let produced = dst.pos();
        if remaining == 0 {
            self.finishing = false;
            Ok(SessionStep::Done { consumed, produced })
        } else {
            Ok(SessionStep::NeedOutput { consumed, produced })
        }
    }
}
