//! codecs/lz4.rs
//! LZ4 frame format via lz4_flex. No level knob and no session engine.
use std::io::{self, Read, Write};

use lz4_flex::frame::{FrameDecoder as Lz4Decoder, FrameEncoder as Lz4Encoder};

use crate::compression::types::{FrameDecoder, FrameEncoder};

impl<W: Write + Send> FrameEncoder for Lz4Encoder<W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish().map(drop).map_err(io::Error::other)
    }
}

pub fn encoder<W: Write + Send + 'static>(_level: i32, sink: W) -> Box<dyn FrameEncoder> {
    Box::new(Lz4Encoder::new(sink))
}

pub fn decoder<R: Read + Send + 'static>(source: R) -> FrameDecoder {
    Box::new(Lz4Decoder::new(source))
}
