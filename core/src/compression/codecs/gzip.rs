//! codecs/gzip.rs
//! gzip members (RFC 1952) via flate2.
//!
//! The session engine frames a raw deflate session with the member header and
//! the CRC32/ISIZE trailer itself, so it can run against a caller-owned
//! output buffer.
use std::io::{self, Read, Write};

use byteorder::{LittleEndian, WriteBytesExt};
use crc32fast::Hasher;
use flate2::{
    read::{GzDecoder, MultiGzDecoder},
    write::GzEncoder,
};

use crate::compression::codecs::deflate::{flate_level, DeflateSession};
use crate::compression::constants::{GZIP_HEADER_LEN, GZIP_MAGIC, GZIP_METHOD_DEFLATE, GZIP_OS_UNKNOWN};
use crate::compression::session::{SessionEngine, SessionStep};
use crate::compression::types::{CompressionError, FrameDecoder, FrameEncoder};
use crate::compression::DecoderFraming;

const GZIP_TRAILER_LEN: usize = 8;

impl<W: Write + Send> FrameEncoder for GzEncoder<W> {
    fn finish(self: Box<Self>) -> io::Result<()> {
        (*self).finish().map(drop)
    }
}

pub fn encoder<W: Write + Send + 'static>(level: i32, sink: W) -> Box<dyn FrameEncoder> {
    Box::new(GzEncoder::new(sink, flate_level(level)))
}

pub fn decoder<R: Read + Send + 'static>(source: R, framing: DecoderFraming) -> FrameDecoder {
    match framing {
        DecoderFraming::SingleFrame => Box::new(GzDecoder::new(source)),
        DecoderFraming::Concatenated => Box::new(MultiGzDecoder::new(source)),
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Stage {
    Header,
    Body,
    Trailer,
    Finished,
}

pub struct GzipSession {
    body: DeflateSession,
    crc: Hasher,
    isize: u32,
    level: i32,
    stage: Stage,
}

impl GzipSession {
    pub fn new(level: i32) -> Self {
        Self {
            body: DeflateSession::new(level),
            crc: Hasher::new(),
            isize: 0,
            level,
            stage: Stage::Header,
        }
    }

    fn write_header(&self, mut out: &mut [u8]) -> io::Result<()> {
        // XFL: 2 = max compression, 4 = fastest
        let xfl = match self.level {
            9 => 2,
            1 => 4,
            _ => 0,
        };
        out.write_all(&GZIP_MAGIC)?;
        out.write_u8(GZIP_METHOD_DEFLATE)?;
        out.write_u8(0)?; // FLG
        out.write_u32::<LittleEndian>(0)?; // MTIME
        out.write_u8(xfl)?;
        out.write_u8(GZIP_OS_UNKNOWN)
    }

    fn write_trailer(&self, mut out: &mut [u8]) -> io::Result<()> {
        out.write_u32::<LittleEndian>(self.crc.clone().finalize())?;
        out.write_u32::<LittleEndian>(self.isize)
    }

    fn absorb(&mut self, input: &[u8]) {
        self.crc.update(input);
        self.isize = self.isize.wrapping_add(input.len() as u32);
    }
}

impl SessionEngine for GzipSession {
    fn compress(&mut self, input: &[u8], output: &mut [u8], last: bool) -> Result<SessionStep, CompressionError> {
        let mut produced = 0;
        let mut consumed = 0;

        if self.stage == Stage::Header {
            if output.len() < GZIP_HEADER_LEN {
                return Ok(SessionStep::NeedOutput { consumed, produced });
            }
            self.write_header(&mut output[..GZIP_HEADER_LEN])?;
            produced += GZIP_HEADER_LEN;
            self.stage = Stage::Body;
        }

        if self.stage == Stage::Body {
            match self.body.compress(input, &mut output[produced..], last)? {
                SessionStep::NeedOutput { consumed: c, produced: p } => {
                    self.absorb(&input[..c]);
                    return Ok(SessionStep::NeedOutput { consumed: c, produced: produced + p });
                }
                SessionStep::Done { consumed: c, produced: p } => {
                    self.absorb(&input[..c]);
                    consumed = c;
                    produced += p;
                    if !last {
                        return Ok(SessionStep::Done { consumed, produced });
                    }
                    self.stage = Stage::Trailer;
                }
            }
        }

        if self.stage == Stage::Trailer {
            if output.len() - produced < GZIP_TRAILER_LEN {
                return Ok(SessionStep::NeedOutput { consumed, produced });
            }
            self.write_trailer(&mut output[produced..produced + GZIP_TRAILER_LEN])?;
            produced += GZIP_TRAILER_LEN;
            self.stage = Stage::Finished;
        }

        Ok(SessionStep::Done { consumed, produced })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Read;

    fn drive(engine: &mut dyn SessionEngine, input: &[u8], initial: usize) -> Vec<u8> {
        let mut out = vec![0u8; initial];
        let (mut nc, mut np) = (0, 0);
        loop {
            match engine.compress(&input[nc..], &mut out[np..], true).expect("session step") {
                SessionStep::Done { consumed, produced } => {
                    np += produced;
                    nc += consumed;
                    break;
                }
                SessionStep::NeedOutput { consumed, produced } => {
                    nc += consumed;
                    np += produced;
                    let len = out.len();
                    out.resize(len * 2, 0);
                }
            }
        }
        assert_eq!(nc, input.len());
        out.truncate(np);
        out
    }

    #[test]
    fn session_member_decodes_with_stock_reader() {
        let input = b"session framed gzip member ".repeat(300);
        let member = drive(&mut GzipSession::new(6), &input, 4);

        let mut decoded = Vec::new();
        GzDecoder::new(&member[..]).read_to_end(&mut decoded).expect("decode");
        assert_eq!(decoded, input);
    }

    #[test]
    fn empty_input_still_yields_complete_member() {
        let member = drive(&mut GzipSession::new(1), &[], 1);
        assert!(member.len() >= GZIP_HEADER_LEN + GZIP_TRAILER_LEN);

        let mut decoded = Vec::new();
        GzDecoder::new(&member[..]).read_to_end(&mut decoded).expect("decode");
        assert!(decoded.is_empty());
    }
}
