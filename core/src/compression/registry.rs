//! compression/registry.rs
//! Codec registry and factory functions.
use std::io::{Read, Write};

use crate::compression::codecs::{deflate, gzip, lz4, zstd, DeflateSession, GzipSession, ZstdSession};
use crate::compression::session::SessionEngine;
use crate::compression::types::{Algorithm, CompressionError, FrameDecoder, FrameEncoder, OffloadSymbol};

/// How far a decoder reads into its source.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DecoderFraming {
    /// Stop after one frame / gzip member.
    SingleFrame,
    /// Keep decoding concatenated frames until the source is drained.
    Concatenated,
}

/// Stream encoder writing one `algorithm` container into `sink`.
///
/// The container is complete only after `FrameEncoder::finish`.
///
/// # Errors
/// `InvalidLevel` when `level` is outside the algorithm's range, or
/// `CodecInitFailed` if the codec refuses the parameters.
pub fn create_encoder<W>(algorithm: Algorithm, level: i32, sink: W) -> Result<Box<dyn FrameEncoder>, CompressionError>
where
    W: Write + Send + 'static,
{
    algorithm.validate_level(level)?;
    match algorithm {
        Algorithm::Deflate => Ok(deflate::encoder(level, sink)),
        Algorithm::Gzip => Ok(gzip::encoder(level, sink)),
        Algorithm::Lz4 => Ok(lz4::encoder(level, sink)),
        Algorithm::Zstd => zstd::encoder(level, sink),
    }
}

/// Stream decoder reading `algorithm` containers from `source`.
///
/// `framing` decides whether the decoder stops after the first frame or
/// member, or keeps going through concatenated ones.
///
/// # Errors
/// `CodecInitFailed` if the codec cannot be set up on this source.
pub fn create_decoder<R>(algorithm: Algorithm, source: R, framing: DecoderFraming) -> Result<FrameDecoder, CompressionError>
where
    R: Read + Send + 'static,
{
    match algorithm {
        Algorithm::Deflate => Ok(deflate::decoder(source)),
        Algorithm::Gzip => Ok(gzip::decoder(source, framing)),
        Algorithm::Lz4 => Ok(lz4::decoder(source)),
        Algorithm::Zstd => zstd::decoder(source, framing),
    }
}

/// Low-level session engine for the algorithm's engine symbol. LZ4 has none.
///
/// # Errors
/// `InvalidLevel` for an out-of-range level. `CodecInitFailed` for LZ4 or
/// when the engine cannot be created.
pub fn create_session(algorithm: Algorithm, level: i32) -> Result<Box<dyn SessionEngine>, CompressionError> {
    algorithm.validate_level(level)?;
    match algorithm.offload_symbol() {
        OffloadSymbol::Deflate => Ok(Box::new(DeflateSession::new(level))),
        OffloadSymbol::DeflateGzip => Ok(Box::new(GzipSession::new(level))),
        OffloadSymbol::Zstd => Ok(Box::new(ZstdSession::new(level)?)),
        OffloadSymbol::Lz4 => Err(CompressionError::CodecInitFailed {
            codec: algorithm.name(),
            msg: "no session engine for this codec".into(),
        }),
    }
}

/// Encode `input` into one complete frame in memory.
pub fn compress_frame(algorithm: Algorithm, level: i32, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let buf = crate::stream::SharedBuffer::new();
    let mut enc = create_encoder(algorithm, level, buf.clone())?;
    enc.write_all(input).map_err(CompressionError::process(algorithm))?;
    enc.finish().map_err(CompressionError::process(algorithm))?;
    Ok(buf.contents())
}

/// Decode every frame in `input`.
pub fn decompress_all(algorithm: Algorithm, input: &[u8]) -> Result<Vec<u8>, CompressionError> {
    let mut dec = create_decoder(algorithm, std::io::Cursor::new(input.to_vec()), DecoderFraming::Concatenated)?;
    let mut out = Vec::new();
    dec.read_to_end(&mut out).map_err(CompressionError::process(algorithm))?;
    Ok(out)
}
