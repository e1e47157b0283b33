//! strategy/session.rs
//! Per-job engine state held in a backend's pool.
use std::io::Write;

use crate::compression::{
    create_decoder, create_encoder, Algorithm, CompressionError, DecoderFraming, FrameDecoder, FrameEncoder,
};
use crate::stream::{SinkHandle, SourceHandle};
use crate::strategy::handler::fill;
use crate::strategy::pool::{lock_session, SessionPool};
use crate::strategy::{HandlerError, JobRequest, Progress, Work};

pub(crate) enum CodecSession {
    /// Open encoder. The container is finalized when the session closes.
    Encode { algorithm: Algorithm, encoder: Box<dyn FrameEncoder> },
    /// Streaming decoder kept across continuation calls.
    Decode { algorithm: Algorithm, decoder: FrameDecoder },
    /// Engine binding with its output buffer (offload session mode).
    Binding { out: Vec<u8> },
    /// Slot held for a job whose work already completed inside `request`.
    Reserved,
}

impl CodecSession {
    pub fn encoder(algorithm: Algorithm, level: i32, sink: &SinkHandle) -> Result<Self, HandlerError> {
        let encoder = create_encoder(algorithm, level, sink.clone())?;
        Ok(CodecSession::Encode { algorithm, encoder })
    }

    pub fn decoder(algorithm: Algorithm, source: &SourceHandle, framing: DecoderFraming) -> Result<Self, HandlerError> {
        let decoder = create_decoder(algorithm, source.clone(), framing)?;
        Ok(CodecSession::Decode { algorithm, decoder })
    }

    pub fn write(&mut self, input: &[u8]) -> Result<Progress, HandlerError> {
        match self {
            CodecSession::Encode { algorithm, encoder } => {
                encoder.write_all(input).map_err(CompressionError::process(*algorithm))?;
                Ok(Progress { bytes: input.len(), end_of_stream: false })
            }
            _ => Err(CompressionError::StateError("session has no encoder".into()).into()),
        }
    }

    pub fn read(&mut self, output: &mut [u8]) -> Result<Progress, HandlerError> {
        match self {
            CodecSession::Decode { algorithm, decoder } => fill(decoder, output, *algorithm),
            _ => Err(CompressionError::StateError("session has no decoder".into()).into()),
        }
    }

    pub fn close(self) -> Result<(), HandlerError> {
        match self {
            CodecSession::Encode { algorithm, encoder } => {
                encoder.finish().map_err(CompressionError::process(algorithm))?;
                Ok(())
            }
            CodecSession::Decode { .. } | CodecSession::Binding { .. } | CodecSession::Reserved => Ok(()),
        }
    }
}

/// Continuation path shared by the hardware backends: read more output from
/// the decoder already bound to the job.
pub(crate) fn resume_decode(pool: &SessionPool<CodecSession>, req: &mut JobRequest<'_>) -> Result<Progress, HandlerError> {
    let session = pool.resume(req.id)?;
    let Work::Decompress { output, .. } = &mut req.work else {
        return Err(CompressionError::StateError("only decompress jobs continue".into()).into());
    };
    let mut guard = lock_session(&session);
    guard.read(output)
}
