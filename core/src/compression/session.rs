//! compression/session.rs
//! Low-level session engines: compress into a caller-owned output slice and
//! report when the slice was too small.
use crate::compression::types::CompressionError;

/// Outcome of one engine invocation.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionStep {
    /// All input consumed (and, for a last call, the frame finished).
    Done { consumed: usize, produced: usize },
    /// The output slice filled up before the engine could finish.
    NeedOutput { consumed: usize, produced: usize },
}

pub trait SessionEngine: Send {
    /// Compress `input` into `output`. With `last` set the frame is finalized.
    fn compress(&mut self, input: &[u8], output: &mut [u8], last: bool) -> Result<SessionStep, CompressionError>;
}

/// Run `engine` over the whole of `input` as the last chunk of a frame.
///
/// `out` grows by doubling every time the engine signals `NeedOutput`; the
/// returned length is the number of valid bytes in `out`.
pub fn run_to_completion(
    engine: &mut dyn SessionEngine,
    input: &[u8],
    out: &mut Vec<u8>,
) -> Result<usize, CompressionError> {
    if out.is_empty() {
        out.resize(1, 0);
    }
    let (mut nc, mut np) = (0, 0);
    loop {
        match engine.compress(&input[nc..], &mut out[np..], true)? {
            SessionStep::Done { consumed, produced } => {
                nc += consumed;
                np += produced;
                if nc != input.len() {
                    return Err(CompressionError::StateError(format!(
                        "session finished after {} of {} input bytes",
                        nc,
                        input.len()
                    )));
                }
                return Ok(np);
            }
            SessionStep::NeedOutput { consumed, produced } => {
                nc += consumed;
                np += produced;
                let len = out.len();
                out.resize(len * 2, 0);
            }
        }
    }
}
