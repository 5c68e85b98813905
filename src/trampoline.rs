//! Checkpoint/result bridge for the engine's abrupt-termination signaling.
//!
//! A scanline codec engine does not unwind normally when it hits corrupt
//! data — it abandons the current call from whatever depth it reached and
//! reports back through its own error state. This module renders that model
//! as a checkpoint/result pattern: engine operations return
//! [`EngineResult`], the [`Aborted`] signal carries no payload (the
//! diagnostic stays in engine state), and [`recover`] is the checkpoint
//! each public entry point establishes before handing control to the
//! engine. When an abort comes back, the engine's message formatter is
//! invoked and the result is a typed [`Error`] for the caller — decode-path
//! aborts become [`MalformedImage`](Error::MalformedImage), encode-path
//! aborts become [`WriteError`](Error::WriteError).

use crate::engine::Engine;
use crate::error::Error;

/// Abrupt-termination signal raised by an engine operation.
///
/// Deliberately payload-free: the engine records what went wrong in its own
/// state, and the checkpoint asks it to format the diagnostic afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Aborted;

/// Result of a single engine operation.
pub type EngineResult<T> = core::result::Result<T, Aborted>;

/// Which public boundary a checkpoint guards.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Boundary {
    Decode,
    Encode,
}

/// Run one engine operation under a checkpoint.
///
/// On abort, the engine's formatted message is captured and wrapped in the
/// boundary-appropriate error variant. The engine is left in whatever state
/// it reached; the caller is responsible for marking the owning session
/// defunct.
pub(crate) fn recover<E, T>(
    engine: &mut E,
    boundary: Boundary,
    op: impl FnOnce(&mut E) -> EngineResult<T>,
) -> Result<T, Error>
where
    E: Engine,
{
    match op(engine) {
        Ok(value) => Ok(value),
        Err(Aborted) => {
            let message = engine.format_message();
            Err(match boundary {
                Boundary::Decode => Error::MalformedImage(message),
                Boundary::Encode => Error::WriteError(message),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FixedMessage(&'static str);

    impl Engine for FixedMessage {
        fn format_message(&self) -> String {
            self.0.to_string()
        }
    }

    #[test]
    fn success_passes_through() {
        let mut engine = FixedMessage("unused");
        let value = recover(&mut engine, Boundary::Decode, |_| Ok(7)).unwrap();
        assert_eq!(value, 7);
    }

    #[test]
    fn decode_abort_becomes_malformed_image() {
        let mut engine = FixedMessage("bad marker");
        let err = recover::<_, ()>(&mut engine, Boundary::Decode, |_| Err(Aborted)).unwrap_err();
        assert_eq!(err, Error::MalformedImage("bad marker".into()));
    }

    #[test]
    fn encode_abort_becomes_write_error() {
        let mut engine = FixedMessage("buffer overrun");
        let err = recover::<_, ()>(&mut engine, Boundary::Encode, |_| Err(Aborted)).unwrap_err();
        assert_eq!(err, Error::WriteError("buffer overrun".into()));
    }

    #[test]
    fn message_formatted_after_abort_not_before() {
        struct Late {
            armed: bool,
        }
        impl Engine for Late {
            fn format_message(&self) -> String {
                assert!(self.armed, "formatter invoked before the abort");
                "late".to_string()
            }
        }

        let mut engine = Late { armed: false };
        let err = recover::<_, ()>(&mut engine, Boundary::Decode, |e| {
            e.armed = true;
            Err(Aborted)
        })
        .unwrap_err();
        assert_eq!(err, Error::MalformedImage("late".into()));
    }
}
