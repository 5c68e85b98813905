//! Failure taxonomy of the public decode/encode boundaries.

use thiserror::Error;

/// Convenience alias used throughout the crate.
pub type Result<T> = core::result::Result<T, Error>;

/// A failure surfaced at a public decode or encode entry point.
///
/// Engine-side failures never propagate as raw abort signals: each public
/// entry point establishes a checkpoint, and an abort is converted into one
/// of these variants carrying the engine's formatted diagnostic. Once a
/// [`Decoder`](crate::Decoder) or [`Encoder`](crate::Encoder) has returned
/// one of these, it is defunct — further calls report the failed session,
/// and dropping it still releases engine resources.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum Error {
    /// The decode path failed: corrupt header, corrupt entropy-coded data,
    /// or a premature end of stream that the synthesized terminator could
    /// not paper over.
    #[error("malformed image: {0}")]
    MalformedImage(String),

    /// The encode path failed: an engine-side inconsistency, or a write to
    /// the underlying stream that did not succeed.
    #[error("write error: {0}")]
    WriteError(String),
}
