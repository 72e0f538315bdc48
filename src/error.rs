use std::{io, path::PathBuf};
use thiserror::Error;

/// Fatal failures: the whole operation is aborted and no output is written.
#[derive(Error, Debug)]
pub enum LeadSheetError {
    #[error("can't read MIDI file {}: {source}", path.display())]
    StreamOpen {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("can't parse MIDI file {}: {source}", path.display())]
    StreamParse {
        path: PathBuf,
        #[source]
        source: midly::Error,
    },

    #[error("MIDI file {} has no usable ticks per quarter note ({reason})", path.display())]
    UnsupportedTiming { path: PathBuf, reason: &'static str },

    #[error("can't write lead sheet to {}: {source}", path.display())]
    DocumentWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// A malformed XF payload. The event carrying it is skipped.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("chord payload has {0} bytes, expected 2 to 4")]
    PayloadLength(usize),

    #[error("chord type {0:#04x} is not in the XF chord table")]
    ChordType(u8),

    #[error("note byte {0:#04x} has no valid accidental and letter")]
    NoteByte(u8),
}
