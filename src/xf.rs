//! Decoding of the Yamaha XF chord and rehearsal-mark events.
//!
//! XF data travels in sequencer-specific meta events (`FF 7F len data`) whose
//! data starts with the Yamaha manufacturer id and the XF marker `43 7B`,
//! followed by an event id and its payload.

use crate::error::DecodeError;

pub const XF_META_HEADER: [u8; 2] = [0x43, 0x7B];
pub const XF_CHORD_ID: u8 = 0x01;
pub const XF_REHEARSAL_ID: u8 = 0x02;

/// Separator/terminator byte inside chord payloads, also "no bass note".
const FILLER: u8 = 0x7F;

pub const NO_CHORD: &str = "N.C.";
const NO_CHORD_TYPE: u8 = 0x22;

/// Indexed by bits 4..6 of a note byte.
const ACCIDENTALS: [&str; 7] = ["bbb", "bb", "b", "", "#", "##", "###"];

/// Indexed by bits 0..3 of a note byte minus one.
const LETTERS: [&str; 7] = ["C", "D", "E", "F", "G", "A", "B"];

/// Chord quality suffixes indexed by the chord type byte.
pub const CHORD_TYPES: [&str; 35] = [
    "",          // 0x00 Maj
    "6",         // 0x01 Maj6
    "maj7",      // 0x02 Maj7
    "maj7(#11)", // 0x03 Maj7(#11)
    "add9",      // 0x04 Maj(9)
    "maj9",      // 0x05 Maj7(9)
    "6(9)",      // 0x06 Maj6(9)
    "aug",       // 0x07 aug
    "m",         // 0x08 min
    "m6",        // 0x09 min6
    "m7",        // 0x0A min7
    "m7b5",      // 0x0B min7b5
    "m(add9)",   // 0x0C min(9)
    "m9",        // 0x0D min7(9)
    "m11",       // 0x0E min7(11)
    "m(maj7)",   // 0x0F minMaj7
    "m(maj7,9)", // 0x10 minMaj7(9)
    "dim",       // 0x11 dim
    "dim7",      // 0x12 dim7
    "7",         // 0x13 7th
    "7sus4",     // 0x14 7sus4
    "7b5",       // 0x15 7b5
    "7(9)",      // 0x16 7(9)
    "7(#11)",    // 0x17 7(#11)
    "7(13)",     // 0x18 7(13)
    "7(b9)",     // 0x19 7(b9)
    "7(b13)",    // 0x1A 7(b13)
    "7(#9)",     // 0x1B 7(#9)
    "maj7aug",   // 0x1C Maj7aug
    "7aug",      // 0x1D 7aug
    "1+8",       // 0x1E 1+8
    "1+5",       // 0x1F 1+5
    "sus4",      // 0x20 sus4
    "1+2+5",     // 0x21 1+2+5
    NO_CHORD,    // 0x22 cc
];

/// Section labels indexed by the low nibble of the rehearsal byte.
pub const REHEARSAL_LABELS: [&str; 16] = [
    "Intro", "Ending", "Fill-in", "A", "B", "C", "D", "E", "F", "G", "H", "I", "J", "K", "L", "M",
];

/// An XF event found in the data of a sequencer-specific meta event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum XfEvent<'a> {
    Chord(&'a [u8]),
    Rehearsal(&'a [u8]),
    Other(u8),
}

/// Identifies XF data. Returns `None` for other sequencer-specific data.
pub fn parse_sequencer_specific(data: &[u8]) -> Option<XfEvent<'_>> {
    if data.len() <= XF_META_HEADER.len() || data[..2] != XF_META_HEADER {
        return None;
    }
    let payload = &data[3..];
    Some(match data[2] {
        XF_CHORD_ID => XfEvent::Chord(payload),
        XF_REHEARSAL_ID => XfEvent::Rehearsal(payload),
        id => XfEvent::Other(id),
    })
}

/// Drops the `0x7F` separators from a chord payload.
pub fn strip_fillers(payload: &[u8]) -> Vec<u8> {
    payload.iter().copied().filter(|&b| b != FILLER).collect()
}

/// Decodes a root or bass byte: bits 4..6 select the accidental, bits 0..3 the
/// letter (1 = C through 7 = B).
pub fn decode_note_byte(byte: u8) -> Result<String, DecodeError> {
    let accidental = ACCIDENTALS
        .get(((byte >> 4) & 0b0111) as usize)
        .ok_or(DecodeError::NoteByte(byte))?;
    let letter = match byte & 0x0F {
        n @ 1..=7 => LETTERS[(n - 1) as usize],
        _ => return Err(DecodeError::NoteByte(byte)),
    };
    Ok(format!("{letter}{accidental}"))
}

/// Decodes `[root, type, bass?, …]` into a chord figure such as `Dmaj7/F#`.
///
/// The no-chord type yields [`NO_CHORD`] whatever the other bytes hold. A bass
/// byte of `0x7F` means the bass is the root. A bass equal to the root is not
/// shown. A fourth byte is accepted and ignored.
pub fn decode_chord(bytes: &[u8]) -> Result<String, DecodeError> {
    if !(2..=4).contains(&bytes.len()) {
        return Err(DecodeError::PayloadLength(bytes.len()));
    }
    let (root_byte, type_byte) = (bytes[0], bytes[1]);
    let suffix = CHORD_TYPES
        .get(type_byte as usize)
        .ok_or(DecodeError::ChordType(type_byte))?;
    if type_byte == NO_CHORD_TYPE {
        return Ok(NO_CHORD.to_string());
    }
    let root = decode_note_byte(root_byte)?;
    let bass = match bytes.get(2) {
        None | Some(&FILLER) => None,
        Some(&bass_byte) => Some(decode_note_byte(bass_byte)?),
    };
    Ok(match bass {
        Some(bass) if bass != root => format!("{root}{suffix}/{bass}"),
        _ => format!("{root}{suffix}"),
    })
}

/// Decodes the rehearsal byte `rr` into a label like `A''`.
/// An empty payload yields `None`.
pub fn decode_rehearsal(payload: &[u8]) -> Option<String> {
    let rr = *payload.first()?;
    let base = REHEARSAL_LABELS[(rr & 0x0F) as usize];
    let variants = ((rr >> 4) & 0b0111) as usize;
    Some(format!("{base}{}", "'".repeat(variants)))
}
