#[cfg(test)]
#[macro_use]
mod test_helpers;

pub mod chord_symbol;
pub mod cmdline;
pub mod error;
pub mod figure;
pub mod leadsheet;
pub mod melody;
pub mod musicxml;
pub mod scan;
pub mod score;
pub mod timeline;
pub mod xf;

pub use error::{DecodeError, LeadSheetError};
pub use leadsheet::{DocumentFormat, LeadSheet};
pub use scan::{Annotations, ChordEvent, Harmony, RehearsalMark};
pub use timeline::Timeline;

use crate::{
    leadsheet::DEFAULT_QUARTER_DIVISORS,
    melody::extract_melody,
    scan::scan_annotations,
    score::{read_midi_file, MidiStream, TimedEvent},
};
use midly::num::u4;
use std::path::Path;
use tracing::{info, warn};

/// Everything found in one event stream.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Extraction {
    pub timeline: Timeline,
    pub rehearsal_marks: Vec<RehearsalMark>,
}

/// Scans a tick-ordered stream for chords, rehearsal marks and the melody on
/// `channel`, and merges chords and melody into a timeline.
pub fn extract(events: &[TimedEvent], channel: u4, ticks_per_quarter: u16) -> Extraction {
    let annotations = scan_annotations(events, ticks_per_quarter);
    let notes = extract_melody(events, channel, ticks_per_quarter);
    Extraction {
        timeline: Timeline::assemble(annotations.chords, notes),
        rehearsal_marks: annotations.rehearsal_marks,
    }
}

/// Builds a quantized lead sheet from the melody on `channel` of `input`.
/// Chords and rehearsal marks come from `chords` when given, otherwise from
/// `input` itself.
pub fn create_lead_sheet(
    input: &Path,
    chords: Option<&Path>,
    channel: u4,
) -> Result<LeadSheet, LeadSheetError> {
    let data = read_midi_file(input)?;
    let stream = MidiStream::parse(input, &data)?;
    let ticks_per_quarter = stream.ticks_per_quarter;
    info!(
        "{}: {} tracks, {} ticks per quarter",
        input.display(),
        stream.track_count,
        ticks_per_quarter
    );

    let notes = extract_melody(&stream.events, channel, ticks_per_quarter);
    info!("{} melody notes on channel {}", notes.len(), channel.as_int() + 1);

    let annotations = match chords {
        Some(path) => {
            let chord_data = read_midi_file(path)?;
            let chord_stream = MidiStream::parse(path, &chord_data)?;
            if chord_stream.ticks_per_quarter != ticks_per_quarter {
                warn!(
                    "{} has {} ticks per quarter but {} has {}, using {}",
                    path.display(),
                    chord_stream.ticks_per_quarter,
                    input.display(),
                    ticks_per_quarter,
                    ticks_per_quarter
                );
            }
            scan_annotations(&chord_stream.events, ticks_per_quarter)
        }
        None => scan_annotations(&stream.events, ticks_per_quarter),
    };
    if annotations.chords.is_empty() {
        warn!("no chords found");
    } else {
        info!("{} chords", annotations.chords.len());
    }
    info!("{} rehearsal marks", annotations.rehearsal_marks.len());

    let part = Timeline::assemble(annotations.chords, notes).into_part();
    Ok(LeadSheet::new(
        stream.metadata(),
        part.quantize(&DEFAULT_QUARTER_DIVISORS),
    ))
}

/// Scans a MIDI file for chords and rehearsal marks, using the file's own
/// ticks per quarter note.
pub fn scan_file(path: &Path) -> Result<Annotations, LeadSheetError> {
    let data = read_midi_file(path)?;
    let stream = MidiStream::parse(path, &data)?;
    Ok(scan_annotations(&stream.events, stream.ticks_per_quarter))
}
