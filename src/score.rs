use crate::error::LeadSheetError;
use midi_reader_writer::midly_0_5::merge_tracks;
use midly::{
    num::u7,
    MetaMessage::{KeySignature as KeySignatureMeta, TimeSignature as TimeSignatureMeta, TrackName},
    Timing,
    TrackEventKind::{self, Meta},
};
use std::{fs, path::Path};

/// A message at an absolute tick of the merged track stream.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TimedEvent<'a> {
    pub tick: u64,
    pub track: usize,
    pub kind: TrackEventKind<'a>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeSignature {
    pub numerator: u8,
    pub denominator: u8,
}

impl Default for TimeSignature {
    fn default() -> Self {
        Self {
            numerator: 4,
            denominator: 4,
        }
    }
}

/// Position on the circle of fifths and mode.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct KeySignature {
    pub fifths: i8,
    pub minor: bool,
}

/// Metadata carried over from the MIDI file into the lead sheet.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Metadata {
    pub title: Option<String>,
    pub time_signature: TimeSignature,
    pub key_signature: Option<KeySignature>,
}

/// All tracks of a MIDI file merged into one stream ordered by absolute tick.
pub struct MidiStream<'a> {
    pub ticks_per_quarter: u16,
    pub track_count: usize,
    pub events: Vec<TimedEvent<'a>>,
}

/// Reads a whole MIDI file into memory. The file is closed before returning.
pub fn read_midi_file(path: &Path) -> Result<Vec<u8>, LeadSheetError> {
    fs::read(path).map_err(|source| LeadSheetError::StreamOpen {
        path: path.to_path_buf(),
        source,
    })
}

impl<'a> MidiStream<'a> {
    /// Parses MIDI file contents read from `path`.
    pub fn parse(path: &Path, data: &'a [u8]) -> Result<Self, LeadSheetError> {
        let smf = midly::Smf::parse(data).map_err(|source| LeadSheetError::StreamParse {
            path: path.to_path_buf(),
            source,
        })?;
        let ticks_per_quarter = match smf.header.timing {
            Timing::Metrical(ticks) if ticks.as_int() > 0 => ticks.as_int(),
            Timing::Metrical(_) => {
                return Err(LeadSheetError::UnsupportedTiming {
                    path: path.to_path_buf(),
                    reason: "zero ticks per quarter note",
                })
            }
            Timing::Timecode(..) => {
                return Err(LeadSheetError::UnsupportedTiming {
                    path: path.to_path_buf(),
                    reason: "timecode timing",
                })
            }
        };
        let events = merge_tracks(&smf.tracks)
            .map(|(tick, track, kind)| TimedEvent { tick, track, kind })
            .collect();
        Ok(Self {
            ticks_per_quarter,
            track_count: smf.tracks.len(),
            events,
        })
    }

    /// The first track name in the first track, used as the title.
    pub fn title(&self) -> Option<String> {
        self.events.iter().find_map(|event| match event.kind {
            Meta(TrackName(name)) if event.track == 0 => {
                let name = String::from_utf8_lossy(name).trim().to_string();
                Some(name).filter(|name| !name.is_empty())
            }
            _ => None,
        })
    }

    /// The first time signature in the stream.
    pub fn time_signature(&self) -> Option<TimeSignature> {
        self.events.iter().find_map(|event| match event.kind {
            Meta(TimeSignatureMeta(numerator, denominator_power, _, _)) if numerator > 0 => {
                1u8.checked_shl(denominator_power.into())
                    .map(|denominator| TimeSignature {
                        numerator,
                        denominator,
                    })
            }
            _ => None,
        })
    }

    /// The first key signature in the stream.
    pub fn key_signature(&self) -> Option<KeySignature> {
        self.events.iter().find_map(|event| match event.kind {
            Meta(KeySignatureMeta(fifths, minor)) => Some(KeySignature { fifths, minor }),
            _ => None,
        })
    }

    pub fn metadata(&self) -> Metadata {
        Metadata {
            title: self.title(),
            time_signature: self.time_signature().unwrap_or_default(),
            key_signature: self.key_signature(),
        }
    }
}

/// Converts an absolute tick into a quarter-note offset.
pub fn ticks_to_quarters(ticks: u64, ticks_per_quarter: u16) -> f64 {
    ticks as f64 / f64::from(ticks_per_quarter)
}

const NOTE_NAMES: [&str; 12] = [
    "C", "C#", "D", "Eb", "E", "F", "F#", "G", "Ab", "A", "Bb", "B",
];

/// Scientific pitch name, middle C (60) being `C4`.
pub fn pitch_to_name(pitch: u7) -> String {
    let pitch_u8 = pitch.as_int();
    let pitch_class = (pitch_u8 % 12) as usize;
    let octave = i16::from(pitch_u8 / 12) - 1;
    format!("{}{}", NOTE_NAMES[pitch_class], octave)
}
