use crate::score::{pitch_to_name, ticks_to_quarters, TimedEvent};
use index_vec::{define_index_type, index_vec, IndexVec};
use midly::{
    num::{u4, u7},
    MidiMessage::{NoteOff, NoteOn},
    TrackEventKind::Midi,
};
use tracing::{debug, trace};

define_index_type! {
    pub struct PitchIdx = u8;
    MAX_INDEX = 128;
    IMPL_RAW_CONVERSIONS = true;
}

const PITCH_COUNT: usize = 128;

/// A note-on waiting for its note-off.
#[derive(Clone, Copy, Debug, PartialEq)]
struct PendingNote {
    start_tick: u64,
    velocity: u7,
}

/// A melody note with quarter-note offset and duration. The duration is zero
/// when note-on and note-off share a tick.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MelodyNote {
    pub offset: f64,
    pub duration: f64,
    pub pitch: u7,
    pub velocity: u7,
}

/// Pairs note-ons and note-offs of one channel into [`MelodyNote`]s.
///
/// There is at most one pending note per pitch. A note-on for a pitch which is
/// already sounding replaces the pending note, so the earlier onset never
/// becomes a note.
pub struct MelodyExtractor {
    channel: u4,
    ticks_per_quarter: u16,
    pending: IndexVec<PitchIdx, Option<PendingNote>>,
    notes: Vec<MelodyNote>,
}

impl MelodyExtractor {
    pub fn new(channel: u4, ticks_per_quarter: u16) -> Self {
        Self {
            channel,
            ticks_per_quarter,
            pending: index_vec![None; PITCH_COUNT],
            notes: vec![],
        }
    }

    pub fn feed(&mut self, event: &TimedEvent) {
        let message = match event.kind {
            Midi { channel, message } if channel == self.channel => message,
            _ => return,
        };
        match message {
            NoteOn { key, vel } if vel.as_int() > 0 => self.start(event.tick, key, vel),
            NoteOn { key, .. } | NoteOff { key, .. } => self.end(event.tick, key),
            _ => {}
        }
    }

    fn start(&mut self, tick: u64, key: u7, velocity: u7) {
        let previous = self.pending[PitchIdx::from(key.as_int())].replace(PendingNote {
            start_tick: tick,
            velocity,
        });
        if let Some(previous) = previous {
            debug!(
                "{} retriggered at tick {}, onset at tick {} discarded",
                pitch_to_name(key),
                tick,
                previous.start_tick
            );
        }
    }

    fn end(&mut self, tick: u64, key: u7) {
        let pending = match self.pending[PitchIdx::from(key.as_int())].take() {
            Some(pending) => pending,
            None => return,
        };
        let note = MelodyNote {
            offset: ticks_to_quarters(pending.start_tick, self.ticks_per_quarter),
            duration: ticks_to_quarters(
                tick.saturating_sub(pending.start_tick),
                self.ticks_per_quarter,
            ),
            pitch: key,
            velocity: pending.velocity,
        };
        trace!(
            "{} at {:.3} for {:.3} quarters",
            pitch_to_name(key),
            note.offset,
            note.duration
        );
        self.notes.push(note);
    }

    /// Ends the scan. Notes still waiting for a note-off are dropped.
    pub fn finish(self) -> Vec<MelodyNote> {
        let unterminated = self.pending.iter().flatten().count();
        if unterminated > 0 {
            debug!("{} notes without note-off dropped", unterminated);
        }
        self.notes
    }
}

/// Extracts the notes of `channel` from a tick-ordered event stream.
pub fn extract_melody<'a, 'b>(
    events: impl IntoIterator<Item = &'b TimedEvent<'a>>,
    channel: u4,
    ticks_per_quarter: u16,
) -> Vec<MelodyNote>
where
    'a: 'b,
{
    let mut extractor = MelodyExtractor::new(channel, ticks_per_quarter);
    for event in events {
        extractor.feed(event);
    }
    extractor.finish()
}
