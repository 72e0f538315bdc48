use crate::score::TimedEvent;
use midly::{
    num::{u4, u7},
    MetaMessage,
    MidiMessage::{NoteOff, NoteOn},
    TrackEventKind,
};

/// Builds expected melody notes from `(offset, duration, pitch)` tuples.
/// Velocities are always 100, matching [`note_on`].
macro_rules! melody {
    (
        $( ($o: expr, $d: expr, $p: expr) ),*
    ) => {
        vec![ $( $crate::melody::MelodyNote {
            offset: $o,
            duration: $d,
            pitch: midly::num::u7::from($p),
            velocity: midly::num::u7::from(100),
        } ),* ]
    }
}

pub fn timed(tick: u64, track: usize, kind: TrackEventKind) -> TimedEvent {
    TimedEvent { tick, track, kind }
}

pub fn meta(message: MetaMessage) -> TrackEventKind {
    TrackEventKind::Meta(message)
}

pub fn track_name(name: &[u8]) -> TrackEventKind {
    meta(MetaMessage::TrackName(name))
}

pub fn text(text: &str) -> TrackEventKind {
    meta(MetaMessage::Text(text.as_bytes()))
}

/// A sequencer-specific meta event, e.g. `xf(&[0x43, 0x7B, 0x01, 0x31, 0x00])`.
pub fn xf(data: &[u8]) -> TrackEventKind {
    meta(MetaMessage::SequencerSpecific(data))
}

/// Note on with velocity 100 on a zero-based channel.
pub fn note_on(channel: u8, key: u8) -> TrackEventKind<'static> {
    velocity(channel, key, 100)
}

/// Note on with an explicit velocity; zero ends the note.
pub fn velocity(channel: u8, key: u8, vel: u8) -> TrackEventKind<'static> {
    TrackEventKind::Midi {
        channel: u4::from(channel),
        message: NoteOn {
            key: u7::from(key),
            vel: u7::from(vel),
        },
    }
}

pub fn note_off(channel: u8, key: u8) -> TrackEventKind<'static> {
    TrackEventKind::Midi {
        channel: u4::from(channel),
        message: NoteOff {
            key: u7::from(key),
            vel: u7::from(64),
        },
    }
}
