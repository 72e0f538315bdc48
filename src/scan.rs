use crate::{
    chord_symbol::ChordSymbol,
    figure::{find_chord_in_text, normalize_figure},
    score::{ticks_to_quarters, TimedEvent},
    xf::{self, XfEvent, NO_CHORD},
};
use midly::{
    MetaMessage::{Lyric, Marker, SequencerSpecific, Text},
    TrackEventKind::Meta,
};
use std::fmt::{self, Display};
use tracing::{debug, trace, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Harmony {
    Chord(ChordSymbol),
    NoChord,
}

impl Harmony {
    /// Builds a harmony from a figure, e.g. a decoded XF chord.
    /// `None` when the chord-symbol model rejects the figure.
    pub fn from_figure(figure: &str) -> Option<Self> {
        if figure == NO_CHORD {
            return Some(Harmony::NoChord);
        }
        ChordSymbol::parse(&normalize_figure(figure)).map(Harmony::Chord)
    }
}

impl Display for Harmony {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Harmony::Chord(chord) => chord.fmt(f),
            Harmony::NoChord => f.write_str(NO_CHORD),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChordSource {
    Xf,
    Text,
}

impl Display for ChordSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ChordSource::Xf => "XF",
            ChordSource::Text => "text",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct ChordEvent {
    pub tick: u64,
    pub offset: f64,
    pub harmony: Harmony,
    pub source: ChordSource,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RehearsalMark {
    pub tick: u64,
    pub label: String,
}

/// Chords and rehearsal marks in stream order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Annotations {
    pub chords: Vec<ChordEvent>,
    pub rehearsal_marks: Vec<RehearsalMark>,
}

/// Collects chords and rehearsal marks in one forward pass.
///
/// Malformed XF payloads and text which isn't a chord skip only the event
/// carrying them.
pub struct AnnotationScanner {
    ticks_per_quarter: u16,
    annotations: Annotations,
}

impl AnnotationScanner {
    pub fn new(ticks_per_quarter: u16) -> Self {
        Self {
            ticks_per_quarter,
            annotations: Annotations::default(),
        }
    }

    pub fn feed(&mut self, event: &TimedEvent) {
        match event.kind {
            Meta(SequencerSpecific(data)) => match xf::parse_sequencer_specific(data) {
                Some(XfEvent::Chord(payload)) => self.xf_chord(event.tick, payload),
                Some(XfEvent::Rehearsal(payload)) => self.xf_rehearsal(event.tick, payload),
                Some(XfEvent::Other(id)) => {
                    trace!("XF event {:#04x} at tick {} ignored", id, event.tick)
                }
                None => {}
            },
            Meta(Text(bytes) | Lyric(bytes) | Marker(bytes)) => self.text(event.tick, bytes),
            _ => {}
        }
    }

    fn xf_chord(&mut self, tick: u64, payload: &[u8]) {
        let bytes = xf::strip_fillers(payload);
        if bytes.is_empty() {
            return;
        }
        let figure = match xf::decode_chord(&bytes) {
            Ok(figure) => figure,
            Err(err) => {
                debug!("tick {}: XF chord {:02X?} skipped: {}", tick, bytes, err);
                return;
            }
        };
        match Harmony::from_figure(&figure) {
            Some(harmony) => {
                debug!("tick {}: XF chord '{}'", tick, figure);
                self.push_chord(tick, harmony, ChordSource::Xf);
            }
            None => warn!("tick {}: can't create a chord from '{}'", tick, figure),
        }
    }

    fn xf_rehearsal(&mut self, tick: u64, payload: &[u8]) {
        if let Some(label) = xf::decode_rehearsal(payload) {
            debug!("tick {}: rehearsal mark '{}'", tick, label);
            self.annotations
                .rehearsal_marks
                .push(RehearsalMark { tick, label });
        }
    }

    fn text(&mut self, tick: u64, bytes: &[u8]) {
        let text = String::from_utf8_lossy(bytes);
        let text = text.trim();
        if text.is_empty() {
            return;
        }
        debug!("tick {}: text '{}'", tick, text);
        if let Some((candidate, chord)) = find_chord_in_text(text) {
            debug!("tick {}: text chord '{}'", tick, candidate);
            self.push_chord(tick, Harmony::Chord(chord), ChordSource::Text);
        }
    }

    fn push_chord(&mut self, tick: u64, harmony: Harmony, source: ChordSource) {
        self.annotations.chords.push(ChordEvent {
            tick,
            offset: ticks_to_quarters(tick, self.ticks_per_quarter),
            harmony,
            source,
        });
    }

    pub fn finish(self) -> Annotations {
        self.annotations
    }
}

/// Scans a tick-ordered stream for chords and rehearsal marks. Chord offsets
/// are computed with `ticks_per_quarter`.
pub fn scan_annotations<'a, 'b>(
    events: impl IntoIterator<Item = &'b TimedEvent<'a>>,
    ticks_per_quarter: u16,
) -> Annotations
where
    'a: 'b,
{
    let mut scanner = AnnotationScanner::new(ticks_per_quarter);
    for event in events {
        scanner.feed(event);
    }
    scanner.finish()
}
