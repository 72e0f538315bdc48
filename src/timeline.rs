use crate::{
    leadsheet::{Element, Part},
    melody::MelodyNote,
    scan::ChordEvent,
};
use std::cmp::Ordering;

#[derive(Clone, Debug, PartialEq)]
pub enum TimelineEvent {
    Chord(ChordEvent),
    Note(MelodyNote),
}

impl TimelineEvent {
    pub fn offset(&self) -> f64 {
        match self {
            TimelineEvent::Chord(chord) => chord.offset,
            TimelineEvent::Note(note) => note.offset,
        }
    }

    /// Chords sort before notes at the same offset.
    fn rank(&self) -> u8 {
        match self {
            TimelineEvent::Chord(_) => 0,
            TimelineEvent::Note(_) => 1,
        }
    }

    fn order(&self, other: &Self) -> Ordering {
        self.offset()
            .total_cmp(&other.offset())
            .then(self.rank().cmp(&other.rank()))
    }
}

/// Chords and melody notes in one sequence ordered by offset.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Timeline {
    events: Vec<TimelineEvent>,
}

impl Timeline {
    /// Merges chords and notes. Events with equal offset and kind keep their
    /// input order.
    pub fn assemble(chords: Vec<ChordEvent>, notes: Vec<MelodyNote>) -> Self {
        let mut events: Vec<TimelineEvent> = chords
            .into_iter()
            .map(TimelineEvent::Chord)
            .chain(notes.into_iter().map(TimelineEvent::Note))
            .collect();
        events.sort_by(TimelineEvent::order);
        Self { events }
    }

    pub fn events(&self) -> &[TimelineEvent] {
        &self.events
    }

    pub fn chords(&self) -> impl Iterator<Item = &ChordEvent> {
        self.events.iter().filter_map(|event| match event {
            TimelineEvent::Chord(chord) => Some(chord),
            TimelineEvent::Note(_) => None,
        })
    }

    pub fn notes(&self) -> impl Iterator<Item = &MelodyNote> {
        self.events.iter().filter_map(|event| match event {
            TimelineEvent::Note(note) => Some(note),
            TimelineEvent::Chord(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Hands every event over to a lead-sheet part, in timeline order.
    pub fn into_part(self) -> Part {
        let mut part = Part::default();
        for event in self.events {
            match event {
                TimelineEvent::Chord(chord) => {
                    part.insert(chord.offset, Element::Harmony(chord.harmony))
                }
                TimelineEvent::Note(note) => part.insert(
                    note.offset,
                    Element::Note {
                        pitch: note.pitch,
                        velocity: note.velocity,
                        duration: note.duration,
                    },
                ),
            }
        }
        part
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scan::{ChordSource, Harmony};

    fn chord(offset: f64, figure: &str) -> ChordEvent {
        ChordEvent {
            tick: (offset * 480.0) as u64,
            offset,
            harmony: Harmony::from_figure(figure).unwrap(),
            source: ChordSource::Xf,
        }
    }

    fn describe(timeline: &Timeline) -> Vec<(f64, String)> {
        timeline
            .events()
            .iter()
            .map(|event| match event {
                TimelineEvent::Chord(c) => (c.offset, c.harmony.to_string()),
                TimelineEvent::Note(n) => (n.offset, n.pitch.as_int().to_string()),
            })
            .collect()
    }

    #[test]
    fn orders_by_offset_with_chords_first() {
        let timeline = Timeline::assemble(
            vec![chord(0.0, "C"), chord(2.0, "G7"), chord(1.0, "F")],
            melody![(1.0, 1.0, 65), (0.0, 0.5, 60), (0.5, 0.5, 62), (2.0, 2.0, 67)],
        );
        assert_eq!(
            describe(&timeline),
            vec![
                (0.0, "C".to_string()),
                (0.0, "60".to_string()),
                (0.5, "62".to_string()),
                (1.0, "F".to_string()),
                (1.0, "65".to_string()),
                (2.0, "G7".to_string()),
                (2.0, "67".to_string()),
            ]
        );
        assert_eq!(timeline.chords().count(), 3);
        assert_eq!(timeline.notes().count(), 4);
    }

    #[test]
    fn equal_events_keep_input_order() {
        let timeline = Timeline::assemble(
            vec![chord(1.0, "Am"), chord(1.0, "N.C.")],
            melody![(1.0, 0.0, 64), (1.0, 1.0, 60)],
        );
        assert_eq!(
            describe(&timeline),
            vec![
                (1.0, "Am".to_string()),
                (1.0, "N.C.".to_string()),
                (1.0, "64".to_string()),
                (1.0, "60".to_string()),
            ]
        );
    }

    #[test]
    fn empty_timeline() {
        let timeline = Timeline::assemble(vec![], vec![]);
        assert!(timeline.is_empty());
        assert_eq!(timeline.into_part().len(), 0);
    }

    #[test]
    fn into_part_keeps_order() {
        let timeline = Timeline::assemble(vec![chord(0.0, "C")], melody![(0.0, 1.0, 60)]);
        assert_eq!(timeline.len(), 2);
        let part = timeline.into_part();
        let elements: Vec<bool> = part
            .elements()
            .iter()
            .map(|e| matches!(e.element, Element::Harmony(_)))
            .collect();
        assert_eq!(elements, vec![true, false]);
    }
}
