//! MusicXML (partwise, 4.0) output for a quantized lead sheet.
//!
//! The melody is written as a single voice. Overlapping notes are cut at the
//! next onset, gaps become rests, and notes crossing a barline or lasting an
//! unnotatable number of divisions are split into tied notes.

use crate::{
    chord_symbol::{ChordPitch, ChordSymbol},
    leadsheet::{LeadSheet, QuantizedElement},
    scan::Harmony,
    score::{KeySignature, TimeSignature},
};
use midly::num::u7;
use tracing::{debug, warn};

const PART_ID: &str = "P1";

struct NoteValue {
    /// Length in quarter notes as numerator and denominator.
    quarters: (u64, u64),
    name: &'static str,
    dots: u8,
    triplet: bool,
}

impl NoteValue {
    fn in_divisions(&self, divisions: u64) -> Option<u64> {
        let (numerator, denominator) = self.quarters;
        let scaled = divisions * numerator;
        (scaled % denominator == 0).then(|| scaled / denominator)
    }
}

macro_rules! value {
    ($n: expr, $d: expr, $name: expr, $dots: expr, $triplet: expr) => {
        NoteValue {
            quarters: ($n, $d),
            name: $name,
            dots: $dots,
            triplet: $triplet,
        }
    };
}

/// Longest first.
static NOTE_VALUES: [NoteValue; 16] = [
    value!(6, 1, "whole", 1, false),
    value!(4, 1, "whole", 0, false),
    value!(3, 1, "half", 1, false),
    value!(2, 1, "half", 0, false),
    value!(3, 2, "quarter", 1, false),
    value!(4, 3, "half", 0, true),
    value!(1, 1, "quarter", 0, false),
    value!(3, 4, "eighth", 1, false),
    value!(2, 3, "quarter", 0, true),
    value!(1, 2, "eighth", 0, false),
    value!(3, 8, "16th", 1, false),
    value!(1, 3, "eighth", 0, true),
    value!(1, 4, "16th", 0, false),
    value!(1, 6, "16th", 0, true),
    value!(1, 8, "32nd", 0, false),
    value!(1, 12, "32nd", 0, true),
];

const SHARP_SPELLING: [(&str, i8); 12] = [
    ("C", 0),
    ("C", 1),
    ("D", 0),
    ("D", 1),
    ("E", 0),
    ("F", 0),
    ("F", 1),
    ("G", 0),
    ("G", 1),
    ("A", 0),
    ("A", 1),
    ("B", 0),
];

const FLAT_SPELLING: [(&str, i8); 12] = [
    ("C", 0),
    ("D", -1),
    ("D", 0),
    ("E", -1),
    ("E", 0),
    ("F", 0),
    ("G", -1),
    ("G", 0),
    ("A", -1),
    ("A", 0),
    ("B", -1),
    ("B", 0),
];

#[derive(Clone, Copy, Debug, PartialEq)]
enum Sound {
    Rest,
    Note { pitch: u7, velocity: u7 },
}

/// A stretch of the voice, in divisions from the start of the piece.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Segment {
    start: u64,
    length: u64,
    sound: Sound,
    tie_stop: bool,
    tie_start: bool,
}

impl Segment {
    fn end(&self) -> u64 {
        self.start + self.length
    }
}

/// Convert a lead sheet to MusicXML.
pub fn to_musicxml(sheet: &LeadSheet) -> String {
    let divisions = u64::from(sheet.part.divisions);
    let time_signature = checked_time_signature(sheet.metadata.time_signature, divisions);
    let measure_length = measure_length(time_signature, divisions);
    let prefer_flats = sheet
        .metadata
        .key_signature
        .map_or(false, |key| key.fifths < 0);

    let harmonies: Vec<(u64, &Harmony)> = sheet
        .part
        .elements
        .iter()
        .filter_map(|element| match element {
            QuantizedElement::Harmony { position, harmony } => Some((*position, harmony)),
            QuantizedElement::Note { .. } => None,
        })
        .collect();
    let voice = voice_segments(&sheet.part.elements);
    let end = voice
        .last()
        .map(Segment::end)
        .into_iter()
        .chain(harmonies.last().map(|(position, _)| position + 1))
        .max()
        .unwrap_or(0);
    let measure_count = ((end + measure_length - 1) / measure_length).max(1);
    let segments = split_at_barlines(fill_rests(voice, measure_count * measure_length), measure_length);

    let mut xml = String::new();
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
    xml.push('\n');
    xml.push_str(r#"<!DOCTYPE score-partwise PUBLIC "-//Recordare//DTD MusicXML 4.0 Partwise//EN" "http://www.musicxml.org/dtds/partwise.dtd">"#);
    xml.push('\n');
    xml.push_str("<score-partwise version=\"4.0\">\n");
    if let Some(title) = &sheet.metadata.title {
        xml.push_str("  <work>\n");
        xml.push_str(&format!("    <work-title>{}</work-title>\n", escape_xml(title)));
        xml.push_str("  </work>\n");
    }
    xml.push_str("  <identification>\n");
    xml.push_str("    <encoding>\n");
    xml.push_str(&format!(
        "      <software>{} {}</software>\n",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    ));
    xml.push_str("    </encoding>\n");
    xml.push_str("  </identification>\n");
    xml.push_str("  <part-list>\n");
    xml.push_str(&format!("    <score-part id=\"{PART_ID}\">\n"));
    xml.push_str("      <part-name>Lead Sheet</part-name>\n");
    xml.push_str("    </score-part>\n");
    xml.push_str("  </part-list>\n");
    xml.push_str(&format!("  <part id=\"{PART_ID}\">\n"));

    let mut segments = segments.into_iter().peekable();
    let mut harmonies = harmonies.into_iter().peekable();
    for index in 0..measure_count {
        let measure_start = index * measure_length;
        let measure_end = measure_start + measure_length;
        xml.push_str(&format!("    <measure number=\"{}\">\n", index + 1));
        if index == 0 {
            push_attributes(
                &mut xml,
                divisions,
                time_signature,
                sheet.metadata.key_signature,
            );
        }
        let mut measure_segments = vec![];
        while let Some(segment) = segments.next_if(|s| s.start < measure_end) {
            measure_segments.push(segment);
        }
        if let [Segment {
            sound: Sound::Rest,
            length,
            ..
        }] = &measure_segments[..]
        {
            while let Some((position, harmony)) = harmonies.next_if(|(p, _)| *p < measure_end) {
                push_harmony(&mut xml, harmony, position - measure_start);
            }
            push_measure_rest(&mut xml, *length);
        } else {
            for segment in measure_segments {
                for (start, length, value, tie_stop, tie_start) in notated(&segment, divisions) {
                    while let Some((position, harmony)) =
                        harmonies.next_if(|(p, _)| *p < start + length)
                    {
                        push_harmony(&mut xml, harmony, position.saturating_sub(start));
                    }
                    push_note(
                        &mut xml,
                        segment.sound,
                        length,
                        value,
                        tie_stop,
                        tie_start,
                        prefer_flats,
                    );
                }
            }
        }
        xml.push_str("    </measure>\n");
    }

    xml.push_str("  </part>\n");
    xml.push_str("</score-partwise>\n");
    xml
}

fn checked_time_signature(time_signature: TimeSignature, divisions: u64) -> TimeSignature {
    let TimeSignature {
        numerator,
        denominator,
    } = time_signature;
    let whole = divisions * 4 * u64::from(numerator);
    if numerator == 0 || denominator == 0 || whole % u64::from(denominator) != 0 {
        warn!(
            "time signature {}/{} can't be written, using 4/4",
            numerator, denominator
        );
        TimeSignature::default()
    } else {
        time_signature
    }
}

fn measure_length(time_signature: TimeSignature, divisions: u64) -> u64 {
    divisions * 4 * u64::from(time_signature.numerator) / u64::from(time_signature.denominator)
}

/// Notes as one monophonic line. A note still sounding when the next one
/// starts is cut short; a note cut to nothing is left out.
fn voice_segments(elements: &[QuantizedElement]) -> Vec<Segment> {
    let mut voice: Vec<Segment> = vec![];
    for element in elements {
        let (position, duration, pitch, velocity) = match element {
            QuantizedElement::Note {
                position,
                duration,
                pitch,
                velocity,
            } => (*position, *duration, *pitch, *velocity),
            QuantizedElement::Harmony { .. } => continue,
        };
        if let Some(previous) = voice.last_mut() {
            if previous.end() > position {
                debug!(
                    "note at division {} cut short by the note at {}",
                    previous.start, position
                );
                previous.length = position - previous.start;
            }
            if previous.length == 0 {
                voice.pop();
            }
        }
        voice.push(Segment {
            start: position,
            length: duration,
            sound: Sound::Note { pitch, velocity },
            tie_stop: false,
            tie_start: false,
        });
    }
    voice
}

fn rest(start: u64, length: u64) -> Segment {
    Segment {
        start,
        length,
        sound: Sound::Rest,
        tie_stop: false,
        tie_start: false,
    }
}

/// Fills the gaps between notes, and after the last one up to `end`, with rests.
fn fill_rests(voice: Vec<Segment>, end: u64) -> Vec<Segment> {
    let mut filled = vec![];
    let mut cursor = 0;
    for segment in voice {
        if segment.start > cursor {
            filled.push(rest(cursor, segment.start - cursor));
        }
        cursor = segment.end();
        filled.push(segment);
    }
    if end > cursor {
        filled.push(rest(cursor, end - cursor));
    }
    filled
}

/// Splits segments crossing a barline. Split notes are tied.
fn split_at_barlines(segments: Vec<Segment>, measure_length: u64) -> Vec<Segment> {
    let mut split = vec![];
    for segment in segments {
        let mut start = segment.start;
        while start < segment.end() {
            let barline = (start / measure_length + 1) * measure_length;
            let end = barline.min(segment.end());
            let is_note = segment.sound != Sound::Rest;
            split.push(Segment {
                start,
                length: end - start,
                sound: segment.sound,
                tie_stop: if start == segment.start {
                    segment.tie_stop
                } else {
                    is_note
                },
                tie_start: is_note && end < segment.end(),
            });
            start = end;
        }
    }
    split
}

/// Breaks a segment into notatable values, longest first:
/// `(start, length, value, tie_stop, tie_start)`.
fn notated(
    segment: &Segment,
    divisions: u64,
) -> Vec<(u64, u64, &'static NoteValue, bool, bool)> {
    let is_note = segment.sound != Sound::Rest;
    let mut parts = vec![];
    let mut start = segment.start;
    while start < segment.end() {
        let remaining = segment.end() - start;
        let found = NOTE_VALUES.iter().find_map(|value| {
            value
                .in_divisions(divisions)
                .filter(|&length| length > 0 && length <= remaining)
                .map(|length| (length, value))
        });
        let (length, value) = match found {
            Some(found) => found,
            None => {
                debug!("{} divisions at {} can't be notated", remaining, start);
                break;
            }
        };
        let end = start + length;
        parts.push((
            start,
            length,
            value,
            if start == segment.start {
                segment.tie_stop
            } else {
                is_note
            },
            if end == segment.end() {
                segment.tie_start
            } else {
                is_note
            },
        ));
        start = end;
    }
    parts
}

fn push_attributes(
    xml: &mut String,
    divisions: u64,
    time_signature: TimeSignature,
    key_signature: Option<KeySignature>,
) {
    xml.push_str("      <attributes>\n");
    xml.push_str(&format!("        <divisions>{divisions}</divisions>\n"));
    if let Some(KeySignature { fifths, minor }) = key_signature {
        xml.push_str("        <key>\n");
        xml.push_str(&format!("          <fifths>{fifths}</fifths>\n"));
        xml.push_str(&format!(
            "          <mode>{}</mode>\n",
            if minor { "minor" } else { "major" }
        ));
        xml.push_str("        </key>\n");
    }
    xml.push_str("        <time>\n");
    xml.push_str(&format!(
        "          <beats>{}</beats>\n",
        time_signature.numerator
    ));
    xml.push_str(&format!(
        "          <beat-type>{}</beat-type>\n",
        time_signature.denominator
    ));
    xml.push_str("        </time>\n");
    xml.push_str("        <clef>\n");
    xml.push_str("          <sign>G</sign>\n");
    xml.push_str("          <line>2</line>\n");
    xml.push_str("        </clef>\n");
    xml.push_str("      </attributes>\n");
}

fn push_pitch(xml: &mut String, element: &str, pitch: ChordPitch) {
    xml.push_str(&format!(
        "          <{element}-step>{}</{element}-step>\n",
        pitch.step
    ));
    if pitch.alter != 0 {
        xml.push_str(&format!(
            "          <{element}-alter>{}</{element}-alter>\n",
            pitch.alter
        ));
    }
}

fn push_chord_symbol(xml: &mut String, chord: &ChordSymbol) {
    xml.push_str("        <root>\n");
    push_pitch(xml, "root", chord.root);
    xml.push_str("        </root>\n");
    xml.push_str(&format!(
        "        <kind text=\"{}\">{}</kind>\n",
        escape_xml(&chord.display_kind()),
        chord.kind.musicxml_kind()
    ));
    if let Some(bass) = chord.bass {
        xml.push_str("        <bass>\n");
        push_pitch(xml, "bass", bass);
        xml.push_str("        </bass>\n");
    }
    let degrees = chord
        .kind
        .added
        .iter()
        .map(|degree| (degree.value, degree.alter, "add"))
        .chain(
            chord
                .kind
                .altered
                .iter()
                .map(|degree| (degree.value, degree.alter, "alter")),
        )
        .chain(chord.kind.omitted.iter().map(|&value| (value, 0, "subtract")));
    for (value, alter, degree_type) in degrees {
        xml.push_str("        <degree>\n");
        xml.push_str(&format!("          <degree-value>{value}</degree-value>\n"));
        xml.push_str(&format!("          <degree-alter>{alter}</degree-alter>\n"));
        xml.push_str(&format!("          <degree-type>{degree_type}</degree-type>\n"));
        xml.push_str("        </degree>\n");
    }
}

/// `offset` counts divisions from the note the harmony precedes.
fn push_harmony(xml: &mut String, harmony: &Harmony, offset: u64) {
    xml.push_str("      <harmony>\n");
    match harmony {
        Harmony::Chord(chord) => push_chord_symbol(xml, chord),
        Harmony::NoChord => {
            xml.push_str("        <root>\n");
            xml.push_str("          <root-step>C</root-step>\n");
            xml.push_str("        </root>\n");
            xml.push_str("        <kind text=\"N.C.\">none</kind>\n");
        }
    }
    if offset > 0 {
        xml.push_str(&format!("        <offset>{offset}</offset>\n"));
    }
    xml.push_str("      </harmony>\n");
}

fn push_measure_rest(xml: &mut String, length: u64) {
    xml.push_str("      <note>\n");
    xml.push_str("        <rest measure=\"yes\"/>\n");
    xml.push_str(&format!("        <duration>{length}</duration>\n"));
    xml.push_str("        <voice>1</voice>\n");
    xml.push_str("      </note>\n");
}

fn push_note(
    xml: &mut String,
    sound: Sound,
    length: u64,
    value: &NoteValue,
    tie_stop: bool,
    tie_start: bool,
    prefer_flats: bool,
) {
    match sound {
        Sound::Rest => {
            xml.push_str("      <note>\n");
            xml.push_str("        <rest/>\n");
        }
        Sound::Note { pitch, velocity } => {
            let (step, alter, octave) = spell(pitch, prefer_flats);
            xml.push_str(&format!(
                "      <note dynamics=\"{:.2}\">\n",
                f64::from(velocity.as_int()) / 90.0 * 100.0
            ));
            xml.push_str("        <pitch>\n");
            xml.push_str(&format!("          <step>{step}</step>\n"));
            if alter != 0 {
                xml.push_str(&format!("          <alter>{alter}</alter>\n"));
            }
            xml.push_str(&format!("          <octave>{octave}</octave>\n"));
            xml.push_str("        </pitch>\n");
        }
    }
    xml.push_str(&format!("        <duration>{length}</duration>\n"));
    if tie_stop {
        xml.push_str("        <tie type=\"stop\"/>\n");
    }
    if tie_start {
        xml.push_str("        <tie type=\"start\"/>\n");
    }
    xml.push_str("        <voice>1</voice>\n");
    xml.push_str(&format!("        <type>{}</type>\n", value.name));
    for _ in 0..value.dots {
        xml.push_str("        <dot/>\n");
    }
    if value.triplet {
        xml.push_str("        <time-modification>\n");
        xml.push_str("          <actual-notes>3</actual-notes>\n");
        xml.push_str("          <normal-notes>2</normal-notes>\n");
        xml.push_str("        </time-modification>\n");
    }
    if tie_stop || tie_start {
        xml.push_str("        <notations>\n");
        if tie_stop {
            xml.push_str("          <tied type=\"stop\"/>\n");
        }
        if tie_start {
            xml.push_str("          <tied type=\"start\"/>\n");
        }
        xml.push_str("        </notations>\n");
    }
    xml.push_str("      </note>\n");
}

/// Step, alteration and octave of a MIDI pitch, middle C being octave 4.
fn spell(pitch: u7, prefer_flats: bool) -> (&'static str, i8, i8) {
    let pitch = pitch.as_int();
    let spelling = if prefer_flats {
        &FLAT_SPELLING
    } else {
        &SHARP_SPELLING
    };
    let (step, alter) = spelling[(pitch % 12) as usize];
    (step, alter, (pitch / 12) as i8 - 1)
}

fn escape_xml(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        leadsheet::{Element, Part, DEFAULT_QUARTER_DIVISORS},
        score::Metadata,
    };
    use rstest::rstest;

    fn note(pitch: u8, duration: f64) -> Element {
        Element::Note {
            pitch: u7::from(pitch),
            velocity: u7::from(90),
            duration,
        }
    }

    fn chord(figure: &str) -> Element {
        Element::Harmony(Harmony::from_figure(figure).unwrap())
    }

    fn render(part: Part, metadata: Metadata) -> String {
        to_musicxml(&LeadSheet::new(
            metadata,
            part.quantize(&DEFAULT_QUARTER_DIVISORS),
        ))
    }

    fn count(xml: &str, needle: &str) -> usize {
        xml.matches(needle).count()
    }

    #[test]
    fn empty_sheet_has_one_measure_rest() {
        let xml = render(Part::default(), Metadata::default());
        assert_eq!(count(&xml, "<measure "), 1);
        assert!(xml.contains("<rest measure=\"yes\"/>"));
        assert!(xml.contains("<duration>48</duration>"));
        assert!(xml.contains("<divisions>12</divisions>"));
        assert!(!xml.contains("<work>"));
        assert!(!xml.contains("<key>"));
    }

    #[test]
    fn header_and_attributes() {
        let metadata = Metadata {
            title: Some("Tom & Jerry".to_string()),
            time_signature: TimeSignature {
                numerator: 3,
                denominator: 4,
            },
            key_signature: Some(KeySignature {
                fifths: -3,
                minor: true,
            }),
        };
        let xml = render(Part::default(), metadata);
        assert!(xml.contains("<work-title>Tom &amp; Jerry</work-title>"));
        assert!(xml.contains("<fifths>-3</fifths>"));
        assert!(xml.contains("<mode>minor</mode>"));
        assert!(xml.contains("<beats>3</beats>"));
        assert!(xml.contains("<duration>36</duration>"));
    }

    #[test]
    fn chord_and_note() {
        let mut part = Part::default();
        part.insert(0.0, chord("Dmaj7/F#"));
        part.insert(0.0, note(62, 1.0));
        let xml = render(part, Metadata::default());
        let harmony = xml.find("<harmony>").unwrap();
        let pitch = xml.find("<pitch>").unwrap();
        assert!(harmony < pitch);
        assert!(xml.contains("<root-step>D</root-step>"));
        assert!(xml.contains("<kind text=\"maj7\">major-seventh</kind>"));
        assert!(xml.contains("<bass-step>F</bass-step>"));
        assert!(xml.contains("<bass-alter>1</bass-alter>"));
        assert!(xml.contains("<step>D</step>"));
        assert!(xml.contains("<octave>4</octave>"));
        assert!(xml.contains("<type>quarter</type>"));
        assert!(xml.contains("dynamics=\"100.00\""));
        assert!(!xml.contains("<offset>"));
        // a quarter note then a dotted half rest fill the measure
        assert!(xml.contains("<type>half</type>"));
        assert!(xml.contains("<dot/>"));
    }

    #[test]
    fn harmony_inside_a_note_gets_an_offset() {
        let mut part = Part::default();
        part.insert(0.0, note(60, 4.0));
        part.insert(2.0, chord("G7"));
        let xml = render(part, Metadata::default());
        assert!(xml.contains("<offset>24</offset>"));
        assert!(xml.contains("<type>whole</type>"));
    }

    #[test]
    fn harmony_in_empty_measure() {
        let mut part = Part::default();
        part.insert(5.0, chord("N.C."));
        let xml = render(part, Metadata::default());
        assert_eq!(count(&xml, "<measure "), 2);
        assert_eq!(count(&xml, "<rest measure=\"yes\"/>"), 2);
        assert!(xml.contains("<kind text=\"N.C.\">none</kind>"));
        assert!(xml.contains("<offset>12</offset>"));
    }

    #[test]
    fn note_across_barline_is_tied() {
        let mut part = Part::default();
        part.insert(3.0, note(67, 2.0));
        let xml = render(part, Metadata::default());
        assert_eq!(count(&xml, "<measure "), 2);
        assert_eq!(count(&xml, "<tie type=\"start\"/>"), 1);
        assert_eq!(count(&xml, "<tie type=\"stop\"/>"), 1);
        assert_eq!(count(&xml, "<tied type=\"start\"/>"), 1);
        assert_eq!(count(&xml, "<step>G</step>"), 2);
    }

    #[test]
    fn overlapping_notes_are_cut() {
        let mut part = Part::default();
        part.insert(0.0, note(60, 2.0));
        part.insert(1.0, note(64, 1.0));
        part.insert(1.0, note(65, 1.0));
        let xml = render(part, Metadata::default());
        assert_eq!(count(&xml, "<pitch>"), 2);
        assert!(!xml.contains("<step>E</step>"));
        assert!(xml.contains("<step>F</step>"));
    }

    #[test]
    fn triplets() {
        let mut part = Part::default();
        part.insert(0.0, note(60, 1.0 / 3.0));
        part.insert(1.0 / 3.0, note(62, 1.0 / 3.0));
        part.insert(2.0 / 3.0, note(64, 1.0 / 3.0));
        let xml = render(part, Metadata::default());
        assert_eq!(count(&xml, "<actual-notes>3</actual-notes>"), 3);
        assert_eq!(count(&xml, "<type>eighth</type>"), 3);
    }

    #[test]
    fn flats_in_flat_keys() {
        let mut part = Part::default();
        part.insert(0.0, note(70, 1.0));
        let metadata = Metadata {
            key_signature: Some(KeySignature {
                fifths: -1,
                minor: false,
            }),
            ..Metadata::default()
        };
        let xml = render(part, metadata);
        assert!(xml.contains("<step>B</step>"));
        assert!(xml.contains("<alter>-1</alter>"));
    }

    #[test]
    fn unwritable_time_signature_falls_back_to_common_time() {
        let time_signature = TimeSignature {
            numerator: 3,
            denominator: 32,
        };
        assert_eq!(
            checked_time_signature(time_signature, 12),
            TimeSignature::default()
        );
        let time_signature = TimeSignature {
            numerator: 6,
            denominator: 8,
        };
        assert_eq!(checked_time_signature(time_signature, 12), time_signature);
        assert_eq!(measure_length(time_signature, 12), 36);
    }

    #[rstest(
        length,
        expect,
        case(12, vec!["quarter"]),
        case(18, vec!["quarter."]),
        case(60, vec!["whole", "quarter"]),
        case(10, vec!["eighth.", "32nd3"]),
        case(4, vec!["eighth3"]),
        case(1, vec!["32nd3"]),
    )]
    fn split_into_values(length: u64, expect: Vec<&str>) {
        let segment = Segment {
            start: 0,
            length,
            sound: Sound::Note {
                pitch: u7::from(60),
                velocity: u7::from(64),
            },
            tie_stop: false,
            tie_start: false,
        };
        let names: Vec<String> = notated(&segment, 12)
            .iter()
            .map(|(_, _, value, _, _)| {
                format!(
                    "{}{}{}",
                    value.name,
                    ".".repeat(value.dots as usize),
                    if value.triplet { "3" } else { "" }
                )
            })
            .collect();
        assert_eq!(names, expect);
    }

    #[rstest(
        pitch,
        prefer_flats,
        expect,
        case(60, false, ("C", 0, 4)),
        case(61, false, ("C", 1, 4)),
        case(61, true, ("D", -1, 4)),
        case(21, false, ("A", 0, 0)),
        case(0, false, ("C", 0, -1)),
        case(127, true, ("G", 0, 9)),
    )]
    fn spell_pitches(pitch: u8, prefer_flats: bool, expect: (&str, i8, i8)) {
        assert_eq!(spell(u7::from(pitch), prefer_flats), expect);
    }
}
