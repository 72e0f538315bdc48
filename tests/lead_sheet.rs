use leadsheet::{
    create_lead_sheet,
    leadsheet::QuantizedElement,
    scan_file, DocumentFormat, Harmony, LeadSheetError,
};
use midly::{
    num::{u15, u28, u4, u7},
    Format, Fps, Header, MetaMessage, MidiMessage, Smf, Timing, TrackEvent, TrackEventKind,
};
use std::{fs, path::Path};

fn event(delta: u32, kind: TrackEventKind) -> TrackEvent {
    TrackEvent {
        delta: u28::from(delta),
        kind,
    }
}

fn meta(message: MetaMessage) -> TrackEventKind {
    TrackEventKind::Meta(message)
}

fn note(channel: u8, key: u8, vel: u8) -> TrackEventKind<'static> {
    TrackEventKind::Midi {
        channel: u4::from(channel),
        message: MidiMessage::NoteOn {
            key: u7::from(key),
            vel: u7::from(vel),
        },
    }
}

fn save(path: &Path, timing: Timing, track: Vec<TrackEvent>) {
    let mut smf = Smf::new(Header::new(Format::SingleTrack, timing));
    smf.tracks.push(track);
    smf.save(path).unwrap();
}

/// In 3/4 with one flat: C for a quarter note, then Bb held for three
/// quarters across the barline with a Bb7 entering on its second beat.
fn song() -> Vec<TrackEvent<'static>> {
    vec![
        event(0, meta(MetaMessage::TrackName(b"Test Song"))),
        event(0, meta(MetaMessage::TimeSignature(3, 2, 24, 8))),
        event(0, meta(MetaMessage::KeySignature(-1, false))),
        event(
            0,
            meta(MetaMessage::SequencerSpecific(&[
                0x43, 0x7B, 0x01, 0x31, 0x00, 0x7F, 0x7F,
            ])),
        ),
        event(0, meta(MetaMessage::SequencerSpecific(&[0x43, 0x7B, 0x02, 0x03]))),
        event(0, note(1, 40, 80)),
        event(0, note(0, 60, 90)),
        event(480, note(0, 60, 0)),
        event(0, note(0, 70, 90)),
        event(
            480,
            meta(MetaMessage::SequencerSpecific(&[0x43, 0x7B, 0x01, 0x27, 0x13])),
        ),
        event(960, note(0, 70, 0)),
        event(0, note(1, 40, 0)),
        event(0, meta(MetaMessage::EndOfTrack)),
    ]
}

#[test]
fn writes_musicxml_lead_sheet() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("song.mid");
    let output = dir.path().join("sheets").join("song.musicxml");
    save(&input, Timing::Metrical(u15::from(480)), song());

    let sheet = create_lead_sheet(&input, None, u4::from(0)).unwrap();
    sheet.write(&output, DocumentFormat::MusicXml).unwrap();
    let xml = fs::read_to_string(&output).unwrap();

    assert!(xml.contains("<work-title>Test Song</work-title>"));
    assert!(xml.contains("<beats>3</beats>"));
    assert!(xml.contains("<fifths>-1</fifths>"));
    assert_eq!(xml.matches("<measure ").count(), 2);
    assert_eq!(xml.matches("<harmony>").count(), 2);
    assert!(xml.contains("<root-step>C</root-step>"));
    assert!(xml.contains("<root-step>B</root-step>"));
    assert!(xml.contains("<root-alter>-1</root-alter>"));
    assert!(xml.contains(">dominant</kind>"));
    assert!(xml.contains("<offset>12</offset>"));
    assert_eq!(xml.matches("<pitch>").count(), 3);
    assert!(!xml.contains("<octave>2</octave>"));
    assert!(xml.contains("<alter>-1</alter>"));
    assert_eq!(xml.matches("<tie type=\"start\"/>").count(), 1);
    assert!(xml.contains("dynamics=\"100.00\""));
}

#[test]
fn chords_from_a_separate_file_use_the_melody_timing() {
    let dir = tempfile::tempdir().unwrap();
    let melody = dir.path().join("melody.mid");
    let chords = dir.path().join("chords.mid");
    save(
        &melody,
        Timing::Metrical(u15::from(480)),
        vec![
            event(0, note(0, 60, 100)),
            event(480, note(0, 60, 0)),
            event(0, meta(MetaMessage::EndOfTrack)),
        ],
    );
    save(
        &chords,
        Timing::Metrical(u15::from(960)),
        vec![
            event(
                960,
                meta(MetaMessage::SequencerSpecific(&[0x43, 0x7B, 0x01, 0x35, 0x13])),
            ),
            event(0, meta(MetaMessage::EndOfTrack)),
        ],
    );

    let sheet = create_lead_sheet(&melody, Some(&chords), u4::from(0)).unwrap();
    assert_eq!(sheet.part.divisions, 12);
    let harmonies: Vec<(u64, String)> = sheet
        .part
        .elements
        .iter()
        .filter_map(|element| match element {
            QuantizedElement::Harmony { position, harmony } => {
                Some((*position, harmony.to_string()))
            }
            QuantizedElement::Note { .. } => None,
        })
        .collect();
    assert_eq!(harmonies, vec![(24, "G7".to_string())]);
    assert_eq!(sheet.part.elements.len(), 2);
}

#[test]
fn scan_finds_chords_and_rehearsal_marks() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("song.mid");
    save(&input, Timing::Metrical(u15::from(480)), song());

    let annotations = scan_file(&input).unwrap();
    let chords: Vec<(u64, f64, String)> = annotations
        .chords
        .iter()
        .map(|chord| (chord.tick, chord.offset, chord.harmony.to_string()))
        .collect();
    assert_eq!(
        chords,
        vec![
            (0, 0.0, "C".to_string()),
            (960, 2.0, "Bb7".to_string())
        ]
    );
    assert!(matches!(annotations.chords[0].harmony, Harmony::Chord(_)));
    let marks: Vec<(u64, &str)> = annotations
        .rehearsal_marks
        .iter()
        .map(|mark| (mark.tick, mark.label.as_str()))
        .collect();
    assert_eq!(marks, vec![(0, "A")]);
}

#[test]
fn timecode_timing_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("smpte.mid");
    save(
        &input,
        Timing::Timecode(Fps::Fps25, 40),
        vec![event(0, meta(MetaMessage::EndOfTrack))],
    );
    assert!(matches!(
        create_lead_sheet(&input, None, u4::from(0)),
        Err(LeadSheetError::UnsupportedTiming { .. })
    ));
}

#[test]
fn unwritable_output_leaves_no_file() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("song.mid");
    save(&input, Timing::Metrical(u15::from(480)), song());
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();
    let output = blocker.join("song.musicxml");

    let sheet = create_lead_sheet(&input, None, u4::from(0)).unwrap();
    assert!(matches!(
        sheet.write(&output, DocumentFormat::MusicXml),
        Err(LeadSheetError::DocumentWrite { .. })
    ));
    assert!(!output.exists());
}
