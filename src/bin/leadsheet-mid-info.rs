use anyhow::{Context, Result};
use leadsheet::{
    score::{pitch_to_name, read_midi_file, MidiStream},
    xf::{parse_sequencer_specific, XfEvent},
};
use midly::{
    num::u7,
    MetaMessage::SequencerSpecific,
    MidiMessage::NoteOn,
    TrackEventKind::{Meta, Midi},
};
use std::{env, path::PathBuf, process};

#[derive(Default)]
struct ChannelNotes {
    count: usize,
    range: Option<(u7, u7)>,
}

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {:#}", err);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let path = PathBuf::from(
        env::args_os()
            .nth(1)
            .context("usage: leadsheet-mid-info <file.mid>")?,
    );
    let data = read_midi_file(&path)?;
    let stream = MidiStream::parse(&path, &data)?;
    let metadata = stream.metadata();

    println!("ticks per quarter: {}", stream.ticks_per_quarter);
    println!("tracks: {}", stream.track_count);
    println!("title: {}", metadata.title.as_deref().unwrap_or("-"));
    println!(
        "time signature: {}/{}",
        metadata.time_signature.numerator, metadata.time_signature.denominator
    );
    match metadata.key_signature {
        Some(key) => println!(
            "key signature: {} fifths, {}",
            key.fifths,
            if key.minor { "minor" } else { "major" }
        ),
        None => println!("key signature: -"),
    }

    let (mut xf_chords, mut xf_rehearsal_marks, mut xf_other) = (0, 0, 0);
    let mut channels: [ChannelNotes; 16] = Default::default();
    for event in &stream.events {
        match event.kind {
            Meta(SequencerSpecific(data)) => match parse_sequencer_specific(data) {
                Some(XfEvent::Chord(_)) => xf_chords += 1,
                Some(XfEvent::Rehearsal(_)) => xf_rehearsal_marks += 1,
                Some(XfEvent::Other(_)) => xf_other += 1,
                None => {}
            },
            Midi {
                channel,
                message: NoteOn { key, vel },
            } if vel.as_int() > 0 => {
                let notes = &mut channels[channel.as_int() as usize];
                notes.count += 1;
                notes.range = Some(match notes.range {
                    Some((low, high)) => (low.min(key), high.max(key)),
                    None => (key, key),
                });
            }
            _ => {}
        }
    }
    println!(
        "XF events: {} chords, {} rehearsal marks, {} other",
        xf_chords, xf_rehearsal_marks, xf_other
    );

    for (channel, notes) in channels.iter().enumerate() {
        if let Some((low, high)) = notes.range {
            println!(
                "channel {:>2}: {:>5} notes, {}..{}",
                channel + 1,
                notes.count,
                pitch_to_name(low),
                pitch_to_name(high)
            );
        }
    }
    Ok(())
}
