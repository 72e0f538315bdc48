use anyhow::{bail, Context, Result};
use midly::num::u4;
use std::path::PathBuf;
use structopt::StructOpt;

#[derive(StructOpt, Debug)]
#[structopt(
    name = "leadsheet",
    about = "Builds a MusicXML lead sheet from the chords and melody of a MIDI file"
)]
pub struct Cli {
    /// MIDI file with the melody, and the chords unless --chords is given
    #[structopt(short = "i", long = "input", parse(from_os_str))]
    pub input: Option<PathBuf>,
    /// MusicXML file to write
    #[structopt(short = "o", long = "output", parse(from_os_str))]
    pub output: Option<PathBuf>,
    /// Separate MIDI file to read chords and rehearsal marks from
    #[structopt(long = "chords", parse(from_os_str))]
    pub chords: Option<PathBuf>,
    /// Melody channel, 1 to 16
    #[structopt(
        short = "c",
        long = "channel",
        default_value = "1",
        parse(try_from_str = parse_channel)
    )]
    pub channel: u4,
    /// Print the chords found in a MIDI file
    #[structopt(long = "check-chords", parse(from_os_str))]
    pub check_chords: Option<PathBuf>,
    /// Print the rehearsal marks found in a MIDI file
    #[structopt(long = "check-rehe", parse(from_os_str))]
    pub check_rehe: Option<PathBuf>,
    /// More logging, repeat for even more
    #[structopt(short = "v", long = "verbose", parse(from_occurrences))]
    pub verbose: u8,
}

/// One-based channel number to midly's zero-based channel.
fn parse_channel(src: &str) -> Result<u4> {
    let channel: u8 = src
        .parse()
        .with_context(|| format!("invalid channel {:?}", src))?;
    if !(1..=16).contains(&channel) {
        bail!("channel must be between 1 and 16, got {}", channel);
    }
    Ok(u4::from(channel - 1))
}

#[derive(Debug, PartialEq)]
pub enum Mode {
    Generate {
        input: PathBuf,
        output: PathBuf,
        chords: Option<PathBuf>,
        channel: u4,
    },
    CheckChords(PathBuf),
    CheckRehearsal(PathBuf),
}

impl Cli {
    /// What to do, or `None` when nothing was asked for.
    pub fn mode(&self) -> Result<Option<Mode>> {
        if let Some(path) = &self.check_chords {
            return Ok(Some(Mode::CheckChords(path.clone())));
        }
        if let Some(path) = &self.check_rehe {
            return Ok(Some(Mode::CheckRehearsal(path.clone())));
        }
        match (&self.input, &self.output) {
            (Some(input), Some(output)) => Ok(Some(Mode::Generate {
                input: input.clone(),
                output: output.clone(),
                chords: self.chords.clone(),
                channel: self.channel,
            })),
            (Some(_), None) => bail!("-o/--output is required with -i/--input"),
            (None, Some(_)) => bail!("-i/--input is required with -o/--output"),
            (None, None) => Ok(None),
        }
    }

    pub fn is_check(&self) -> bool {
        self.check_chords.is_some() || self.check_rehe.is_some()
    }
}
