use anyhow::{Context, Result};
use leadsheet::{
    cmdline::{Cli, Mode},
    create_lead_sheet, scan_file,
    DocumentFormat,
};
use std::process;
use structopt::StructOpt;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() {
    let args = Cli::from_args();
    init_logging(&args);
    match run(&args) {
        Ok(true) => {}
        Ok(false) => {
            let _ = Cli::clap().print_help();
            println!();
            process::exit(1);
        }
        Err(err) => {
            eprintln!("Error: {:#}", err);
            process::exit(1);
        }
    }
}

fn init_logging(args: &Cli) {
    let default_level = match (args.verbose, args.is_check()) {
        (0, false) => "warn",
        (1, false) => "info",
        (0 | 1, true) | (2, _) => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("leadsheet={}", default_level)));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// `Ok(false)` when there was nothing to do.
fn run(args: &Cli) -> Result<bool> {
    let mode = match args.mode()? {
        Some(mode) => mode,
        None => return Ok(false),
    };
    match mode {
        Mode::Generate {
            input,
            output,
            chords,
            channel,
        } => {
            let sheet = create_lead_sheet(&input, chords.as_deref(), channel)
                .with_context(|| format!("can't create a lead sheet from {}", input.display()))?;
            sheet.write(&output, DocumentFormat::MusicXml)?;
            info!("lead sheet written to {}", output.display());
        }
        Mode::CheckChords(path) => {
            let annotations = scan_file(&path)?;
            for chord in &annotations.chords {
                println!(
                    "{:>8} {:>9.3} {:>4} {}",
                    chord.tick,
                    chord.offset,
                    chord.source.to_string(),
                    chord.harmony
                );
            }
            println!("{} chords", annotations.chords.len());
        }
        Mode::CheckRehearsal(path) => {
            let annotations = scan_file(&path)?;
            for mark in &annotations.rehearsal_marks {
                println!("{:>8} {}", mark.tick, mark.label);
            }
            println!("{} rehearsal marks", annotations.rehearsal_marks.len());
        }
    }
    Ok(true)
}

