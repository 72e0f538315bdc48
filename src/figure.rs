//! Chord figures as text: normalization for the chord-symbol model and the
//! heuristic search for chord names inside free text.

use crate::{chord_symbol::ChordSymbol, xf::NO_CHORD};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use tracing::debug;

/// The root at the start of a figure or the bass after `/`, with accidentals.
static NOTE_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(^|/)([A-G](?:bb|##|b|#)?)").expect("invalid note token pattern")
});

/// Something that looks like a chord name somewhere in a text event.
static CHORD_TEXT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"[^A-G]*([A-G][b#]?(?:maj|min|m|M|dim|aug|sus|add|[-_])?[0-9]*(?:\(.*\))?(?:/[A-G][b#]?)?)\b",
    )
    .expect("invalid chord text pattern")
});

const QUALITY_SPELLINGS: [(&str, &str); 3] = [
    ("add9", "add2"),
    ("m7(11)", "m11"),
    ("m(maj7,9)", "m(maj9)"),
];

fn simplify_enharmonic(note: &str) -> &str {
    match note {
        "E#" => "F",
        "B#" => "C",
        "Fb" => "E",
        "Cb" => "B",
        "Dbb" => "C",
        "Ebb" => "D",
        "Gbb" => "F",
        "Abb" => "G",
        "Bbb" => "A",
        other => other,
    }
}

/// Rewrites a figure into the spelling [`ChordSymbol::parse`] accepts.
///
/// Enharmonic simplification of the root and bass runs first, then the
/// alternate quality spellings, and flats become `-` last so that `b` inside
/// note tokens is still recognizable in the earlier steps.
pub fn normalize_figure(figure: &str) -> String {
    if figure.is_empty() || figure == NO_CHORD {
        return figure.to_string();
    }
    let mut figure = NOTE_TOKEN
        .replace_all(figure, |caps: &Captures| {
            format!("{}{}", &caps[1], simplify_enharmonic(&caps[2]))
        })
        .into_owned();
    for (from, to) in QUALITY_SPELLINGS {
        figure = figure.replace(from, to);
    }
    figure.replace("bb", "--").replace('b', "-")
}

/// Searches free text for the first chord name the chord-symbol model accepts.
///
/// Returns the matched text as written together with the constructed chord.
/// Candidates that fail validation are skipped and the search goes on.
pub fn find_chord_in_text(text: &str) -> Option<(String, ChordSymbol)> {
    CHORD_TEXT
        .captures_iter(text.trim())
        .filter_map(|caps| caps.get(1))
        .find_map(|candidate| {
            let candidate = candidate.as_str();
            match ChordSymbol::parse(&normalize_figure(candidate)) {
                Some(chord) => Some((candidate.to_string(), chord)),
                None => {
                    debug!("text '{}' looked like a chord but isn't one", candidate);
                    None
                }
            }
        })
}
