//! Chord-symbol model used to validate and construct chord figures.
//!
//! Figures are expected in normalized form (see [`crate::figure`]): flats are
//! written `-`, double flats `--`.

use std::{
    fmt::{self, Display, Write},
    ops::Range,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Step::C => "C",
            Step::D => "D",
            Step::E => "E",
            Step::F => "F",
            Step::G => "G",
            Step::A => "A",
            Step::B => "B",
        })
    }
}

/// A spelled pitch class: step plus alteration in semitones.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordPitch {
    pub step: Step,
    pub alter: i8,
}

impl Display for ChordPitch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.step)?;
        let accidental = if self.alter < 0 { 'b' } else { '#' };
        for _ in 0..self.alter.unsigned_abs() {
            f.write_char(accidental)?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Triad {
    Major,
    Minor,
    Diminished,
    Augmented,
    Suspended2,
    Suspended4,
    /// Root and fifth only.
    Power,
    /// Explicit interval stacks such as `1+8` or `1+2+5`.
    Intervals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Seventh {
    Major,
    Minor,
    Diminished,
}

/// A chord degree with its alteration, e.g. `#11` is `Degree { value: 11, alter: 1 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Degree {
    pub value: u8,
    pub alter: i8,
}

impl Degree {
    fn new(value: u8, alter: i8) -> Self {
        Self { value, alter }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Major(Option<u8>),
    Minor,
    Diminished,
    Augmented,
    Suspended(u8),
    Add(u8),
    Omit(u8),
    Alter(Degree),
    Extension(u8),
    Tension(u8),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordKind {
    pub triad: Triad,
    pub seventh: Option<Seventh>,
    pub sixth: bool,
    /// Highest stacked tension above the seventh (9, 11 or 13).
    pub extension: Option<u8>,
    pub added: Vec<Degree>,
    pub altered: Vec<Degree>,
    pub omitted: Vec<u8>,
}

impl ChordKind {
    fn triad(triad: Triad) -> Self {
        Self {
            triad,
            seventh: None,
            sixth: false,
            extension: None,
            added: vec![],
            altered: vec![],
            omitted: vec![],
        }
    }

    fn from_intervals(intervals: Vec<u8>) -> Self {
        let mut kind = Self::triad(Triad::Intervals);
        if intervals == [5] {
            kind.triad = Triad::Power;
        } else if intervals == [2, 5] {
            kind.triad = Triad::Suspended2;
        } else {
            kind.added = intervals.into_iter().map(|i| Degree::new(i, 0)).collect();
        }
        kind
    }

    fn from_tokens(tokens: Vec<Token>) -> Result<Self, &'static str> {
        let mut kind = Self::triad(Triad::Major);
        for token in tokens {
            match token {
                Token::Major(None) => {}
                Token::Major(Some(6)) => kind.sixth = true,
                Token::Major(Some(7)) => kind.seventh = Some(Seventh::Major),
                Token::Major(Some(n @ (9 | 11 | 13))) => {
                    kind.seventh = Some(Seventh::Major);
                    kind.extension = Some(n);
                }
                Token::Major(Some(_)) => return Err("major chord degree"),
                Token::Minor => kind.triad = Triad::Minor,
                Token::Diminished => kind.triad = Triad::Diminished,
                Token::Augmented => kind.triad = Triad::Augmented,
                Token::Suspended(2) => kind.triad = Triad::Suspended2,
                Token::Suspended(4) => kind.triad = Triad::Suspended4,
                Token::Suspended(_) => return Err("suspended degree"),
                Token::Add(n) => kind.added.push(Degree::new(n, 0)),
                Token::Omit(n) => kind.omitted.push(n),
                Token::Alter(degree) => kind.altered.push(degree),
                Token::Extension(5) if kind == Self::triad(Triad::Major) => {
                    kind.triad = Triad::Power
                }
                Token::Extension(6) => kind.sixth = true,
                Token::Extension(7) => kind.seventh = Some(kind.default_seventh()),
                Token::Extension(n @ (9 | 11 | 13)) => {
                    if kind.seventh.is_none() {
                        kind.seventh = Some(kind.default_seventh());
                    }
                    kind.extension = Some(n);
                }
                Token::Extension(_) => return Err("chord degree"),
                Token::Tension(n @ (9 | 11 | 13)) if kind.seventh.is_some() => {
                    kind.extension = Some(kind.extension.map_or(n, |e| e.max(n)))
                }
                Token::Tension(n) => kind.added.push(Degree::new(n, 0)),
            }
        }
        Ok(kind)
    }

    fn default_seventh(&self) -> Seventh {
        match self.triad {
            Triad::Diminished => Seventh::Diminished,
            _ => Seventh::Minor,
        }
    }

    fn is_half_diminished(&self) -> bool {
        self.triad == Triad::Minor
            && self.seventh == Some(Seventh::Minor)
            && self.altered.contains(&Degree::new(5, -1))
    }

    /// The MusicXML `kind` value closest to this chord.
    pub fn musicxml_kind(&self) -> &'static str {
        use Seventh as S;
        use Triad as T;
        if self.is_half_diminished() && self.extension.is_none() {
            return "half-diminished";
        }
        match (self.triad, self.seventh, self.extension) {
            (T::Power, None, _) => "power",
            (T::Major, None, _) if self.sixth => "major-sixth",
            (T::Minor, None, _) if self.sixth => "minor-sixth",
            (T::Major, None, _) => "major",
            (T::Minor, None, _) => "minor",
            (T::Augmented, None, _) => "augmented",
            (T::Diminished, None, _) => "diminished",
            (T::Suspended2, None, _) => "suspended-second",
            (T::Suspended4, None, _) => "suspended-fourth",
            (T::Major, Some(S::Minor), None) => "dominant",
            (T::Major, Some(S::Minor), Some(9)) => "dominant-ninth",
            (T::Major, Some(S::Minor), Some(11)) => "dominant-11th",
            (T::Major, Some(S::Minor), Some(_)) => "dominant-13th",
            (T::Major, Some(S::Major), None) => "major-seventh",
            (T::Major, Some(S::Major), Some(9)) => "major-ninth",
            (T::Major, Some(S::Major), Some(11)) => "major-11th",
            (T::Major, Some(S::Major), Some(_)) => "major-13th",
            (T::Minor, Some(S::Minor), None) => "minor-seventh",
            (T::Minor, Some(S::Minor), Some(9)) => "minor-ninth",
            (T::Minor, Some(S::Minor), Some(11)) => "minor-11th",
            (T::Minor, Some(S::Minor), Some(_)) => "minor-13th",
            (T::Minor, Some(S::Major), _) => "major-minor",
            (T::Diminished, Some(S::Diminished), _) => "diminished-seventh",
            (T::Diminished, Some(S::Minor), _) => "half-diminished",
            (T::Augmented, Some(S::Minor), _) => "augmented-seventh",
            _ => "other",
        }
    }
}

/// Parsed pieces of a figure before the kind text is sliced out.
pub struct RawChord {
    root: ChordPitch,
    kind: ChordKind,
    kind_span: Range<usize>,
    bass: Option<ChordPitch>,
}

peg::parser! {
grammar chord_figure() for str {
    rule number() -> u8
        = n:$(['0'..='9']+) {? n.parse().or(Err("number")) }

    rule step() -> Step
        = "C" { Step::C } / "D" { Step::D } / "E" { Step::E } / "F" { Step::F }
        / "G" { Step::G } / "A" { Step::A } / "B" { Step::B }

    rule alter() -> i8
        = "###" { 3 } / "##" { 2 } / "#" { 1 } / "---" { -3 } / "--" { -2 } / "-" { -1 }

    rule pitch() -> ChordPitch
        = step:step() alter:alter()? { ChordPitch { step, alter: alter.unwrap_or(0) } }

    rule alteration() -> Token
        = "#" n:number() { Token::Alter(Degree::new(n, 1)) }
        / "-" n:number() { Token::Alter(Degree::new(n, -1)) }

    rule token() -> Token
        = "maj" n:number()? { Token::Major(n) }
        / "min" { Token::Minor }
        / "dim" { Token::Diminished }
        / "aug" { Token::Augmented }
        / "sus" n:number()? { Token::Suspended(n.unwrap_or(4)) }
        / "add" n:number() { Token::Add(n) }
        / "omit" n:number() { Token::Omit(n) }
        / "M" n:number()? { Token::Major(n) }
        / "m" { Token::Minor }
        / "+" { Token::Augmented }
        / alteration()
        / n:number() { Token::Extension(n) }

    rule grouped() -> Token
        = "maj" n:number() { Token::Major(Some(n)) }
        / "add" n:number() { Token::Add(n) }
        / "omit" n:number() { Token::Omit(n) }
        / alteration()
        / n:number() { Token::Tension(n) }

    rule part() -> Vec<Token>
        = "(" t:(grouped() ++ ",") ")" { t }
        / t:token() { vec![t] }

    rule intervals() -> ChordKind
        = "1" i:("+" n:number() { n })+ { ChordKind::from_intervals(i) }

    rule kind() -> ChordKind
        = intervals()
        / parts:part()* {? ChordKind::from_tokens(parts.into_iter().flatten().collect()) }

    rule bass() -> ChordPitch
        = "/" p:pitch() { p }

    pub rule chord() -> RawChord
        = root:pitch() start:position!() kind:kind() end:position!() bass:bass()? {
            RawChord { root, kind, kind_span: start..end, bass }
        }
}
}

/// A validated chord symbol.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChordSymbol {
    pub root: ChordPitch,
    pub kind: ChordKind,
    pub bass: Option<ChordPitch>,
    /// Quality text as written in the figure, e.g. `m7-5`.
    pub kind_text: String,
}

impl ChordSymbol {
    /// Validates and constructs a chord from a normalized figure.
    /// Anything the grammar doesn't accept is "not a chord".
    pub fn parse(figure: &str) -> Option<Self> {
        let raw = chord_figure::chord(figure).ok()?;
        Some(Self {
            root: raw.root,
            bass: raw.bass.filter(|bass| *bass != raw.root),
            kind_text: figure[raw.kind_span].to_string(),
            kind: raw.kind,
        })
    }

    /// Quality text for display, with flats written as `b`.
    pub fn display_kind(&self) -> String {
        self.kind_text.replace('-', "b")
    }
}

impl Display for ChordSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.root, self.display_kind())?;
        if let Some(bass) = self.bass {
            write!(f, "/{bass}")?;
        }
        Ok(())
    }
}
