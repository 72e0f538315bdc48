//! Lead-sheet document model: a single part of chords and melody notes that
//! is quantized onto a notatable grid and written out as MusicXML.

use crate::{error::LeadSheetError, musicxml, scan::Harmony, score::Metadata};
use midly::num::u7;
use std::{fs, path::Path};
use tracing::debug;

/// Grid used for lead sheets: sixteenths and eighth-note triplets.
pub const DEFAULT_QUARTER_DIVISORS: [u32; 2] = [4, 3];

#[derive(Clone, Debug, PartialEq)]
pub enum Element {
    Harmony(Harmony),
    Note { pitch: u7, velocity: u7, duration: f64 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct PartElement {
    pub offset: f64,
    pub element: Element,
}

/// Elements at quarter-note offsets, not yet quantized.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Part {
    elements: Vec<PartElement>,
}

impl Part {
    /// Inserts after any elements already at the same offset.
    pub fn insert(&mut self, offset: f64, element: Element) {
        let index = self.elements.partition_point(|e| e.offset <= offset);
        self.elements.insert(index, PartElement { offset, element });
    }

    pub fn elements(&self) -> &[PartElement] {
        &self.elements
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Snaps offsets and durations to the nearest multiple of `1/d` quarter
    /// for the divisor `d` giving the smallest error. Notes whose duration
    /// snaps to zero are dropped.
    pub fn quantize(&self, divisors: &[u32]) -> QuantizedPart {
        let quantizer = Quantizer::new(divisors);
        let mut elements: Vec<QuantizedElement> = self
            .elements
            .iter()
            .filter_map(|PartElement { offset, element }| {
                let position = quantizer.snap(*offset);
                match element {
                    Element::Harmony(harmony) => Some(QuantizedElement::Harmony {
                        position,
                        harmony: harmony.clone(),
                    }),
                    Element::Note {
                        pitch,
                        velocity,
                        duration,
                    } => match quantizer.snap(*duration) {
                        0 => {
                            debug!("note at {:.3} too short to notate, dropped", offset);
                            None
                        }
                        duration => Some(QuantizedElement::Note {
                            position,
                            duration,
                            pitch: *pitch,
                            velocity: *velocity,
                        }),
                    },
                }
            })
            .collect();
        elements.sort_by_key(|element| (element.position(), element.rank()));
        QuantizedPart {
            divisions: quantizer.divisions,
            elements,
        }
    }
}

struct Quantizer {
    divisors: Vec<u32>,
    /// Least common multiple of the divisors.
    divisions: u32,
}

impl Quantizer {
    fn new(divisors: &[u32]) -> Self {
        let mut divisors: Vec<u32> = divisors.iter().copied().filter(|&d| d > 0).collect();
        if divisors.is_empty() {
            divisors.push(1);
        }
        let divisions = divisors.iter().fold(1, |acc, &d| lcm(acc, d));
        Self {
            divisors,
            divisions,
        }
    }

    /// Quarter notes to the nearest grid point, in divisions.
    fn snap(&self, quarters: f64) -> u64 {
        let quarters = quarters.max(0.0);
        self.divisors
            .iter()
            .map(|&divisor| {
                let steps = (quarters * f64::from(divisor)).round();
                let error = (quarters - steps / f64::from(divisor)).abs();
                (error, steps as u64 * u64::from(self.divisions / divisor))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map_or(0, |(_, position)| position)
    }
}

fn gcd(a: u32, b: u32) -> u32 {
    if b == 0 {
        a
    } else {
        gcd(b, a % b)
    }
}

fn lcm(a: u32, b: u32) -> u32 {
    a / gcd(a, b) * b
}

/// An element on the grid. Positions and durations count divisions.
#[derive(Clone, Debug, PartialEq)]
pub enum QuantizedElement {
    Harmony {
        position: u64,
        harmony: Harmony,
    },
    Note {
        position: u64,
        duration: u64,
        pitch: u7,
        velocity: u7,
    },
}

impl QuantizedElement {
    pub fn position(&self) -> u64 {
        match self {
            QuantizedElement::Harmony { position, .. } | QuantizedElement::Note { position, .. } => {
                *position
            }
        }
    }

    fn rank(&self) -> u8 {
        match self {
            QuantizedElement::Harmony { .. } => 0,
            QuantizedElement::Note { .. } => 1,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct QuantizedPart {
    /// Divisions per quarter note.
    pub divisions: u32,
    pub elements: Vec<QuantizedElement>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFormat {
    MusicXml,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LeadSheet {
    pub metadata: Metadata,
    pub part: QuantizedPart,
}

impl LeadSheet {
    pub fn new(metadata: Metadata, part: QuantizedPart) -> Self {
        Self { metadata, part }
    }

    pub fn render(&self, format: DocumentFormat) -> String {
        match format {
            DocumentFormat::MusicXml => musicxml::to_musicxml(self),
        }
    }

    /// Renders the whole document before creating the file, so a failure
    /// never leaves a partial file behind.
    pub fn write(&self, path: &Path, format: DocumentFormat) -> Result<(), LeadSheetError> {
        let document = self.render(format);
        let write_error = |source| LeadSheetError::DocumentWrite {
            path: path.to_path_buf(),
            source,
        };
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(write_error)?;
        }
        fs::write(path, document).map_err(write_error)
    }
}
