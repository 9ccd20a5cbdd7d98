//! The tab-delimited text format.
//!
//! Each data line carries up to six tab-separated fields:
//!
//! ```text
//! name <TAB> count <TAB> Emean = <value> <unit> <TAB> (<lo> <unit> --> <hi> <unit>) <TAB> stable <TAB> decay time
//! ```
//!
//! A line with a single field is a blank/sentinel line and yields no record.
//! Lines with two to five fields yield a partial record holding only the
//! name and count. The first two lines of a document are headers.

use std::fmt;

use dmerge_types::{mean, Energy, EnergyRange, EnergyUnit};
use tracing::debug;

use crate::error::{MergeError, MergeResult, RecordError, RecordResult};
use crate::merge::{ensure_same_name, sum_counts, MergeContext};
use crate::record::{ParseOptions, ParticleRecord, SourceFormat};

/// Number of fields on a fully populated line.
const FULL_FIELD_COUNT: usize = 6;

/// A particle record read from the text format.
#[derive(Clone, Debug, PartialEq)]
pub struct TextRecord {
    pub name: String,
    pub count: u64,
    /// `None` for partial lines that only carry a name and a count.
    pub detail: Option<TextDetail>,
}

/// The measurement fields of a fully populated text line.
#[derive(Clone, Debug, PartialEq)]
pub struct TextDetail {
    pub mean_energy: Energy,
    pub decay_range: DecayRange,
    /// Stability marker, passed through verbatim.
    pub stable: String,
    /// Decay time, passed through verbatim.
    pub decay_time: String,
}

/// The decay-energy range column.
///
/// Text that does not read as `(lo --> hi)` is kept verbatim so it renders
/// back unchanged.
#[derive(Clone, Debug, PartialEq)]
pub enum DecayRange {
    Bounds(EnergyRange),
    Opaque(String),
}

impl DecayRange {
    pub fn parse(text: &str) -> Self {
        match EnergyRange::parse(text) {
            Ok(range) => Self::Bounds(range),
            Err(_) => Self::Opaque(text.to_string()),
        }
    }

    /// Union of two range columns.
    ///
    /// Parsed bounds always survive an opaque column, whichever side they
    /// are on. Two opaque columns keep `self`.
    pub fn union(&self, other: &Self) -> Self {
        match (self, other) {
            (Self::Bounds(a), Self::Bounds(b)) => Self::Bounds(a.union(b)),
            (Self::Bounds(_), Self::Opaque(_)) => self.clone(),
            (Self::Opaque(_), Self::Bounds(_)) => other.clone(),
            (Self::Opaque(_), Self::Opaque(_)) => self.clone(),
        }
    }
}

impl fmt::Display for DecayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bounds(range) => write!(f, "{range}"),
            Self::Opaque(text) => f.write_str(text),
        }
    }
}

impl TextRecord {
    /// Parse a single line. Returns `Ok(None)` for sentinel lines.
    pub fn parse_line(line: &str) -> RecordResult<Option<Self>> {
        let line = line.trim_end_matches(['\r', '\n']);
        let fields: Vec<&str> = line.split('\t').collect();
        if fields.len() == 1 {
            return Ok(None);
        }

        let name = fields[0].to_string();
        let count = fields[1]
            .trim()
            .parse::<u64>()
            .map_err(|_| RecordError::Malformed(format!("invalid count {:?}", fields[1])))?;

        if fields.len() < FULL_FIELD_COUNT {
            return Ok(Some(Self { name, count, detail: None }));
        }

        let detail = TextDetail {
            mean_energy: parse_mean_field(fields[2])?,
            decay_range: DecayRange::parse(fields[3]),
            stable: fields[4].to_string(),
            decay_time: fields[5].to_string(),
        };
        Ok(Some(Self { name, count, detail: Some(detail) }))
    }

    /// The line this record renders to, without a terminator.
    pub fn to_line(&self) -> String {
        match &self.detail {
            Some(detail) => format!(
                "{}\t{}\tEmean = {}\t{}\t{}\t{}",
                self.name,
                self.count,
                detail.mean_energy,
                detail.decay_range,
                detail.stable,
                detail.decay_time,
            ),
            None => format!("{}\t{}", self.name, self.count),
        }
    }
}

/// Read `Emean = <value> <unit>`.
///
/// The value is the first whitespace-separated token after the first `=`
/// and the unit is the last one, so any amount of spacing is accepted.
fn parse_mean_field(field: &str) -> RecordResult<Energy> {
    let rhs = field
        .split('=')
        .nth(1)
        .ok_or_else(|| RecordError::Malformed(format!("mean energy field lacks '=': {field:?}")))?;
    let tokens: Vec<&str> = rhs.split_whitespace().collect();
    let (Some(value), Some(unit)) = (tokens.first(), tokens.last()) else {
        return Err(RecordError::Malformed(format!("empty mean energy field: {field:?}")));
    };
    let magnitude = value
        .parse::<f64>()
        .map_err(|_| RecordError::Malformed(format!("invalid mean energy value {value:?}")))?;
    let unit = unit.parse::<EnergyUnit>()?;
    Ok(Energy::new(magnitude, unit))
}

impl ParticleRecord for TextRecord {
    const FORMAT: SourceFormat = SourceFormat::Text;

    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn parse_document(content: &str, options: &ParseOptions) -> RecordResult<Vec<Self>> {
        let mut records = Vec::new();
        for (idx, line) in content.lines().enumerate().skip(options.header_lines) {
            let parsed = Self::parse_line(line).map_err(|e| RecordError::AtLine {
                line: idx + 1,
                source: Box::new(e),
            })?;
            if let Some(record) = parsed {
                records.push(record);
            }
        }
        debug!(records = records.len(), "parsed text document");
        Ok(records)
    }

    fn render(&self) -> RecordResult<String> {
        let mut line = self.to_line();
        line.push('\n');
        Ok(line)
    }

    fn merge(&self, other: &Self, ctx: &MergeContext) -> MergeResult<Self> {
        ensure_same_name(&self.name, &other.name)?;
        let count = sum_counts(&self.name, self.count, other.count)?;

        let detail = match (&self.detail, &other.detail) {
            (Some(a), Some(b)) => Some(TextDetail {
                mean_energy: mean(a.mean_energy, b.mean_energy, ctx.mean_mode),
                decay_range: a.decay_range.union(&b.decay_range),
                stable: a.stable.clone(),
                decay_time: a.decay_time.clone(),
            }),
            (None, None) => None,
            _ => {
                return Err(MergeError::MissingMeanEnergy {
                    name: self.name.clone(),
                })
            }
        };

        Ok(Self {
            name: self.name.clone(),
            count,
            detail,
        })
    }
}
