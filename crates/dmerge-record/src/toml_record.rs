//! The TOML format: one table per particle, keyed by name.
//!
//! ```toml
//! [pion]
//! count = 100
//! stable = false
//! half_life = 2.6e-8
//! human_readable_half_life = "26 ns"
//! ```
//!
//! `human_readable_half_life` is required exactly when `stable` is false.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{MergeResult, RecordError, RecordResult};
use crate::merge::{ensure_same_name, sum_counts, MergeContext};
use crate::record::{ParseOptions, ParticleRecord, SourceFormat};

const HUMAN_READABLE_HALF_LIFE: &str = "human_readable_half_life";

/// A particle record read from a TOML table.
#[derive(Clone, Debug, PartialEq)]
pub struct TomlRecord {
    pub name: String,
    pub count: u64,
    pub stable: bool,
    /// Any TOML value; carried through without interpretation.
    pub half_life: toml::Value,
    /// Present only on unstable particles.
    pub human_readable_half_life: Option<String>,
}

#[derive(Deserialize)]
struct RawEntry {
    count: u64,
    stable: bool,
    half_life: toml::Value,
    human_readable_half_life: Option<String>,
}

#[derive(Serialize)]
struct RenderedEntry<'a> {
    count: u64,
    stable: bool,
    half_life: &'a toml::Value,
    #[serde(skip_serializing_if = "Option::is_none")]
    human_readable_half_life: Option<&'a str>,
}

impl TomlRecord {
    /// Build a record from one table of a document.
    pub fn from_table(name: &str, value: toml::Value) -> RecordResult<Self> {
        if !value.is_table() {
            return Err(RecordError::NotATable { name: name.to_string() });
        }
        let raw = value.try_into::<RawEntry>()?;
        let human_readable_half_life = if raw.stable {
            None
        } else {
            Some(raw.human_readable_half_life.ok_or_else(|| RecordError::MissingField {
                name: name.to_string(),
                field: HUMAN_READABLE_HALF_LIFE,
            })?)
        };
        Ok(Self {
            name: name.to_string(),
            count: raw.count,
            stable: raw.stable,
            half_life: raw.half_life,
            human_readable_half_life,
        })
    }
}

impl ParticleRecord for TomlRecord {
    const FORMAT: SourceFormat = SourceFormat::Toml;

    fn name(&self) -> &str {
        &self.name
    }

    fn count(&self) -> u64 {
        self.count
    }

    fn parse_document(content: &str, _options: &ParseOptions) -> RecordResult<Vec<Self>> {
        let doc: toml::Table = content.parse()?;
        let records = doc
            .into_iter()
            .map(|(name, value)| Self::from_table(&name, value))
            .collect::<RecordResult<Vec<_>>>()?;
        debug!(records = records.len(), "parsed TOML document");
        Ok(records)
    }

    fn render(&self) -> RecordResult<String> {
        let entry = RenderedEntry {
            count: self.count,
            stable: self.stable,
            half_life: &self.half_life,
            human_readable_half_life: if self.stable {
                None
            } else {
                self.human_readable_half_life.as_deref()
            },
        };
        let mut table = BTreeMap::new();
        table.insert(self.name.as_str(), entry);
        let mut out = toml::to_string(&table)?;
        out.push('\n');
        Ok(out)
    }

    fn merge(&self, other: &Self, _ctx: &MergeContext) -> MergeResult<Self> {
        ensure_same_name(&self.name, &other.name)?;
        Ok(Self {
            count: sum_counts(&self.name, self.count, other.count)?,
            ..self.clone()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MergeError;
    use crate::record::render_document;

    const DOC: &str = r#"
[pion]
count = 100
stable = false
half_life = 2.6e-8
human_readable_half_life = "26 ns"

[proton]
count = 7
stable = true
half_life = "inf"
"#;

    fn parse(doc: &str) -> Vec<TomlRecord> {
        TomlRecord::parse_document(doc, &ParseOptions::default()).unwrap()
    }

    #[test]
    fn parse_in_document_order() {
        let records = parse(DOC);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].name, "pion");
        assert_eq!(records[0].count, 100);
        assert!(!records[0].stable);
        assert_eq!(records[0].half_life, toml::Value::Float(2.6e-8));
        assert_eq!(records[0].human_readable_half_life.as_deref(), Some("26 ns"));
        assert_eq!(records[1].name, "proton");
        assert!(records[1].human_readable_half_life.is_none());
    }

    #[test]
    fn order_is_not_alphabetical() {
        let records = parse("[zeta]\ncount = 1\nstable = true\nhalf_life = 0\n[alpha]\ncount = 2\nstable = true\nhalf_life = 0\n");
        assert_eq!(records[0].name, "zeta");
        assert_eq!(records[1].name, "alpha");
    }

    #[test]
    fn unstable_without_human_readable_fails() {
        let err = TomlRecord::parse_document(
            "[pion]\ncount = 1\nstable = false\nhalf_life = 1.0\n",
            &ParseOptions::default(),
        )
        .unwrap_err();
        assert!(matches!(
            err,
            RecordError::MissingField { field: HUMAN_READABLE_HALF_LIFE, .. }
        ));
    }

    #[test]
    fn stable_drops_human_readable() {
        let records = parse("[p]\ncount = 1\nstable = true\nhalf_life = 1\nhuman_readable_half_life = \"x\"\n");
        assert!(records[0].human_readable_half_life.is_none());
    }

    #[test]
    fn missing_count_fails() {
        let err = TomlRecord::parse_document("[p]\nstable = true\nhalf_life = 1\n", &ParseOptions::default())
            .unwrap_err();
        assert!(matches!(err, RecordError::TomlDecode(_)));
    }

    #[test]
    fn top_level_scalar_fails() {
        let err = TomlRecord::parse_document("title = \"run\"\n", &ParseOptions::default()).unwrap_err();
        assert!(matches!(err, RecordError::NotATable { .. }));
    }

    #[test]
    fn render_is_valid_toml() {
        let records = parse(DOC);
        let rendered = records[0].render().unwrap();
        assert!(rendered.starts_with("[pion]\n"));
        assert!(rendered.contains("count = 100\n"));
        assert!(rendered.contains("stable = false\n"));
        assert!(rendered.contains("human_readable_half_life = \"26 ns\"\n"));
        assert!(rendered.ends_with("\n\n"));
    }

    #[test]
    fn round_trip() {
        let once = parse(DOC);
        let twice = parse(&render_document(&once).unwrap());
        assert_eq!(once, twice);
    }

    #[test]
    fn round_trip_quoted_name() {
        let once = parse("[\"K+\"]\ncount = 3\nstable = false\nhalf_life = 1.2e-8\nhuman_readable_half_life = \"12 ns\"\n");
        let twice = parse(&render_document(&once).unwrap());
        assert_eq!(once, twice);
        assert_eq!(twice[0].name, "K+");
    }

    #[test]
    fn merge_sums_counts_first_wins() {
        let a = parse(DOC).remove(0);
        let mut b = a.clone();
        b.count = 150;
        b.half_life = toml::Value::Float(1.0);
        b.human_readable_half_life = Some("1 s".into());
        let merged = a.merge(&b, &MergeContext::default()).unwrap();
        assert_eq!(merged.count, 250);
        assert_eq!(merged.half_life, a.half_life);
        assert_eq!(merged.human_readable_half_life, a.human_readable_half_life);
        assert_eq!(b.merge(&a, &MergeContext::default()).unwrap().count, 250);
    }

    #[test]
    fn merge_name_mismatch_fails() {
        let records = parse(DOC);
        let err = records[0].merge(&records[1], &MergeContext::default()).unwrap_err();
        assert!(matches!(err, MergeError::NameMismatch { .. }));
    }
}
