//! Phonetic corpus and phonological edit distance.
//!
//! The corpus maps spelled words to segment transcriptions. Lines are
//! `word<TAB>transcription`; segments are separated by `.` (IPHOD style,
//! e.g. `K.AE1.T`) or by whitespace. An optional feature system assigns each
//! segment a `+`/`-`/`0` value per phonological feature, which turns the
//! edit distance into a feature-weighted one.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use wordrdm_spec::table::DelimitedTable;
use wordrdm_spec::{RdmError, RdmResult};

/// A segmented transcription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transcription(Vec<String>);

impl Transcription {
    /// Splits a transcription string into segments.
    pub fn parse(text: &str) -> Self {
        let text = text.trim();
        let segments: Vec<String> = if text.contains('.') {
            text.split('.')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect()
        } else if text.contains(char::is_whitespace) {
            text.split_whitespace().map(str::to_string).collect()
        } else {
            text.chars().map(|c| c.to_string()).collect()
        };
        Self(segments)
    }

    /// Segments in order.
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True for an empty transcription.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Value of one phonological feature for one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeatureValue {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `0` or blank
    Unspecified,
}

impl FeatureValue {
    fn parse(text: &str) -> Option<Self> {
        match text.trim() {
            "+" => Some(FeatureValue::Plus),
            "-" => Some(FeatureValue::Minus),
            "0" | "" => Some(FeatureValue::Unspecified),
            _ => None,
        }
    }
}

/// Feature specifications per segment symbol.
#[derive(Debug, Clone, Default)]
pub struct FeatureSystem {
    names: Vec<String>,
    segments: HashMap<String, Vec<FeatureValue>>,
}

impl FeatureSystem {
    /// Parses a delimited table with a `symbol` column and one column per feature.
    pub fn parse(text: &str) -> RdmResult<Self> {
        let delimiter = if text.lines().next().is_some_and(|l| l.contains('\t')) {
            '\t'
        } else {
            ','
        };
        let table = DelimitedTable::parse(text, delimiter)?;
        let symbol_col = table
            .header
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case("symbol"))
            .ok_or_else(|| RdmError::Parse {
                line: 1,
                message: "feature table needs a 'symbol' column".to_string(),
            })?;
        let names: Vec<String> = table
            .header
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != symbol_col)
            .map(|(_, h)| h.trim().to_string())
            .collect();

        let mut segments = HashMap::new();
        for (line, row) in &table.rows {
            let symbol = row.get(symbol_col).map(|s| s.trim()).unwrap_or_default();
            if symbol.is_empty() {
                continue;
            }
            let mut values = Vec::with_capacity(names.len());
            for (i, cell) in row.iter().enumerate() {
                if i == symbol_col {
                    continue;
                }
                let value = FeatureValue::parse(cell).ok_or_else(|| RdmError::Parse {
                    line: *line,
                    message: format!("invalid feature value '{}' for '{}'", cell, symbol),
                })?;
                values.push(value);
            }
            if values.len() != names.len() {
                return Err(RdmError::Parse {
                    line: *line,
                    message: format!(
                        "segment '{}' has {} feature values, expected {}",
                        symbol,
                        values.len(),
                        names.len()
                    ),
                });
            }
            segments.insert(symbol.to_string(), values);
        }

        Ok(Self { names, segments })
    }

    /// Feature names in column order.
    pub fn feature_names(&self) -> &[String] {
        &self.names
    }

    /// Feature values for a segment.
    pub fn get(&self, segment: &str) -> Option<&[FeatureValue]> {
        self.segments.get(segment).map(Vec::as_slice)
    }

    fn substitution_cost(&self, a: &str, b: &str) -> f64 {
        match (self.get(a), self.get(b)) {
            (Some(fa), Some(fb)) => fa.iter().zip(fb).filter(|(x, y)| x != y).count() as f64,
            _ => 1.0,
        }
    }

    fn indel_cost(&self, segment: &str) -> f64 {
        match self.get(segment) {
            Some(values) => values
                .iter()
                .filter(|v| **v != FeatureValue::Unspecified)
                .count() as f64,
            None => 1.0,
        }
    }
}

/// Word → transcription lookup with an edit-distance primitive.
#[derive(Debug, Clone, Default)]
pub struct PhoneticCorpus {
    entries: HashMap<String, Transcription>,
    features: Option<FeatureSystem>,
}

impl PhoneticCorpus {
    /// Parses `word<TAB>transcription` lines. `#` starts a comment line; the
    /// first entry for a word wins.
    pub fn parse(text: &str) -> RdmResult<Self> {
        let mut entries = HashMap::new();
        for (idx, line) in text.lines().enumerate() {
            let line = line.trim_end_matches('\r');
            if line.trim().is_empty() || line.trim_start().starts_with('#') {
                continue;
            }
            let (word, transcription) = line.split_once('\t').ok_or_else(|| RdmError::Parse {
                line: idx + 1,
                message: "expected 'word<TAB>transcription'".to_string(),
            })?;
            let transcription = Transcription::parse(transcription);
            if transcription.is_empty() {
                return Err(RdmError::Parse {
                    line: idx + 1,
                    message: format!("empty transcription for '{}'", word.trim()),
                });
            }
            entries
                .entry(word.trim().to_string())
                .or_insert(transcription);
        }
        Ok(Self {
            entries,
            features: None,
        })
    }

    /// Loads a corpus file and, optionally, a feature table.
    pub fn load(path: &Path, features: Option<&Path>) -> RdmResult<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| RdmError::asset_load(path, e.to_string()))?;
        let mut corpus =
            Self::parse(&text).map_err(|e| RdmError::asset_load(path, e.to_string()))?;

        if let Some(features_path) = features {
            let text = fs::read_to_string(features_path)
                .map_err(|e| RdmError::asset_load(features_path, e.to_string()))?;
            let system = FeatureSystem::parse(&text)
                .map_err(|e| RdmError::asset_load(features_path, e.to_string()))?;
            corpus.features = Some(system);
        }

        debug!(
            "loaded phonetic corpus {} ({} entries, features: {})",
            path.display(),
            corpus.len(),
            corpus.features.is_some()
        );
        Ok(corpus)
    }

    /// Attaches a feature system.
    pub fn with_features(mut self, features: FeatureSystem) -> Self {
        self.features = Some(features);
        self
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// True when the corpus holds no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Exact-form membership test.
    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    /// Exact-form lookup.
    pub fn find(&self, word: &str) -> Option<&Transcription> {
        self.entries.get(word)
    }

    /// Edit distance between two transcriptions.
    ///
    /// With a feature system, substituting costs the number of differing
    /// features and inserting/deleting costs the number of specified features.
    /// Without one, every operation costs 1.
    pub fn phono_edit_distance(&self, a: &Transcription, b: &Transcription) -> f64 {
        let sub = |x: &str, y: &str| -> f64 {
            if x == y {
                return 0.0;
            }
            match &self.features {
                Some(features) => features.substitution_cost(x, y),
                None => 1.0,
            }
        };
        let indel = |x: &str| -> f64 {
            match &self.features {
                Some(features) => features.indel_cost(x),
                None => 1.0,
            }
        };

        let a = a.segments();
        let b = b.segments();
        let mut prev: Vec<f64> = Vec::with_capacity(b.len() + 1);
        prev.push(0.0);
        for seg in b {
            let last = prev[prev.len() - 1];
            prev.push(last + indel(seg));
        }
        let mut curr = vec![0.0; b.len() + 1];

        for seg_a in a {
            curr[0] = prev[0] + indel(seg_a);
            for (j, seg_b) in b.iter().enumerate() {
                curr[j + 1] = f64::min(
                    f64::min(prev[j + 1] + indel(seg_a), curr[j] + indel(seg_b)),
                    prev[j] + sub(seg_a, seg_b),
                );
            }
            std::mem::swap(&mut prev, &mut curr);
        }

        prev[b.len()]
    }
}
