//! Phonological channel: grapheme-to-phoneme consistency.
//!
//! Each word carries a consistency vector (onset, nucleus, coda by default)
//! and the distance is Euclidean.

use std::collections::HashMap;

use log::debug;
use wordrdm_spec::{ChannelKind, DelimitedTable, G2pConfig, PairwiseChannel, RdmError, RdmResult};

/// Word → consistency vector lookup.
#[derive(Debug, Clone, Default)]
pub struct ConsistencyTable {
    columns: Vec<String>,
    vectors: HashMap<String, Vec<f64>>,
}

impl ConsistencyTable {
    /// Builds a table from parsed rows. Empty or `NA` cells load as NaN.
    pub fn from_table(
        table: &DelimitedTable,
        word_column: &str,
        columns: &[String],
    ) -> RdmResult<Self> {
        if columns.is_empty() {
            return Err(RdmError::InvalidConfig(
                "g2p consistency needs at least one column".to_string(),
            ));
        }
        let word_idx = table.column_index(word_column)?;
        let indices = columns
            .iter()
            .map(|c| table.column_index(c))
            .collect::<RdmResult<Vec<usize>>>()?;

        let mut vectors = HashMap::new();
        for (line, row) in &table.rows {
            let word = match row.get(word_idx).map(|w| w.trim()) {
                Some(word) if !word.is_empty() => word,
                _ => continue,
            };
            if vectors.contains_key(word) {
                continue;
            }
            let mut vector = Vec::with_capacity(indices.len());
            for &idx in &indices {
                let cell = row.get(idx).map(|c| c.trim()).unwrap_or("");
                let value = if cell.is_empty() || cell.eq_ignore_ascii_case("na") {
                    f64::NAN
                } else {
                    cell.parse().map_err(|_| RdmError::Parse {
                        line: *line,
                        message: format!("invalid consistency value '{}' for '{}'", cell, word),
                    })?
                };
                vector.push(value);
            }
            vectors.insert(word.to_string(), vector);
        }

        Ok(Self {
            columns: columns.to_vec(),
            vectors,
        })
    }

    /// Loads the configured table.
    pub fn load(config: &G2pConfig) -> RdmResult<Self> {
        let table = DelimitedTable::read(&config.path, config.delimiter)?;
        let loaded = Self::from_table(&table, &config.word_column, &config.columns)
            .map_err(|e| RdmError::asset_load(&config.path, e.to_string()))?;
        debug!(
            "loaded {} consistency vectors ({}) from {}",
            loaded.len(),
            loaded.columns.join(", "),
            config.path.display()
        );
        Ok(loaded)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when empty.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Consistency vector for a word.
    pub fn get(&self, word: &str) -> Option<&[f64]> {
        self.vectors.get(word).map(Vec::as_slice)
    }
}

/// Euclidean distance between consistency vectors.
#[derive(Debug, Clone, Copy)]
pub struct PhonologicalChannel<'a> {
    table: &'a ConsistencyTable,
}

impl<'a> PhonologicalChannel<'a> {
    /// Creates a channel over a loaded table.
    pub fn new(table: &'a ConsistencyTable) -> Self {
        Self { table }
    }

    fn vector(&self, word: &str) -> RdmResult<&'a [f64]> {
        self.table.get(word).ok_or_else(|| {
            RdmError::lookup_miss(
                ChannelKind::Phonological.as_str(),
                word,
                "g2p consistency table",
            )
        })
    }
}

impl PairwiseChannel for PhonologicalChannel<'_> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Phonological
    }

    fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
        let a = self.vector(first)?;
        let b = self.vector(second)?;
        Ok(a
            .iter()
            .zip(b)
            .map(|(x, y)| (x - y) * (x - y))
            .sum::<f64>()
            .sqrt())
    }
}
