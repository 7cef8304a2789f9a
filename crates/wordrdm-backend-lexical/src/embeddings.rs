//! Word embeddings and the semantic channel.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use log::debug;
use wordrdm_spec::{ChannelKind, PairwiseChannel, RdmError, RdmResult};

/// Word → vector lookup loaded from word2vec/GloVe text format.
#[derive(Debug, Clone, Default)]
pub struct EmbeddingStore {
    vectors: HashMap<String, Vec<f64>>,
    dimension: usize,
}

impl EmbeddingStore {
    /// Parses `word v1 v2 ...` lines. A leading `count dim` line is skipped;
    /// every vector must have the same dimension and the first entry for a
    /// word wins.
    pub fn parse(text: &str) -> RdmResult<Self> {
        let mut store = Self::default();
        for (idx, line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let mut fields = line.split_whitespace();
            let word = match fields.next() {
                Some(word) => word,
                None => continue,
            };
            let values: Vec<&str> = fields.collect();

            if line_no == 1 && values.len() == 1 && is_header(word, values[0]) {
                continue;
            }
            if values.is_empty() {
                return Err(RdmError::Parse {
                    line: line_no,
                    message: format!("no vector for '{}'", word),
                });
            }

            let vector = values
                .iter()
                .map(|v| {
                    v.parse::<f64>().map_err(|_| RdmError::Parse {
                        line: line_no,
                        message: format!("invalid component '{}' for '{}'", v, word),
                    })
                })
                .collect::<RdmResult<Vec<f64>>>()?;

            if store.dimension == 0 {
                store.dimension = vector.len();
            } else if vector.len() != store.dimension {
                return Err(RdmError::Parse {
                    line: line_no,
                    message: format!(
                        "'{}' has {} components, expected {}",
                        word,
                        vector.len(),
                        store.dimension
                    ),
                });
            }
            store.vectors.entry(word.to_string()).or_insert(vector);
        }
        Ok(store)
    }

    /// Loads an embedding file.
    pub fn load(path: &Path) -> RdmResult<Self> {
        let text =
            fs::read_to_string(path).map_err(|e| RdmError::asset_load(path, e.to_string()))?;
        let store = Self::parse(&text).map_err(|e| RdmError::asset_load(path, e.to_string()))?;
        debug!(
            "loaded {} embeddings of dimension {} from {}",
            store.len(),
            store.dimension,
            path.display()
        );
        Ok(store)
    }

    /// Number of words.
    pub fn len(&self) -> usize {
        self.vectors.len()
    }

    /// True when no vectors are loaded.
    pub fn is_empty(&self) -> bool {
        self.vectors.is_empty()
    }

    /// Vector dimension (0 when empty).
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Vector for a word.
    pub fn get(&self, word: &str) -> Option<&[f64]> {
        self.vectors.get(word).map(Vec::as_slice)
    }

    /// Cosine similarity between two words' vectors.
    ///
    /// NaN when either vector has zero norm.
    pub fn similarity(&self, first: &str, second: &str) -> RdmResult<f64> {
        let a = self.lookup(first)?;
        let b = self.lookup(second)?;
        Ok(cosine(a, b))
    }

    fn lookup(&self, word: &str) -> RdmResult<&[f64]> {
        self.get(word).ok_or_else(|| {
            RdmError::lookup_miss(ChannelKind::Semantic.as_str(), word, "embedding store")
        })
    }
}

fn is_header(first: &str, second: &str) -> bool {
    first.parse::<usize>().is_ok() && second.parse::<usize>().is_ok()
}

fn cosine(a: &[f64], b: &[f64]) -> f64 {
    let dot: f64 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a = a.iter().map(|x| x * x).sum::<f64>().sqrt();
    let norm_b = b.iter().map(|x| x * x).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return f64::NAN;
    }
    (dot / (norm_a * norm_b)).clamp(-1.0, 1.0)
}

/// `1 - cosine similarity` of embedding vectors.
#[derive(Debug, Clone, Copy)]
pub struct SemanticChannel<'a> {
    store: &'a EmbeddingStore,
}

impl<'a> SemanticChannel<'a> {
    /// Creates a channel over a loaded store.
    pub fn new(store: &'a EmbeddingStore) -> Self {
        Self { store }
    }
}

impl PairwiseChannel for SemanticChannel<'_> {
    fn kind(&self) -> ChannelKind {
        ChannelKind::Semantic
    }

    fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
        Ok(1.0 - self.store.similarity(first, second)?)
    }
}
