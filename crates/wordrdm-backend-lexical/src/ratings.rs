//! Rating-table channels: concreteness, imageability, morphology, and
//! syntactic category.
//!
//! Each is the absolute difference of a per-word numeric rating. Missing
//! ratings (`NA` or an empty cell) load as NaN and produce missing cells.

use std::collections::HashMap;
use std::path::Path;

use log::{debug, warn};
use wordrdm_spec::{
    ChannelKind, DelimitedTable, PairwiseChannel, RatingTableConfig, RdmError, RdmResult,
};

/// Word → rating lookup.
#[derive(Debug, Clone, Default)]
pub struct RatingTable {
    name: String,
    ratings: HashMap<String, f64>,
}

impl RatingTable {
    /// Builds a table from a parsed delimited file.
    pub fn from_table(
        name: impl Into<String>,
        table: &DelimitedTable,
        word_column: &str,
        rating_column: &str,
    ) -> RdmResult<Self> {
        let word_idx = table.column_index(word_column)?;
        let rating_idx = table.column_index(rating_column)?;
        let name = name.into();

        let mut ratings = HashMap::new();
        for (line, row) in &table.rows {
            let word = match row.get(word_idx).map(|w| w.trim()) {
                Some(word) if !word.is_empty() => word,
                _ => continue,
            };
            let cell = row.get(rating_idx).map(String::as_str).unwrap_or("");
            let rating = parse_rating(cell).ok_or_else(|| RdmError::Parse {
                line: *line,
                message: format!("invalid rating '{}' for '{}'", cell.trim(), word),
            })?;
            if ratings.contains_key(word) {
                debug!("{}: duplicate row for '{}' ignored", name, word);
                continue;
            }
            ratings.insert(word.to_string(), rating);
        }

        Ok(Self { name, ratings })
    }

    /// Parses delimited text.
    pub fn parse(
        name: impl Into<String>,
        text: &str,
        delimiter: char,
        word_column: &str,
        rating_column: &str,
    ) -> RdmResult<Self> {
        let table = DelimitedTable::parse(text, delimiter)?;
        Self::from_table(name, &table, word_column, rating_column)
    }

    /// Loads the rating table configured for a channel.
    pub fn load(config: &RatingTableConfig, kind: ChannelKind) -> RdmResult<Self> {
        let (word_column, rating_column) = config.columns_for(kind);
        let table = DelimitedTable::read(&config.path, config.delimiter)?;
        let loaded = Self::from_table(kind.as_str(), &table, &word_column, &rating_column)
            .map_err(|e| RdmError::asset_load(&config.path, e.to_string()))?;
        log_loaded(&loaded, &config.path);
        Ok(loaded)
    }

    /// Name used in lookup errors.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of rated words.
    pub fn len(&self) -> usize {
        self.ratings.len()
    }

    /// True when the table is empty.
    pub fn is_empty(&self) -> bool {
        self.ratings.is_empty()
    }

    /// Rating for a word; NaN when the row exists but has no rating.
    pub fn get(&self, word: &str) -> Option<f64> {
        self.ratings.get(word).copied()
    }
}

fn log_loaded(table: &RatingTable, path: &Path) {
    let missing = table.ratings.values().filter(|r| r.is_nan()).count();
    if missing > 0 {
        warn!(
            "{}: {} of {} rows in {} have no rating",
            table.name,
            missing,
            table.len(),
            path.display()
        );
    }
    debug!("{}: loaded {} ratings", table.name, table.len());
}

fn parse_rating(cell: &str) -> Option<f64> {
    let cell = cell.trim();
    if cell.is_empty() || cell.eq_ignore_ascii_case("na") || cell.eq_ignore_ascii_case("nan") {
        return Some(f64::NAN);
    }
    cell.parse().ok()
}

/// Absolute rating difference.
#[derive(Debug, Clone, Copy)]
pub struct RatingChannel<'a> {
    kind: ChannelKind,
    table: &'a RatingTable,
}

impl<'a> RatingChannel<'a> {
    /// Creates a rating channel of the given kind.
    pub fn new(kind: ChannelKind, table: &'a RatingTable) -> Self {
        Self { kind, table }
    }

    fn rating(&self, word: &str) -> RdmResult<f64> {
        self.table.get(word).ok_or_else(|| {
            RdmError::lookup_miss(
                self.kind.as_str(),
                word,
                format!("{} ratings", self.table.name()),
            )
        })
    }
}

impl PairwiseChannel for RatingChannel<'_> {
    fn kind(&self) -> ChannelKind {
        self.kind
    }

    fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
        Ok((self.rating(first)? - self.rating(second)?).abs())
    }
}
