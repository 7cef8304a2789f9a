//! Word-set normalization.
//!
//! A [`WordSet`] is the row/column labeling of every matrix. Words are sorted
//! case-insensitively (ties broken by byte order) so that the same list always
//! produces the same layout regardless of input order. Duplicates are kept:
//! deduplication is the caller's responsibility.

use std::fs;
use std::path::Path;

use crate::error::{RdmError, RdmResult};
use crate::pairs::Pairs;

/// A normalized, non-empty, sorted sequence of words.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordSet {
    words: Vec<String>,
}

impl WordSet {
    /// Normalizes an arbitrary sequence of words.
    ///
    /// # Errors
    /// Returns [`RdmError::EmptyWordList`] when no words are given.
    pub fn new<I, S>(words: I) -> RdmResult<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut words: Vec<String> = words.into_iter().map(Into::into).collect();
        if words.is_empty() {
            return Err(RdmError::EmptyWordList);
        }
        words.sort_by(|a, b| {
            a.to_lowercase()
                .cmp(&b.to_lowercase())
                .then_with(|| a.cmp(b))
        });
        Ok(Self { words })
    }

    /// Parses one word per line, trimming whitespace and dropping blank lines.
    pub fn parse_lines(text: &str) -> Vec<String> {
        text.lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Reads and concatenates one or more word-list files.
    pub fn from_files<P: AsRef<Path>>(paths: &[P]) -> RdmResult<Self> {
        let mut words = Vec::new();
        for path in paths {
            let path = path.as_ref();
            let text = fs::read_to_string(path)
                .map_err(|e| RdmError::asset_load(path, e.to_string()))?;
            words.extend(Self::parse_lines(&text));
        }
        Self::new(words)
    }

    /// Returns a new set with every occurrence of the given words removed,
    /// matching ASCII case-insensitively.
    ///
    /// # Errors
    /// Returns [`RdmError::EmptyWordList`] if nothing remains.
    pub fn without(&self, excluded: &[&str]) -> RdmResult<Self> {
        let remaining: Vec<String> = self
            .words
            .iter()
            .filter(|w| !excluded.iter().any(|x| x.eq_ignore_ascii_case(w)))
            .cloned()
            .collect();
        Self::new(remaining)
    }

    /// Number of words (N).
    pub fn len(&self) -> usize {
        self.words.len()
    }

    /// Always false; a `WordSet` cannot be constructed empty.
    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// Word at a position.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.words.get(index).map(String::as_str)
    }

    /// Words in normalized order.
    pub fn as_slice(&self) -> &[String] {
        &self.words
    }

    /// Iterates words in normalized order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.words.iter().map(String::as_str)
    }

    /// All ordered pairs of distinct positions.
    pub fn pairs(&self) -> Pairs<'_> {
        Pairs::new(&self.words)
    }

    /// Consumes the set, returning the sorted words.
    pub fn into_vec(self) -> Vec<String> {
        self.words
    }
}

impl<'a> IntoIterator for &'a WordSet {
    type Item = &'a String;
    type IntoIter = std::slice::Iter<'a, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.words.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn test_sorts_case_insensitively() {
        let set = WordSet::new(["banana", "Apple", "cherry", "apple"]).unwrap();
        assert_eq!(set.as_slice(), &["Apple", "apple", "banana", "cherry"]);
    }

    #[test]
    fn test_empty_is_rejected() {
        let empty: Vec<String> = Vec::new();
        assert!(matches!(WordSet::new(empty), Err(RdmError::EmptyWordList)));
    }

    #[test]
    fn test_duplicates_are_preserved() {
        let set = WordSet::new(["dog", "cat", "dog"]).unwrap();
        assert_eq!(set.as_slice(), &["cat", "dog", "dog"]);
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_without_removes_every_occurrence() {
        let set = WordSet::new(["powder", "cat", "turnip", "dog"]).unwrap();
        let filtered = set.without(&["powder", "turnip"]).unwrap();
        assert_eq!(filtered.as_slice(), &["cat", "dog"]);

        let mixed_case = WordSet::new(["Turnip", "cat", "POWDER", "turnip"]).unwrap();
        let filtered = mixed_case.without(&["powder", "turnip"]).unwrap();
        assert_eq!(filtered.as_slice(), &["cat"]);

        let only_excluded = WordSet::new(["powder"]).unwrap();
        assert!(only_excluded.without(&["powder"]).is_err());
    }

    #[test]
    fn test_parse_lines_drops_blanks() {
        let words = WordSet::parse_lines("cat\n\n  dog \r\n\n");
        assert_eq!(words, vec!["cat", "dog"]);
    }

    #[test]
    fn test_from_files_concatenates() {
        let dir = tempfile::tempdir().unwrap();
        let aloud = dir.path().join("aloud_words.txt");
        let silent = dir.path().join("silent_words.txt");
        writeln!(fs::File::create(&aloud).unwrap(), "zebra\nant").unwrap();
        writeln!(fs::File::create(&silent).unwrap(), "moth\n").unwrap();

        let set = WordSet::from_files(&[&aloud, &silent]).unwrap();
        assert_eq!(set.as_slice(), &["ant", "moth", "zebra"]);
    }

    #[test]
    fn test_from_files_reports_missing_path() {
        let err = WordSet::from_files(&["/definitely/not/here.txt"]).unwrap_err();
        assert!(err.to_string().contains("/definitely/not/here.txt"));
    }
}
