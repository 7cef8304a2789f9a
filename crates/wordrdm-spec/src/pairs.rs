//! Ordered pair enumeration.

/// One ordered pair of distinct positions in a word set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordPair<'a> {
    /// Row index.
    pub row: usize,
    /// Column index.
    pub col: usize,
    /// Word at `row`.
    pub first: &'a str,
    /// Word at `col`.
    pub second: &'a str,
}

/// Lazy iterator over all N(N-1) ordered pairs; the first word varies slowest.
///
/// A clone continues from the current position. Call
/// [`crate::WordSet::pairs`] again for a fresh sequence.
#[derive(Debug, Clone)]
pub struct Pairs<'a> {
    words: &'a [String],
    row: usize,
    col: usize,
    remaining: usize,
}

impl<'a> Pairs<'a> {
    pub(crate) fn new(words: &'a [String]) -> Self {
        let n = words.len();
        let mut pairs = Self {
            words,
            row: 0,
            col: 0,
            remaining: n * n.saturating_sub(1),
        };
        pairs.skip_diagonal();
        pairs
    }

    fn skip_diagonal(&mut self) {
        if self.row == self.col {
            self.col += 1;
        }
        if self.col >= self.words.len() {
            self.row += 1;
            self.col = if self.row == 0 { 1 } else { 0 };
        }
    }
}

impl<'a> Iterator for Pairs<'a> {
    type Item = WordPair<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let pair = WordPair {
            row: self.row,
            col: self.col,
            first: &self.words[self.row],
            second: &self.words[self.col],
        };
        self.remaining -= 1;
        self.col += 1;
        self.skip_diagonal();
        Some(pair)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Pairs<'_> {}

#[cfg(test)]
mod tests {
    use crate::WordSet;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_permutation_order() {
        let set = WordSet::new(["c", "a", "b"]).unwrap();
        let pairs: Vec<(&str, &str)> = set.pairs().map(|p| (p.first, p.second)).collect();
        assert_eq!(
            pairs,
            vec![
                ("a", "b"),
                ("a", "c"),
                ("b", "a"),
                ("b", "c"),
                ("c", "a"),
                ("c", "b"),
            ]
        );
    }

    #[test]
    fn test_count_and_len() {
        let set = WordSet::new(["w1", "w2", "w3", "w4", "w5"]).unwrap();
        let pairs = set.pairs();
        assert_eq!(pairs.len(), 20);
        assert_eq!(pairs.count(), 20);
    }

    #[test]
    fn test_single_word_has_no_pairs() {
        let set = WordSet::new(["alone"]).unwrap();
        assert_eq!(set.pairs().next(), None);
        assert_eq!(set.pairs().len(), 0);
    }

    #[test]
    fn test_never_yields_diagonal_and_is_restartable() {
        let set = WordSet::new(["x", "y", "z", "w"]).unwrap();
        assert!(set.pairs().all(|p| p.row != p.col));
        let first: Vec<_> = set.pairs().collect();
        let second: Vec<_> = set.pairs().collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_duplicate_words_pair_by_position() {
        let set = WordSet::new(["dog", "dog"]).unwrap();
        let pairs: Vec<(usize, usize)> = set.pairs().map(|p| (p.row, p.col)).collect();
        assert_eq!(pairs, vec![(0, 1), (1, 0)]);
    }
}
