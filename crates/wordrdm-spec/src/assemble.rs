//! Matrix assembly from channels.

use log::{debug, info};

use crate::channel::{ChannelKind, JointChannel, PairwiseChannel};
use crate::correlation::CorrelationFeature;
use crate::error::{RdmError, RdmResult};
use crate::matrix::DistanceMatrix;
use crate::words::WordSet;

/// Applies a channel's fixed exclusion list to a word set.
pub fn prepare_words(words: &WordSet, kind: ChannelKind) -> RdmResult<WordSet> {
    let excluded = kind.excluded_words();
    if excluded.is_empty() {
        return Ok(words.clone());
    }
    let prepared = words.without(excluded)?;
    if prepared.len() != words.len() {
        info!(
            "{}: excluded {} word(s) without ratings",
            kind,
            words.len() - prepared.len()
        );
    }
    Ok(prepared)
}

/// Builds a matrix by calling a pairwise channel once per ordered pair.
pub fn build_pairwise<C>(words: &WordSet, channel: &C) -> RdmResult<DistanceMatrix>
where
    C: PairwiseChannel + ?Sized,
{
    build_pairwise_with_progress(words, channel, |_, _| {})
}

/// Like [`build_pairwise`], reporting `(done, total)` after every pair.
pub fn build_pairwise_with_progress<C, F>(
    words: &WordSet,
    channel: &C,
    mut progress: F,
) -> RdmResult<DistanceMatrix>
where
    C: PairwiseChannel + ?Sized,
    F: FnMut(usize, usize),
{
    let kind = channel.kind();
    let words = prepare_words(words, kind)?;
    let mut matrix = DistanceMatrix::empty(&words);
    let pairs = words.pairs();
    let total = pairs.len();

    for (done, pair) in pairs.enumerate() {
        let distance = channel.distance(pair.first, pair.second)?;
        debug!("{}: {} / {} = {}", kind, pair.first, pair.second, distance);
        matrix.set(pair.row, pair.col, distance);
        progress(done + 1, total);
    }

    matrix.zero_diagonal();
    info!("{}: built {}x{} matrix", kind, matrix.size(), matrix.size());
    Ok(matrix)
}

/// Builds a matrix from a joint channel: features once per word, then
/// correlation distance for every unordered pair, mirrored.
pub fn build_joint<C>(words: &WordSet, channel: &C) -> RdmResult<DistanceMatrix>
where
    C: JointChannel + ?Sized,
{
    let kind = channel.kind();
    let words = prepare_words(words, kind)?;
    let features = channel.features(&words)?;
    if features.len() != words.len() {
        return Err(RdmError::DimensionMismatch {
            expected: words.len(),
            found: features.len(),
        });
    }
    debug!(
        "{}: {} feature vectors of dimension {}",
        kind,
        features.len(),
        features.first().map(|f| f.dimension()).unwrap_or(0)
    );

    let mut matrix = DistanceMatrix::empty(&words);
    for i in 0..features.len() {
        for j in (i + 1)..features.len() {
            let distance = features[i].correlation_distance(&features[j])?;
            matrix.set(i, j, distance);
            matrix.set(j, i, distance);
        }
    }

    matrix.zero_diagonal();
    info!("{}: built {}x{} matrix", kind, matrix.size(), matrix.size());
    Ok(matrix)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::correlation::DenseFeatures;
    use std::cell::RefCell;

    struct CountingChannel {
        calls: RefCell<Vec<(String, String)>>,
        kind: ChannelKind,
    }

    impl CountingChannel {
        fn new(kind: ChannelKind) -> Self {
            Self {
                calls: RefCell::new(Vec::new()),
                kind,
            }
        }
    }

    impl PairwiseChannel for CountingChannel {
        fn kind(&self) -> ChannelKind {
            self.kind
        }

        fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
            self.calls
                .borrow_mut()
                .push((first.to_string(), second.to_string()));
            Ok((first.len() + 10 * second.len()) as f64)
        }
    }

    struct FailingChannel;

    impl PairwiseChannel for FailingChannel {
        fn kind(&self) -> ChannelKind {
            ChannelKind::Semantic
        }

        fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
            if second == "zzz" {
                return Err(RdmError::lookup_miss("semantic", second, "test"));
            }
            Ok(first.len() as f64)
        }
    }

    struct LengthFeatures;

    impl JointChannel for LengthFeatures {
        type Feature = DenseFeatures;

        fn kind(&self) -> ChannelKind {
            ChannelKind::Orthographic
        }

        fn features(&self, words: &WordSet) -> RdmResult<Vec<DenseFeatures>> {
            Ok(words
                .iter()
                .map(|w| DenseFeatures(w.bytes().map(f64::from).collect()))
                .collect())
        }
    }

    #[test]
    fn test_each_ordered_pair_called_once() {
        let words = WordSet::new(["a", "bb", "ccc", "dddd"]).unwrap();
        let channel = CountingChannel::new(ChannelKind::WordLength);
        let matrix = build_pairwise(&words, &channel).unwrap();

        let calls = channel.calls.borrow();
        assert_eq!(calls.len(), 12);
        let mut unique = calls.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 12);
        assert!(calls.iter().all(|(a, b)| a != b));
        assert_eq!(matrix.filled_cells(), 16);
        // Directed: value at (row, col) comes from distance(row, col)
        assert_eq!(matrix.get_by_word("a", "bb"), Some(21.0));
        assert_eq!(matrix.get_by_word("bb", "a"), Some(12.0));
    }

    #[test]
    fn test_diagonal_is_zero() {
        let words = WordSet::new(["x", "y", "z"]).unwrap();
        let matrix = build_pairwise(&words, &CountingChannel::new(ChannelKind::WordLength)).unwrap();
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), Some(0.0));
        }
    }

    #[test]
    fn test_lookup_miss_aborts_build() {
        let words = WordSet::new(["aaa", "zzz"]).unwrap();
        let err = build_pairwise(&words, &FailingChannel).unwrap_err();
        assert!(matches!(err, RdmError::LookupMiss { ref word, .. } if word == "zzz"));
    }

    #[test]
    fn test_imageability_exclusions_applied() {
        let words = WordSet::new(["turnip", "apple", "powder", "house"]).unwrap();
        let channel = CountingChannel::new(ChannelKind::Imageability);
        let matrix = build_pairwise(&words, &channel).unwrap();
        assert_eq!(matrix.labels(), &["apple", "house"]);
        assert!(channel
            .calls
            .borrow()
            .iter()
            .all(|(a, b)| a != "turnip" && b != "powder"));
    }

    #[test]
    fn test_progress_reports_total() {
        let words = WordSet::new(["a", "b", "c"]).unwrap();
        let mut seen = Vec::new();
        build_pairwise_with_progress(
            &words,
            &CountingChannel::new(ChannelKind::WordLength),
            |done, total| seen.push((done, total)),
        )
        .unwrap();
        assert_eq!(seen.len(), 6);
        assert_eq!(seen.last(), Some(&(6, 6)));
    }

    #[test]
    fn test_joint_is_symmetric_with_zero_diagonal() {
        let words = WordSet::new(["abc", "abd", "cba"]).unwrap();
        let matrix = build_joint(&words, &LengthFeatures).unwrap();
        assert!(matrix.is_symmetric(0.0));
        for i in 0..3 {
            assert_eq!(matrix.get(i, i), Some(0.0));
        }
        let reversed = matrix.get_by_word("abc", "cba").unwrap();
        assert!((reversed - 2.0).abs() < 1e-12);
    }
}
