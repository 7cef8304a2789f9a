//! Orthographic channel: open-bigram vectors compared by correlation distance.
//!
//! An open bigram is any ordered pair of letters in a word, adjacent or not
//! ("cat" → ca, ct, at). The feature space is the set of bigrams occurring
//! anywhere in the list, so each word's vector depends on the whole list.

use std::collections::{BTreeMap, BTreeSet};

use wordrdm_spec::{ChannelKind, DenseFeatures, JointChannel, RdmResult, WordSet};

/// Open bigrams of a word with their counts.
pub fn open_bigrams(word: &str) -> BTreeMap<(char, char), usize> {
    let chars: Vec<char> = word.chars().collect();
    let mut counts = BTreeMap::new();
    for i in 0..chars.len() {
        for j in (i + 1)..chars.len() {
            *counts.entry((chars[i], chars[j])).or_insert(0) += 1;
        }
    }
    counts
}

/// Joint channel producing open-bigram count vectors.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrthographicChannel;

impl JointChannel for OrthographicChannel {
    type Feature = DenseFeatures;

    fn kind(&self) -> ChannelKind {
        ChannelKind::Orthographic
    }

    fn features(&self, words: &WordSet) -> RdmResult<Vec<DenseFeatures>> {
        let per_word: Vec<BTreeMap<(char, char), usize>> =
            words.iter().map(open_bigrams).collect();
        let vocabulary: BTreeSet<(char, char)> = per_word
            .iter()
            .flat_map(|counts| counts.keys().copied())
            .collect();

        Ok(per_word
            .iter()
            .map(|counts| {
                DenseFeatures(
                    vocabulary
                        .iter()
                        .map(|bigram| counts.get(bigram).copied().unwrap_or(0) as f64)
                        .collect(),
                )
            })
            .collect())
    }
}
