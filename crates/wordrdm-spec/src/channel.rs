//! Channel identities and the two channel contracts.
//!
//! Most channels are *pairwise*: a distance is computed from two words in
//! isolation. The orthographic and visual channels are *joint*: one feature
//! vector is computed per word and the matrix is derived from correlation
//! distance over all vectors, so their values depend on the whole list.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::correlation::CorrelationFeature;
use crate::error::{RdmError, RdmResult};
use crate::words::WordSet;

/// Words without imageability ratings; always dropped from imageability RDMs.
pub const IMAGEABILITY_EXCLUDED: &[&str] = &[
    "account",
    "campaign",
    "century",
    "department",
    "journey",
    "painting",
    "powder",
    "turnip",
];

/// How a channel produces its matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelShape {
    /// One call per ordered word pair.
    Pairwise,
    /// One feature vector per word, then correlation distance.
    Joint,
    /// Pairwise per speaker/session, then averaged.
    Aggregated,
}

/// Every supported similarity theory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChannelKind {
    /// Phonological edit distance over corpus transcriptions.
    Articulatory,
    /// Open-bigram correlation distance.
    Orthographic,
    /// Euclidean distance of grapheme-to-phoneme consistency triples.
    Phonological,
    /// MFCC + DTW distance between recordings.
    Acoustic,
    /// One minus embedding cosine similarity.
    Semantic,
    /// Rendered-silhouette correlation distance.
    Visual,
    /// Difference in character count.
    WordLength,
    /// Difference in concreteness ratings.
    Concreteness,
    /// Difference in imageability ratings.
    Imageability,
    /// Difference in morpheme counts.
    Morphology,
    /// Difference in noun/verb category.
    SyntacticCategory,
}

impl ChannelKind {
    /// All channels in a stable order.
    pub const ALL: [ChannelKind; 11] = [
        ChannelKind::Articulatory,
        ChannelKind::Orthographic,
        ChannelKind::Phonological,
        ChannelKind::Acoustic,
        ChannelKind::Semantic,
        ChannelKind::Visual,
        ChannelKind::WordLength,
        ChannelKind::Concreteness,
        ChannelKind::Imageability,
        ChannelKind::Morphology,
        ChannelKind::SyntacticCategory,
    ];

    /// Kebab-case name used on the command line, in configs and file names.
    pub fn as_str(&self) -> &'static str {
        match self {
            ChannelKind::Articulatory => "articulatory",
            ChannelKind::Orthographic => "orthographic",
            ChannelKind::Phonological => "phonological",
            ChannelKind::Acoustic => "acoustic",
            ChannelKind::Semantic => "semantic",
            ChannelKind::Visual => "visual",
            ChannelKind::WordLength => "word-length",
            ChannelKind::Concreteness => "concreteness",
            ChannelKind::Imageability => "imageability",
            ChannelKind::Morphology => "morphology",
            ChannelKind::SyntacticCategory => "syntactic-category",
        }
    }

    /// How the channel's matrix is assembled.
    pub fn shape(&self) -> ChannelShape {
        match self {
            ChannelKind::Orthographic | ChannelKind::Visual => ChannelShape::Joint,
            ChannelKind::Acoustic => ChannelShape::Aggregated,
            _ => ChannelShape::Pairwise,
        }
    }

    /// Name of the study-config section holding this channel's asset, if any.
    pub fn required_asset(&self) -> Option<&'static str> {
        match self {
            ChannelKind::Articulatory => Some("phonetic_corpus"),
            ChannelKind::Phonological => Some("g2p_consistency"),
            ChannelKind::Acoustic => Some("audio"),
            ChannelKind::Semantic => Some("embeddings"),
            ChannelKind::Concreteness => Some("concreteness"),
            ChannelKind::Imageability => Some("imageability"),
            ChannelKind::Morphology => Some("morphology"),
            ChannelKind::SyntacticCategory => Some("syntactic_category"),
            ChannelKind::Orthographic | ChannelKind::Visual | ChannelKind::WordLength => None,
        }
    }

    /// One-line description for listings.
    pub fn description(&self) -> &'static str {
        match self {
            ChannelKind::Articulatory => {
                "phonological edit distance / longer word length (phonetic corpus)"
            }
            ChannelKind::Orthographic => "open-bigram vectors, correlation distance",
            ChannelKind::Phonological => "euclidean distance of G2P consistency (O, N, C)",
            ChannelKind::Acoustic => "MFCC + DTW distance averaged over speakers/sessions",
            ChannelKind::Semantic => "1 - cosine similarity of word embeddings",
            ChannelKind::Visual => "rendered word silhouettes, correlation distance",
            ChannelKind::WordLength => "absolute difference in character count",
            ChannelKind::Concreteness => "absolute difference in concreteness ratings",
            ChannelKind::Imageability => "absolute difference in imageability ratings",
            ChannelKind::Morphology => "absolute difference in morpheme counts",
            ChannelKind::SyntacticCategory => "absolute difference in noun(0)/noun+verb(1)",
        }
    }

    /// Words this channel always drops before building.
    pub fn excluded_words(&self) -> &'static [&'static str] {
        match self {
            ChannelKind::Imageability => IMAGEABILITY_EXCLUDED,
            _ => &[],
        }
    }
}

impl fmt::Display for ChannelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChannelKind {
    type Err = RdmError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase().replace('_', "-");
        ChannelKind::ALL
            .iter()
            .copied()
            .find(|k| k.as_str() == normalized)
            .ok_or_else(|| {
                RdmError::InvalidConfig(format!(
                    "unknown channel '{}' (expected one of: {})",
                    s,
                    ChannelKind::ALL
                        .iter()
                        .map(|k| k.as_str())
                        .collect::<Vec<_>>()
                        .join(", ")
                ))
            })
    }
}

/// A distance computed independently for each word pair.
pub trait PairwiseChannel {
    /// Which theory this channel implements.
    fn kind(&self) -> ChannelKind;

    /// Distance between two words. Never called for diagonal cells.
    fn distance(&self, first: &str, second: &str) -> RdmResult<f64>;
}

/// A distance derived from per-word features computed over the whole list.
pub trait JointChannel {
    /// Feature vector type.
    type Feature: CorrelationFeature;

    /// Which theory this channel implements.
    fn kind(&self) -> ChannelKind;

    /// One feature vector per word, in `words` order.
    fn features(&self, words: &WordSet) -> RdmResult<Vec<Self::Feature>>;
}

impl<T: PairwiseChannel + ?Sized> PairwiseChannel for &T {
    fn kind(&self) -> ChannelKind {
        (**self).kind()
    }

    fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
        (**self).distance(first, second)
    }
}

impl<T: PairwiseChannel + ?Sized> PairwiseChannel for Box<T> {
    fn kind(&self) -> ChannelKind {
        (**self).kind()
    }

    fn distance(&self, first: &str, second: &str) -> RdmResult<f64> {
        (**self).distance(first, second)
    }
}
